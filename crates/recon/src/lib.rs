//! `rinkdata-recon` — Cross-source reconciliation engine for game event data.
//!
//! Pure engine crate: receives pre-loaded source documents, returns a
//! classified analysis. No CLI or IO dependencies.

pub mod compare;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod model;
pub mod quality;
pub mod rules;
pub mod scenario;

pub use config::AnalysisConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{AnalysisResult, DocumentSet, EventRecord};
