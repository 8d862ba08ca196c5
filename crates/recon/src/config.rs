use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::{EventKind, SourceDetail};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One reconciliation run: one game, one event kind, a set of sources.
#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    pub game_id: String,
    pub season: String,
    /// Most authoritative source; drives scenario classification and the
    /// aggregate minutes cross-check.
    pub primary: String,
    #[serde(default = "default_event_kind")]
    pub event_kind: EventKind,
    pub sources: BTreeMap<String, SourceConfig>,
    #[serde(default)]
    pub matching: MatchOptions,
}

fn default_event_kind() -> EventKind {
    EventKind::Penalty
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub format: SourceFormat,
    pub file: String,
    /// Defaults per format; only boxscore is aggregate-only.
    #[serde(default)]
    pub detail: Option<SourceDetail>,
}

impl SourceConfig {
    pub fn detail(&self) -> SourceDetail {
        self.detail.unwrap_or_else(|| self.format.default_detail())
    }
}

/// Which extractor understands the raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    GamecenterLanding,
    Boxscore,
    Playbyplay,
    ParsedHtml,
    ParsedPenalties,
}

impl SourceFormat {
    pub fn default_detail(&self) -> SourceDetail {
        match self {
            Self::Boxscore => SourceDetail::AggregateOnly,
            _ => SourceDetail::FullDetail,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GamecenterLanding => write!(f, "gamecenter_landing"),
            Self::Boxscore => write!(f, "boxscore"),
            Self::Playbyplay => write!(f, "playbyplay"),
            Self::ParsedHtml => write!(f, "parsed_html"),
            Self::ParsedPenalties => write!(f, "parsed_penalties"),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Matching is byte-exact by default; `normalize` trims and case-folds both
/// sides of a key. Turning it on can change discrepancy counts, so it is an
/// explicit opt-in.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MatchOptions {
    #[serde(default)]
    pub normalize: bool,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl AnalysisConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: AnalysisConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.sources.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least 1 source is required".into(),
            ));
        }

        let primary = self
            .sources
            .get(&self.primary)
            .ok_or_else(|| ReconError::UnknownSource(self.primary.clone()))?;
        if primary.detail() != SourceDetail::FullDetail {
            return Err(ReconError::ConfigValidation(format!(
                "primary source '{}' must be full_detail",
                self.primary
            )));
        }

        for (name, source) in &self.sources {
            if source.format == SourceFormat::Boxscore
                && source.detail() == SourceDetail::FullDetail
            {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{name}': boxscore carries per-player totals only and cannot be full_detail"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
