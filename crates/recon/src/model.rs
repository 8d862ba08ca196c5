use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A raw per-source document, as handed over by the loading collaborator.
///
/// A source that could not be loaded or parsed arrives as `Failed` so the
/// engine can record a `data_source_error` instead of aborting the run.
#[derive(Debug, Clone)]
pub enum SourceDocument {
    Loaded(serde_json::Value),
    Failed(String),
}

/// Pre-loaded documents keyed by source name.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    pub documents: BTreeMap<String, SourceDocument>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, source: impl Into<String>, document: serde_json::Value) {
        self.documents
            .insert(source.into(), SourceDocument::Loaded(document));
    }

    pub fn fail(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.documents
            .insert(source.into(), SourceDocument::Failed(message.into()));
    }
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Penalty,
    Goal,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Penalty => write!(f, "penalty"),
            Self::Goal => write!(f, "goal"),
        }
    }
}

/// Detail level a source can deliver. Aggregate-only sources (per-player
/// cumulative minutes) cannot be matched one-to-one against discrete events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceDetail {
    FullDetail,
    AggregateOnly,
}

impl std::fmt::Display for SourceDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullDetail => write!(f, "full_detail"),
            Self::AggregateOnly => write!(f, "aggregate_only"),
        }
    }
}

/// One normalized event occurrence from one source.
///
/// `kind` and `source` are always present; everything else is optional and
/// `None` means "the source did not say" — never reused for zero minutes or
/// an unattributed team event, which are encoded as `Some(0)` / `None` player
/// respectively. Records are immutable once extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub kind: EventKind,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl EventRecord {
    /// A record with only the mandatory fields set.
    pub fn bare(kind: EventKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            time: None,
            period: None,
            team: None,
            player: None,
            description: None,
            category: None,
            minutes: None,
            situation_code: None,
            event_id: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Discrepancies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    CountMismatch,
    MissingPenalty,
    PenaltyMinutesMismatch,
    MissingSourceData,
    DataSourceError,
    PlayerNameMismatch,
    SimultaneousPenaltyValidation,
}

impl std::fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CountMismatch => write!(f, "count_mismatch"),
            Self::MissingPenalty => write!(f, "missing_penalty"),
            Self::PenaltyMinutesMismatch => write!(f, "penalty_minutes_mismatch"),
            Self::MissingSourceData => write!(f, "missing_source_data"),
            Self::DataSourceError => write!(f, "data_source_error"),
            Self::PlayerNameMismatch => write!(f, "player_name_mismatch"),
            Self::SimultaneousPenaltyValidation => write!(f, "simultaneous_penalty_validation"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A detected disagreement between sources. Severity is assigned from the
/// rule table in `rules`, never ad hoc at the emission site.
#[derive(Debug, Clone, Serialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub severity: Severity,
    pub description: String,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<EventRecord>,
}

// ---------------------------------------------------------------------------
// Complex scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    SimultaneousPenalties,
    MultipleTeamPenalties,
    TeamPenalties,
    NonPowerPlayPenalties,
    PenaltyShots,
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimultaneousPenalties => write!(f, "simultaneous_penalties"),
            Self::MultipleTeamPenalties => write!(f, "multiple_team_penalties"),
            Self::TeamPenalties => write!(f, "team_penalties"),
            Self::NonPowerPlayPenalties => write!(f, "non_power_play_penalties"),
            Self::PenaltyShots => write!(f, "penalty_shots"),
        }
    }
}

/// A pattern among records needing interpretation beyond presence/absence.
/// `records` keeps discovery order; a scenario is never emitted empty.
#[derive(Debug, Clone, Serialize)]
pub struct ComplexScenario {
    pub kind: ScenarioKind,
    pub description: String,
    pub impact: String,
    pub records: Vec<EventRecord>,
}

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    Complete,
    Partial,
    Missing,
}

impl std::fmt::Display for Completeness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Partial => write!(f, "partial"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Consistent,
    Inconsistent,
}

impl std::fmt::Display for Consistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consistent => write!(f, "consistent"),
            Self::Inconsistent => write!(f, "inconsistent"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityAssessment {
    pub completeness: BTreeMap<String, Completeness>,
    pub consistency: BTreeMap<String, Consistency>,
    pub overall_score: f64,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

/// Per-source cell for one comparison row; `None` in the outer map value
/// means the source has no record for the row's key.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

/// One row per distinct (time, player, description) key seen in any source,
/// for side-by-side human review.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sources: BTreeMap<String, Option<ComparisonCell>>,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Per-source outcome of the extraction step.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub detail: SourceDetail,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMeta {
    pub game_id: String,
    pub season: String,
    pub event_kind: EventKind,
    pub engine_version: String,
    pub generated_at: String,
}

/// The complete output of one reconciliation run. Created fresh per run and
/// never persisted by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub meta: AnalysisMeta,
    pub sources: BTreeMap<String, SourceSummary>,
    pub discrepancies: Vec<Discrepancy>,
    pub scenarios: Vec<ComplexScenario>,
    pub quality: QualityAssessment,
    pub recommendations: Vec<Recommendation>,
    pub comparison: Vec<ComparisonRow>,
}
