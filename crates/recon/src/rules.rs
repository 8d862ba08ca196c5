//! Severity and recommendation rule tables.
//!
//! Every discrepancy severity and recommendation priority in the engine is
//! assigned here, so the mapping stays auditable and testable in one place.

use crate::model::{
    Discrepancy, DiscrepancyKind, EventRecord, Priority, QualityAssessment, Recommendation,
    Severity,
};

/// Quality score below which extraction fidelity is flagged.
pub const QUALITY_SCORE_FLOOR: f64 = 80.0;

pub fn severity_for(kind: DiscrepancyKind) -> Severity {
    match kind {
        DiscrepancyKind::CountMismatch | DiscrepancyKind::MissingSourceData => Severity::High,
        DiscrepancyKind::MissingPenalty
        | DiscrepancyKind::PenaltyMinutesMismatch
        | DiscrepancyKind::DataSourceError
        | DiscrepancyKind::PlayerNameMismatch
        | DiscrepancyKind::SimultaneousPenaltyValidation => Severity::Medium,
    }
}

/// The only constructor for discrepancies; severity comes from the table.
pub fn discrepancy(
    kind: DiscrepancyKind,
    description: String,
    sources: Vec<String>,
    records: Vec<EventRecord>,
) -> Discrepancy {
    Discrepancy {
        kind,
        severity: severity_for(kind),
        description,
        sources,
        records,
    }
}

/// Fixed-priority rule set mapping discrepancy patterns to recommended
/// actions. The catch-all consistency-check recommendation is always last.
pub fn recommend(
    discrepancies: &[Discrepancy],
    quality: &QualityAssessment,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if let Some(count) = discrepancies
        .iter()
        .find(|d| d.kind == DiscrepancyKind::CountMismatch)
    {
        recommendations.push(Recommendation {
            priority: Priority::High,
            action: "Investigate penalty count discrepancies".into(),
            description: "Review penalty extraction logic and identify missing penalties".into(),
            sources: count.sources.clone(),
        });
    }

    let mut missing_sources: Vec<String> = discrepancies
        .iter()
        .filter(|d| d.kind == DiscrepancyKind::MissingPenalty)
        .flat_map(|d| d.sources.iter().cloned())
        .collect();
    missing_sources.sort();
    missing_sources.dedup();
    if !missing_sources.is_empty() {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            action: "Cross-reference penalty data".into(),
            description: "Ensure all penalties are captured across all sources".into(),
            sources: missing_sources,
        });
    }

    if quality.overall_score < QUALITY_SCORE_FLOOR {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            action: "Improve data extraction".into(),
            description: format!(
                "Current quality score: {:.1}%. Focus on the least complete sources",
                quality.overall_score
            ),
            sources: Vec::new(),
        });
    }

    recommendations.push(Recommendation {
        priority: Priority::Low,
        action: "Establish automated consistency checks".into(),
        description: "Create automated checks for penalty data consistency".into(),
        sources: Vec::new(),
    });

    recommendations
}
