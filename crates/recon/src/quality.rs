use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    Completeness, Consistency, QualityAssessment, SourceDetail, SourceSummary,
};

/// Grade each source's coverage and the cross-source agreement on counts.
///
/// Aggregate-only sources can never score better than partial: per-player
/// totals cannot prove every discrete event was captured. The overall score
/// is the share of sources graded complete, as a percentage.
pub fn assess(sources: &BTreeMap<String, SourceSummary>) -> QualityAssessment {
    if sources.is_empty() {
        return QualityAssessment::default();
    }

    let mut quality = QualityAssessment::default();

    for (name, summary) in sources {
        // Aggregate-only sources grade partial unconditionally, load errors
        // and empty record counts included.
        let grade = if summary.detail == SourceDetail::AggregateOnly {
            Completeness::Partial
        } else if summary.error.is_some() || summary.count == 0 {
            Completeness::Missing
        } else {
            Completeness::Complete
        };
        quality.completeness.insert(name.clone(), grade);
    }

    // Counts only agree or disagree among full-detail sources that loaded;
    // aggregate rows are per-player, not per-event.
    let counts: BTreeSet<usize> = sources
        .values()
        .filter(|s| s.detail == SourceDetail::FullDetail && s.error.is_none())
        .map(|s| s.count)
        .collect();
    if !counts.is_empty() {
        let verdict = if counts.len() <= 1 {
            Consistency::Consistent
        } else {
            Consistency::Inconsistent
        };
        quality.consistency.insert("counts".into(), verdict);
    }

    let complete = quality
        .completeness
        .values()
        .filter(|c| **c == Completeness::Complete)
        .count();
    quality.overall_score = complete as f64 / sources.len() as f64 * 100.0;

    quality
}
