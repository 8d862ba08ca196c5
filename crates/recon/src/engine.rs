//! Run orchestration: one config plus pre-loaded documents in, one
//! `AnalysisResult` out. The engine never touches the filesystem; loading
//! (and any retry policy around it) belongs to the caller.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::compare;
use crate::config::AnalysisConfig;
use crate::detect;
use crate::error::ReconError;
use crate::model::{
    AnalysisMeta, AnalysisResult, DiscrepancyKind, DocumentSet, EventKind, EventRecord,
    ScenarioKind, SourceDetail, SourceDocument, SourceSummary,
};
use crate::quality;
use crate::rules;
use crate::scenario;

pub fn run(config: &AnalysisConfig, documents: &DocumentSet) -> Result<AnalysisResult, ReconError> {
    config.validate()?;

    let mut discrepancies = Vec::new();
    let mut summaries: BTreeMap<String, SourceSummary> = BTreeMap::new();
    let mut details: BTreeMap<String, Vec<EventRecord>> = BTreeMap::new();
    let mut aggregates: BTreeMap<String, Vec<EventRecord>> = BTreeMap::new();

    // Availability pass: every configured source gets a summary, and every
    // absent or failed one gets a discrepancy before any matching runs.
    for (name, source) in &config.sources {
        let detail = source.detail();
        match documents.documents.get(name) {
            None => {
                discrepancies.push(rules::discrepancy(
                    DiscrepancyKind::MissingSourceData,
                    format!("no document provided for source {name}"),
                    vec![name.clone()],
                    Vec::new(),
                ));
                summaries.insert(
                    name.clone(),
                    SourceSummary {
                        detail,
                        count: 0,
                        error: Some("no document provided".into()),
                    },
                );
            }
            Some(SourceDocument::Failed(message)) => {
                discrepancies.push(rules::discrepancy(
                    DiscrepancyKind::DataSourceError,
                    format!("source {name} failed to load: {message}"),
                    vec![name.clone()],
                    Vec::new(),
                ));
                summaries.insert(
                    name.clone(),
                    SourceSummary {
                        detail,
                        count: 0,
                        error: Some(message.clone()),
                    },
                );
            }
            Some(SourceDocument::Loaded(document)) => {
                let records =
                    crate::extract::extract(name, source.format, config.event_kind, document);
                summaries.insert(
                    name.clone(),
                    SourceSummary {
                        detail,
                        count: records.len(),
                        error: None,
                    },
                );
                match detail {
                    SourceDetail::FullDetail => details.insert(name.clone(), records),
                    SourceDetail::AggregateOnly => aggregates.insert(name.clone(), records),
                };
            }
        }
    }

    discrepancies.extend(detect::detect(&details, &aggregates, &config.matching));

    let primary_records: &[EventRecord] = details
        .get(&config.primary)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    discrepancies.extend(detect::cross_check_minutes(
        &config.primary,
        primary_records,
        &aggregates,
    ));

    // Scenario classification reads penalty-specific vocabulary; a goal run
    // reconciles records but carries no scenarios.
    let scenarios = if config.event_kind == EventKind::Penalty {
        scenario::classify(primary_records)
    } else {
        Vec::new()
    };

    // Coincident penalties are where sources disagree most, so each group
    // gets an explicit verification discrepancy alongside the scenario.
    for s in &scenarios {
        if s.kind == ScenarioKind::SimultaneousPenalties {
            discrepancies.push(rules::discrepancy(
                DiscrepancyKind::SimultaneousPenaltyValidation,
                format!("verify across sources: {}", s.description),
                details.keys().cloned().collect(),
                s.records.clone(),
            ));
        }
    }

    let quality = quality::assess(&summaries);
    let recommendations = rules::recommend(&discrepancies, &quality);

    let mut all_records = details.clone();
    all_records.extend(aggregates);
    let comparison = compare::table(&all_records);

    Ok(AnalysisResult {
        meta: AnalysisMeta {
            game_id: config.game_id.clone(),
            season: config.season.clone(),
            event_kind: config.event_kind,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
        },
        sources: summaries,
        discrepancies,
        scenarios,
        quality,
        recommendations,
        comparison,
    })
}
