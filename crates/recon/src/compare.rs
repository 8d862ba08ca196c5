use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ComparisonCell, ComparisonRow, EventRecord};

/// Build the side-by-side comparison table over every source's records.
///
/// One row per distinct (time, player, description) key seen anywhere, keyed
/// with absent fields as empty strings so partial records still land in a
/// row. Every source appears in every row; `None` marks a gap. Rows are in
/// key order, so the table is stable across runs.
pub fn table(records_by_source: &BTreeMap<String, Vec<EventRecord>>) -> Vec<ComparisonRow> {
    let keys: BTreeSet<(String, String, String)> = records_by_source
        .values()
        .flatten()
        .map(row_key)
        .collect();

    keys.into_iter()
        .map(|key| {
            let sources: BTreeMap<String, Option<ComparisonCell>> = records_by_source
                .iter()
                .map(|(source, records)| {
                    let cell = records.iter().find(|r| row_key(r) == key).map(|r| {
                        ComparisonCell {
                            minutes: r.minutes,
                            category: r.category.clone(),
                            team: r.team.clone(),
                        }
                    });
                    (source.clone(), cell)
                })
                .collect();
            ComparisonRow {
                time: non_empty(key.0),
                player: non_empty(key.1),
                description: non_empty(key.2),
                sources,
            }
        })
        .collect()
}

fn row_key(record: &EventRecord) -> (String, String, String) {
    (
        record.time.clone().unwrap_or_default(),
        record.player.clone().unwrap_or_default(),
        record.description.clone().unwrap_or_default(),
    )
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
