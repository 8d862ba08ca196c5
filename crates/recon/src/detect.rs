use std::collections::{BTreeMap, BTreeSet};

use crate::config::MatchOptions;
use crate::matcher::find_match;
use crate::model::{Discrepancy, DiscrepancyKind, EventRecord};
use crate::rules;

/// Fraction of the smaller player-name set two sources must share.
const PLAYER_NAME_OVERLAP: f64 = 0.8;

/// Run all per-record and count-level checks.
///
/// Per-record and count checks see full-detail sources only; the player-name
/// check is set-level, so aggregate sources (which carry per-player names)
/// participate in it too. Checks are independent and additive; one record may
/// contribute to several discrepancies. Iteration order is the map's key
/// order, so output is deterministic for identical inputs.
pub fn detect(
    details: &BTreeMap<String, Vec<EventRecord>>,
    aggregates: &BTreeMap<String, Vec<EventRecord>>,
    options: &MatchOptions,
) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();

    check_counts(details, &mut discrepancies);
    check_missing(details, options, &mut discrepancies);
    check_minutes(details, options, &mut discrepancies);
    check_player_names(details, aggregates, &mut discrepancies);

    discrepancies
}

fn check_counts(details: &BTreeMap<String, Vec<EventRecord>>, out: &mut Vec<Discrepancy>) {
    if details.len() < 2 {
        return;
    }
    let distinct: BTreeSet<usize> = details.values().map(Vec::len).collect();
    if distinct.len() > 1 {
        let listing: Vec<String> = details
            .iter()
            .map(|(source, records)| format!("{source}={}", records.len()))
            .collect();
        out.push(rules::discrepancy(
            DiscrepancyKind::CountMismatch,
            format!("penalty count mismatch: {}", listing.join(", ")),
            details.keys().cloned().collect(),
            Vec::new(),
        ));
    }
}

/// A record with no match in any *other* full-detail source is reported from
/// its own source's direction only.
fn check_missing(
    details: &BTreeMap<String, Vec<EventRecord>>,
    options: &MatchOptions,
    out: &mut Vec<Discrepancy>,
) {
    for (source, records) in details {
        for record in records {
            let found = details
                .iter()
                .filter(|(other, _)| *other != source)
                .any(|(_, candidates)| find_match(record, candidates, options).is_some());
            if !found {
                out.push(rules::discrepancy(
                    DiscrepancyKind::MissingPenalty,
                    format!(
                        "penalty missing from other sources: {}",
                        record.description.as_deref().unwrap_or("unknown")
                    ),
                    vec![source.clone()],
                    vec![record.clone()],
                ));
            }
        }
    }
}

fn check_minutes(
    details: &BTreeMap<String, Vec<EventRecord>>,
    options: &MatchOptions,
    out: &mut Vec<Discrepancy>,
) {
    for (source, records) in details {
        for record in records {
            let Some(minutes) = record.minutes else {
                continue;
            };
            for (other_source, candidates) in details {
                if other_source == source {
                    continue;
                }
                let Some(matched) = find_match(record, candidates, options) else {
                    continue;
                };
                if let Some(other_minutes) = matched.minutes {
                    if other_minutes != minutes {
                        out.push(rules::discrepancy(
                            DiscrepancyKind::PenaltyMinutesMismatch,
                            format!("penalty minutes mismatch: {minutes} vs {other_minutes}"),
                            vec![source.clone(), other_source.clone()],
                            vec![record.clone(), matched.clone()],
                        ));
                    }
                }
            }
        }
    }
}

fn check_player_names(
    details: &BTreeMap<String, Vec<EventRecord>>,
    aggregates: &BTreeMap<String, Vec<EventRecord>>,
    out: &mut Vec<Discrepancy>,
) {
    let names: BTreeMap<&String, BTreeSet<&str>> = details
        .iter()
        .chain(aggregates.iter())
        .map(|(source, records)| {
            let set: BTreeSet<&str> = records
                .iter()
                .filter_map(|r| r.player.as_deref())
                .filter(|p| !p.is_empty())
                .collect();
            (source, set)
        })
        .collect();

    let sources: Vec<&&String> = names.keys().collect();
    for (i, a) in sources.iter().enumerate() {
        for b in &sources[i + 1..] {
            let set_a = &names[**a];
            let set_b = &names[**b];
            if set_a.is_empty() || set_b.is_empty() {
                continue;
            }
            let common = set_a.intersection(set_b).count();
            let smaller = set_a.len().min(set_b.len());
            if (common as f64) < (smaller as f64) * PLAYER_NAME_OVERLAP {
                out.push(rules::discrepancy(
                    DiscrepancyKind::PlayerNameMismatch,
                    format!(
                        "player names diverge between {a} and {b}: {common} of {smaller} shared"
                    ),
                    vec![(**a).clone(), (**b).clone()],
                    Vec::new(),
                ));
            }
        }
    }
}

/// Compare the primary source's total minutes against each aggregate-only
/// source's summed per-player minutes. Aggregate sources cannot be matched
/// record-for-record, so the cross-check runs at the total level only.
pub fn cross_check_minutes(
    primary: &str,
    primary_records: &[EventRecord],
    aggregates: &BTreeMap<String, Vec<EventRecord>>,
) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();
    if primary_records.is_empty() {
        return discrepancies;
    }
    let primary_total: i64 = primary_records.iter().filter_map(|r| r.minutes).sum();

    for (source, records) in aggregates {
        if records.is_empty() {
            continue;
        }
        let total: i64 = records.iter().filter_map(|r| r.minutes).sum();
        if total != primary_total {
            discrepancies.push(rules::discrepancy(
                DiscrepancyKind::PenaltyMinutesMismatch,
                format!(
                    "total penalty minutes mismatch: {primary}={primary_total} vs {source}={total}"
                ),
                vec![primary.to_string(), source.clone()],
                Vec::new(),
            ));
        }
    }

    discrepancies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventKind, Severity};

    fn rec(source: &str, time: &str, player: &str, desc: &str, minutes: i64) -> EventRecord {
        let mut r = EventRecord::bare(EventKind::Penalty, source);
        r.time = Some(time.into());
        r.player = Some(player.into());
        r.description = Some(desc.into());
        r.minutes = Some(minutes);
        r
    }

    fn details(entries: Vec<(&str, Vec<EventRecord>)>) -> BTreeMap<String, Vec<EventRecord>> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn equal_counts_no_count_mismatch() {
        let d = details(vec![
            ("gamecenter_landing", vec![rec("gamecenter_landing", "04:12", "A", "tripping", 2)]),
            ("playbyplay", vec![rec("playbyplay", "04:12", "A", "tripping", 2)]),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        assert!(discrepancies
            .iter()
            .all(|d| d.kind != DiscrepancyKind::CountMismatch));
    }

    #[test]
    fn count_mismatch_lists_all_sources() {
        let d = details(vec![
            (
                "gamecenter_landing",
                vec![
                    rec("gamecenter_landing", "04:12", "A", "tripping", 2),
                    rec("gamecenter_landing", "10:00", "B", "hooking", 2),
                ],
            ),
            ("playbyplay", vec![rec("playbyplay", "04:12", "A", "tripping", 2)]),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        let count: Vec<_> = discrepancies
            .iter()
            .filter(|d| d.kind == DiscrepancyKind::CountMismatch)
            .collect();
        assert_eq!(count.len(), 1);
        assert_eq!(count[0].severity, Severity::High);
        assert_eq!(count[0].sources, vec!["gamecenter_landing", "playbyplay"]);
        assert!(count[0].description.contains("gamecenter_landing=2"));
        assert!(count[0].description.contains("playbyplay=1"));
    }

    #[test]
    fn missing_penalty_is_directional() {
        let d = details(vec![
            (
                "gamecenter_landing",
                vec![
                    rec("gamecenter_landing", "04:12", "A", "tripping", 2),
                    rec("gamecenter_landing", "10:00", "B", "hooking", 2),
                ],
            ),
            ("playbyplay", vec![rec("playbyplay", "04:12", "A", "tripping", 2)]),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        let missing: Vec<_> = discrepancies
            .iter()
            .filter(|d| d.kind == DiscrepancyKind::MissingPenalty)
            .collect();
        // Only the hooking record lacks a counterpart, reported from
        // gamecenter_landing's direction only.
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].sources, vec!["gamecenter_landing"]);
        assert_eq!(missing[0].records[0].description.as_deref(), Some("hooking"));
    }

    #[test]
    fn minutes_mismatch_names_both_sides() {
        let d = details(vec![
            ("gamecenter_landing", vec![rec("gamecenter_landing", "04:12", "A", "tripping", 2)]),
            ("playbyplay", vec![rec("playbyplay", "04:12", "A", "tripping", 5)]),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        let minutes: Vec<_> = discrepancies
            .iter()
            .filter(|d| d.kind == DiscrepancyKind::PenaltyMinutesMismatch)
            .collect();
        // Reported from both directions, like the baseline behavior.
        assert_eq!(minutes.len(), 2);
        assert_eq!(minutes[0].sources, vec!["gamecenter_landing", "playbyplay"]);
        assert_eq!(minutes[0].records.len(), 2);
    }

    #[test]
    fn minutes_absent_is_not_a_mismatch() {
        let mut without = rec("playbyplay", "04:12", "A", "tripping", 0);
        without.minutes = None;
        let d = details(vec![
            ("gamecenter_landing", vec![rec("gamecenter_landing", "04:12", "A", "tripping", 2)]),
            ("playbyplay", vec![without]),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        assert!(discrepancies
            .iter()
            .all(|d| d.kind != DiscrepancyKind::PenaltyMinutesMismatch));
    }

    #[test]
    fn player_name_mismatch_below_overlap() {
        let d = details(vec![
            (
                "gamecenter_landing",
                vec![
                    rec("gamecenter_landing", "01:00", "A", "a", 2),
                    rec("gamecenter_landing", "02:00", "B", "b", 2),
                    rec("gamecenter_landing", "03:00", "C", "c", 2),
                    rec("gamecenter_landing", "04:00", "D", "d", 2),
                    rec("gamecenter_landing", "05:00", "E", "e", 2),
                ],
            ),
            (
                "playbyplay",
                vec![
                    rec("playbyplay", "01:00", "A", "a", 2),
                    rec("playbyplay", "02:00", "B", "b", 2),
                    rec("playbyplay", "03:00", "X", "x", 2),
                    rec("playbyplay", "04:00", "Y", "y", 2),
                    rec("playbyplay", "05:00", "Z", "z", 2),
                ],
            ),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        let names: Vec<_> = discrepancies
            .iter()
            .filter(|d| d.kind == DiscrepancyKind::PlayerNameMismatch)
            .collect();
        // 2 of 5 shared < 80%.
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].sources, vec!["gamecenter_landing", "playbyplay"]);
    }

    #[test]
    fn player_name_overlap_above_threshold_passes() {
        let d = details(vec![
            (
                "a",
                vec![
                    rec("a", "01:00", "A", "a", 2),
                    rec("a", "02:00", "B", "b", 2),
                    rec("a", "03:00", "C", "c", 2),
                    rec("a", "04:00", "D", "d", 2),
                    rec("a", "05:00", "E", "e", 2),
                ],
            ),
            (
                "b",
                vec![
                    rec("b", "01:00", "A", "a", 2),
                    rec("b", "02:00", "B", "b", 2),
                    rec("b", "03:00", "C", "c", 2),
                    rec("b", "04:00", "D", "d", 2),
                ],
            ),
        ]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        // 4 of 4 (smaller set) shared.
        assert!(discrepancies
            .iter()
            .all(|d| d.kind != DiscrepancyKind::PlayerNameMismatch));
    }

    #[test]
    fn aggregate_names_participate_in_player_check() {
        let d = details(vec![(
            "gamecenter_landing",
            vec![
                rec("gamecenter_landing", "01:00", "A", "a", 2),
                rec("gamecenter_landing", "02:00", "B", "b", 2),
                rec("gamecenter_landing", "03:00", "C", "c", 2),
                rec("gamecenter_landing", "04:00", "D", "d", 2),
                rec("gamecenter_landing", "05:00", "E", "e", 2),
            ],
        )]);
        let mut agg = Vec::new();
        for name in ["A", "X", "Y", "Z", "W"] {
            let mut r = EventRecord::bare(EventKind::Penalty, "boxscore");
            r.player = Some(name.into());
            r.minutes = Some(2);
            agg.push(r);
        }
        let aggregates = details(vec![("boxscore", agg)]);

        let discrepancies = detect(&d, &aggregates, &MatchOptions::default());
        let names: Vec<_> = discrepancies
            .iter()
            .filter(|d| d.kind == DiscrepancyKind::PlayerNameMismatch)
            .collect();
        // 1 of 5 shared between the per-event source and the per-player
        // totals source.
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].sources, vec!["boxscore", "gamecenter_landing"]);
    }

    #[test]
    fn matching_aggregate_names_pass() {
        let d = details(vec![
            (
                "gamecenter_landing",
                vec![
                    rec("gamecenter_landing", "01:00", "A", "a", 2),
                    rec("gamecenter_landing", "02:00", "B", "b", 2),
                ],
            ),
            (
                "playbyplay",
                vec![
                    rec("playbyplay", "01:00", "A", "a", 2),
                    rec("playbyplay", "02:00", "B", "b", 2),
                ],
            ),
        ]);
        let mut agg = Vec::new();
        for name in ["A", "B"] {
            let mut r = EventRecord::bare(EventKind::Penalty, "boxscore");
            r.player = Some(name.into());
            r.minutes = Some(2);
            agg.push(r);
        }
        let aggregates = details(vec![("boxscore", agg)]);

        let discrepancies = detect(&d, &aggregates, &MatchOptions::default());
        assert!(discrepancies
            .iter()
            .all(|d| d.kind != DiscrepancyKind::PlayerNameMismatch));
        // Aggregate records never enter the per-record checks: no missing
        // penalties are reported against boxscore rows.
        assert!(discrepancies
            .iter()
            .all(|d| d.kind != DiscrepancyKind::MissingPenalty));
    }

    #[test]
    fn single_source_runs_without_count_check() {
        let d = details(vec![(
            "gamecenter_landing",
            vec![rec("gamecenter_landing", "04:12", "A", "tripping", 2)],
        )]);
        let discrepancies = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        assert!(discrepancies
            .iter()
            .all(|d| d.kind != DiscrepancyKind::CountMismatch));
    }

    #[test]
    fn aggregate_cross_check_flags_total_difference() {
        let primary = vec![
            rec("gamecenter_landing", "04:12", "A", "tripping", 2),
            rec("gamecenter_landing", "10:00", "B", "hooking", 2),
        ];
        let mut agg = EventRecord::bare(EventKind::Penalty, "boxscore");
        agg.player = Some("A".into());
        agg.minutes = Some(6);
        let aggregates = details(vec![("boxscore", vec![agg])]);

        let discrepancies = cross_check_minutes("gamecenter_landing", &primary, &aggregates);
        assert_eq!(discrepancies.len(), 1);
        assert_eq!(discrepancies[0].kind, DiscrepancyKind::PenaltyMinutesMismatch);
        assert!(discrepancies[0].description.contains("gamecenter_landing=4"));
        assert!(discrepancies[0].description.contains("boxscore=6"));
    }

    #[test]
    fn aggregate_cross_check_matching_totals_pass() {
        let primary = vec![rec("gamecenter_landing", "04:12", "A", "tripping", 2)];
        let mut agg = EventRecord::bare(EventKind::Penalty, "boxscore");
        agg.minutes = Some(2);
        let aggregates = details(vec![("boxscore", vec![agg])]);
        assert!(cross_check_minutes("gamecenter_landing", &primary, &aggregates).is_empty());
    }

    #[test]
    fn detection_is_deterministic() {
        let d = details(vec![
            (
                "gamecenter_landing",
                vec![
                    rec("gamecenter_landing", "04:12", "A", "tripping", 2),
                    rec("gamecenter_landing", "10:00", "B", "hooking", 2),
                ],
            ),
            ("playbyplay", vec![rec("playbyplay", "04:12", "A", "tripping", 5)]),
        ]);
        let a = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        let b = detect(&d, &BTreeMap::new(), &MatchOptions::default());
        let json_a = serde_json::to_string(&a).unwrap();
        let json_b = serde_json::to_string(&b).unwrap();
        assert_eq!(json_a, json_b);
    }
}
