use std::collections::BTreeSet;

use crate::model::{ComplexScenario, EventRecord, ScenarioKind};

/// Infraction terms that never create a numerical advantage. Matching is
/// case-insensitive substring over the record description.
pub const NON_POWER_PLAY_TERMS: &[&str] = &[
    "fighting",
    "misconduct",
    "game-misconduct",
    "match-penalty",
    "too-many-men-on-the-ice",
    "delay-of-game",
    "unsportsmanlike-conduct",
];

/// Whether a penalty would put the offending team short-handed.
pub fn is_power_play_eligible(record: &EventRecord) -> bool {
    let Some(description) = record.description.as_deref() else {
        return true;
    };
    let lowered = description.to_ascii_lowercase();
    !NON_POWER_PLAY_TERMS.iter().any(|term| lowered.contains(term))
}

/// Classify the primary source's records into on-ice patterns that need
/// interpretation beyond presence/absence. One record can appear in several
/// scenarios. Output order is fixed: time-grouped scenarios in first-seen
/// order, then team penalties, non-power-play penalties, penalty shots.
pub fn classify(records: &[EventRecord]) -> Vec<ComplexScenario> {
    let mut scenarios = Vec::new();

    for (time, group) in group_by_time(records) {
        if group.len() < 2 {
            continue;
        }
        let teams: BTreeSet<&str> = group.iter().filter_map(|r| r.team.as_deref()).collect();
        if teams.len() > 1 {
            scenarios.push(ComplexScenario {
                kind: ScenarioKind::SimultaneousPenalties,
                description: format!("{} penalties at {time}", group.len()),
                impact: "4-on-4 even strength (no power play)".into(),
                records: group,
            });
        } else {
            let team = teams.iter().next().copied().unwrap_or("unknown team");
            scenarios.push(ComplexScenario {
                kind: ScenarioKind::MultipleTeamPenalties,
                description: format!("{} penalties to {team} at {time}", group.len()),
                impact: "Extended power play for opponent".into(),
                records: group,
            });
        }
    }

    let team_penalties: Vec<EventRecord> = records
        .iter()
        .filter(|r| r.player.is_none())
        .cloned()
        .collect();
    if !team_penalties.is_empty() {
        scenarios.push(ComplexScenario {
            kind: ScenarioKind::TeamPenalties,
            description: format!("{} team penalties without an attributed player", team_penalties.len()),
            impact: "Penalty served by designated player, affects team statistics".into(),
            records: team_penalties,
        });
    }

    let non_power_play: Vec<EventRecord> = records
        .iter()
        .filter(|r| !is_power_play_eligible(r))
        .cloned()
        .collect();
    if !non_power_play.is_empty() {
        scenarios.push(ComplexScenario {
            kind: ScenarioKind::NonPowerPlayPenalties,
            description: format!("{} penalties without a power play", non_power_play.len()),
            impact: "No numerical advantage, different statistical treatment".into(),
            records: non_power_play,
        });
    }

    let penalty_shots: Vec<EventRecord> = records
        .iter()
        .filter(|r| {
            r.description
                .as_deref()
                .map(|d| d.to_ascii_lowercase().contains("penalty-shot"))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    if !penalty_shots.is_empty() {
        scenarios.push(ComplexScenario {
            kind: ScenarioKind::PenaltyShots,
            description: format!("{} penalty shot events", penalty_shots.len()),
            impact: "Free shot awarded instead of a power play".into(),
            records: penalty_shots,
        });
    }

    scenarios
}

/// Group records by their `time` field, keeping first-seen group order so a
/// run over identical input yields identical output. Records without a time
/// cannot be co-timed and are left out.
fn group_by_time(records: &[EventRecord]) -> Vec<(String, Vec<EventRecord>)> {
    let mut groups: Vec<(String, Vec<EventRecord>)> = Vec::new();
    for record in records {
        let Some(time) = record.time.as_deref() else {
            continue;
        };
        match groups.iter_mut().find(|(t, _)| t == time) {
            Some((_, group)) => group.push(record.clone()),
            None => groups.push((time.to_string(), vec![record.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventKind;

    fn rec(time: &str, team: &str, player: &str, desc: &str) -> EventRecord {
        let mut r = EventRecord::bare(EventKind::Penalty, "gamecenter_landing");
        r.time = Some(time.into());
        r.team = Some(team.into());
        r.player = Some(player.into());
        r.description = Some(desc.into());
        r
    }

    #[test]
    fn lone_penalty_yields_no_scenarios() {
        let records = vec![rec("04:12", "TOR", "J. Smith", "tripping")];
        assert!(classify(&records).is_empty());
    }

    #[test]
    fn coincident_penalties_are_simultaneous() {
        let records = vec![
            rec("04:12", "TOR", "J. Smith", "roughing"),
            rec("04:12", "BOS", "A. Jones", "roughing"),
        ];
        let scenarios = classify(&records);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].kind, ScenarioKind::SimultaneousPenalties);
        assert_eq!(scenarios[0].description, "2 penalties at 04:12");
        assert_eq!(scenarios[0].impact, "4-on-4 even strength (no power play)");
        assert_eq!(scenarios[0].records.len(), 2);
    }

    #[test]
    fn same_team_pair_is_multiple_team_not_simultaneous() {
        let records = vec![
            rec("04:12", "TOR", "J. Smith", "roughing"),
            rec("04:12", "TOR", "A. Jones", "slashing"),
        ];
        let scenarios = classify(&records);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].kind, ScenarioKind::MultipleTeamPenalties);
        assert_eq!(scenarios[0].description, "2 penalties to TOR at 04:12");
        assert_eq!(scenarios[0].impact, "Extended power play for opponent");
        assert_eq!(scenarios[0].records.len(), 2);
    }

    #[test]
    fn unattributed_penalty_is_a_team_penalty() {
        let mut bench = rec("10:00", "TOR", "", "too-many-men-on-the-ice");
        bench.player = None;
        let scenarios = classify(&[bench]);
        let kinds: Vec<ScenarioKind> = scenarios.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&ScenarioKind::TeamPenalties));
        assert!(kinds.contains(&ScenarioKind::NonPowerPlayPenalties));
    }

    #[test]
    fn exclusion_terms_are_case_insensitive() {
        let record = rec("05:00", "BOS", "A. Jones", "Fighting");
        assert!(!is_power_play_eligible(&record));
        let record = rec("05:00", "BOS", "A. Jones", "game-Misconduct");
        assert!(!is_power_play_eligible(&record));
    }

    #[test]
    fn ordinary_minor_is_eligible() {
        let record = rec("05:00", "BOS", "A. Jones", "tripping");
        assert!(is_power_play_eligible(&record));
    }

    #[test]
    fn missing_description_counts_as_eligible() {
        let record = EventRecord::bare(EventKind::Penalty, "gamecenter_landing");
        assert!(is_power_play_eligible(&record));
    }

    #[test]
    fn penalty_shot_detected_by_description() {
        let records = vec![rec("12:30", "TOR", "J. Smith", "ps-penalty-shot-hooking")];
        let scenarios = classify(&records);
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].kind, ScenarioKind::PenaltyShots);
    }

    #[test]
    fn untimed_records_never_group() {
        let mut a = rec("", "TOR", "J. Smith", "tripping");
        a.time = None;
        let mut b = rec("", "BOS", "A. Jones", "hooking");
        b.time = None;
        assert!(classify(&[a, b]).is_empty());
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let records = vec![
            rec("15:00", "TOR", "A", "roughing"),
            rec("15:00", "BOS", "B", "roughing"),
            rec("02:00", "TOR", "C", "roughing"),
            rec("02:00", "BOS", "D", "roughing"),
        ];
        let scenarios = classify(&records);
        assert_eq!(scenarios[0].description, "2 penalties at 15:00");
        assert_eq!(scenarios[1].description, "2 penalties at 02:00");
    }
}
