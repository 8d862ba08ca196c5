//! Per-format extractors turning raw JSON documents into normalized records.
//!
//! Each feed has shipped more than one document shape over time, so every
//! extractor probes the current layout first and falls back to the older
//! one. Extractors never fail: an unrecognized shape yields zero records and
//! the quality assessment grades the source accordingly.

use serde_json::Value;

use crate::config::SourceFormat;
use crate::model::{EventKind, EventRecord};

pub fn extract(
    source: &str,
    format: SourceFormat,
    kind: EventKind,
    document: &Value,
) -> Vec<EventRecord> {
    match format {
        SourceFormat::GamecenterLanding => gamecenter(source, kind, document),
        SourceFormat::Boxscore => boxscore(source, kind, document),
        SourceFormat::Playbyplay => playbyplay(source, kind, document),
        SourceFormat::ParsedHtml => parsed(source, kind, parsed_html_events(kind, document)),
        SourceFormat::ParsedPenalties => parsed(source, kind, parsed_file_events(kind, document)),
    }
}

// ---------------------------------------------------------------------------
// Gamecenter landing
// ---------------------------------------------------------------------------

fn gamecenter(source: &str, kind: EventKind, document: &Value) -> Vec<EventRecord> {
    let mut records = Vec::new();

    let summary_key = match kind {
        EventKind::Penalty => "penalties",
        EventKind::Goal => "scoring",
    };

    // Current layout: events nested per period under summary.
    if let Some(periods) = document
        .get("summary")
        .and_then(|s| s.get(summary_key))
        .and_then(Value::as_array)
    {
        for period in periods {
            let number = period
                .get("periodDescriptor")
                .and_then(|d| d.get("number"))
                .and_then(Value::as_u64)
                .map(|n| n as u32);
            let inner_key = match kind {
                EventKind::Penalty => "penalties",
                EventKind::Goal => "goals",
            };
            if let Some(events) = period.get(inner_key).and_then(Value::as_array) {
                for event in events {
                    let mut record = gamecenter_event(source, kind, event);
                    record.period = number;
                    records.push(record);
                }
            }
        }
        return records;
    }

    // Older layout: one flat array at the top level.
    if let Some(events) = document.get(summary_key).and_then(Value::as_array) {
        for event in events {
            records.push(gamecenter_event(source, kind, event));
        }
    }

    records
}

fn gamecenter_event(source: &str, kind: EventKind, event: &Value) -> EventRecord {
    let mut record = EventRecord::bare(kind, source);
    record.time = string_field(event.get("timeInPeriod"));
    record.team = name_field(event.get("teamAbbrev"));
    record.player = name_field(event.get("committedByPlayer"))
        .or_else(|| name_field(event.get("playerName")))
        .or_else(|| name_field(event.get("name")));
    record.description =
        string_field(event.get("descKey")).or_else(|| string_field(event.get("description")));
    record.category =
        string_field(event.get("type")).or_else(|| string_field(event.get("penaltyType")));
    record.minutes = int_field(event.get("duration"))
        .or_else(|| int_field(event.get("penaltyMinutes")))
        .filter(|_| kind == EventKind::Penalty);
    record.situation_code = string_field(event.get("situationCode"));
    record.event_id = id_field(event.get("eventId"));
    record
}

// ---------------------------------------------------------------------------
// Boxscore (aggregate-only)
// ---------------------------------------------------------------------------

/// Boxscore carries per-player totals, not events. A penalty record here
/// means "this player accumulated N minutes", one record per player.
fn boxscore(source: &str, kind: EventKind, document: &Value) -> Vec<EventRecord> {
    let stat_key = match kind {
        EventKind::Penalty => "pim",
        EventKind::Goal => "goals",
    };
    let mut records = Vec::new();

    // Current layout: playerByGameStats split by team and position.
    if let Some(stats) = document.get("playerByGameStats") {
        for team_key in ["awayTeam", "homeTeam"] {
            let abbrev = name_field(
                document
                    .get(team_key)
                    .and_then(|t| t.get("abbrev")),
            );
            let Some(team_stats) = stats.get(team_key) else {
                continue;
            };
            for position in ["forwards", "defensemen", "goalies"] {
                let Some(players) = team_stats.get(position).and_then(Value::as_array) else {
                    continue;
                };
                for player in players {
                    let total = int_field(player.get(stat_key)).unwrap_or(0);
                    if total > 0 {
                        let mut record = EventRecord::bare(kind, source);
                        record.team = abbrev.clone();
                        record.player = name_field(player.get("name"));
                        if kind == EventKind::Penalty {
                            record.minutes = Some(total);
                        }
                        records.push(record);
                    }
                }
            }
        }
        return records;
    }

    // Older layout: skater rows directly under each team.
    for team_key in ["awayTeam", "homeTeam"] {
        let Some(team) = document.get(team_key) else {
            continue;
        };
        let abbrev = name_field(team.get("abbrev"));
        let Some(skaters) = team.get("skaters").and_then(Value::as_array) else {
            continue;
        };
        let legacy_key = match kind {
            EventKind::Penalty => "penaltyMinutes",
            EventKind::Goal => "goals",
        };
        for skater in skaters {
            let total = int_field(skater.get(legacy_key)).unwrap_or(0);
            if total > 0 {
                let mut record = EventRecord::bare(kind, source);
                record.team = abbrev.clone();
                record.player = name_field(skater.get("name"));
                if kind == EventKind::Penalty {
                    record.minutes = Some(total);
                }
                records.push(record);
            }
        }
    }

    records
}

// ---------------------------------------------------------------------------
// Play-by-play
// ---------------------------------------------------------------------------

fn playbyplay(source: &str, kind: EventKind, document: &Value) -> Vec<EventRecord> {
    let wanted: &[&str] = match kind {
        EventKind::Penalty => &["PENALTY", "PENALTY_SHOT"],
        EventKind::Goal => &["GOAL"],
    };
    let mut records = Vec::new();

    let Some(plays) = document.get("plays").and_then(Value::as_array) else {
        return records;
    };

    for play in plays {
        // Current layout keeps the event type at the top of the play.
        if let Some(event_type) = play.get("eventTypeId").and_then(Value::as_str) {
            if wanted.contains(&event_type) {
                let mut record = EventRecord::bare(kind, source);
                record.time = string_field(play.get("timeInPeriod"));
                record.period = play
                    .get("periodDescriptor")
                    .and_then(|d| d.get("number"))
                    .and_then(Value::as_u64)
                    .map(|n| n as u32);
                record.team = name_field(play.get("team").and_then(|t| t.get("abbrev")));
                record.player = name_field(play.get("player").and_then(|p| p.get("name")));
                record.description = string_field(play.get("descKey"))
                    .or_else(|| string_field(play.get("description")));
                record.category = string_field(play.get("penaltyType"));
                record.minutes =
                    int_field(play.get("penaltyMinutes")).filter(|_| kind == EventKind::Penalty);
                record.situation_code = string_field(play.get("situationCode"));
                record.event_id = id_field(play.get("eventId"));
                records.push(record);
            }
            continue;
        }

        // Older layout nests the event type under result.
        let Some(result) = play.get("result") else {
            continue;
        };
        let Some(event_type) = result.get("eventTypeId").and_then(Value::as_str) else {
            continue;
        };
        if !wanted.contains(&event_type) {
            continue;
        }
        let mut record = EventRecord::bare(kind, source);
        let about = play.get("about");
        record.time = string_field(about.and_then(|a| a.get("periodTime")));
        record.period = about
            .and_then(|a| a.get("period"))
            .and_then(Value::as_u64)
            .map(|n| n as u32);
        record.team = name_field(play.get("team").and_then(|t| t.get("abbreviation")));
        record.player = name_field(
            play.get("players")
                .and_then(Value::as_array)
                .and_then(|players| players.first())
                .and_then(|p| p.get("player"))
                .and_then(|p| p.get("fullName")),
        );
        record.description = string_field(result.get("description"));
        record.category = string_field(result.get("penaltyType"));
        record.minutes =
            int_field(result.get("penaltyMinutes")).filter(|_| kind == EventKind::Penalty);
        record.event_id = id_field(about.and_then(|a| a.get("eventId")));
        records.push(record);
    }

    records
}

// ---------------------------------------------------------------------------
// Parsed feeds (html scrape + parsed event files)
// ---------------------------------------------------------------------------

fn parsed_html_events<'a>(kind: EventKind, document: &'a Value) -> Option<&'a Vec<Value>> {
    let key = parsed_key(kind);
    document
        .get("consolidated_data")
        .and_then(|c| c.get(key))
        .and_then(Value::as_array)
        .or_else(|| document.get(key).and_then(Value::as_array))
}

fn parsed_file_events<'a>(kind: EventKind, document: &'a Value) -> Option<&'a Vec<Value>> {
    document.get(parsed_key(kind)).and_then(Value::as_array)
}

fn parsed_key(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Penalty => "penalties",
        EventKind::Goal => "goals",
    }
}

/// Parsed feeds are already flat key/value rows; field names vary with the
/// parser vintage, so each field probes its aliases in order.
fn parsed(source: &str, kind: EventKind, events: Option<&Vec<Value>>) -> Vec<EventRecord> {
    let Some(events) = events else {
        return Vec::new();
    };
    events
        .iter()
        .map(|event| {
            let mut record = EventRecord::bare(kind, source);
            record.time = string_field(event.get("time"));
            record.period = event.get("period").and_then(Value::as_u64).map(|n| n as u32);
            record.team = name_field(event.get("team"));
            record.player = name_field(event.get("committed_by"))
                .or_else(|| name_field(event.get("player")))
                .or_else(|| name_field(event.get("player_name")));
            record.description = string_field(event.get("description"));
            record.category = string_field(event.get("type"))
                .or_else(|| string_field(event.get("penalty_type")));
            record.minutes = int_field(event.get("duration"))
                .or_else(|| int_field(event.get("penalty_minutes")))
                .filter(|_| kind == EventKind::Penalty);
            record.situation_code = string_field(event.get("situation_code"));
            record.event_id = id_field(event.get("event_id"));
            record
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// A present-but-empty string means the feed had no value; map it to `None`
/// so it can never satisfy a match key.
fn string_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Names arrive either as a bare string or as a localized object with a
/// `default` entry.
fn name_field(value: Option<&Value>) -> Option<String> {
    let value = value?;
    match value {
        Value::String(_) => string_field(Some(value)),
        Value::Object(map) => string_field(map.get("default")),
        _ => None,
    }
}

fn int_field(value: Option<&Value>) -> Option<i64> {
    value.and_then(Value::as_i64)
}

/// Event ids arrive as numbers or strings depending on the feed.
fn id_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
