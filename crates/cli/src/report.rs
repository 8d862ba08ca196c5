//! Human review report and comparison-table CSV rendering.
//!
//! Rendering lives here in the CLI; the engine only produces the structured
//! result. The report is line-oriented plain text for reading in a terminal
//! or pasting into a review ticket.

use rinkdata_recon::model::AnalysisResult;

use crate::CliError;

const RULE_HEAVY: &str =
    "================================================================================";
const RULE_LIGHT: &str = "----------------------------------------";

pub fn render(result: &AnalysisResult) -> String {
    let mut report: Vec<String> = Vec::new();

    report.push(RULE_HEAVY.into());
    report.push("GAME DATA RECONCILIATION REVIEW REPORT".into());
    report.push(RULE_HEAVY.into());
    report.push(format!("Game ID: {}", result.meta.game_id));
    report.push(format!("Season: {}", result.meta.season));
    report.push(format!("Event Kind: {}", result.meta.event_kind));
    report.push(format!("Analysis Date: {}", result.meta.generated_at));
    report.push(String::new());

    report.push("DATA SOURCES SUMMARY".into());
    report.push(RULE_LIGHT.into());
    for (source, summary) in &result.sources {
        match &summary.error {
            Some(error) => report.push(format!("  {source}: ERROR - {error}")),
            None => report.push(format!(
                "  {source}: {} records ({})",
                summary.count, summary.detail
            )),
        }
    }
    report.push(String::new());

    report.push("RECONCILIATION DISCREPANCIES".into());
    report.push(RULE_LIGHT.into());
    if result.discrepancies.is_empty() {
        report.push("  No reconciliation discrepancies found.".into());
        report.push(String::new());
    } else {
        for (i, d) in result.discrepancies.iter().enumerate() {
            report.push(format!("  {}. {}", i + 1, title(&d.kind.to_string())));
            report.push(format!("     Description: {}", d.description));
            report.push(format!("     Severity: {}", d.severity));
            if !d.sources.is_empty() {
                report.push(format!("     Sources: {}", d.sources.join(", ")));
            }
            report.push(String::new());
        }
    }

    if !result.scenarios.is_empty() {
        report.push("COMPLEX SCENARIOS".into());
        report.push(RULE_LIGHT.into());
        for (i, s) in result.scenarios.iter().enumerate() {
            report.push(format!("  {}. {}", i + 1, title(&s.kind.to_string())));
            report.push(format!("     Description: {}", s.description));
            report.push(format!("     Impact: {}", s.impact));
            report.push(String::new());
        }
    }

    report.push("DATA QUALITY ASSESSMENT".into());
    report.push(RULE_LIGHT.into());
    report.push(format!(
        "  Overall Score: {:.1}%",
        result.quality.overall_score
    ));
    for (source, completeness) in &result.quality.completeness {
        report.push(format!("  {source}: {completeness}"));
    }
    for (metric, consistency) in &result.quality.consistency {
        report.push(format!("  {metric}: {consistency}"));
    }
    report.push(String::new());

    if !result.recommendations.is_empty() {
        report.push("RECOMMENDATIONS".into());
        report.push(RULE_LIGHT.into());
        for (i, r) in result.recommendations.iter().enumerate() {
            report.push(format!("  {}. {}", i + 1, r.action));
            report.push(format!("     Priority: {}", r.priority));
            report.push(format!("     Description: {}", r.description));
            if !r.sources.is_empty() {
                report.push(format!("     Sources: {}", r.sources.join(", ")));
            }
            report.push(String::new());
        }
    }

    report.push(RULE_HEAVY.into());
    report.push("END OF REPORT".into());
    report.push(RULE_HEAVY.into());

    report.join("\n")
}

/// "count_mismatch" -> "Count Mismatch"
fn title(tag: &str) -> String {
    tag.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the comparison table as CSV, three columns per source so the file
/// opens cleanly in a spreadsheet for side-by-side review.
pub fn write_comparison_csv<W: std::io::Write>(
    result: &AnalysisResult,
    writer: W,
) -> Result<(), CliError> {
    let mut csv = csv::Writer::from_writer(writer);

    let sources: Vec<&String> = result.sources.keys().collect();
    let mut header = vec!["time".to_string(), "player".into(), "description".into()];
    for source in &sources {
        header.push(format!("{source}_minutes"));
        header.push(format!("{source}_category"));
        header.push(format!("{source}_team"));
    }
    csv.write_record(&header)
        .map_err(|e| CliError::runtime(format!("cannot write CSV: {e}")))?;

    for row in &result.comparison {
        let mut record = vec![
            row.time.clone().unwrap_or_default(),
            row.player.clone().unwrap_or_default(),
            row.description.clone().unwrap_or_default(),
        ];
        for source in &sources {
            match row.sources.get(*source).and_then(Option::as_ref) {
                Some(cell) => {
                    record.push(cell.minutes.map(|m| m.to_string()).unwrap_or_default());
                    record.push(cell.category.clone().unwrap_or_default());
                    record.push(cell.team.clone().unwrap_or_default());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        csv.write_record(&record)
            .map_err(|e| CliError::runtime(format!("cannot write CSV: {e}")))?;
    }

    csv.flush()
        .map_err(|e| CliError::runtime(format!("cannot write CSV: {e}")))?;
    Ok(())
}
