//! `rinkdata analyze` / `rinkdata validate` — config-driven reconciliation.

use std::path::{Path, PathBuf};

use rinkdata_recon::model::DiscrepancyKind;
use rinkdata_recon::{AnalysisConfig, DocumentSet};

use crate::exit_codes::{EXIT_DISCREPANCIES, EXIT_INVALID_CONFIG};
use crate::{report, CliError};

pub fn cmd_analyze(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_file: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config = AnalysisConfig::from_toml(&config_str)
        .map_err(|e| CliError { code: EXIT_INVALID_CONFIG, message: e.to_string(), hint: None })?;

    // Source files resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let documents = load_documents(base_dir, &config);

    let result = rinkdata_recon::run(&config, &documents)
        .map_err(|e| CliError::runtime(e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref path) = csv_file {
        let file = std::fs::File::create(path)
            .map_err(|e| CliError::runtime(format!("cannot write {}: {e}", path.display())))?;
        report::write_comparison_csv(&result, file)?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if json_output {
        println!("{json_str}");
    } else if !quiet {
        eprintln!("{}", report::render(&result));
    }

    // Simultaneous-penalty validation prompts are advisory; everything else
    // means the sources disagree and scripts should see a nonzero exit.
    let findings = result
        .discrepancies
        .iter()
        .filter(|d| d.kind != DiscrepancyKind::SimultaneousPenaltyValidation)
        .count();
    if findings > 0 {
        return Err(CliError {
            code: EXIT_DISCREPANCIES,
            message: format!("{findings} discrepancies found"),
            hint: None,
        });
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    let config = AnalysisConfig::from_toml(&config_str)
        .map_err(|e| CliError { code: EXIT_INVALID_CONFIG, message: e.to_string(), hint: None })?;

    eprintln!(
        "config ok: game {} ({}), {} sources, primary {}",
        config.game_id,
        config.season,
        config.sources.len(),
        config.primary,
    );
    Ok(())
}

/// Load every configured source document. A malformed file becomes an
/// error-marker document and an absent file leaves the source out entirely;
/// the engine reports both as discrepancies, never a CLI abort.
fn load_documents(base_dir: &Path, config: &AnalysisConfig) -> DocumentSet {
    let mut documents = DocumentSet::new();
    for (name, source) in &config.sources {
        let path = base_dir.join(&source.file);
        match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(value) => documents.load(name.clone(), value),
                Err(e) => documents.fail(name.clone(), format!("invalid JSON: {e}")),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => documents.fail(name.clone(), format!("cannot read {}: {e}", path.display())),
        }
    }
    documents
}
