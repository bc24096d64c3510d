//! Extract command: runs the pipeline over a batch file.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pegdex_extract::LocalizationTable;
use pegdex_sprite::{CorrelationStore, PathOnlySink};

use crate::config::PipelineConfig;
use crate::input::{load_batch, load_catalog, load_localization};
use crate::pipeline::{BatchOutput, Pipeline};

/// Options for one extract run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Batch file to process.
    pub input: PathBuf,
    /// Output file (default: stdout).
    pub output: Option<PathBuf>,
    /// Sprite catalog file, appended to the batch's own catalog.
    pub catalog: Option<PathBuf>,
    /// Localization table file.
    pub localization: Option<PathBuf>,
    /// Pipeline config file.
    pub config: Option<PathBuf>,
    /// Correlation cache file.
    pub cache_path: PathBuf,
    /// Neither read nor write the correlation cache.
    pub no_cache: bool,
}

/// Run the extract command
pub fn run(options: &ExtractOptions) -> Result<ExitCode> {
    let output = execute(options)?;

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    match &options.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!("  {}: {}", "Output".dimmed(), path.display());
        }
        None => println!("{}", json),
    }

    print_summary(&output);
    Ok(ExitCode::SUCCESS)
}

/// Runs the pipeline and merges correlations into the cache.
pub fn execute(options: &ExtractOptions) -> Result<BatchOutput> {
    let config = PipelineConfig::load(options.config.as_deref())?;

    let mut batch = load_batch(&options.input)?;
    if let Some(path) = &options.catalog {
        for sprite in load_catalog(path)?.iter() {
            batch.catalog.push(sprite.clone());
        }
    }

    let localizer = match &options.localization {
        Some(path) => load_localization(path)?,
        None => LocalizationTable::new(),
    };

    let store = if options.no_cache {
        CorrelationStore::new()
    } else {
        CorrelationStore::load(&options.cache_path).with_context(|| {
            format!("Failed to load correlation cache: {}", options.cache_path.display())
        })?
    };

    eprintln!(
        "{} {} ({} assets, {} catalog sprites)",
        "Extracting".cyan().bold(),
        options.input.display(),
        batch.assets.len(),
        batch.catalog.len()
    );

    let mut pipeline = Pipeline::new(&config, localizer, store, PathOnlySink);
    let output = pipeline.run(&batch);

    if !options.no_cache {
        let written = pipeline
            .into_store()
            .save_merged(&options.cache_path)
            .with_context(|| {
                format!("Failed to save correlation cache: {}", options.cache_path.display())
            })?;
        tracing::debug!(entries = written, "correlation cache saved");
    }

    Ok(output)
}

fn print_summary(output: &BatchOutput) {
    let report = &output.report;
    eprintln!(
        "  {} {} of {} records extracted",
        "SUCCESS".green().bold(),
        report.extracted(),
        report.records_seen
    );
    for (kind, count) in &report.classified {
        eprintln!("    {:<8} {}", kind.as_str(), count);
    }
    if report.unclassified > 0 {
        eprintln!("  {}: {}", "Unclassified".dimmed(), report.unclassified);
    }
    if report.extraction_failures > 0 {
        eprintln!("  {}: {}", "Failed".yellow(), report.extraction_failures);
    }
    eprintln!("  {}: {}", "Sprites resolved".dimmed(), report.sprites_resolved);
    for (method, count) in &report.correlations {
        eprintln!("    {:<12} {}", method.as_str(), count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegdex_model::CorrelationMethod;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BATCH: &str = r#"{
        "assets": [
            { "name": "Slime", "source": { "record": { "MaxHealth": 30, "AttackRange": 1 } } },
            { "name": "Ghost", "source": { "record": { "MaxHealth": 50, "AttackRange": 4 } } }
        ],
        "catalog": [
            {
                "id": "slime", "name": "slime", "type": "Enemy",
                "width": 32, "height": 32, "is_atlas": false,
                "frame_width": 32, "frame_height": 32, "frame_count": 1
            }
        ]
    }"#;

    fn options(dir: &TempDir) -> ExtractOptions {
        let input = dir.path().join("batch.json");
        fs::write(&input, BATCH).unwrap();
        ExtractOptions {
            input,
            output: Some(dir.path().join("out.json")),
            cache_path: dir.path().join("cache").join("correlations.json"),
            ..ExtractOptions::default()
        }
    }

    #[test]
    fn test_run_writes_output_and_cache() {
        let dir = TempDir::new().unwrap();
        let options = options(&dir);

        assert_eq!(run(&options).unwrap(), ExitCode::SUCCESS);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out.json")).unwrap()).unwrap();
        assert_eq!(written["entities"].as_array().unwrap().len(), 2);
        assert_eq!(written["entities"][0]["sprite_id"], "slime");
        assert_eq!(written["report"]["records_seen"], 2);

        let store = CorrelationStore::load(&options.cache_path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get("Enemy:ghost").unwrap().method,
            CorrelationMethod::NoMatch
        );
    }

    #[test]
    fn test_no_cache_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let options = ExtractOptions {
            no_cache: true,
            ..options(&dir)
        };
        let output = execute(&options).unwrap();
        assert_eq!(output.entities.len(), 2);
        assert!(!options.cache_path.exists());
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let options = ExtractOptions {
            input: dir.path().join("missing.json"),
            cache_path: dir.path().join("c.json"),
            ..ExtractOptions::default()
        };
        assert!(execute(&options).is_err());
    }
}
