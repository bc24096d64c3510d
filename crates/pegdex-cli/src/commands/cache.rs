//! Correlation cache management commands

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use pegdex_sprite::CorrelationStore;

/// Delete the correlation cache
pub fn clear(cache_path: &Path) -> Result<ExitCode> {
    println!("{}", "Clearing correlation cache...".cyan().bold());

    let count = CorrelationStore::remove_file(cache_path)
        .with_context(|| format!("Failed to clear cache: {}", cache_path.display()))?;

    if count == 0 {
        println!("  {}", "Cache is already empty".dimmed());
    } else {
        println!(
            "  {} Removed {} cached {}",
            "SUCCESS".green().bold(),
            count,
            if count == 1 { "correlation" } else { "correlations" }
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Show correlation cache information
pub fn info(cache_path: &Path, json: bool) -> Result<ExitCode> {
    let store = CorrelationStore::load(cache_path)
        .with_context(|| format!("Failed to load cache: {}", cache_path.display()))?;
    let info = store.info();

    if json {
        let value = serde_json::json!({
            "cache_path": cache_path.display().to_string(),
            "info": info,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Cache Information".cyan().bold());
    println!("  {}: {}", "Cache file".dimmed(), cache_path.display());
    println!("  {}: {}", "Entry count".dimmed(), info.entry_count);
    println!("  {}: {}", "With sprite".dimmed(), info.matched_count);
    for (method, count) in &info.by_method {
        println!("    {:<12} {}", method.as_str(), count);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pegdex_model::{Correlation, EntityKind};
    use tempfile::TempDir;

    #[test]
    fn test_clear_and_info() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("correlations.json");

        let mut store = CorrelationStore::new();
        store.merge(Correlation::unmatched(EntityKind::Orb, "stone"));
        store.save(&path).unwrap();

        assert_eq!(info(&path, true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(clear(&path).unwrap(), ExitCode::SUCCESS);
        assert!(!path.exists());
        assert_eq!(clear(&path).unwrap(), ExitCode::SUCCESS);
    }
}
