//! Identity projection CLI commands: sync and resync.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use crate::state::AppState;

/// Project the user's identity answers into memory records.
pub async fn sync(state: &AppState, user: &Uuid, json: bool) -> Result<()> {
    let records = state.projector.sync(&state.memory_service, user).await?;
    report(&records, "synced", json)
}

/// Wipe identity-derived records and project from scratch.
pub async fn resync(state: &AppState, user: &Uuid, json: bool) -> Result<()> {
    let records = state.projector.resync(&state.memory_service, user).await?;
    report(&records, "resynced", json)
}

fn report(records: &[memoir_types::memory::MemoryRecord], verb: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    println!();
    if records.is_empty() {
        println!(
            "  {} No identity record found; nothing to project.",
            style("i").blue().bold(),
        );
    } else {
        println!(
            "  {} {} {} identity field(s) into memory.",
            style("✓").green().bold(),
            verb,
            style(records.len()).bold(),
        );
        for record in records {
            println!(
                "    {} {}",
                style(&record.content_type).cyan(),
                truncate(&record.text_content, 60),
            );
        }
    }
    println!();
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    let short: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        format!("{short}...")
    } else {
        short
    }
}
