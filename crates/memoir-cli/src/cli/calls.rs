//! Call transcript extraction CLI command.

use anyhow::Result;
use console::style;
use uuid::Uuid;

use memoir_core::repository::call::CallRepository;

use crate::state::AppState;

/// Extract psychological snippets from the user's recent call transcripts
/// and persist them as memory records.
///
/// Re-running over the same calls dedups instead of duplicating.
pub async fn extract(state: &AppState, user: &Uuid, limit: usize, json: bool) -> Result<()> {
    let calls = state.call_repo.recent_calls(user, limit).await?;
    let insights = state.extractor.extract_from_calls(&calls).await;
    let stored = state
        .memory_service
        .persist_call_insights(user, insights)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
        return Ok(());
    }

    println!();
    if calls.is_empty() {
        println!(
            "  {} No calls on record for this user.",
            style("i").blue().bold(),
        );
    } else {
        println!(
            "  {} Processed {} call(s), stored {} memory record(s).",
            style("✓").green().bold(),
            calls.len(),
            style(stored.len()).bold(),
        );
        for record in &stored {
            let text: String = record.text_content.chars().take(60).collect();
            println!("    {} {}", style(&record.content_type).cyan(), text);
        }
    }
    println!();
    Ok(())
}
