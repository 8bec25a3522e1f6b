//! Nightly pattern aggregation CLI command.
//!
//! Intended to be run from cron or a systemd timer; the run never fails on
//! a single user, so a non-zero exit only means the user listing itself
//! broke.

use anyhow::Result;
use console::style;

use memoir_core::pattern::aggregator::DEFAULT_USER_CAP;

use crate::state::AppState;

/// Run one aggregation batch over active users.
pub async fn run(state: &AppState, user_cap: Option<usize>, json: bool) -> Result<()> {
    let cap = user_cap.unwrap_or(DEFAULT_USER_CAP);
    let report = state.aggregator.run(cap).await?;

    if json {
        let out = serde_json::json!({
            "processed": report.processed,
            "failures": report
                .failures
                .iter()
                .map(|(user_id, error)| serde_json::json!({
                    "user_id": user_id,
                    "error": error,
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Aggregated profiles for {} user(s).",
        style("✓").green().bold(),
        style(report.processed).bold(),
    );
    if !report.failures.is_empty() {
        println!(
            "  {} {} user(s) failed:",
            style("!").yellow().bold(),
            report.failures.len(),
        );
        for (user_id, error) in &report.failures {
            println!("    {} {}", style(user_id).dim(), error);
        }
    }
    println!();
    Ok(())
}
