//! Memory CLI commands: semantic search and processed insights.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use memoir_core::memory::service::{DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_THRESHOLD};
use memoir_types::memory::ScoredMemory;

use crate::state::AppState;

/// Search a user's memories by semantic similarity.
///
/// # Examples
///
/// ```bash
/// memoir search --user <uuid> "why do I keep skipping workouts"
/// memoir search --user <uuid> --types excuse,excuse_pattern "gym" --json
/// ```
pub async fn search(
    state: &AppState,
    user: &Uuid,
    query: &str,
    types: &[String],
    threshold: Option<f32>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let threshold = threshold.unwrap_or(DEFAULT_SEARCH_THRESHOLD);
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    let results = if types.is_empty() {
        state
            .memory_service
            .search(user, query, threshold, limit)
            .await?
    } else {
        state
            .memory_service
            .search_by_types(user, query, types, threshold, limit)
            .await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!();
        println!(
            "  {} No memories matched (threshold {threshold}).",
            style("i").blue().bold(),
        );
        println!();
        return Ok(());
    }

    print_results_table(&results);
    Ok(())
}

fn print_results_table(results: &[ScoredMemory]) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Similarity").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Text").fg(Color::White),
        Cell::new("Date").fg(Color::White),
    ]);

    for scored in results {
        let text: String = scored.record.text_content.chars().take(60).collect();
        let text = if scored.record.text_content.chars().count() > 60 {
            format!("{text}...")
        } else {
            text
        };

        table.add_row(vec![
            Cell::new(format!("{:.2}", scored.similarity)).fg(Color::Yellow),
            Cell::new(&scored.record.content_type).fg(Color::Cyan),
            Cell::new(text).fg(Color::White),
            Cell::new(scored.record.created_at.format("%Y-%m-%d").to_string())
                .fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
}

/// Print the processed insight aggregate for a user.
pub async fn insights(state: &AppState, user: &Uuid, json: bool) -> Result<()> {
    let insights = state.memory_service.insights(user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    let stats = &insights.memory_stats;
    let behavior = &insights.behavioral_indicators;
    let signals = &insights.accountability_signals;
    let health = &insights.system_health;

    println!();
    println!("  {} Memory insights", style("◆").cyan().bold());
    println!();
    println!(
        "  Total memories: {} ({} in the last 7 days, volume {})",
        style(stats.total_memories).bold(),
        stats.recent_memories,
        serde_label(&stats.weekly_trend)?,
    );
    for (content_type, count) in &stats.content_type_breakdown {
        println!("    {content_type}: {count}");
    }
    println!();
    println!(
        "  Excuses: {}  Patterns: {}  Emotional trend: {}",
        serde_label(&behavior.excuse_frequency)?,
        serde_label(&behavior.pattern_strength)?,
        serde_label(&behavior.emotional_trend)?,
    );
    println!(
        "  Breakthroughs: {}  Growth indicators: {}  Recurring patterns: {}",
        behavior.breakthrough_moments, signals.growth_indicators, signals.recurring_pattern_count,
    );
    if let Some(last) = signals.last_memory_date {
        println!("  Last memory: {}", last.format("%Y-%m-%d %H:%M UTC"));
    }
    println!(
        "  Data quality score: {}",
        style(health.data_quality_score).yellow().bold()
    );
    println!();
    Ok(())
}

/// Render a lowercase serde enum label without a manual Display impl.
fn serde_label<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}
