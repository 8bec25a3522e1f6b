//! Behavioral analysis CLI commands: calls, promises, identity correlation.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use memoir_core::repository::call::CallRepository;

use crate::state::AppState;

/// How many recent calls to feed the extractor for identity correlation.
const CORRELATION_CALL_LIMIT: usize = 50;

/// Analyze call-success patterns for a user.
pub async fn calls(state: &AppState, user: &Uuid, json: bool) -> Result<()> {
    let analysis = state.call_analyzer.analyze(user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!();
    println!("  {} Call analysis", style("◆").cyan().bold());
    println!();
    println!(
        "  Calls analyzed: {}  Success rate: {}%  Trend: {}",
        style(analysis.total_calls).bold(),
        style(analysis.success_rate).yellow().bold(),
        analysis.recent_trend,
    );
    println!(
        "  Average duration: {}s  Most effective tone: {}",
        analysis.average_call_duration,
        style(&analysis.most_effective_tone).cyan(),
    );
    print_list("Recommended actions", &analysis.recommended_actions);
    println!();
    Ok(())
}

/// Analyze promise-keeping patterns for a user.
pub async fn promises(state: &AppState, user: &Uuid, json: bool) -> Result<()> {
    let analysis = state.promise_analyzer.analyze(user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!();
    println!("  {} Promise analysis", style("◆").cyan().bold());
    println!();
    println!(
        "  Promises analyzed: {}  Success rate: {}%  Trend: {}",
        style(analysis.total_promises).bold(),
        style(analysis.success_rate).yellow().bold(),
        analysis.recent_trend,
    );

    if !analysis.breakdown.is_empty() {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Category").fg(Color::White),
            Cell::new("Total").fg(Color::White),
            Cell::new("Kept").fg(Color::White),
            Cell::new("Broken").fg(Color::White),
        ]);
        for (category, stats) in &analysis.breakdown {
            table.add_row(vec![
                Cell::new(category).fg(Color::Cyan),
                Cell::new(stats.total),
                Cell::new(stats.kept).fg(Color::Green),
                Cell::new(stats.broken).fg(Color::Red),
            ]);
        }
        println!("{table}");
    }

    print_list("Common failure reasons", &analysis.common_failure_reasons);
    print_list("Recommendations", &analysis.recommendations);
    println!();
    Ok(())
}

/// Correlate the user's identity baseline with their recent call insights.
pub async fn identity(state: &AppState, user: &Uuid, json: bool) -> Result<()> {
    let calls = state
        .call_repo
        .recent_calls(user, CORRELATION_CALL_LIMIT)
        .await?;
    let insights = state.extractor.extract_from_calls(&calls).await;
    let correlation = state.correlator.analyze(user, &insights).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&correlation)?);
        return Ok(());
    }

    println!();
    println!("  {} Identity correlation", style("◆").cyan().bold());
    println!();
    match correlation.consistency_score {
        Some(score) => println!("  Consistency score: {}", style(score).yellow().bold()),
        None => println!(
            "  Consistency score: {} (pending: {})",
            style("n/a").dim(),
            correlation.pending_analyses.join(", "),
        ),
    }
    print_list("Consistent areas", &correlation.consistent_areas);
    print_list("Growth indicators", &correlation.growth_indicators);
    print_list("Call-only insights", &correlation.call_only_insights);
    print_list("Contradictions", &correlation.contradictions);
    print_list("Recommendations", &correlation.recommendations);
    println!();
    Ok(())
}

fn print_list(label: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    println!("  {label}:");
    for entry in entries {
        println!("    {} {}", style("•").dim(), entry);
    }
}
