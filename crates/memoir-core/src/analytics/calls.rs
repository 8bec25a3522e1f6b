//! Call success analysis.

use uuid::Uuid;

use memoir_types::analytics::{CallAnalysis, Trend};
use memoir_types::call::CallRecord;
use memoir_types::error::RepositoryError;

use crate::repository::call::CallRepository;

use super::trend::{success_percent, windowed_trend};

const CALL_SCAN_LIMIT: usize = 50;
const TREND_WINDOW: usize = 10;
const MAX_RECOMMENDATIONS: usize = 5;

/// Analyzes call outcomes over a user's recent history.
pub struct CallAnalyzer<C> {
    calls: C,
}

impl<C> CallAnalyzer<C>
where
    C: CallRepository,
{
    pub fn new(calls: C) -> Self {
        Self { calls }
    }

    /// Analyze the user's most recent calls. A user with no call history
    /// gets the documented empty result, never an error.
    #[tracing::instrument(name = "analyze_calls", skip(self), fields(user_id = %user_id))]
    pub async fn analyze(&self, user_id: &Uuid) -> Result<CallAnalysis, RepositoryError> {
        let calls = self.calls.recent_calls(user_id, CALL_SCAN_LIMIT).await?;
        if calls.is_empty() {
            return Ok(CallAnalysis::empty());
        }

        let successful = calls.iter().filter(|c| c.is_successful()).count();
        let success_rate = success_percent(successful, calls.len());

        let outcomes: Vec<bool> = calls.iter().map(|c| c.is_successful()).collect();
        let recent_trend = windowed_trend(&outcomes, TREND_WINDOW);

        let total_duration: i64 = calls.iter().map(|c| c.duration_sec).sum();
        let average_call_duration =
            (total_duration as f64 / calls.len() as f64).round() as i64;

        let most_effective_tone = most_effective_tone(&calls);
        let recommended_actions = recommendations(success_rate, recent_trend);

        Ok(CallAnalysis {
            total_calls: calls.len(),
            success_rate,
            recent_trend,
            average_call_duration,
            most_effective_tone,
            recommended_actions,
        })
    }
}

/// Tone with the highest per-tone success ratio. Calls without a tone count
/// as "supportive". Ties break toward the tone seen first.
fn most_effective_tone(calls: &[CallRecord]) -> String {
    let mut tones: Vec<(String, u64, u64)> = Vec::new();
    for call in calls {
        let tone = call.tone_used.as_deref().unwrap_or("supportive");
        let idx = match tones.iter().position(|(t, _, _)| t == tone) {
            Some(idx) => idx,
            None => {
                tones.push((tone.to_string(), 0, 0));
                tones.len() - 1
            }
        };
        tones[idx].1 += 1;
        if call.is_successful() {
            tones[idx].2 += 1;
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (tone, total, successful) in &tones {
        let rate = *successful as f64 / *total as f64;
        if best.is_none_or(|(_, r)| rate > r) {
            best = Some((tone, rate));
        }
    }
    best.map(|(tone, _)| tone.to_string())
        .unwrap_or_else(|| "supportive".to_string())
}

fn recommendations(success_rate: u32, trend: Trend) -> Vec<String> {
    let mut out = Vec::new();
    if success_rate < 50 {
        out.push("Focus on smaller, achievable daily commitments".to_string());
    } else if success_rate > 80 {
        out.push("Consider increasing commitment difficulty for continued growth".to_string());
    }
    if trend == Trend::Declining {
        out.push("Schedule additional support calls this week".to_string());
    }
    out.truncate(MAX_RECOMMENDATIONS);
    out
}
