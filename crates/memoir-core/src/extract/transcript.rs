//! Psychological snippet extraction from call transcripts.
//!
//! Each call's transcript is rendered to `"role: message"` lines and sent to
//! the classifier. A malformed or failed classification yields zero items
//! for that call -- logged, never fatal -- so one bad call cannot abort a
//! multi-call batch.

use memoir_types::call::{CallInsight, CallRecord};

use crate::classify::TranscriptClassifier;

/// Extracts categorized psychological snippets from call history.
pub struct TranscriptExtractor<C> {
    classifier: C,
}

impl<C> TranscriptExtractor<C>
where
    C: TranscriptClassifier,
{
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Extract insights across a batch of calls.
    ///
    /// Calls without a transcript are skipped entirely. The output is the
    /// flattened snippet list across all calls, each annotated with its
    /// call's metadata.
    #[tracing::instrument(name = "extract_transcripts", skip(self, calls), fields(call_count = calls.len()))]
    pub async fn extract_from_calls(&self, calls: &[CallRecord]) -> Vec<CallInsight> {
        let mut insights = Vec::new();
        for call in calls {
            let Some(transcript) = call.transcript_text() else {
                tracing::debug!(call_id = %call.id, "call has no transcript, skipping");
                continue;
            };

            let snippets = match self
                .classifier
                .classify(&transcript, call.transcript_summary.as_deref())
                .await
            {
                Ok(snippets) => snippets,
                Err(e) => {
                    tracing::warn!(
                        call_id = %call.id,
                        error = %e,
                        "transcript classification failed, treating as zero items"
                    );
                    continue;
                }
            };

            let call_success = call
                .call_successful
                .clone()
                .unwrap_or_else(|| "unknown".to_string());

            for snippet in snippets {
                insights.push(CallInsight {
                    call_id: call.id,
                    content_type: snippet.kind,
                    text_content: snippet.content,
                    confidence: snippet.confidence,
                    call_date: call.created_at,
                    call_success: call_success.clone(),
                    call_type: call.call_type.clone(),
                    tone_used: call.tone_used.clone(),
                });
            }
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_call, ScriptedClassifier};
    use memoir_types::call::ClassifiedSnippet;
    use memoir_types::error::ClassificationError;
    use uuid::Uuid;

    fn snippet(kind: &str, content: &str) -> ClassifiedSnippet {
        ClassifiedSnippet {
            kind: kind.to_string(),
            content: content.to_string(),
            confidence: 0.9,
        }
    }

    #[tokio::test]
    async fn test_extracts_and_annotates_snippets() {
        let user = Uuid::now_v7();
        let call = test_call(user, true, Some(vec![("user", "I skipped the gym")]));
        let call_id = call.id;

        let extractor = TranscriptExtractor::new(ScriptedClassifier::new(vec![Ok(vec![
            snippet("excuse", "skipped the gym"),
            snippet("commitment", "will go tomorrow"),
        ])]));

        let insights = extractor.extract_from_calls(&[call]).await;
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].call_id, call_id);
        assert_eq!(insights[0].content_type, "excuse");
        assert_eq!(insights[0].call_success, "success");
    }

    #[tokio::test]
    async fn test_skips_calls_without_transcript() {
        let user = Uuid::now_v7();
        let no_transcript = test_call(user, true, None);
        let empty_transcript = test_call(user, true, Some(vec![]));

        // Classifier would panic the script if called: no responses queued.
        let extractor = TranscriptExtractor::new(ScriptedClassifier::new(vec![]));
        let insights = extractor
            .extract_from_calls(&[no_transcript, empty_transcript])
            .await;
        assert!(insights.is_empty());
    }

    #[tokio::test]
    async fn test_classification_failure_is_isolated() {
        let user = Uuid::now_v7();
        let bad_call = test_call(user, false, Some(vec![("user", "garbled")]));
        let good_call = test_call(user, true, Some(vec![("user", "I did it")]));

        let extractor = TranscriptExtractor::new(ScriptedClassifier::new(vec![
            Err(ClassificationError::MalformedResponse(
                "not json".to_string(),
            )),
            Ok(vec![snippet("breakthrough", "I did it")]),
        ]));

        let insights = extractor.extract_from_calls(&[bad_call, good_call]).await;
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].content_type, "breakthrough");
        assert_eq!(insights[0].call_success, "success");
    }
}
