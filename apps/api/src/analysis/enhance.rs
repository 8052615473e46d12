//! LLM augmentation of the heuristic analysis, with guaranteed fallback.
//!
//! The augmenter never surfaces an error to its caller: every failure mode
//! (transport, provider error, malformed JSON, timeout) collapses into
//! `Augmentation::HeuristicFallback`, and the analysis that ships is the
//! heuristic one, retagged so consumers can see the attempt failed.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::analysis::narrative;
use crate::llm_client::{extract_json_object, prompts, LlmClient, LlmError};
use crate::models::analysis::{
    AnalysisMethod, AnalysisResult, ConfidenceLevel, LOCAL_MODEL, MAX_CONFIDENCE, MIN_CONFIDENCE,
};

/// Outcome of one augmentation attempt.
#[derive(Debug)]
pub enum Augmentation {
    /// The provider returned usable JSON and the merged result applies.
    Augmented(AnalysisResult),
    /// The attempt failed; the caller keeps the heuristic analysis.
    HeuristicFallback { reason: String },
}

/// Pluggable enhancement seam. The production implementation talks to
/// OpenAI; tests inject deterministic stand-ins.
#[async_trait]
pub trait Augmenter: Send + Sync {
    async fn augment(&self, heuristic: &AnalysisResult, resume_text: &str) -> Augmentation;

    /// Model name recorded when an attempt falls back.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Error)]
enum EnhanceError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("provider returned no parseable JSON object")]
    InvalidJson,
}

pub struct OpenAiAugmenter {
    client: LlmClient,
    timeout: Duration,
}

impl OpenAiAugmenter {
    pub fn new(client: LlmClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn request_enhanced(
        &self,
        heuristic: &AnalysisResult,
        resume_text: &str,
    ) -> Result<AnalysisResult, EnhanceError> {
        let base_json = serde_json::to_string(heuristic)?;
        let prompt = prompts::build_analysis_prompt(&base_json, resume_text);

        let completion = self.client.complete(prompts::ANALYSIS_SYSTEM, &prompt).await?;
        let parsed =
            extract_json_object(&completion.content).ok_or(EnhanceError::InvalidJson)?;

        Ok(merge_enhanced(
            &parsed,
            heuristic,
            completion.model.as_deref(),
            self.client.model(),
        ))
    }

    /// Runs one enhancement attempt under the configured hard deadline.
    /// Expiry cancels the in-flight attempt and counts as a failure.
    async fn run_with_deadline<F>(&self, attempt: F) -> Augmentation
    where
        F: std::future::Future<Output = Result<AnalysisResult, EnhanceError>>,
    {
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(enhanced)) => Augmentation::Augmented(enhanced),
            Ok(Err(e)) => {
                warn!("LLM enhancement failed, using local fallback: {e}");
                Augmentation::HeuristicFallback {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    "LLM enhancement timed out after {}s, using local fallback",
                    self.timeout.as_secs()
                );
                Augmentation::HeuristicFallback {
                    reason: format!("timed out after {}s", self.timeout.as_secs()),
                }
            }
        }
    }
}

#[async_trait]
impl Augmenter for OpenAiAugmenter {
    async fn augment(&self, heuristic: &AnalysisResult, resume_text: &str) -> Augmentation {
        self.run_with_deadline(self.request_enhanced(heuristic, resume_text))
            .await
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}

/// Merges provider output over the heuristic baseline, field by field.
/// Every field is untrusted: lists are sanitized, confidence is clamped
/// and its tier recomputed, and anything missing keeps the heuristic value.
fn merge_enhanced(
    parsed: &Value,
    heuristic: &AnalysisResult,
    reported_model: Option<&str>,
    configured_model: &str,
) -> AnalysisResult {
    let confidence = match parsed.get("confidence").and_then(Value::as_f64) {
        Some(value) => (value.round() as i32).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        None => heuristic.confidence,
    };

    let prediction = parsed
        .get("prediction")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(&heuristic.prediction)
        .to_string();

    let llm_model = reported_model
        .filter(|m| !m.is_empty())
        .unwrap_or(configured_model)
        .to_string();

    let voice_summary = parsed
        .get("voiceSummary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut enhanced = AnalysisResult {
        prediction,
        confidence,
        confidence_level: ConfidenceLevel::from_score(confidence),
        weaknesses: sanitize_string_list(parsed.get("weaknesses"), &heuristic.weaknesses),
        precautions: sanitize_string_list(parsed.get("precautions"), &heuristic.precautions),
        technology_recommendations: sanitize_string_list(
            parsed.get("technologyRecommendations"),
            &heuristic.technology_recommendations,
        ),
        improvement_plan: sanitize_string_list(
            parsed.get("improvementPlan"),
            &heuristic.improvement_plan,
        ),
        llm_model,
        analysis_method: AnalysisMethod::OpenaiEnhanced,
        voice_summary,
    };

    if enhanced.voice_summary.is_empty() {
        enhanced.voice_summary = narrative::build_voice_summary(&enhanced);
    }

    enhanced
}

/// Trims entries, drops empties and non-strings, caps the list; a missing
/// or non-array value keeps the heuristic list wholesale.
fn sanitize_string_list(value: Option<&Value>, fallback: &[String]) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return fallback.to_vec();
    };

    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(narrative::MAX_LIST_ITEMS)
        .map(str::to_string)
        .collect()
}

/// Retags a heuristic analysis after a failed augmentation attempt so the
/// output records which model was tried.
pub fn fallback_analysis(mut heuristic: AnalysisResult, attempted_model: &str) -> AnalysisResult {
    heuristic.llm_model = format!("{LOCAL_MODEL} (openai fallback from {attempted_model})");
    heuristic.analysis_method = AnalysisMethod::HeuristicLocalFallback;
    heuristic.voice_summary = narrative::build_voice_summary(&heuristic);
    heuristic
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_heuristic() -> AnalysisResult {
        AnalysisResult {
            prediction: "Good profile detected.".to_string(),
            confidence: 72,
            confidence_level: ConfidenceLevel::Moderate,
            weaknesses: vec!["Work experience impact is unclear.".to_string()],
            precautions: vec!["Do not overload the resume.".to_string()],
            technology_recommendations: vec!["Terraform".to_string()],
            improvement_plan: vec!["Tailor keywords to every job description.".to_string()],
            llm_model: LOCAL_MODEL.to_string(),
            analysis_method: AnalysisMethod::HeuristicLocalLlm,
            voice_summary: "AI coach update.".to_string(),
        }
    }

    #[test]
    fn test_merge_accepts_clean_payload() {
        let parsed = json!({
            "prediction": "Strong candidate for platform roles.",
            "confidence": 91,
            "confidenceLevel": "Moderate",
            "weaknesses": ["Thin leadership signals."],
            "precautions": ["Keep bullet points short."],
            "technologyRecommendations": ["Terraform", "ArgoCD"],
            "improvementPlan": ["Lead a migration project."],
            "voiceSummary": "Your resume is strong."
        });

        let enhanced = merge_enhanced(&parsed, &make_heuristic(), Some("gpt-4o-mini-2024"), "gpt-4o-mini");

        assert_eq!(enhanced.prediction, "Strong candidate for platform roles.");
        assert_eq!(enhanced.confidence, 91);
        // The tier is recomputed from the clamped score, not trusted.
        assert_eq!(enhanced.confidence_level, ConfidenceLevel::High);
        assert_eq!(enhanced.llm_model, "gpt-4o-mini-2024");
        assert_eq!(enhanced.analysis_method, AnalysisMethod::OpenaiEnhanced);
        assert_eq!(enhanced.voice_summary, "Your resume is strong.");
    }

    #[test]
    fn test_merge_clamps_out_of_range_confidence() {
        let parsed = json!({ "confidence": 150 });
        let enhanced = merge_enhanced(&parsed, &make_heuristic(), None, "gpt-4o-mini");
        assert_eq!(enhanced.confidence, MAX_CONFIDENCE);
        assert_eq!(enhanced.confidence_level, ConfidenceLevel::High);

        let parsed = json!({ "confidence": 3.4 });
        let enhanced = merge_enhanced(&parsed, &make_heuristic(), None, "gpt-4o-mini");
        assert_eq!(enhanced.confidence, MIN_CONFIDENCE);
    }

    #[test]
    fn test_merge_falls_back_per_field() {
        let parsed = json!({ "confidence": "not a number", "weaknesses": "not a list" });
        let heuristic = make_heuristic();
        let enhanced = merge_enhanced(&parsed, &heuristic, None, "gpt-4o-mini");

        assert_eq!(enhanced.confidence, heuristic.confidence);
        assert_eq!(enhanced.prediction, heuristic.prediction);
        assert_eq!(enhanced.weaknesses, heuristic.weaknesses);
        assert_eq!(enhanced.llm_model, "gpt-4o-mini");
        // Still tagged enhanced: the provider answered, even if poorly.
        assert_eq!(enhanced.analysis_method, AnalysisMethod::OpenaiEnhanced);
    }

    #[test]
    fn test_merge_synthesizes_missing_voice_summary() {
        let parsed = json!({ "confidence": 88 });
        let enhanced = merge_enhanced(&parsed, &make_heuristic(), None, "gpt-4o-mini");
        assert!(enhanced.voice_summary.starts_with("AI coach update."));
        assert!(enhanced.voice_summary.contains("88 percent"));
    }

    #[test]
    fn test_sanitize_string_list_cleans_entries() {
        let value = json!(["  keep me  ", "", 42, null, "also keep", "a", "b", "c", "d"]);
        let out = sanitize_string_list(Some(&value), &["fallback".to_string()]);
        assert_eq!(out, vec!["keep me", "also keep", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_sanitize_string_list_fallback_on_non_array() {
        let fallback = vec!["heuristic".to_string()];
        assert_eq!(sanitize_string_list(None, &fallback), fallback);
        let value = json!("nope");
        assert_eq!(sanitize_string_list(Some(&value), &fallback), fallback);
    }

    #[test]
    fn test_fallback_analysis_retags_provenance() {
        let fallback = fallback_analysis(make_heuristic(), "gpt-4o-mini");
        assert_eq!(
            fallback.llm_model,
            "local-llm-v1 (openai fallback from gpt-4o-mini)"
        );
        assert_eq!(
            fallback.analysis_method,
            AnalysisMethod::HeuristicLocalFallback
        );
        // Narrative content survives untouched; only provenance changes.
        assert_eq!(fallback.confidence, 72);
        assert!(fallback.voice_summary.starts_with("AI coach update."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_expiry_falls_back() {
        let client = LlmClient::new(
            "sk-test".to_string(),
            "gpt-4o-mini".to_string(),
            Duration::from_secs(30),
        );
        let augmenter = OpenAiAugmenter::new(client, Duration::from_secs(30));

        // An attempt that never resolves; the paused clock jumps straight
        // to the deadline.
        let stalled = std::future::pending::<Result<AnalysisResult, EnhanceError>>();

        match augmenter.run_with_deadline(stalled).await {
            Augmentation::HeuristicFallback { reason } => {
                assert_eq!(reason, "timed out after 30s");
            }
            Augmentation::Augmented(_) => panic!("a stalled attempt must fall back"),
        }
    }
}
