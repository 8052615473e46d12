//! Analysis engine — wires text recovery, signal collection, scoring,
//! narrative generation, and the optional enhancement pass into one
//! infallible entry point.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error};
use uuid::Uuid;

use crate::analysis::enhance::{fallback_analysis, Augmentation, Augmenter};
use crate::analysis::narrative;
use crate::analysis::profile::{ProfileExtractor, ResumeProfile};
use crate::analysis::scoring::calculate_confidence;
use crate::analysis::signals::SignalExtractor;
use crate::analysis::text::{normalize_text, recover_text, DecodedText};
use crate::models::analysis::{
    AnalysisMethod, AnalysisRecord, AnalysisResult, ConfidenceLevel, LOCAL_MODEL,
};
use crate::store::AnalysisStore;

/// One finished analysis plus the identity of its history record.
pub struct AnalysisOutcome {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub analysis: AnalysisResult,
}

/// Structured profile plus the heuristic confidence as a fraction.
pub struct ProfileOutcome {
    pub profile: ResumeProfile,
    pub confidence: f64,
}

pub struct AnalysisEngine {
    signals: SignalExtractor,
    profiles: ProfileExtractor,
    augmenter: Option<Arc<dyn Augmenter>>,
    store: Arc<AnalysisStore>,
}

impl AnalysisEngine {
    pub fn new(augmenter: Option<Arc<dyn Augmenter>>, store: Arc<AnalysisStore>) -> Self {
        Self {
            signals: SignalExtractor::new(),
            profiles: ProfileExtractor::new(),
            augmenter,
            store,
        }
    }

    /// Analyzes one uploaded document end to end. Never fails: unreadable
    /// bytes decode to empty text and land in the lowest confidence band.
    pub async fn analyze(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: Option<&str>,
    ) -> AnalysisOutcome {
        let decoded = recover_text(bytes, file_name, content_type);
        let heuristic = self.heuristic_analysis(&decoded);

        let analysis = match &self.augmenter {
            None => heuristic,
            Some(augmenter) => {
                // The provider sees collapsed text with original casing.
                let prompt_text = normalize_text(decoded.text());
                match augmenter.augment(&heuristic, &prompt_text).await {
                    Augmentation::Augmented(enhanced) => enhanced,
                    Augmentation::HeuristicFallback { reason } => {
                        debug!("Augmentation fell back to heuristics: {reason}");
                        fallback_analysis(heuristic, augmenter.model_name())
                    }
                }
            }
        };

        let record = AnalysisRecord::new(file_name, &analysis);
        let outcome = AnalysisOutcome {
            id: record.id,
            created_at: record.created_at,
            analysis,
        };
        self.record(record).await;
        outcome
    }

    /// Structured profile extraction for the pipeline-shaped payload.
    /// Confidence is the heuristic score expressed as a fraction of 100.
    pub fn extract_profile(
        &self,
        bytes: &[u8],
        file_name: &str,
        content_type: Option<&str>,
    ) -> ProfileOutcome {
        let decoded = recover_text(bytes, file_name, content_type);
        let signals = self.signals.collect(decoded.corpus());
        let confidence = f64::from(calculate_confidence(&signals)) / 100.0;
        ProfileOutcome {
            profile: self.profiles.extract(&decoded),
            confidence,
        }
    }

    fn heuristic_analysis(&self, decoded: &DecodedText) -> AnalysisResult {
        let signals = self.signals.collect(decoded.corpus());
        let confidence = calculate_confidence(&signals);
        let technology_recommendations =
            narrative::build_technology_recommendations(&signals, decoded.corpus());

        let mut analysis = AnalysisResult {
            prediction: narrative::prediction_message(confidence).to_string(),
            confidence,
            confidence_level: ConfidenceLevel::from_score(confidence),
            weaknesses: narrative::build_weaknesses(&signals),
            precautions: narrative::build_precautions(&signals),
            improvement_plan: narrative::build_improvement_plan(
                &signals,
                &technology_recommendations,
            ),
            technology_recommendations,
            llm_model: LOCAL_MODEL.to_string(),
            analysis_method: AnalysisMethod::HeuristicLocalLlm,
            voice_summary: String::new(),
        };
        analysis.voice_summary = narrative::build_voice_summary(&analysis);
        analysis
    }

    /// History append. Failures are logged and swallowed so persistence
    /// can never affect the analysis outcome.
    async fn record(&self, record: AnalysisRecord) {
        let store = Arc::clone(&self.store);
        if let Err(join_err) = tokio::task::spawn_blocking(move || {
            if let Err(e) = store.append(record) {
                error!("Unable to persist analysis record: {e}");
            }
        })
        .await
        {
            error!("Persistence task failed: {join_err}");
        }
    }
}
