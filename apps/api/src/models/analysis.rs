use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest confidence score the model will ever report.
pub const MIN_CONFIDENCE: i32 = 45;
/// Highest confidence score the model will ever report.
pub const MAX_CONFIDENCE: i32 = 98;

/// Name reported for the built-in heuristic model.
pub const LOCAL_MODEL: &str = "local-llm-v1";

/// Qualitative tier derived from the numeric confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Moderate,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl ConfidenceLevel {
    pub fn from_score(score: i32) -> Self {
        if score >= 85 {
            ConfidenceLevel::High
        } else if score >= 70 {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Moderate => "Moderate",
            ConfidenceLevel::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the analysis was produced: pure heuristics, an accepted LLM pass,
/// or heuristics after a failed LLM attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMethod {
    HeuristicLocalLlm,
    OpenaiEnhanced,
    HeuristicLocalFallback,
}

impl AnalysisMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::HeuristicLocalLlm => "heuristic-local-llm",
            AnalysisMethod::OpenaiEnhanced => "openai-enhanced",
            AnalysisMethod::HeuristicLocalFallback => "heuristic-local-fallback",
        }
    }
}

impl std::fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete career-readiness assessment for one uploaded resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub prediction: String,
    pub confidence: i32,
    pub confidence_level: ConfidenceLevel,
    pub weaknesses: Vec<String>,
    pub precautions: Vec<String>,
    pub technology_recommendations: Vec<String>,
    pub improvement_plan: Vec<String>,
    pub llm_model: String,
    pub analysis_method: AnalysisMethod,
    pub voice_summary: String,
}

/// One row of the append-only analysis history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub file_name: String,
    pub confidence: i32,
    pub confidence_level: ConfidenceLevel,
    pub llm_model: String,
    pub analysis_method: AnalysisMethod,
    pub weaknesses: Vec<String>,
    pub technology_recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(file_name: &str, analysis: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            confidence: analysis.confidence,
            confidence_level: analysis.confidence_level,
            llm_model: analysis.llm_model.clone(),
            analysis_method: analysis.analysis_method,
            weaknesses: analysis.weaknesses.clone(),
            technology_recommendations: analysis.technology_recommendations.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_level_bands() {
        assert_eq!(ConfidenceLevel::from_score(98), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(84), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(70), ConfidenceLevel::Moderate);
        assert_eq!(
            ConfidenceLevel::from_score(69),
            ConfidenceLevel::NeedsImprovement
        );
        assert_eq!(
            ConfidenceLevel::from_score(45),
            ConfidenceLevel::NeedsImprovement
        );
    }

    #[test]
    fn test_analysis_result_round_trip() {
        let result = AnalysisResult {
            prediction: "Strong profile detected.".to_string(),
            confidence: 91,
            confidence_level: ConfidenceLevel::High,
            weaknesses: vec!["Limited evidence of AWS in recent work.".to_string()],
            precautions: vec![],
            technology_recommendations: vec!["Terraform".to_string()],
            improvement_plan: vec!["Tailor keywords to every job description.".to_string()],
            llm_model: LOCAL_MODEL.to_string(),
            analysis_method: AnalysisMethod::HeuristicLocalLlm,
            voice_summary: "AI coach update.".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["confidenceLevel"], "High");
        assert_eq!(json["analysisMethod"], "heuristic-local-llm");
        assert_eq!(json["llmModel"], "local-llm-v1");
        assert!(json.get("confidence_level").is_none());

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.confidence, 91);
        assert_eq!(back.analysis_method, AnalysisMethod::HeuristicLocalLlm);
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(
            AnalysisMethod::HeuristicLocalFallback.to_string(),
            "heuristic-local-fallback"
        );
        assert_eq!(AnalysisMethod::OpenaiEnhanced.to_string(), "openai-enhanced");
        assert_eq!(
            ConfidenceLevel::NeedsImprovement.to_string(),
            "Needs Improvement"
        );
    }
}
