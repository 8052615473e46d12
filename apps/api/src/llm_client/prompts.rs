// Prompt constants for the resume enhancement call.
// The system prompt pins the exact response schema; the sanitizer in
// analysis::enhance still treats every field as untrusted.

/// Maximum resume characters forwarded to the provider.
pub const MAX_RESUME_PROMPT_CHARS: usize = 8000;

/// System instruction demanding schema-exact JSON output.
pub const ANALYSIS_SYSTEM: &str = r#"You are an expert resume evaluator.
Return only JSON:
{
  "prediction": "string",
  "confidence": number,
  "confidenceLevel": "High|Moderate|Needs Improvement",
  "weaknesses": ["string"],
  "precautions": ["string"],
  "technologyRecommendations": ["string"],
  "improvementPlan": ["string"],
  "voiceSummary": "string"
}"#;

/// User message: the heuristic baseline plus the (truncated) resume text.
pub fn build_analysis_prompt(base_analysis_json: &str, resume_text: &str) -> String {
    let resume: String = resume_text.chars().take(MAX_RESUME_PROMPT_CHARS).collect();
    format!("Base analysis: {base_analysis_json}\nResume: {resume}")
}
