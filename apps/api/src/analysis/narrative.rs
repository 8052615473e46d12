//! Deterministic narrative feedback derived from collected signals.
//!
//! Every sentence here is fixed copy; signals only decide which sentences
//! appear and in what order. Keeping the strings centralized means the
//! heuristic output is fully reproducible for a given corpus.

use crate::analysis::signals::{Domain, SignalSet};
use crate::models::analysis::AnalysisResult;

/// Upper bound for every narrative list in the response.
pub const MAX_LIST_ITEMS: usize = 6;

/// Curated learning recommendations per detected domain.
fn domain_recommendations(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Frontend => &[
            "TypeScript",
            "Next.js",
            "React Server Components",
            "Playwright",
            "Web Performance Profiling",
        ],
        Domain::Backend => &[
            "Node.js API Security",
            "FastAPI",
            "GraphQL Federation",
            "Event-Driven Architecture",
            "gRPC",
        ],
        Domain::Data => &[
            "PostgreSQL Tuning",
            "Vector Databases",
            "dbt",
            "DuckDB",
            "Data Contracts",
        ],
        Domain::Cloud => &[
            "AWS Lambda",
            "Terraform",
            "Cloud Security Posture",
            "Observability",
            "FinOps",
        ],
        Domain::Devops => &[
            "Kubernetes",
            "GitHub Actions",
            "SRE Incident Playbooks",
            "Docker Slim Images",
        ],
        Domain::Ai => &[
            "LLM Prompt Engineering",
            "RAG Pipelines",
            "LangChain",
            "MLOps",
            "Model Evaluation",
        ],
    }
}

pub fn prediction_message(confidence: i32) -> &'static str {
    if confidence >= 85 {
        "Strong profile detected. High match for Full-Stack / Software Engineer roles."
    } else if confidence >= 70 {
        "Good profile detected. Suitable for junior-to-mid software development roles."
    } else {
        "Resume uploaded successfully. Improve role-specific details for better interview conversion."
    }
}

pub fn build_weaknesses(signals: &SignalSet) -> Vec<String> {
    let mut items = Vec::new();

    if !signals.has_projects {
        items.push(
            "Project section is missing or too light, so practical skills are hard to verify."
                .to_string(),
        );
    }
    if !signals.has_experience {
        items.push("Work experience impact is unclear. Add ownership and role outcomes.".to_string());
    }
    if signals.quantified_impact_count == 0 {
        items.push(
            "Achievements are not quantified. Add metrics like %, time saved, or revenue impact."
                .to_string(),
        );
    }
    if !signals.has_contact() {
        items.push(
            "Contact details are incomplete, which can reduce interview callbacks.".to_string(),
        );
    }
    for skill in signals.missing.iter().take(3) {
        items.push(format!("Limited evidence of {} in recent work.", skill.label));
    }
    if items.is_empty() {
        items.push(
            "No major weaknesses detected. Focus next on role-specific keyword alignment."
                .to_string(),
        );
    }

    items.truncate(MAX_LIST_ITEMS);
    items
}

pub fn build_precautions(signals: &SignalSet) -> Vec<String> {
    let mut items = Vec::new();

    if signals.word_count < 220 {
        items.push(
            "Do not submit a one-page resume with very limited detail; expand impact statements."
                .to_string(),
        );
    }
    if signals.word_count > 1000 {
        items.push("Do not overload the resume. Keep it concise and high-impact.".to_string());
    }
    if !signals.has_projects {
        items.push(
            "Do not apply without at least one strong project section linked to real outcomes."
                .to_string(),
        );
    }
    if signals.quantified_impact_count < 2 {
        items.push(
            "Do not use only generic claims. Add measurable results in top achievements."
                .to_string(),
        );
    }
    if !signals.has_summary {
        items.push(
            "Do not skip your profile summary. Add a short role-aligned summary at the top."
                .to_string(),
        );
    }
    if items.is_empty() {
        items.push(
            "Avoid using the same resume for every role; customize skills per job description."
                .to_string(),
        );
    }

    items.truncate(MAX_LIST_ITEMS);
    items
}

/// Technologies worth learning given the domains the resume already shows.
/// Skips anything the resume mentions; AI topics are always considered so
/// every candidate gets at least some coverage of the fastest-moving area.
pub fn build_technology_recommendations(signals: &SignalSet, corpus: &str) -> Vec<String> {
    let mut recommendations: Vec<&'static str> = Vec::new();

    let domains: Vec<Domain> = if signals.detected_domains.is_empty() {
        vec![Domain::Frontend, Domain::Backend, Domain::Devops]
    } else {
        signals.detected_domains.clone()
    };

    let push_unseen = |recs: &mut Vec<&'static str>, tech: &'static str| {
        if !corpus.contains(&tech.to_lowercase()) && !recs.contains(&tech) {
            recs.push(tech);
        }
    };

    for domain in &domains {
        for tech in domain_recommendations(*domain) {
            push_unseen(&mut recommendations, tech);
        }
    }

    if !signals.detected_domains.contains(&Domain::Ai) {
        for tech in domain_recommendations(Domain::Ai) {
            push_unseen(&mut recommendations, tech);
        }
    }

    recommendations.truncate(MAX_LIST_ITEMS);
    recommendations.into_iter().map(str::to_string).collect()
}

pub fn build_improvement_plan(signals: &SignalSet, technology_recommendations: &[String]) -> Vec<String> {
    let mut plan = Vec::new();

    if signals.quantified_impact_count < 2 {
        plan.push(
            "Rewrite at least 3 bullet points using action + metric + business result format."
                .to_string(),
        );
    }
    if !signals.has_projects {
        plan.push(
            "Add one flagship project with architecture choices, stack used, and measurable impact."
                .to_string(),
        );
    }
    if !signals.has_certifications {
        plan.push(
            "Complete one relevant certification and include it near the top of the resume."
                .to_string(),
        );
    }
    if !technology_recommendations.is_empty() {
        let top: Vec<&str> = technology_recommendations
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        plan.push(format!(
            "Build a short project using {} and link it.",
            top.join(" and ")
        ));
    }
    plan.push("Tailor keywords to every job description before applying.".to_string());

    plan.truncate(MAX_LIST_ITEMS);
    plan
}

/// Spoken-style one-liner recapping the whole analysis.
pub fn build_voice_summary(analysis: &AnalysisResult) -> String {
    let top_weakness = analysis
        .weaknesses
        .first()
        .map(String::as_str)
        .unwrap_or("No major weakness detected.");
    let top_improvement = analysis
        .improvement_plan
        .first()
        .map(String::as_str)
        .unwrap_or("Strengthen role-specific details.");
    let top_tech: Vec<&str> = analysis
        .technology_recommendations
        .iter()
        .take(2)
        .map(String::as_str)
        .collect();
    let tech_phrase = if top_tech.is_empty() {
        "modern cloud and AI technologies".to_string()
    } else {
        top_tech.join(" and ")
    };

    format!(
        "AI coach update. Your resume confidence is {} percent and the confidence level is {}. Key weakness: {} Priority improvement: {} Learn {} to improve future opportunities.",
        analysis.confidence, analysis.confidence_level, top_weakness, top_improvement, tech_phrase
    )
}
