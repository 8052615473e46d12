//! Corpus signal collection for the confidence model.
//!
//! Everything here is a pure function of the lowercase matching corpus:
//! weighted skill hits, section-presence flags, quantified-impact counts,
//! and contact markers. No extraction heuristics, no side effects.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Frontend,
    Backend,
    Data,
    Cloud,
    Devops,
    Ai,
}

/// One entry of the weighted skill library the scorer runs on.
#[derive(Debug)]
pub struct SkillEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: i32,
    pub domains: &'static [Domain],
}

pub const SKILL_LIBRARY: &[SkillEntry] = &[
    SkillEntry { key: "javascript", label: "JavaScript", weight: 8, domains: &[Domain::Frontend, Domain::Backend] },
    SkillEntry { key: "react", label: "React", weight: 8, domains: &[Domain::Frontend] },
    SkillEntry { key: "typescript", label: "TypeScript", weight: 8, domains: &[Domain::Frontend, Domain::Backend] },
    SkillEntry { key: "node", label: "Node.js", weight: 8, domains: &[Domain::Backend] },
    SkillEntry { key: "python", label: "Python", weight: 8, domains: &[Domain::Backend, Domain::Ai] },
    SkillEntry { key: "sql", label: "SQL", weight: 7, domains: &[Domain::Data, Domain::Backend] },
    SkillEntry { key: "mongodb", label: "MongoDB", weight: 6, domains: &[Domain::Data, Domain::Backend] },
    SkillEntry { key: "aws", label: "AWS", weight: 7, domains: &[Domain::Cloud, Domain::Devops] },
    SkillEntry { key: "docker", label: "Docker", weight: 7, domains: &[Domain::Devops, Domain::Cloud] },
    SkillEntry { key: "kubernetes", label: "Kubernetes", weight: 7, domains: &[Domain::Devops, Domain::Cloud] },
    SkillEntry { key: "machine learning", label: "Machine Learning", weight: 8, domains: &[Domain::Ai, Domain::Data] },
    SkillEntry { key: "tensorflow", label: "TensorFlow", weight: 6, domains: &[Domain::Ai] },
    SkillEntry { key: "pytorch", label: "PyTorch", weight: 6, domains: &[Domain::Ai] },
    SkillEntry { key: "git", label: "Git", weight: 5, domains: &[Domain::Devops] },
];

/// Signals collected from one resume corpus.
///
/// `detected` and `missing` partition the skill library; `detected_domains`
/// keeps first-seen order so downstream recommendations stay deterministic.
#[derive(Debug)]
pub struct SignalSet {
    pub detected: Vec<&'static SkillEntry>,
    pub missing: Vec<&'static SkillEntry>,
    pub detected_domains: Vec<Domain>,
    pub has_projects: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_certifications: bool,
    pub has_summary: bool,
    pub quantified_impact_count: usize,
    pub has_email: bool,
    pub has_phone: bool,
    pub word_count: usize,
}

impl SignalSet {
    pub fn has_contact(&self) -> bool {
        self.has_email && self.has_phone
    }
}

pub struct SignalExtractor {
    projects: Regex,
    experience: Regex,
    education: Regex,
    certifications: Regex,
    summary: Regex,
    impact: Regex,
    email: Regex,
    phone: Regex,
}

impl SignalExtractor {
    pub fn new() -> Self {
        Self {
            projects: Regex::new(r"\bprojects?\b").expect("Invalid projects regex"),
            experience: Regex::new(r"\bexperience\b|\bemployment\b|\bwork history\b")
                .expect("Invalid experience regex"),
            education: Regex::new(r"\beducation\b|\bcollege\b|\buniversity\b|\bbachelor\b|\bmaster\b")
                .expect("Invalid education regex"),
            certifications: Regex::new(r"\bcertification\b|\bcertified\b|\bcertificate\b")
                .expect("Invalid certifications regex"),
            summary: Regex::new(r"\bsummary\b|\bprofile\b|\bobjective\b")
                .expect("Invalid summary regex"),
            // %-figures, "5+" style counts, currency amounts, any 2+ digit number.
            impact: Regex::new(r"\b\d{1,3}%|\b\d+\+|\$\d+[kmb]?\b|\b\d{2,}\b")
                .expect("Invalid impact regex"),
            email: Regex::new(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}")
                .expect("Invalid email regex"),
            phone: Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("Invalid phone regex"),
        }
    }

    /// Collects all scoring signals from a lowercase normalized corpus.
    /// Skill detection is plain substring containment of each library key.
    pub fn collect(&self, corpus: &str) -> SignalSet {
        let (detected, missing): (Vec<_>, Vec<_>) = SKILL_LIBRARY
            .iter()
            .partition(|skill| corpus.contains(skill.key));

        let mut detected_domains = Vec::new();
        for skill in &detected {
            for &domain in skill.domains {
                if !detected_domains.contains(&domain) {
                    detected_domains.push(domain);
                }
            }
        }

        SignalSet {
            detected,
            missing,
            detected_domains,
            has_projects: self.projects.is_match(corpus),
            has_experience: self.experience.is_match(corpus),
            has_education: self.education.is_match(corpus),
            has_certifications: self.certifications.is_match(corpus),
            has_summary: self.summary.is_match(corpus),
            quantified_impact_count: self.impact.find_iter(corpus).count(),
            has_email: self.email.is_match(corpus),
            has_phone: self.phone.is_match(corpus),
            word_count: corpus.split_whitespace().count(),
        }
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(corpus: &str) -> SignalSet {
        SignalExtractor::new().collect(corpus)
    }

    #[test]
    fn test_empty_corpus_has_no_signals() {
        let signals = collect("");
        assert!(signals.detected.is_empty());
        assert_eq!(signals.missing.len(), SKILL_LIBRARY.len());
        assert!(!signals.has_projects);
        assert!(!signals.has_experience);
        assert_eq!(signals.quantified_impact_count, 0);
        assert_eq!(signals.word_count, 0);
    }

    #[test]
    fn test_detected_and_missing_partition_library() {
        let signals = collect("python and docker on aws");
        let labels: Vec<_> = signals.detected.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Python", "AWS", "Docker"]);
        assert_eq!(
            signals.detected.len() + signals.missing.len(),
            SKILL_LIBRARY.len()
        );
        assert!(signals.missing.iter().all(|s| !labels.contains(&s.label)));
    }

    #[test]
    fn test_domains_keep_first_seen_order() {
        let signals = collect("react and aws and python");
        assert_eq!(
            signals.detected_domains,
            vec![Domain::Frontend, Domain::Backend, Domain::Ai, Domain::Cloud, Domain::Devops]
        );
    }

    #[test]
    fn test_skill_detection_is_substring_containment() {
        // "sqlite" still carries the "sql" key.
        let signals = collect("worked with sqlite databases");
        assert!(signals.detected.iter().any(|s| s.label == "SQL"));
    }

    #[test]
    fn test_section_flags() {
        let signals = collect("education at state college. projects include a chat app. summary");
        assert!(signals.has_education);
        assert!(signals.has_projects);
        assert!(signals.has_summary);
        assert!(!signals.has_experience);
        assert!(!signals.has_certifications);
    }

    #[test]
    fn test_quantified_impact_counts_percent_plus_currency_and_numbers() {
        let signals = collect("cut latency 40% across 12 services, saved $30k, 5+ launches");
        // 40%, 12, $30k, 5+
        assert_eq!(signals.quantified_impact_count, 4);
    }

    #[test]
    fn test_single_digit_percent_counts() {
        let signals = collect("raised conversion 5% year over year");
        assert_eq!(signals.quantified_impact_count, 1);
    }

    #[test]
    fn test_contact_detection() {
        let with_both = collect("reach me at jane.doe@example.com or +1 (555) 010-7788");
        assert!(with_both.has_email);
        assert!(with_both.has_phone);
        assert!(with_both.has_contact());

        let email_only = collect("jane.doe@example.com");
        assert!(email_only.has_email);
        assert!(!email_only.has_phone);
        assert!(!email_only.has_contact());
    }
}
