//! Section-aware resume profile extraction.
//!
//! Works on the normalized line list from text recovery: locates headed
//! sections by alias, reads their bodies up to the next section heading,
//! and falls back to keyword scans when a resume has no usable headings.
//! Everything here is best-effort; a field the heuristics cannot find is
//! returned empty rather than failing the request.

use regex::Regex;
use serde::Serialize;

use crate::analysis::text::{normalize_line, split_lines, DecodedText};

// ────────────────────────────────────────────────────────────────────────────
// Vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Canonical skill labels with the lowercase aliases that reveal them.
const KNOWN_SKILLS: &[(&str, &[&str])] = &[
    ("JavaScript", &["javascript", "js"]),
    ("TypeScript", &["typescript", "ts"]),
    ("React", &["react", "react.js"]),
    ("Node.js", &["node", "nodejs", "node.js"]),
    ("Express.js", &["express", "expressjs", "express.js"]),
    ("Python", &["python"]),
    ("SQL", &["sql", "mysql", "postgresql", "postgres"]),
    ("MongoDB", &["mongodb", "mongo"]),
    ("HTML", &["html", "html5"]),
    ("CSS", &["css", "css3"]),
    ("AWS", &["aws", "amazon web services"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Git", &["git", "github"]),
    ("Machine Learning", &["machine learning", "ml"]),
    ("Deep Learning", &["deep learning"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch"]),
    ("NLP", &["nlp", "natural language processing"]),
    ("Data Analysis", &["data analysis", "analytics"]),
    ("Scikit-learn", &["scikit-learn", "sklearn"]),
    ("Pandas", &["pandas"]),
    ("NumPy", &["numpy"]),
    ("Power BI", &["power bi", "powerbi"]),
    ("Tableau", &["tableau"]),
    ("REST APIs", &["rest api", "restful", "apis"]),
    ("C++", &["c++", "cpp"]),
    ("Java", &["java"]),
    ("C#", &["c#", ".net", "dotnet"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Skills,
    Education,
    Certifications,
    Projects,
    Experience,
}

const SECTION_ALIASES: &[(Section, &[&str])] = &[
    (
        Section::Skills,
        &["skills", "technical skills", "core skills", "technologies", "competencies"],
    ),
    (
        Section::Education,
        &["education", "academic", "academics", "qualification", "qualifications"],
    ),
    (
        Section::Certifications,
        &["certification", "certifications", "licenses", "license"],
    ),
    (
        Section::Projects,
        &["project", "projects", "key projects", "personal projects"],
    ),
    (
        Section::Experience,
        &["experience", "work experience", "professional experience", "employment"],
    ),
];

/// Ordered role rules: the first rule with the strictly highest number of
/// matching skills wins; ties keep the earlier rule.
const ROLE_RULES: &[(&str, &[&str])] = &[
    (
        "Machine Learning Engineer",
        &["machine learning", "tensorflow", "pytorch", "nlp", "deep learning", "scikit-learn"],
    ),
    (
        "Data Scientist",
        &["data analysis", "sql", "pandas", "numpy", "power bi", "tableau"],
    ),
    (
        "Full Stack Developer",
        &["react", "node.js", "javascript", "typescript", "html", "css"],
    ),
    (
        "Backend Developer",
        &["node.js", "express.js", "java", "sql", "mongodb", "rest apis"],
    ),
    ("DevOps Engineer", &["aws", "docker", "kubernetes", "git"]),
];

const DEFAULT_ROLE: &str = "Software Engineer";

/// Lines that look like headings, not names.
const NAME_STOPLIST: &[&str] = &[
    "resume",
    "curriculum vitae",
    "profile",
    "summary",
    "objective",
    "skills",
    "education",
    "experience",
    "projects",
];

const MAX_SKILLS: usize = 20;
const MAX_SECTION_ITEMS: usize = 8;
const MAX_SKILL_SECTION_LINES: usize = 12;

// ────────────────────────────────────────────────────────────────────────────
// Output type
// ────────────────────────────────────────────────────────────────────────────

/// Structured fields pulled out of one resume. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeProfile {
    pub name: String,
    pub skills: Vec<String>,
    pub education: String,
    pub certifications: Vec<String>,
    pub projects: Vec<String>,
    pub experience_years: u32,
    pub predicted_role: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

pub struct ProfileExtractor {
    education: Regex,
    years: Regex,
    years_range: Regex,
    certification_line: Regex,
    project_line: Regex,
}

impl ProfileExtractor {
    pub fn new() -> Self {
        Self {
            education: Regex::new(
                r"(?i)\b(b\.?\s?tech|bachelor|master|m\.?\s?tech|phd|mba|b\.?\s?e\.?|m\.?\s?e\.?|bca|mca|university|college|institute)\b",
            )
            .expect("Invalid education regex"),
            years: Regex::new(r"(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)")
                .expect("Invalid years regex"),
            years_range: Regex::new(r"(\d+(?:\.\d+)?)\s*(?:-|to)\s*(\d+(?:\.\d+)?)\s*(?:years?|yrs?)")
                .expect("Invalid years range regex"),
            certification_line: Regex::new(r"(?i)\b(certified|certification|certificate)\b")
                .expect("Invalid certification regex"),
            project_line: Regex::new(r"(?i)\b(project|built|developed|designed|implemented)\b")
                .expect("Invalid project regex"),
        }
    }

    pub fn extract(&self, decoded: &DecodedText) -> ResumeProfile {
        let lines = split_lines(decoded.text());
        // Lines are already normalized, so joining them yields the corpus.
        let corpus = lines.join(" ").to_lowercase();

        let section_tokens =
            tokenize_skills(&section_lines(&lines, Section::Skills, MAX_SKILL_SECTION_LINES));
        let known = known_skills_in(&corpus);
        let merged: Vec<String> = section_tokens
            .into_iter()
            .chain(known.into_iter().map(str::to_string))
            .collect();
        let skills = uniq_list(merged, MAX_SKILLS);

        ResumeProfile {
            name: pick_name(&lines),
            education: self.pick_education(&lines),
            certifications: self.pick_certifications(&lines),
            projects: self.pick_projects(&lines),
            experience_years: self.pick_experience_years(&corpus),
            predicted_role: pick_predicted_role(&skills),
            skills,
        }
    }

    fn pick_education(&self, lines: &[String]) -> String {
        for line in lines {
            if self.education.is_match(line) {
                return line.clone();
            }
        }

        section_lines(lines, Section::Education, 3)
            .first()
            .cloned()
            .unwrap_or_default()
    }

    fn pick_certifications(&self, lines: &[String]) -> Vec<String> {
        let items = section_lines(lines, Section::Certifications, MAX_SECTION_ITEMS);
        if !items.is_empty() {
            return uniq_list(items, MAX_SECTION_ITEMS);
        }

        let fallback: Vec<String> = lines
            .iter()
            .filter(|line| self.certification_line.is_match(line))
            .take(MAX_SECTION_ITEMS)
            .cloned()
            .collect();
        uniq_list(fallback, MAX_SECTION_ITEMS)
    }

    fn pick_projects(&self, lines: &[String]) -> Vec<String> {
        let items = section_lines(lines, Section::Projects, MAX_SECTION_ITEMS);
        if !items.is_empty() {
            return uniq_list(items, MAX_SECTION_ITEMS);
        }

        let fallback: Vec<String> = lines
            .iter()
            .filter(|line| self.project_line.is_match(line))
            .take(MAX_SECTION_ITEMS)
            .cloned()
            .collect();
        uniq_list(fallback, MAX_SECTION_ITEMS)
    }

    /// Largest year figure mentioned anywhere, rounding "2-7 years" up to its
    /// range high. Defaults to 0 when the resume never states a duration.
    fn pick_experience_years(&self, corpus: &str) -> u32 {
        let mut max_years = 0.0_f64;

        for cap in self.years.captures_iter(corpus) {
            if let Ok(years) = cap[1].parse::<f64>() {
                max_years = max_years.max(years);
            }
        }

        for cap in self.years_range.captures_iter(corpus) {
            if let Ok(high) = cap[2].parse::<f64>() {
                max_years = max_years.max(high);
            }
        }

        max_years.round().max(0.0) as u32
    }
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section scanning
// ────────────────────────────────────────────────────────────────────────────

/// Lowercased heading form of a line: leading noise stripped, trailing
/// colons/whitespace removed.
fn sanitize_header(line: &str) -> String {
    normalize_line(line)
        .to_lowercase()
        .trim_end_matches([':', ' '])
        .to_string()
}

fn aliases_for(section: Section) -> &'static [&'static str] {
    SECTION_ALIASES
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

fn is_section_breaker(header: &str) -> bool {
    SECTION_ALIASES
        .iter()
        .any(|(_, aliases)| aliases.contains(&header))
}

fn find_section_index(lines: &[String], section: Section) -> Option<usize> {
    let aliases = aliases_for(section);
    lines
        .iter()
        .position(|line| aliases.contains(&sanitize_header(line).as_str()))
}

fn next_section_index(lines: &[String], from: usize) -> usize {
    ((from + 1)..lines.len())
        .find(|&i| is_section_breaker(&sanitize_header(&lines[i])))
        .unwrap_or(lines.len())
}

/// Body lines of a section: everything between its heading and the next
/// recognized heading, capped at `max_items`.
fn section_lines(lines: &[String], section: Section, max_items: usize) -> Vec<String> {
    let Some(start) = find_section_index(lines, section) else {
        return Vec::new();
    };
    let end = next_section_index(lines, start);

    let mut rows = Vec::new();
    for line in &lines[start + 1..end] {
        let item = normalize_line(line);
        if !item.is_empty() {
            rows.push(item);
        }
        if rows.len() >= max_items {
            break;
        }
    }
    rows
}

// ────────────────────────────────────────────────────────────────────────────
// Field heuristics
// ────────────────────────────────────────────────────────────────────────────

/// Splits skill-section lines on list separators, keeping tokens of a
/// plausible skill length.
fn tokenize_skills(skill_lines: &[String]) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in skill_lines {
        for part in line.split([',', '|', '/', ';']) {
            let part = normalize_line(part);
            if (2..=40).contains(&part.len()) {
                tokens.push(part);
            }
        }
    }
    tokens
}

fn known_skills_in(corpus: &str) -> Vec<&'static str> {
    KNOWN_SKILLS
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| corpus.contains(alias)))
        .map(|(label, _)| *label)
        .collect()
}

/// Case-insensitive dedup that keeps the first casing seen, capped.
fn uniq_list(values: Vec<String>, max_items: usize) -> Vec<String> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for value in values {
        let clean = normalize_line(&value);
        if clean.is_empty() {
            continue;
        }
        let key = clean.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(clean);
        }
        if out.len() >= max_items {
            break;
        }
    }
    out
}

/// A plausible name near the top: two to four purely alphabetic words,
/// no digits or contact separators, not a section heading.
fn pick_name(lines: &[String]) -> String {
    for line in lines.iter().take(12) {
        let value = line.as_str();
        let lower = value.to_lowercase();
        let words: Vec<&str> = value.split_whitespace().collect();

        if value.len() < 4
            || value.len() > 60
            || value.chars().any(|c| c.is_ascii_digit())
            || value.chars().any(|c| matches!(c, '@' | ':' | '/' | '\\'))
            || words.len() < 2
            || words.len() > 4
            || NAME_STOPLIST.contains(&lower.as_str())
        {
            continue;
        }

        let alpha_words = words.iter().all(|word| {
            word.chars()
                .all(|c| c.is_ascii_alphabetic() || matches!(c, '.' | '\'' | '-'))
        });
        if alpha_words {
            return value.to_string();
        }
    }

    String::new()
}

fn pick_predicted_role(skills: &[String]) -> String {
    let normalized: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();

    let mut best_role = DEFAULT_ROLE;
    let mut best_score = 0;

    for (role, keywords) in ROLE_RULES {
        let score = keywords
            .iter()
            .filter(|k| normalized.iter().any(|s| s == *k))
            .count();
        if score > best_score {
            best_score = score;
            best_role = role;
        }
    }

    best_role.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::text::recover_text;

    fn extract(text: &str) -> ResumeProfile {
        let decoded = recover_text(text.as_bytes(), "resume.txt", Some("text/plain"));
        ProfileExtractor::new().extract(&decoded)
    }

    const SECTIONED_RESUME: &str = "\
Jane Doe
Senior Engineer with 5+ years of experience

Skills:
Python, Docker | AWS
Terraform; GraphQL

Projects
- Realtime analytics dashboard
- Churn prediction service

Education
B.Tech in Computer Science, Pune University

Certifications:
AWS Certified Solutions Architect
aws certified solutions architect
";

    #[test]
    fn test_extracts_name_from_top_lines() {
        let profile = extract(SECTIONED_RESUME);
        assert_eq!(profile.name, "Jane Doe");
    }

    #[test]
    fn test_name_rejects_headings_and_contact_lines() {
        let profile = extract(
            "Curriculum Vitae\njane@doe.dev\n+91 98765 43210\nJane Anne Doe\nSkills\nPython",
        );
        assert_eq!(profile.name, "Jane Anne Doe");
    }

    #[test]
    fn test_skills_merge_section_tokens_with_known_hits() {
        let profile = extract(SECTIONED_RESUME);
        // Section tokens survive verbatim.
        assert!(profile.skills.iter().any(|s| s == "Terraform"));
        assert!(profile.skills.iter().any(|s| s == "GraphQL"));
        // Dictionary hits from anywhere in the corpus are merged in.
        assert!(profile.skills.iter().any(|s| s == "Python"));
        assert!(profile.skills.iter().any(|s| s == "AWS"));
        assert!(profile.skills.len() <= MAX_SKILLS);
    }

    #[test]
    fn test_certifications_dedup_case_insensitively() {
        let profile = extract(SECTIONED_RESUME);
        assert_eq!(
            profile.certifications,
            vec!["AWS Certified Solutions Architect"]
        );
    }

    #[test]
    fn test_projects_read_from_section() {
        let profile = extract(SECTIONED_RESUME);
        assert_eq!(
            profile.projects,
            vec![
                "Realtime analytics dashboard",
                "Churn prediction service"
            ]
        );
    }

    #[test]
    fn test_education_pattern_beats_section() {
        let profile = extract(SECTIONED_RESUME);
        assert_eq!(
            profile.education,
            "B.Tech in Computer Science, Pune University"
        );
    }

    #[test]
    fn test_experience_years_takes_range_high() {
        let profile = extract("Worked 5+ years in backend roles\nOpen to 2-7 years positions");
        assert_eq!(profile.experience_years, 7);
    }

    #[test]
    fn test_experience_years_default_zero() {
        let profile = extract("Fresh graduate, eager to learn");
        assert_eq!(profile.experience_years, 0);
    }

    #[test]
    fn test_role_rules_pick_highest_match() {
        let profile = extract(
            "Skills\nmachine learning, tensorflow, pytorch\nnlp; deep learning",
        );
        assert_eq!(profile.predicted_role, "Machine Learning Engineer");
    }

    #[test]
    fn test_role_defaults_to_software_engineer() {
        let profile = extract("Carpenter turned woodworker");
        assert_eq!(profile.predicted_role, "Software Engineer");
    }

    #[test]
    fn test_projects_keyword_fallback_without_section() {
        let profile = extract(
            "Jane Doe\nBuilt a log shipper in Go\nDesigned the billing schema\nLikes hiking",
        );
        assert_eq!(
            profile.projects,
            vec!["Built a log shipper in Go", "Designed the billing schema"]
        );
    }

    #[test]
    fn test_section_body_stops_at_next_heading() {
        let profile = extract("Skills\nRust, Zig\nEducation\nSome University");
        assert!(profile.skills.iter().any(|s| s == "Rust"));
        assert!(profile.skills.iter().any(|s| s == "Zig"));
        assert!(!profile.skills.iter().any(|s| s == "Some University"));
    }

    #[test]
    fn test_empty_input_yields_empty_profile() {
        let profile = extract("");
        assert_eq!(profile.name, "");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.education, "");
        assert!(profile.certifications.is_empty());
        assert!(profile.projects.is_empty());
        assert_eq!(profile.experience_years, 0);
        assert_eq!(profile.predicted_role, "Software Engineer");
    }
}
