//! Fit Scoring — trait-based scorer that measures a profile against the session's job target.
//!
//! Default: `KeywordFitScorer` (pure-Rust, fast, deterministic, fully testable).
//! The Job-Fit responder holds an `Arc<dyn FitScorer>` so a semantic backend can be swapped in.

use serde::{Deserialize, Serialize};

use crate::job::keywords::{tokenize, JobTarget};
use crate::profile::models::ProfileRecord;

const SKILL_STRENGTH: f32 = 1.0;
const TEXT_STRENGTH: f32 = 0.6;
const STRONG_THRESHOLD: f32 = 0.8;
const PARTIAL_THRESHOLD: f32 = 0.4;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// A job keyword covered by the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitMatch {
    pub keyword: String,
    pub evidence: String, // where on the profile it was found
    pub strength: f32,    // 0.0 – 1.0
}

/// A job keyword not covered by the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub keyword: String,
    pub jd_frequency: u32,
    pub suggestion: Option<String>, // closest related skill, if any
}

/// Full fit report; serialized as the Job-Fit structured payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub score: f64,                     // 0.0 – 1.0
    pub strong_matches: Vec<FitMatch>,  // strength ≥ 0.8
    pub partial_matches: Vec<FitMatch>, // 0.4 – 0.79
    pub gaps: Vec<Gap>,                 // strength < 0.4
    pub recommendation: String,
    pub scorer_backend: String, // "keyword"
}

impl FitReport {
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }

    /// Plain-text rendering for generation context.
    pub fn render(&self) -> String {
        let gaps = self
            .gaps
            .iter()
            .map(|g| match &g.suggestion {
                Some(s) => format!("{} (related: {s})", g.keyword),
                None => g.keyword.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Keyword fit score: {}/100\nStrong matches: {}\nPartial matches: {}\nGaps: {}\nAssessment: {}",
            self.percent(),
            or_none(list_matches(&self.strong_matches)),
            or_none(list_matches(&self.partial_matches)),
            or_none(gaps),
            self.recommendation
        )
    }
}

fn list_matches(matches: &[FitMatch]) -> String {
    matches
        .iter()
        .map(|m| format!("{} ({})", m.keyword, m.evidence))
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_none(s: String) -> String {
    if s.is_empty() {
        "none".to_string()
    } else {
        s
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

pub trait FitScorer: Send + Sync {
    fn score(&self, profile: &ProfileRecord, job: &JobTarget) -> FitReport;
}

/// Keyword-based fit scorer. No generation call.
///
/// Algorithm:
/// 1. For each keyword in `JobTarget.keywords`:
///    - skill match (whole skill, or any word of a multi-word skill) → strength 1.0
///    - word match in headline / summary / experience → strength 0.6
///    - no match → strength 0.0
/// 2. score = Σ(strength × weighted_score) / Σ(weighted_score), in [0, 1]
/// 3. Classify: strong (≥0.8), partial (0.4–0.79), gap (<0.4)
pub struct KeywordFitScorer;

impl FitScorer for KeywordFitScorer {
    fn score(&self, profile: &ProfileRecord, job: &JobTarget) -> FitReport {
        compute_keyword_fit(profile, job)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword fit algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_keyword_fit(profile: &ProfileRecord, job: &JobTarget) -> FitReport {
    if job.keywords.is_empty() {
        return FitReport {
            score: 0.0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            recommendation: "No keywords found in the job description; cannot score fit."
                .to_string(),
            scorer_backend: "keyword".to_string(),
        };
    }

    // Tokenised once; each source labelled for evidence.
    // Multi-word skills ("Spring Boot") cover each of their words.
    let skills: Vec<(&str, Vec<String>)> = profile
        .skills
        .iter()
        .map(|skill| (skill.as_str(), tokenize(skill)))
        .collect();
    let mut sources: Vec<(String, Vec<String>)> = vec![
        ("headline".to_string(), tokenize(&profile.headline)),
        ("summary".to_string(), tokenize(&profile.summary)),
    ];
    for exp in &profile.experience {
        sources.push((
            format!("experience: {}", exp.label()),
            tokenize(&format!("{} {} {}", exp.title, exp.organization, exp.description)),
        ));
    }

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut gaps = Vec::new();

    let mut total_weighted = 0.0_f32;
    let mut total_score = 0.0_f32;

    for kw in &job.keywords {
        total_weighted += kw.weighted_score;

        let (strength, evidence) = if let Some((skill, _)) = skills
            .iter()
            .find(|(skill, tokens)| {
                skill.eq_ignore_ascii_case(&kw.keyword) || tokens.contains(&kw.keyword)
            })
        {
            (SKILL_STRENGTH, format!("skill: {skill}"))
        } else if let Some((label, _)) = sources
            .iter()
            .find(|(_, tokens)| tokens.iter().any(|t| t == &kw.keyword))
        {
            (TEXT_STRENGTH, label.clone())
        } else {
            (0.0, String::new())
        };

        total_score += strength * kw.weighted_score;

        let fit_match = FitMatch {
            keyword: kw.keyword.clone(),
            evidence,
            strength,
        };

        if strength >= STRONG_THRESHOLD {
            strong_matches.push(fit_match);
        } else if strength >= PARTIAL_THRESHOLD {
            partial_matches.push(fit_match);
        } else {
            gaps.push(Gap {
                keyword: kw.keyword.clone(),
                jd_frequency: kw.frequency,
                suggestion: find_related_skill(profile, &kw.keyword),
            });
        }
    }

    let score = if total_weighted > 0.0 {
        ((total_score / total_weighted) as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let recommendation = build_recommendation(score, &gaps);

    FitReport {
        score,
        strong_matches,
        partial_matches,
        gaps,
        recommendation,
        scorer_backend: "keyword".to_string(),
    }
}

/// Finds a skill that overlaps the keyword as a substring (e.g. "postgres" ↔ "PostgreSQL").
fn find_related_skill(profile: &ProfileRecord, keyword: &str) -> Option<String> {
    profile
        .skills
        .iter()
        .find(|skill| {
            let skill_lower = skill.to_lowercase();
            skill_lower.contains(keyword) || keyword.contains(&skill_lower)
        })
        .cloned()
}

/// Builds a human-readable recommendation string from score and gaps.
fn build_recommendation(score: f64, gaps: &[Gap]) -> String {
    let percent = (score * 100.0).round() as u32;
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if percent >= 80 {
        "Strong fit. Your profile directly covers the key job requirements.".to_string()
    } else if percent >= 60 {
        format!(
            "Moderate fit ({percent}/100). Consider highlighting: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit ({percent}/100). Significant gaps: {}. Consider building or surfacing these before applying.",
            top_gaps.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::keywords::KeywordEntry;
    use crate::testing::sample_profile;

    fn make_job(keywords: Vec<(&str, u32, f32)>) -> JobTarget {
        JobTarget {
            description: "Senior Backend Engineer at Acme".to_string(),
            keywords: keywords
                .into_iter()
                .map(|(kw, freq, pw)| KeywordEntry {
                    keyword: kw.to_string(),
                    frequency: freq,
                    position_weight: pw,
                    weighted_score: freq as f32 * pw,
                })
                .collect(),
        }
    }

    #[test]
    fn test_perfect_skill_match_scores_strong() {
        let report = compute_keyword_fit(
            &sample_profile(),
            &make_job(vec![("rust", 5, 0.8), ("kafka", 3, 0.6)]),
        );
        assert!(report.score >= 0.8, "Expected ≥0.8, got {}", report.score);
        assert_eq!(report.strong_matches.len(), 2);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_multi_word_skills_cover_their_words() {
        let mut profile = sample_profile();
        profile.skills = ["Machine Learning", "Spring Boot", "Rust (Programming Language)"]
            .into_iter()
            .map(String::from)
            .collect();
        let job = JobTarget::new("ML Engineer\nRequirements: machine learning, spring boot, rust");
        let report = KeywordFitScorer.score(&profile, &job);

        for kw in ["machine", "learning", "spring", "boot", "rust"] {
            let m = report
                .strong_matches
                .iter()
                .find(|m| m.keyword == kw)
                .unwrap_or_else(|| panic!("{kw} should be a strong match"));
            assert!(m.evidence.starts_with("skill: "));
        }
        assert!(report.gaps.iter().all(|g| g.suggestion.is_none()));
        assert!(report.score > 0.5, "score was {}", report.score);
    }

    #[test]
    fn test_text_match_scores_partial() {
        let report = compute_keyword_fit(&sample_profile(), &make_job(vec![("billing", 3, 0.8)]));
        assert_eq!(report.partial_matches.len(), 1);
        assert!(report.partial_matches[0].evidence.starts_with("experience:"));
        assert_eq!(report.strong_matches.len(), 0);
        assert_eq!(report.gaps.len(), 0);
    }

    #[test]
    fn test_text_match_requires_whole_word() {
        // "payments" appears on the profile; "pay" alone does not
        let report = compute_keyword_fit(&sample_profile(), &make_job(vec![("pay", 1, 0.8)]));
        assert_eq!(report.gaps.len(), 1);
    }

    #[test]
    fn test_no_match_creates_gap() {
        let report = compute_keyword_fit(&sample_profile(), &make_job(vec![("cobol", 5, 0.8)]));
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].keyword, "cobol");
        assert_eq!(report.gaps[0].jd_frequency, 5);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn test_gap_suggests_related_skill() {
        let report = compute_keyword_fit(&sample_profile(), &make_job(vec![("postgres", 1, 0.8)]));
        assert_eq!(report.gaps[0].suggestion.as_deref(), Some("PostgreSQL"));
    }

    #[test]
    fn test_empty_keywords_returns_zero_score() {
        let report = compute_keyword_fit(&sample_profile(), &make_job(vec![]));
        assert_eq!(report.score, 0.0);
        assert!(report.strong_matches.is_empty());
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_score_bounded_0_to_1() {
        let report = compute_keyword_fit(
            &sample_profile(),
            &make_job(vec![("rust", 10, 1.0), ("java", 1, 0.1)]),
        );
        assert!((0.0..=1.0).contains(&report.score));
    }

    #[test]
    fn test_scorer_backend_label_is_keyword() {
        let report = KeywordFitScorer.score(&sample_profile(), &make_job(vec![]));
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[test]
    fn test_extracted_job_target_scores_against_profile() {
        let job = JobTarget::new(
            "Senior Backend Engineer at Acme\nRequirements: Rust, PostgreSQL, Kafka, Kubernetes",
        );
        let report = KeywordFitScorer.score(&sample_profile(), &job);
        assert!(report.score > 0.5, "score was {}", report.score);
        assert!(report.strong_matches.iter().any(|m| m.keyword == "rust"));
    }

    #[test]
    fn test_recommendation_high_score() {
        let rec = build_recommendation(0.85, &[]);
        assert!(rec.contains("Strong fit"));
    }

    #[test]
    fn test_recommendation_moderate_score_lists_gaps() {
        let gaps = vec![Gap {
            keyword: "Kafka".to_string(),
            jd_frequency: 3,
            suggestion: None,
        }];
        let rec = build_recommendation(0.65, &gaps);
        assert!(rec.contains("Kafka"));
        assert!(rec.contains("65"));
    }

    #[test]
    fn test_render_mentions_score_and_gaps() {
        let report = compute_keyword_fit(
            &sample_profile(),
            &make_job(vec![("rust", 1, 1.0), ("cobol", 1, 1.0)]),
        );
        let rendered = report.render();
        assert!(rendered.contains("50/100"));
        assert!(rendered.contains("cobol"));
    }
}
