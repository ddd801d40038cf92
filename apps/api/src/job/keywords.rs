//! Job Target — the session's target job description and its requirement keywords.
//!
//! Keywords are extracted lexically once, when the session starts, and never change.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Upper bound on keywords kept per job description.
const MAX_KEYWORDS: usize = 20;

/// Title line weight; the first non-empty line of the description.
const TITLE_WEIGHT: f32 = 1.0;
const REQUIREMENTS_WEIGHT: f32 = 0.8;
const RESPONSIBILITIES_WEIGHT: f32 = 0.6;
const PREFERRED_WEIGHT: f32 = 0.5;
const BODY_WEIGHT: f32 = 0.5;
const ABOUT_WEIGHT: f32 = 0.3;

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "all", "also", "an", "and", "are", "as", "at", "be", "being", "both",
    "by", "can", "do", "etc", "for", "from", "has", "have", "help", "in", "including", "into",
    "is", "it", "its", "join", "looking", "more", "must", "new", "not", "of", "on", "or", "our",
    "other", "plus", "such", "that", "the", "their", "them", "they", "this", "to", "us", "using",
    "we", "well", "what", "who", "will", "with", "within", "you", "your", "ability", "able",
    "bonus", "candidate", "company", "experience", "good", "great", "ideal", "knowledge",
    "nice", "position", "preferred", "qualifications", "required", "requirements",
    "responsibilities", "role", "skills", "strong", "team", "understanding", "work", "working",
    "year", "years",
    // seniority levels
    "senior", "sr", "junior", "jr", "staff", "principal",
];

/// A single keyword from the job description, weighted by position and frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities=0.6, preferred/body=0.5, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

/// The target job for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTarget {
    pub description: String,
    pub keywords: Vec<KeywordEntry>,
}

impl JobTarget {
    pub fn new(description: impl Into<String>) -> Self {
        let description = description.into().trim().to_string();
        let keywords = extract_keywords(&description);
        Self {
            description,
            keywords,
        }
    }

    /// First non-empty line of the description, used as a short label.
    pub fn title(&self) -> &str {
        self.description
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }

    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.keyword.as_str()).collect()
    }
}

/// Extracts weighted requirement keywords from a raw job description.
///
/// The first non-empty line is the title, minus any "at <employer>" tail. Later lines
/// inherit the weight of the most recent section header they follow (a header may share
/// its line with content).
/// Each keyword keeps the highest position weight it was seen at.
pub fn extract_keywords(description: &str) -> Vec<KeywordEntry> {
    let mut seen: HashMap<String, (u32, f32)> = HashMap::new();
    let mut section_weight = BODY_WEIGHT;
    let mut is_title = true;

    for line in description.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (weight, tokens) = if is_title {
            is_title = false;
            (TITLE_WEIGHT, title_tokens(line))
        } else {
            if let Some(w) = header_weight(line) {
                section_weight = w;
            }
            (section_weight, tokenize(line))
        };

        for token in tokens {
            if !is_keyword(&token) {
                continue;
            }
            let entry = seen.entry(token).or_insert((0, weight));
            entry.0 += 1;
            entry.1 = entry.1.max(weight);
        }
    }

    let mut keywords: Vec<KeywordEntry> = seen
        .into_iter()
        .map(|(keyword, (frequency, position_weight))| KeywordEntry {
            keyword,
            frequency,
            position_weight,
            weighted_score: frequency as f32 * position_weight,
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.weighted_score
            .total_cmp(&a.weighted_score)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Role words of the title line; the employer after "at" is not a requirement.
fn title_tokens(line: &str) -> Vec<String> {
    tokenize(line)
        .into_iter()
        .take_while(|t| t != "at")
        .collect()
}

fn header_weight(line: &str) -> Option<f32> {
    let lower = line.to_lowercase();

    if starts_with_any(
        &lower,
        &["requirements", "required", "must have", "qualifications", "you need", "what you bring"],
    ) {
        Some(REQUIREMENTS_WEIGHT)
    } else if starts_with_any(
        &lower,
        &["responsibilities", "you will", "what you'll do", "what you will do", "the role"],
    ) {
        Some(RESPONSIBILITIES_WEIGHT)
    } else if starts_with_any(&lower, &["preferred", "nice to have", "bonus", "plus"]) {
        Some(PREFERRED_WEIGHT)
    } else if starts_with_any(&lower, &["about us", "about the company", "about:", "who we are"]) {
        Some(ABOUT_WEIGHT)
    } else {
        None
    }
}

fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| text.starts_with(p))
}

/// Lowercased word tokens. Keeps `+`, `#` and inner `.` so `c++`, `c#` and `node.js` survive.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_keyword(token: &str) -> bool {
    token.chars().count() >= 2
        && !token.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '.')
        && !STOPWORDS.contains(&token)
}
