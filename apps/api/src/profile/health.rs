//! Deterministic best-practice checks over a `ProfileRecord`.
//!
//! The report is fed into the Profile-Analyzer and Content-Enhancer instruction
//! context so the generated critique is anchored in concrete findings.

use serde::{Deserialize, Serialize};

use crate::profile::models::ProfileRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    Headline,
    Summary,
    Experience,
    Skills,
    Education,
}

impl ProfileSection {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileSection::Headline => "headline",
            ProfileSection::Summary => "summary",
            ProfileSection::Experience => "experience",
            ProfileSection::Skills => "skills",
            ProfileSection::Education => "education",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: ProfileSection,
    pub score: f64,
    pub status: SectionStatus,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileHealth {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<ProfileSection>,
}

const SECTION_WEIGHTS: &[(ProfileSection, f64)] = &[
    (ProfileSection::Headline, 0.15),
    (ProfileSection::Summary, 0.25),
    (ProfileSection::Experience, 0.35),
    (ProfileSection::Skills, 0.15),
    (ProfileSection::Education, 0.10),
];

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible for",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "many",
    "numerous",
    "various",
    "several",
];

pub fn assess_profile(profile: &ProfileRecord) -> ProfileHealth {
    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut weighted_sum = 0.0;

    for &(section, weight) in SECTION_WEIGHTS {
        let (score, notes) = match section {
            ProfileSection::Headline => assess_headline(&profile.headline),
            ProfileSection::Summary => assess_summary(&profile.summary),
            ProfileSection::Experience => assess_experience(profile),
            ProfileSection::Skills => assess_skills(profile.skills.len()),
            ProfileSection::Education => {
                if profile.education.is_empty() {
                    (0.0, vec!["No education entries listed".to_string()])
                } else {
                    (1.0, vec![])
                }
            }
        };

        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s >= 0.2 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };
        if status == SectionStatus::Missing {
            missing_sections.push(section);
        }

        weighted_sum += score * weight;
        sections.push(SectionHealth {
            section,
            score,
            status,
            notes,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();

    ProfileHealth {
        overall_score: (weighted_sum / total_weight).clamp(0.0, 1.0),
        sections,
        missing_sections,
    }
}

impl ProfileHealth {
    pub fn section(&self, section: ProfileSection) -> Option<&SectionHealth> {
        self.sections.iter().find(|s| s.section == section)
    }

    /// Plain-text rendering for generation context.
    pub fn render(&self) -> String {
        let mut out = format!("Overall profile health: {:.2}\n", self.overall_score);
        for s in &self.sections {
            out.push_str(&format!(
                "- {}: {:?} ({:.2})",
                s.section.as_str(),
                s.status,
                s.score
            ));
            if !s.notes.is_empty() {
                out.push_str(": ");
                out.push_str(&s.notes.join("; "));
            }
            out.push('\n');
        }
        out
    }
}

fn assess_headline(headline: &str) -> (f64, Vec<String>) {
    let words = headline.split_whitespace().count();
    match words {
        0 => (0.0, vec!["Headline is empty".to_string()]),
        1..=2 => (
            0.3,
            vec!["Headline is very short; state your specialty and the value you bring".to_string()],
        ),
        3..=4 => (
            0.6,
            vec!["Headline could name a specialty or domain in addition to the title".to_string()],
        ),
        _ => (1.0, vec![]),
    }
}

fn assess_summary(summary: &str) -> (f64, Vec<String>) {
    let length = summary.chars().count();
    if length == 0 {
        return (0.0, vec!["Summary (about) section is empty".to_string()]);
    }

    let mut notes = Vec::new();
    let mut score: f64 = match length {
        l if l >= 600 => 1.0,
        l if l >= 200 => 0.8,
        _ => {
            notes.push(format!("Summary is short ({length} characters)"));
            0.4
        }
    };

    if !is_quantified(summary) {
        score -= 0.2;
        notes.push("Summary has no quantified achievements".to_string());
    }
    for phrase in vague_phrases(summary) {
        notes.push(format!("Vague phrasing: '{phrase}'"));
    }

    (score.clamp(0.0, 1.0), notes)
}

fn assess_experience(profile: &ProfileRecord) -> (f64, Vec<String>) {
    let entries = &profile.experience;
    if entries.is_empty() {
        return (0.0, vec!["No experience entries listed".to_string()]);
    }

    let mut undescribed = 0;
    let mut unquantified = 0;
    let total: f64 = entries
        .iter()
        .map(|e| {
            if e.description.trim().is_empty() {
                undescribed += 1;
                0.2
            } else if is_quantified(&e.description) {
                1.0
            } else {
                unquantified += 1;
                0.5
            }
        })
        .sum();

    let mut notes = Vec::new();
    if undescribed > 0 {
        notes.push(format!(
            "{undescribed} of {} roles have no description",
            entries.len()
        ));
    }
    if unquantified > 0 {
        notes.push(format!(
            "{unquantified} roles describe work without quantified outcomes"
        ));
    }
    if entries.len() < 2 {
        notes.push("Only one role listed; add earlier positions or projects".to_string());
    }

    ((total / entries.len() as f64).clamp(0.0, 1.0), notes)
}

fn assess_skills(count: usize) -> (f64, Vec<String>) {
    match count {
        0 => (0.0, vec!["No skills listed".to_string()]),
        1..=4 => (0.4, vec![format!("Only {count} skills listed; aim for 10 or more")]),
        5..=9 => (0.7, vec![format!("{count} skills listed; aim for 10 or more")]),
        _ => (1.0, vec![]),
    }
}

/// True if the text carries a concrete metric: a number, percentage or currency amount.
pub fn is_quantified(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        || text.contains('%')
        || text.contains('$')
        || text.contains('€')
        || text.contains('£')
}

/// Vague verbs and scale words found in the text, in list order.
///
/// Single words are matched as whole words ("many" does not match "company").
pub fn vague_phrases(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    VAGUE_VERBS
        .iter()
        .chain(VAGUE_SCALE_WORDS)
        .copied()
        .filter(|phrase| {
            if phrase.contains(' ') {
                lower.contains(phrase)
            } else {
                words.contains(phrase)
            }
        })
        .collect()
}
