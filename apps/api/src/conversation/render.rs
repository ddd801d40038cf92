//! Plain-text renderings of session data for generation context.

use crate::job::keywords::JobTarget;
use crate::profile::models::ProfileRecord;
use crate::session::turn::Turn;

const MAX_EXPERIENCE_ENTRIES: usize = 3;
const MAX_EDUCATION_ENTRIES: usize = 2;
const MAX_HISTORY_CHARS: usize = 150;

pub const EMPTY_HISTORY: &str = "This is the beginning of our conversation.";

pub fn render_profile(profile: &ProfileRecord) -> String {
    let mut out = format!("Name: {}\n", profile.name);
    if !profile.headline.is_empty() {
        out.push_str(&format!("Headline: {}\n", profile.headline));
    }
    if !profile.location.is_empty() {
        out.push_str(&format!("Location: {}\n", profile.location));
    }
    out.push_str(&format!(
        "About: {}\n",
        non_empty(&profile.summary, "(no summary)")
    ));

    out.push_str("Experience:\n");
    if profile.experience.is_empty() {
        out.push_str("- (none listed)\n");
    }
    for exp in profile.experience.iter().take(MAX_EXPERIENCE_ENTRIES) {
        out.push_str(&format!("- {}", exp.label()));
        if !exp.description.is_empty() {
            out.push_str(&format!(": {}", exp.description));
        }
        out.push('\n');
    }

    let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
    out.push_str(&format!(
        "Skills: {}\n",
        non_empty(&skills.join(", "), "(none listed)")
    ));

    out.push_str("Education:\n");
    if profile.education.is_empty() {
        out.push_str("- (none listed)\n");
    }
    for edu in profile.education.iter().take(MAX_EDUCATION_ENTRIES) {
        out.push_str(&format!("- {}\n", edu.label()));
    }
    out
}

pub fn render_job(job: &JobTarget) -> String {
    format!(
        "{}\nKey requirements: {}",
        job.description,
        job.keyword_list().join(", ")
    )
}

/// "User: .. | Assistant: .." per completed turn, each side cut to 150 characters.
pub fn render_history(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    turns
        .iter()
        .map(|t| {
            format!(
                "User: {} | Assistant: {}",
                truncate_chars(t.message(), MAX_HISTORY_CHARS),
                truncate_chars(t.response().unwrap_or(""), MAX_HISTORY_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn non_empty<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    if text.trim().is_empty() {
        placeholder
    } else {
        text
    }
}
