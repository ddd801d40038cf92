//! Fixed user-facing texts for turns that end without a generated answer.

pub const TIMEOUT_RESPONSE: &str = "Sorry, that took longer than expected and I had to stop. \
Please ask again, or try a shorter question.";

pub const ABANDONED_RESPONSE: &str =
    "This question was interrupted before an answer was ready. Please ask it again.";

pub const INTERNAL_FAILURE_RESPONSE: &str =
    "I apologize, but something went wrong on my side. Please try rephrasing your question.";

pub const PROFILE_ANALYZER_APOLOGY: &str =
    "I apologize, but I encountered an issue analyzing your profile. Please try rephrasing your question.";

pub const JOB_FIT_APOLOGY: &str =
    "I apologize, but I encountered an issue analyzing your job fit. Please try rephrasing your question.";

pub const CONTENT_ENHANCER_APOLOGY: &str =
    "I apologize, but I encountered an issue enhancing your content. Please try rephrasing your question.";

pub const CAREER_COACH_APOLOGY: &str = "I apologize, but I encountered a technical issue. \
Please try rephrasing your question or ask something else about your career development.";

/// Greeting sent once the profile has been acquired.
pub fn welcome_message(name: &str, job_title: &str) -> String {
    let name = if name.trim().is_empty() { "there" } else { name.trim() };
    format!(
        "Welcome, {name}! I've loaded your profile and I'm ready to help you prepare for the \
         {job_title} role.\n\nAsk me anything about your profile, your fit for this job, \
         rewriting a section, or your career."
    )
}
