// Instruction contracts and context templates for the classifier and the four responders.
// Cross-cutting fragments live in llm_client::prompts.

use crate::llm_client::prompts::{FORMAT_INSTRUCTION, GROUNDING_INSTRUCTION};

// ────────────────────────────────────────────────────────────────────────────
// Intent classification
// ────────────────────────────────────────────────────────────────────────────

/// System prompt for intent classification. The contrastive examples keep
/// `job_fit` (the one target role on record) apart from `career_guidance`
/// (other roles, paths and growth).
pub const CLASSIFIER_INSTRUCTIONS: &str = r#"You are an intent classifier for a career-coaching assistant.

Classify the user's latest message into exactly one of these labels:

1. profile_analysis - assessing the user's profile as it stands: strengths, weaknesses, completeness.
   Examples: "What are my profile's biggest strengths?", "Analyze my profile", "What is missing from my profile?"

2. job_fit - how well the profile matches THE TARGET JOB ON RECORD (given below). Direct comparison against that one role.
   Examples: "How well do I match the job requirements?", "What's my fit score for this role?", "Am I qualified for the job I entered?"

3. content_enhancement - rewriting or improving a specific part of the profile text.
   Examples: "Rewrite my about section", "Improve my headline", "Make my experience descriptions stronger"

4. career_guidance - open-ended exploration: other roles, career paths, skills to grow, transitions, general advice.
   Examples: "What skills should I develop?", "What other roles could I aim for?", "Suggest some career paths for me"

5. fallback - greetings, small talk, or anything unrelated to the user's career.

Contrastive examples:
- "Am I a good fit for the Senior Backend Engineer role at Acme?" when that is the target job -> job_fit
- "What would it take to become a Staff Engineer at Google?" when the target job is something else -> career_guidance
- "Which of my skills match this job?" -> job_fit
- "Which skills should I learn next?" -> career_guidance
- "How strong is my summary?" -> profile_analysis
- "Rewrite my summary" -> content_enhancement

If the user asks about fit for the target job, use job_fit. If they ask about any other role or about general direction, use career_guidance.

Respond with a JSON object:
{"intent": "<label>", "confidence": <0.0-1.0>, "reasoning": "<one short sentence>"}"#;

/// Classifier context. Replace `{job_title}`, `{history}`, `{message}` and `{json_rule}`.
pub const CLASSIFIER_CONTEXT_TEMPLATE: &str = "Target job on record: {job_title}

Recent conversation:
{history}

Latest user message: \"{message}\"

{json_rule}";

// ────────────────────────────────────────────────────────────────────────────
// Responders
// ────────────────────────────────────────────────────────────────────────────

pub const PROFILE_ANALYZER_ROLE: &str = "You are an expert profile reviewer and career coach. \
    Evaluate the user's professional profile against best practices: a specific headline, \
    a summary with concrete achievements, quantified experience, a broad skills section and \
    complete education. Use the section health report as the factual starting point, explain \
    the most important strengths and weaknesses, and give prioritized, actionable improvements.";

pub const JOB_FIT_ROLE: &str = "You are an expert recruiter. \
    Explain how well the user's profile fits the specific target job in the context. \
    The keyword fit report is computed deterministically; quote its score as given and never \
    invent a different one. Walk through the strongest matches, the most important gaps, and \
    concrete steps that would close the gaps before applying.";

pub const CONTENT_ENHANCER_ROLE: &str = "You are an expert profile copywriter. \
    Rewrite the requested section of the user's profile. Offer two or three alternative \
    versions, each using strong action verbs and concrete outcomes drawn only from the profile. \
    Replace any flagged vague phrasing. Keep each version ready to paste.";

pub const CAREER_COACH_ROLE: &str = "You are an experienced career coach. \
    Give open-ended guidance: possible roles and paths, skills to develop, and how to make a \
    transition. Use the skill gaps against the target job as one input, but answer the question \
    the user actually asked, including questions about roles other than the target job.";

/// Full instruction contract for a responder role.
pub fn responder_instructions(role: &str) -> String {
    format!("{role}\n\n{GROUNDING_INSTRUCTION}\n\n{FORMAT_INSTRUCTION}")
}

/// Fills `{name}` placeholders in a single pass over the template.
///
/// Substituted values are never rescanned, so braces in profile text or user
/// messages stay literal. Unknown placeholders are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = values.iter().find(|(name, _)| {
            tail[1..]
                .strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match placeholder {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Shared responder context. Replace `{profile}`, `{job}`, `{history}`, `{extra}` and `{question}`.
pub const RESPONDER_CONTEXT_TEMPLATE: &str = "USER PROFILE:
{profile}

TARGET JOB:
{job}

CONVERSATION SO FAR:
{history}

{extra}

USER QUESTION: {question}";

/// Profile-Analyzer extra context. Replace `{health}`.
pub const HEALTH_SECTION_TEMPLATE: &str = "SECTION HEALTH REPORT:
{health}";

/// Job-Fit extra context. Replace `{fit_report}`.
pub const FIT_SECTION_TEMPLATE: &str = "KEYWORD FIT REPORT:
{fit_report}";

/// Content-Enhancer extra context. Replace `{section}`, `{section_text}` and `{flags}`.
pub const ENHANCE_SECTION_TEMPLATE: &str = "SECTION TO REWRITE: {section}

CURRENT TEXT:
{section_text}

FLAGGED ISSUES:
{flags}";

/// Career-Coach extra context. Replace `{score}` and `{gaps}`.
pub const GAPS_SECTION_TEMPLATE: &str = "FIT AGAINST TARGET JOB: {score}/100
SKILL GAPS AGAINST TARGET JOB:
{gaps}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_substitutes_each_placeholder() {
        let filled = fill_template("{a} and {b}, {a} again", &[("a", "x"), ("b", "y")]);
        assert_eq!(filled, "x and y, x again");
    }

    #[test]
    fn test_fill_template_does_not_expand_placeholders_inside_values() {
        let filled = fill_template(
            "PROFILE: {profile}\nQUESTION: {question}",
            &[("profile", "I love {question} marks"), ("question", "Am I a fit?")],
        );
        assert_eq!(filled, "PROFILE: I love {question} marks\nQUESTION: Am I a fit?");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        assert_eq!(fill_template("{x} {} {", &[("y", "z")]), "{x} {} {");
    }
}
