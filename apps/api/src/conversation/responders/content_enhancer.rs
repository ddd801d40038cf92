use std::sync::Arc;

use async_trait::async_trait;

use crate::conversation::fallback::CONTENT_ENHANCER_APOLOGY;
use crate::conversation::prompts::{
    fill_template, responder_instructions, CONTENT_ENHANCER_ROLE, ENHANCE_SECTION_TEMPLATE,
};
use crate::conversation::responders::{build_context, Reply, Responder};
use crate::conversation::router::ResponderId;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::profile::health::{assess_profile, vague_phrases, ProfileSection};
use crate::profile::models::ProfileRecord;
use crate::session::context::SessionContext;
use crate::session::turn::Turn;

/// Message cues per section, checked in order. Summary is the default.
const SECTION_CUES: &[(ProfileSection, &[&str])] = &[
    (ProfileSection::Headline, &["headline", "tagline", "title"]),
    (
        ProfileSection::Experience,
        &["experience", "role description", "job description", "position", "bullet"],
    ),
    (ProfileSection::Skills, &["skills", "skill section"]),
    (ProfileSection::Education, &["education", "degree", "school"]),
    (ProfileSection::Summary, &["summary", "about", "bio"]),
];

/// Rewrites one profile section. The profile itself is never modified.
pub struct ContentEnhancer {
    generator: Arc<dyn TextGenerator>,
}

impl ContentEnhancer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Responder for ContentEnhancer {
    fn id(&self) -> ResponderId {
        ResponderId::ContentEnhancer
    }

    fn apology(&self) -> &'static str {
        CONTENT_ENHANCER_APOLOGY
    }

    async fn respond(&self, ctx: &SessionContext, turn: &Turn) -> Result<Reply, GenerationError> {
        let section = detect_section(turn.message());
        let section_text = section_text(ctx.profile(), section);

        let flags = section_flags(ctx.profile(), section, &section_text);
        let extra = fill_template(
            ENHANCE_SECTION_TEMPLATE,
            &[
                ("section", section.as_str()),
                ("section_text", section_text.as_str()),
                ("flags", flags.as_str()),
            ],
        );
        let context = build_context(ctx, turn, &extra);

        let text = self
            .generator
            .generate(&responder_instructions(CONTENT_ENHANCER_ROLE), &context)
            .await?;
        Ok(Reply::text(text))
    }
}

/// The section a rewrite request names, by keyword. Defaults to the summary.
pub fn detect_section(message: &str) -> ProfileSection {
    let lower = message.to_lowercase();
    SECTION_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| lower.contains(cue)))
        .map(|(section, _)| *section)
        .unwrap_or(ProfileSection::Summary)
}

fn section_text(profile: &ProfileRecord, section: ProfileSection) -> String {
    let text = match section {
        ProfileSection::Headline => profile.headline.clone(),
        ProfileSection::Summary => profile.summary.clone(),
        ProfileSection::Experience => profile
            .experience
            .iter()
            .map(|e| format!("{}: {}", e.label(), e.description))
            .collect::<Vec<_>>()
            .join("\n"),
        ProfileSection::Skills => profile
            .skills
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        ProfileSection::Education => profile
            .education
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join("\n"),
    };

    if text.trim().is_empty() {
        "(this section is empty on the profile)".to_string()
    } else {
        text
    }
}

fn section_flags(profile: &ProfileRecord, section: ProfileSection, text: &str) -> String {
    let mut flags: Vec<String> = vague_phrases(text)
        .into_iter()
        .map(|p| format!("Vague phrasing: '{p}'"))
        .collect();

    if let Some(health) = assess_profile(profile).section(section) {
        flags.extend(
            health
                .notes
                .iter()
                .filter(|n| !n.starts_with("Vague phrasing"))
                .cloned(),
        );
    }

    if flags.is_empty() {
        "none".to_string()
    } else {
        flags
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
