// Shared prompt fragments.
// Each service that needs generated text defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every responder instruction contract.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement about the user on the profile data provided in the context. \
    Do NOT invent employers, titles, dates, degrees, skills, or metrics. \
    If the profile does not contain something, say so and suggest what the user could add.";

/// Formatting rules shared by all conversational responders.
pub const FORMAT_INSTRUCTION: &str = "\
    Use markdown with short headings and bullet points. \
    Be specific and actionable, encouraging but honest. \
    Answer the user's current question directly; use the conversation history only to stay consistent.";
