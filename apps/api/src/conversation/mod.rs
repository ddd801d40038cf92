//! Conversation pipeline for one turn: classify the message, route the label
//! to a responder, generate the response.

pub mod coordinator;
pub mod fallback;
pub mod intent;
pub mod prompts;
pub mod render;
pub mod responders;
pub mod router;
