//! Session lifecycle: the per-session context, its turn ledger and the live registry.

pub mod context;
pub mod handlers;
pub mod registry;
pub mod turn;
