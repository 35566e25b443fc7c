//! Chat-driven compose operations: AI typesetting and cover generation.

pub mod cover;
pub mod handlers;
pub mod prompts;
pub mod typeset;
