//! Prompt templates used by the report stages
//!
//! - `system`: system prompts per analyst role
//! - `user`: user message builders for specific operations

mod system;
mod user;

pub use system::*;
pub use user::*;
