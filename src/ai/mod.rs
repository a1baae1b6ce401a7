//! All generative model functionality

pub mod client;
pub mod parser;

// Re-export main types for convenience
pub use client::{BedrockInvoker, ModelInvoker, estimate_tokens};
pub use parser::{Validation, parse};
