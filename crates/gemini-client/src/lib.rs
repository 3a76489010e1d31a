//! `gemini-client`: async client for Google's Gemini `generateContent` API.
//!
//! The studio tools treat the language model as an opaque collaborator: a
//! prompt goes in, text (or a JSON document as text) comes back, and the call
//! can fail. This crate is that collaborator and nothing more.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use gemini_client::GeminiClient;
//!
//! let client = GeminiClient::new(std::env::var("API_KEY").ok());
//! let markdown = client.generate_text("Analyze a habit tracker app").await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::GeminiError;
pub use types::GenerateOptions;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GeminiError>;
