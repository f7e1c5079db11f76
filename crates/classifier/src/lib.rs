//! External AI classifier client.
//!
//! Wraps the Gemini `generateContent` REST endpoint behind the
//! [`campus_core::Classify`] seam. Every failure mode resolves to the safe
//! default classification; nothing here propagates an error to callers.

pub mod gemini;

pub use gemini::GeminiClassifier;
