//! Quiz generation for TutorHub tutorials.
//!
//! This crate provides the three-tier quiz data model, the [`QuizGenerator`]
//! capability contract, and the Gemini-backed implementation that turns
//! authored tutorial content into easy/medium/hard multiple-choice questions.

pub mod gemini;
pub mod generate;
pub mod model;

pub use gemini::GeminiGenerator;
pub use generate::{CannedGenerator, GenerateError, QuizGenerator};
pub use model::{Question, Quiz};
