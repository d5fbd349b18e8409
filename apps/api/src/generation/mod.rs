// Structured generation: the prompt/response-schema contract with the hosted model.
// All model calls go through llm_client via the LanguageModel trait.

pub mod analysis;
pub mod learning_path;
pub mod prompts;
pub mod structured;

pub use analysis::analyze;
pub use learning_path::{build_path, StyleAdherence};
pub use structured::{GenerationError, StructuredGenerator};
