//! Response generation
//!
//! - `GenerationService` is the contract required from the language model
//! - `ResponseGenerator` wraps it with the two call sites the engine uses:
//!   free-text turn replies and schema-constrained session summaries

mod client;
mod schema;

pub use client::{GenerationOutput, GenerationService, ResponseGenerator};
pub use schema::{summary_schema, SessionAssessment, SuggestedActivity};
