//! Smart actions: what the analyzer suggests and where each action goes.
//!
//! - **types**: analyzer reply types (AnalyzeReport, ActionDescriptor)
//! - **fields**: user-supplied form fields and validation
//! - **registry**: ActionRegistry, the static id → endpoint table

pub mod fields;
pub mod registry;
pub mod types;

pub use fields::{FieldInputs, FieldSpec, Rule};
pub use registry::{ActionRegistry, ActionRoute, ResolvedAction};
pub use types::{ActionDescriptor, AnalyzeReport};
