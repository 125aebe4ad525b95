/// Failures of a single document's extraction attempt. Each variant maps to
/// one unit of work; none of them should abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("prompt template for class {class:?} has no $ctext placeholder")]
    Template { class: String },

    #[error("model call failed: {0}")]
    ModelCall(String),

    #[error("malformed extraction: {0}")]
    Malformed(String),
}
