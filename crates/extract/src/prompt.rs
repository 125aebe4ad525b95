use crate::classes::ClassSchema;
use crate::error::ExtractError;

/// Placeholder token the class templates use for the document text.
pub const PLACEHOLDER: &str = "$ctext";

/// Merge document text into the class template.
///
/// The text is substituted verbatim; a document that itself contains the
/// placeholder token will corrupt the prompt. That is a documented constraint
/// of the corpus, not something defended against here.
pub fn build_prompt(schema: &ClassSchema, text: &str) -> Result<String, ExtractError> {
    if !schema.template.contains(PLACEHOLDER) {
        return Err(ExtractError::Template {
            class: schema.class.to_string(),
        });
    }
    Ok(schema.template.replace(PLACEHOLDER, text))
}
