pub mod classes;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod schema;
pub mod validate;

pub use classes::{ClassSchema, builtin_schemas, schema_for_class};
pub use error::ExtractError;
pub use llm::{ExtractionModel, OllamaClient};
pub use schema::{Entity, Extraction, Triple};

/// Ties the stages of one document's extraction together: build the prompt,
/// make one model call, validate the response.
pub struct Extractor {
    model: Box<dyn ExtractionModel>,
}

impl Extractor {
    pub fn new(model: Box<dyn ExtractionModel>) -> Self {
        Self { model }
    }

    /// Extract entities and relationship triples from one document.
    pub async fn extract(
        &self,
        schema: &ClassSchema,
        text: &str,
    ) -> Result<Extraction, ExtractError> {
        let prompt = prompt::build_prompt(schema, text)?;
        let raw = self.model.complete(schema.system_role, &prompt).await?;
        validate::parse_extraction(&raw, schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedModel(String);

    #[async_trait]
    impl ExtractionModel for CannedModel {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ExtractError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn extracts_through_the_model_seam() {
        let response = r#"{
            "entities": [{"label": "SlackMessage", "id": "msg001", "text": "hello"}],
            "relationships": []
        }"#;
        let extractor = Extractor::new(Box::new(CannedModel(response.to_string())));
        let schema = schema_for_class("slack_messages").unwrap();

        let extraction = extractor.extract(&schema, "some message log").await.unwrap();
        assert_eq!(extraction.entities[0].id, "msg001");
    }

    #[tokio::test]
    async fn invalid_model_output_surfaces_as_malformed() {
        let extractor = Extractor::new(Box::new(CannedModel("not json".to_string())));
        let schema = schema_for_class("slack_messages").unwrap();

        let err = extractor.extract(&schema, "text").await.unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }
}
