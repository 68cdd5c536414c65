pub const ENTITY_PLACEHOLDER: &str = "{entity}";

/// A user prompt with `{entity}` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        PromptTemplate(template.into())
    }

    /// Replaces every occurrence of the placeholder, there is no escaping.
    pub fn render(&self, entity: &str) -> String {
        self.0.replace(ENTITY_PLACEHOLDER, entity)
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PromptTemplate {
    fn from(value: &str) -> Self {
        PromptTemplate::new(value)
    }
}
