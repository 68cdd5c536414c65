use async_openai::error::OpenAIError;
use async_trait::async_trait;

use crate::domain::{extraction::Extraction, search_result::SearchResult};

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error(transparent)]
    Api(#[from] OpenAIError),
    #[error("No choices in completion response")]
    NoChoices,
}

/// A text-completion model: prompt in, first choice out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Joins the snippets line by line below the instruction.
pub fn build_prompt(results: &[SearchResult], instruction: &str) -> String {
    let search_results_text = results
        .iter()
        .map(|result| result.snippet_text())
        .collect::<Vec<&str>>()
        .join("\n");

    format!("{}\n\n{}", instruction, search_results_text)
}

/// Asks the model to pull the requested fact out of the snippets. Never
/// fails, errors come back as `Extraction::Failure`.
pub async fn extract(
    provider: &dyn CompletionProvider,
    results: &[SearchResult],
    instruction: &str,
) -> Extraction {
    let prompt = build_prompt(results, instruction);

    match provider.complete(&prompt).await {
        Ok(text) => Extraction::Success(text.trim().to_string()),
        Err(e) => {
            log::error!("Completion call failed: {}", e);
            Extraction::Failure(e.to_string())
        }
    }
}
