use crate::domain::{
    extraction::{Extraction, ExtractionRecord},
    prompt::PromptTemplate,
};

use super::{extract, CompletionProvider, WebSearcher};

/// Inputs of one run, all three must be present for anything to happen.
pub struct RunRequest<'a> {
    pub api_key: &'a str,
    pub prompt: &'a PromptTemplate,
    pub entity: &'a str,
}

impl RunRequest<'_> {
    pub fn is_ready(&self) -> bool {
        !self.api_key.trim().is_empty()
            && !self.prompt.is_blank()
            && !self.entity.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Waiting for a key, a prompt and an entity.
    Idle,
    Empty { query: String },
    SearchFailed { query: String, reason: String },
    ExtractionFailed { entity: String, reason: String },
    /// The model answered, but with nothing worth recording.
    NothingExtracted { entity: String },
    Done(ExtractionRecord),
}

impl RunOutcome {
    pub fn record(&self) -> Option<&ExtractionRecord> {
        match self {
            RunOutcome::Done(record) => Some(record),
            _ => None,
        }
    }
}

pub async fn run_extraction(
    searcher: &dyn WebSearcher,
    completer: &dyn CompletionProvider,
    instruction: &PromptTemplate,
    request: RunRequest<'_>,
) -> RunOutcome {
    if !request.is_ready() {
        return RunOutcome::Idle;
    }

    let entity = request.entity;
    let query = request.prompt.render(entity);

    let results = match searcher.try_search(&query, request.api_key.trim()).await {
        Ok(results) => results,
        Err(e) => {
            log::error!("Search for {} failed: {}", entity, e);
            return RunOutcome::SearchFailed {
                query,
                reason: e.to_string(),
            };
        }
    };

    if results.is_empty() {
        log::info!("No results found for query: {}", query);
        return RunOutcome::Empty { query };
    }

    match extract(completer, &results, &instruction.render(entity)).await {
        Extraction::Success(text) if text.is_empty() => {
            log::info!("Nothing extracted for {}", entity);
            RunOutcome::NothingExtracted {
                entity: entity.to_string(),
            }
        }
        Extraction::Success(text) => RunOutcome::Done(ExtractionRecord::new(entity, text)),
        Extraction::Failure(reason) => RunOutcome::ExtractionFailed {
            entity: entity.to_string(),
            reason,
        },
    }
}
