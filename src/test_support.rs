//! Fakes shared by the unit tests: a scripted HTTP provider and in-memory
//! implementations of the service traits.

use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{Arc, Mutex},
};

use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use async_trait::async_trait;
use serde_json::Value;

use crate::{
    domain::{entity_table::EntityTable, search_result::SearchResult},
    services::{
        CompletionError, CompletionProvider, SearchError, SheetError, SheetStore, WebSearcher,
    },
};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Answers every request with the next scripted reply, repeating the last one
/// once the script runs out.
pub struct FakeProvider {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeProvider {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub async fn spawn_fake_provider(replies: Vec<(u16, Value)>) -> FakeProvider {
    assert!(!replies.is_empty(), "A fake provider needs at least one reply");

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();
    let replies = Arc::new(replies);

    let server_requests = requests.clone();
    let server = HttpServer::new(move || {
        let requests = server_requests.clone();
        let replies = replies.clone();
        App::new().default_service(web::to(move |req: HttpRequest, body: String| {
            let requests = requests.clone();
            let replies = replies.clone();
            async move {
                let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
                    .map(|q| q.into_inner())
                    .unwrap_or_default();
                let headers = req
                    .headers()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                    .collect();

                let mut requests = requests.lock().unwrap();
                requests.push(RecordedRequest {
                    method: req.method().to_string(),
                    path: req.path().to_string(),
                    query,
                    headers,
                    body,
                });

                let (status, reply) = replies[(requests.len() - 1).min(replies.len() - 1)].clone();
                HttpResponse::build(StatusCode::from_u16(status).unwrap()).json(reply)
            }
        }))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();

    tokio::spawn(server);

    FakeProvider {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

pub struct FakeSearcher {
    reply: Result<Vec<SearchResult>, String>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeSearcher {
    pub fn returning(results: Vec<SearchResult>) -> Self {
        FakeSearcher {
            reply: Ok(results),
            queries: Mutex::default(),
        }
    }

    pub fn failing() -> Self {
        FakeSearcher {
            reply: Err("connection refused".to_string()),
            queries: Mutex::default(),
        }
    }
}

#[async_trait]
impl WebSearcher for FakeSearcher {
    async fn try_search(
        &self,
        query: &str,
        _api_key: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.reply {
            Ok(results) => Ok(results.clone()),
            Err(reason) => Err(SearchError::Exhausted {
                attempts: 3,
                last: reason.clone(),
            }),
        }
    }
}

pub struct FakeCompleter {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeCompleter {
    pub fn answering(text: &str) -> Self {
        FakeCompleter {
            reply: Some(text.to_string()),
            prompts: Mutex::default(),
        }
    }

    pub fn failing() -> Self {
        FakeCompleter {
            reply: None,
            prompts: Mutex::default(),
        }
    }
}

#[async_trait]
impl CompletionProvider for FakeCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().ok_or(CompletionError::NoChoices)
    }
}

#[derive(Default)]
pub struct FakeSheets {
    pub table: Option<EntityTable>,
    pub appended: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeSheets {
    pub fn with_table(table: EntityTable) -> Self {
        FakeSheets {
            table: Some(table),
            appended: Mutex::default(),
        }
    }
}

#[async_trait]
impl SheetStore for FakeSheets {
    async fn fetch_records(&self, _sheet_url: &str) -> Result<EntityTable, SheetError> {
        self.table.clone().ok_or(SheetError::MissingCredentials)
    }

    async fn append_row(&self, sheet_url: &str, row: &[String]) -> Result<(), SheetError> {
        self.appended
            .lock()
            .unwrap()
            .push((sheet_url.to_string(), row.to_vec()));
        Ok(())
    }
}
