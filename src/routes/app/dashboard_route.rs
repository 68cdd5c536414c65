use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;

use crate::{
    configuration::Settings,
    domain::{entity_table::EntityTable, extraction::ExtractionRecord, prompt::PromptTemplate},
    services::{
        run_extraction, CompletionProvider, RunOutcome, RunRequest, SheetStore, WebSearcher,
    },
};

/// Dashboard defaults that do not change between requests.
#[derive(Clone)]
pub struct DashboardConfig {
    pub default_prompt: String,
    pub instruction: PromptTemplate,
    pub preview_rows: usize,
}

impl From<&Settings> for DashboardConfig {
    fn from(settings: &Settings) -> Self {
        DashboardConfig {
            default_prompt: settings.dashboard.default_prompt.clone(),
            instruction: PromptTemplate::new(settings.completion.instruction.clone()),
            preview_rows: settings.dashboard.preview_rows,
        }
    }
}

/// Everything the page posts back. The uploaded csv travels in `source_csv`
/// so no table is kept on the server between requests.
#[derive(Deserialize, Default, Clone)]
pub struct DashboardForm {
    #[serde(default)]
    pub source_csv: String,
    #[serde(default)]
    pub sheet_url: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub manual_entity: String,
    #[serde(default)]
    pub serpapi_key: String,
}

pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

fn select_options(values: &[String], selected: &str) -> Vec<SelectOption> {
    values
        .iter()
        .map(|value| SelectOption {
            value: value.clone(),
            selected: value == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    source_csv: String,
    sheet_url: String,
    prompt: String,
    serpapi_key: String,
    manual_entity: String,
    errors: Vec<String>,
    table_title: Option<String>,
    columns: Vec<String>,
    preview: Vec<Vec<String>>,
    column_options: Vec<SelectOption>,
    entity_options: Vec<SelectOption>,
    message: Option<String>,
    failure: Option<String>,
    record: Option<ExtractionRecord>,
}

impl DashboardTemplate {
    fn from_form(form: &DashboardForm) -> Self {
        DashboardTemplate {
            source_csv: form.source_csv.clone(),
            sheet_url: form.sheet_url.clone(),
            prompt: form.prompt.clone(),
            serpapi_key: form.serpapi_key.clone(),
            manual_entity: form.manual_entity.clone(),
            errors: vec![],
            table_title: None,
            columns: vec![],
            preview: vec![],
            column_options: vec![],
            entity_options: vec![],
            message: None,
            failure: None,
            record: None,
        }
    }

    fn show_outcome(&mut self, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Idle => {}
            RunOutcome::Empty { .. } => self.message = Some("No results found.".to_string()),
            RunOutcome::SearchFailed { reason, .. } => {
                self.failure = Some(format!("Error searching the web: {}", reason))
            }
            RunOutcome::ExtractionFailed { reason, .. } => {
                self.failure = Some(format!("Error: {}", reason))
            }
            RunOutcome::NothingExtracted { .. } => {
                self.message = Some("No information could be extracted.".to_string())
            }
            RunOutcome::Done(record) => self.record = Some(record),
        }
    }
}

/// Loads the entity table the form points at. A sheet url wins over an
/// uploaded csv, a sheet that fails to load leaves the csv in place.
async fn load_table(
    form: &DashboardForm,
    sheets: &dyn SheetStore,
    view: &mut DashboardTemplate,
) -> Option<EntityTable> {
    let mut table = None;

    if !form.source_csv.trim().is_empty() {
        match EntityTable::from_csv(&form.source_csv) {
            Ok(t) => {
                view.table_title = Some("CSV Data Preview:".to_string());
                table = Some(t);
            }
            Err(e) => view.errors.push(format!("Error reading the CSV file: {}", e)),
        }
    }

    let sheet_url = form.sheet_url.trim();
    if !sheet_url.is_empty() {
        match sheets.fetch_records(sheet_url).await {
            Ok(t) => {
                view.table_title = Some("Google Sheet Data Preview:".to_string());
                table = Some(t);
            }
            Err(e) => {
                log::error!("Error connecting to sheet {}: {}", sheet_url, e);
                view.errors.push(format!("Error connecting to the sheet: {}", e));
            }
        }
    }

    table
}

/// Runs one interaction cycle: load the table, pick the entity, run the
/// pipeline once every input is there.
pub async fn build_dashboard(
    form: DashboardForm,
    searcher: &dyn WebSearcher,
    completer: &dyn CompletionProvider,
    sheets: &dyn SheetStore,
    config: &DashboardConfig,
) -> DashboardTemplate {
    let mut view = DashboardTemplate::from_form(&form);

    let entity = match load_table(&form, sheets, &mut view).await {
        Some(table) if !table.is_empty() => {
            let column = match table.columns.contains(&form.column) {
                true => form.column.clone(),
                false => table.columns.first().cloned().unwrap_or_default(),
            };
            let entities = table.entities(&column);
            let entity = match entities.contains(&form.entity) {
                true => form.entity.clone(),
                false => entities.first().cloned().unwrap_or_default(),
            };

            view.column_options = select_options(&table.columns, &column);
            view.entity_options = select_options(&entities, &entity);
            view.preview = table.preview(config.preview_rows).to_vec();
            view.columns = table.columns;
            entity
        }
        Some(table) => {
            view.columns = table.columns;
            form.manual_entity.clone()
        }
        None => form.manual_entity.clone(),
    };

    let prompt = PromptTemplate::new(form.prompt.clone());
    let request = RunRequest {
        api_key: &form.serpapi_key,
        prompt: &prompt,
        entity: &entity,
    };
    let outcome = run_extraction(searcher, completer, &config.instruction, request).await;
    view.show_outcome(outcome);

    view
}

pub fn render(view: DashboardTemplate) -> HttpResponse {
    match view.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render dashboard: {:?}", e);
            HttpResponse::InternalServerError().body("Failed to render dashboard")
        }
    }
}

#[get("/dashboard")]
pub async fn dashboard(config: web::Data<DashboardConfig>) -> HttpResponse {
    let form = DashboardForm {
        prompt: config.default_prompt.clone(),
        ..Default::default()
    };
    render(DashboardTemplate::from_form(&form))
}

#[post("/dashboard")]
pub async fn run_dashboard(
    form: web::Form<DashboardForm>,
    searcher: web::Data<dyn WebSearcher>,
    completer: web::Data<dyn CompletionProvider>,
    sheets: web::Data<dyn SheetStore>,
    config: web::Data<DashboardConfig>,
) -> HttpResponse {
    let view = build_dashboard(
        form.into_inner(),
        searcher.get_ref(),
        completer.get_ref(),
        sheets.get_ref(),
        &config,
    )
    .await;
    render(view)
}
