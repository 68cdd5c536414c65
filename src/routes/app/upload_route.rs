use actix_multipart::form::{bytes::Bytes, text::Text, MultipartForm};
use actix_web::{post, web, HttpResponse};

use crate::services::{CompletionProvider, SheetStore, WebSearcher};

use super::dashboard_route::{build_dashboard, render, DashboardConfig, DashboardForm};

#[derive(MultipartForm)]
pub struct UploadForm {
    #[multipart(limit = "2MB")]
    file: Bytes,
    prompt: Option<Text<String>>,
    sheet_url: Option<Text<String>>,
    serpapi_key: Option<Text<String>>,
}

fn text(field: Option<Text<String>>) -> String {
    field.map(|t| t.into_inner()).unwrap_or_default()
}

#[post("/upload")]
pub async fn upload_csv(
    MultipartForm(upload): MultipartForm<UploadForm>,
    searcher: web::Data<dyn WebSearcher>,
    completer: web::Data<dyn CompletionProvider>,
    sheets: web::Data<dyn SheetStore>,
    config: web::Data<DashboardConfig>,
) -> HttpResponse {
    let file_name = upload.file.file_name.clone().unwrap_or_default();
    let source_csv = match String::from_utf8(upload.file.data.to_vec()) {
        Ok(content) => content,
        Err(e) => {
            log::error!("Uploaded file {} is not utf-8: {:?}", file_name, e);
            return HttpResponse::BadRequest()
                .body("The uploaded file is not a valid UTF-8 CSV file");
        }
    };
    log::info!("Received {} ({} bytes)", file_name, source_csv.len());

    let form = DashboardForm {
        source_csv,
        prompt: text(upload.prompt),
        sheet_url: text(upload.sheet_url),
        serpapi_key: text(upload.serpapi_key),
        ..Default::default()
    };

    let view = build_dashboard(
        form,
        searcher.get_ref(),
        completer.get_ref(),
        sheets.get_ref(),
        &config,
    )
    .await;
    render(view)
}
