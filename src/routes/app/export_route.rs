use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, HttpResponse,
};
use serde::Deserialize;

use crate::domain::extraction::{records_to_csv, ExtractionRecord};

const EXPORT_FILE_NAME: &str = "extracted_data.csv";

/// A finished run posted back from the page.
#[derive(Deserialize)]
pub struct RecordForm {
    pub entity: Option<String>,
    pub extracted_info: Option<String>,
}

impl RecordForm {
    pub fn record(&self) -> Option<ExtractionRecord> {
        ExtractionRecord::from_parts(self.entity.as_deref(), self.extracted_info.as_deref())
    }
}

#[post("/export")]
pub async fn export_csv(form: web::Form<RecordForm>) -> HttpResponse {
    let Some(record) = form.record() else {
        return HttpResponse::BadRequest().body("No extracted data to export");
    };

    match records_to_csv(&[record]) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(EXPORT_FILE_NAME.to_string())],
            })
            .body(csv),
        Err(e) => {
            log::error!("Failed to export csv: {}", e);
            HttpResponse::InternalServerError().body("Failed to export csv")
        }
    }
}
