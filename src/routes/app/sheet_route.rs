use actix_web::{http::header::LOCATION, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;

use crate::services::SheetStore;

use super::export_route::RecordForm;

#[derive(Template)]
#[template(path = "notice.html")]
struct NoticeTemplate {
    success: bool,
    message: String,
}

#[derive(Deserialize)]
pub struct UpdateSheetForm {
    #[serde(default)]
    sheet_url: String,
    #[serde(flatten)]
    record: RecordForm,
}

#[post("/update-sheet")]
pub async fn update_sheet(
    form: web::Form<UpdateSheetForm>,
    sheets: web::Data<dyn SheetStore>,
) -> HttpResponse {
    // Nothing extracted yet, nothing to append
    let Some(record) = form.record.record() else {
        return HttpResponse::SeeOther()
            .insert_header((LOCATION, "/app/dashboard"))
            .finish();
    };

    let result = match form.sheet_url.trim() {
        "" => Err("No Google Sheet URL given".to_string()),
        sheet_url => sheets
            .append_row(sheet_url, &record.as_row())
            .await
            .map_err(|e| e.to_string()),
    };

    let notice = match result {
        Ok(()) => NoticeTemplate {
            success: true,
            message: "Google Sheet updated successfully.".to_string(),
        },
        Err(e) => {
            log::error!("Error updating Google Sheet: {}", e);
            NoticeTemplate {
                success: false,
                message: format!("Error updating Google Sheet: {}", e),
            }
        }
    };

    match notice.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render notice: {:?}", e);
            HttpResponse::InternalServerError().body(notice.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web, App};

    use crate::{services::SheetStore, test_support::FakeSheets};

    use super::update_sheet;

    const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/abc/edit";

    #[actix_web::test]
    async fn appends_record_as_row() {
        let fake = Arc::new(FakeSheets::default());
        let sheets: Arc<dyn SheetStore> = fake.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sheets))
                .service(update_sheet),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/update-sheet")
            .set_form([
                ("sheet_url", SHEET_URL),
                ("entity", "Jane Doe"),
                ("extracted_info", "jane@example.com"),
            ])
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Google Sheet updated successfully."));
        assert_eq!(
            fake.appended.lock().unwrap().as_slice(),
            [(
                SHEET_URL.to_string(),
                vec!["Jane Doe".to_string(), "jane@example.com".to_string()]
            )]
        );
    }

    #[actix_web::test]
    async fn without_record_nothing_happens() {
        let fake = Arc::new(FakeSheets::default());
        let sheets: Arc<dyn SheetStore> = fake.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sheets))
                .service(update_sheet),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/update-sheet")
            .set_form([("sheet_url", SHEET_URL)])
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(fake.appended.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn missing_sheet_url_is_an_error() {
        let fake = Arc::new(FakeSheets::default());
        let sheets: Arc<dyn SheetStore> = fake.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sheets))
                .service(update_sheet),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/update-sheet")
            .set_form([("entity", "Jane Doe"), ("extracted_info", "jane@example.com")])
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Error updating Google Sheet: No Google Sheet URL given"));
        assert!(fake.appended.lock().unwrap().is_empty());
    }
}
