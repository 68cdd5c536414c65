use actix_web::{get, http::header::LOCATION, HttpResponse, Responder};

#[get("/")]
pub async fn default() -> impl Responder {
    HttpResponse::Found()
        .insert_header((LOCATION, "/app/dashboard"))
        .finish()
}
