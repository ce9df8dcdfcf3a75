use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
struct StatusResponse {
    alive: bool,
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Liveness probe for the webhook gateway.
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse { alive: true })
}
