use actix_web::{HttpResponse, route};

// HEAD is accepted for load balancer probes.
#[route("/health_check", method = "GET", method = "HEAD")]
pub async fn get() -> HttpResponse {
    HttpResponse::Ok().finish()
}
