pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let app = Router::new()
        // Token issue
        .route("/jwt", post(routes::auth::issue_token))
        // Users
        .route("/users", get(routes::user::list).post(routes::user::upsert))
        .route(
            "/users/admin/{key}",
            get(routes::user::is_admin).patch(routes::user::make_admin),
        )
        .route(
            "/users/member/{key}",
            get(routes::user::is_member).patch(routes::user::make_member),
        )
        .route("/users/user/{id}", patch(routes::user::make_user))
        .route(
            "/users/{key}",
            get(routes::user::get_by_email).delete(routes::user::delete),
        )
        // Apartments
        .route(
            "/apartments",
            get(routes::apartment::list).post(routes::apartment::create),
        )
        .route(
            "/apartments/{id}",
            get(routes::apartment::get)
                .patch(routes::apartment::update)
                .delete(routes::apartment::delete),
        )
        // Coupons
        .route(
            "/coupons",
            get(routes::coupon::list).post(routes::coupon::create),
        )
        .route("/coupons/apply", post(routes::coupon::apply))
        .route(
            "/coupons/{id}",
            get(routes::coupon::get)
                .patch(routes::coupon::update)
                .delete(routes::coupon::delete),
        )
        .route(
            "/coupons/{id}/status",
            patch(routes::coupon::update_status),
        )
        // Announcements
        .route(
            "/announcements",
            get(routes::announcement::list).post(routes::announcement::create),
        )
        .route(
            "/announcements/{id}",
            put(routes::announcement::update)
                .delete(routes::announcement::delete),
        )
        // Agreements
        .route(
            "/agreements",
            get(routes::agreement::list).post(routes::agreement::create),
        )
        .route("/agreements/requests", get(routes::agreement::requests))
        .route("/agreements/user/{email}", get(routes::agreement::by_user))
        .route(
            "/agreements/{id}",
            patch(routes::agreement::update_status)
                .delete(routes::agreement::delete),
        )
        // Payments
        .route(
            "/payments",
            get(routes::payment::list).post(routes::payment::create),
        )
        .route("/payments/request", post(routes::payment::request))
        .route("/payments/user/{email}", get(routes::payment::by_user))
        // Admin dashboard (both spellings survive from earlier iterations)
        .route("/admin-stats", get(routes::stats::admin_stats))
        .route("/admin/stats", get(routes::stats::admin_stats))
        // Health check
        .route("/health", get(health_check));

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
