pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full API surface. `main` and the integration tests build the same
/// router from here.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/calendar/slots", get(handlers::slots::get_slots))
        .route(
            "/api/services",
            get(handlers::services::list_services).post(handlers::services::create_service),
        )
        .route("/api/services/all", get(handlers::services::list_all_services))
        .route(
            "/api/services/:id",
            get(handlers::services::get_service)
                .put(handlers::services::update_service)
                .delete(handlers::services::delete_service),
        )
        .route(
            "/api/bookings",
            post(handlers::bookings::create_booking).get(handlers::bookings::get_all_bookings),
        )
        .route("/api/bookings/my", get(handlers::bookings::get_my_bookings))
        .route(
            "/api/bookings/token/:token",
            get(handlers::bookings::get_booking_by_token),
        )
        .route(
            "/api/bookings/id/:id",
            put(handlers::bookings::update_booking).delete(handlers::bookings::delete_booking),
        )
        .route("/api/bookings/:token", get(handlers::bookings::get_booking))
        .route("/api/payments/create-intent", post(handlers::payments::create_intent))
        .route("/api/payments/confirm", post(handlers::payments::confirm))
        .route("/api/emails/confirmation", post(handlers::emails::send_confirmation))
        .route(
            "/api/blog",
            get(handlers::blog::list_posts).post(handlers::blog::create_post),
        )
        .route("/api/blog/all", get(handlers::blog::list_all_posts))
        .route(
            "/api/blog/id/:id",
            put(handlers::blog::update_post).delete(handlers::blog::delete_post),
        )
        .route("/api/blog/:slug", get(handlers::blog::get_post))
        .route(
            "/api/contact",
            post(handlers::contact::create_message).get(handlers::contact::list_messages),
        )
        .route(
            "/api/contact/:id",
            put(handlers::contact::update_message).delete(handlers::contact::delete_message),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
