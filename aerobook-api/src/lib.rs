pub mod admin;
pub mod bookings;
pub mod error;
pub mod flights;
pub mod sessions;
pub mod state;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(flights::routes())
        .merge(sessions::routes())
        .merge(bookings::routes())
        .merge(admin::routes())
        .merge(users::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
