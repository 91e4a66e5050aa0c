use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod bookings;
pub mod doc;
pub mod health;
pub mod hotels;
pub mod params;
pub mod payments;
pub mod room_types;
pub mod users;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/bookings", bookings::router())
        .nest("/hotels", hotels::router())
        .nest("/room-types", room_types::router())
        .nest("/users", users::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router())
}
