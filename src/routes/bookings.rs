use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::bookings::{BookingDetails, BookingList, CreateBookingRequest, UpdateBookingRequest},
    error::AppResult,
    middleware::auth::AdminUser,
    models::Booking,
    response::ApiResponse,
    routes::params::Pagination,
    services::booking_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route(
            "/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Payment captured and booking saved", body = ApiResponse<Booking>),
        (status = 400, description = "Invalid hotel id, invalid body or payment declined"),
        (status = 404, description = "User or hotel not found"),
    ),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Booking>>)> {
    let response = booking_service::create_booking(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    params(Pagination),
    responses(
        (status = 200, description = "Bookings with their user and hotel", body = ApiResponse<BookingList>)
    ),
    tag = "Bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<BookingList>>> {
    Ok(Json(booking_service::list_bookings(&state, pagination).await?))
}

#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking with its user and hotel", body = ApiResponse<BookingDetails>),
        (status = 404, description = "Booking not found"),
    ),
    tag = "Bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookingDetails>>> {
    Ok(Json(booking_service::get_booking(&state, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = ApiResponse<Booking>),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn update_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    Ok(Json(booking_service::update_booking(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted"),
        (status = 404, description = "Booking not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bookings"
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(booking_service::delete_booking(&state, id).await?))
}
