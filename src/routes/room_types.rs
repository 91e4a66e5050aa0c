use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::room_types::{
        CreateRoomTypeRequest, RoomTypeList, RoomTypeUploadForm, UpdateRoomTypeRequest,
    },
    error::{AppError, AppResult},
    models::RoomType,
    response::ApiResponse,
    services::room_type_service,
    state::AppState,
    uploads::{self, UploadedForm},
    validation::FieldErrors,
};

pub const MAX_ROOM_TYPE_IMAGES: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_room_type))
        .route("/hotel/{hotel_id}", get(list_room_types))
        .route("/{id}", patch(update_room_type).delete(delete_room_type))
}

pub fn create_request_from_form(form: UploadedForm) -> AppResult<CreateRoomTypeRequest> {
    let mut errors = FieldErrors::new();

    let hotel_id = form.required_text("hotel_id", &mut errors);
    let room_type = form.required_text("type", &mut errors);
    let base_price = form.required_parse::<f64>("base_price", &mut errors);
    let multiplier = form.parse::<f64>("multiplier", &mut errors);
    let available = form.parse::<bool>("available", &mut errors);
    errors.into_result()?;

    let hotel_id = Uuid::parse_str(&hotel_id)
        .map_err(|_| AppError::InvalidInput("Invalid hotel ID format".into()))?;
    let base_price =
        base_price.ok_or_else(|| AppError::InvalidInput("base_price is required".into()))?;

    Ok(CreateRoomTypeRequest {
        hotel_id,
        room_type,
        description: form.text("description"),
        images: form.images,
        base_price,
        multiplier,
        available,
    })
}

pub fn update_request_from_form(form: UploadedForm) -> AppResult<UpdateRoomTypeRequest> {
    let mut errors = FieldErrors::new();
    if form.text("hotel_id").is_some() {
        errors.push("hotel_id", "A room type cannot be moved to another hotel");
    }
    let patch = UpdateRoomTypeRequest {
        room_type: form.text("type"),
        description: form.text("description"),
        base_price: form.parse("base_price", &mut errors),
        multiplier: form.parse("multiplier", &mut errors),
        available: form.parse("available", &mut errors),
        images: Some(form.images).filter(|images| !images.is_empty()),
    };
    errors.into_result()?;
    Ok(patch)
}

#[utoipa::path(
    post,
    path = "/api/room-types",
    request_body(content = RoomTypeUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Room type created and linked to its hotel", body = ApiResponse<RoomType>),
        (status = 400, description = "Field validation errors"),
        (status = 404, description = "Hotel not found"),
    ),
    tag = "Room types"
)]
pub async fn create_room_type(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<RoomType>>)> {
    let upload_dir = &state.config.upload_dir;
    let form = uploads::read_form(multipart, upload_dir, MAX_ROOM_TYPE_IMAGES).await?;
    let stored = form.images.clone();
    let result = async {
        let payload = create_request_from_form(form)?;
        room_type_service::create_room_type(&state, payload).await
    }
    .await;
    let response = uploads::discard_on_error(upload_dir, &stored, result).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/room-types/hotel/{hotel_id}",
    params(("hotel_id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Room types of a hotel", body = ApiResponse<RoomTypeList>)
    ),
    tag = "Room types"
)]
pub async fn list_room_types(
    State(state): State<AppState>,
    Path(hotel_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RoomTypeList>>> {
    Ok(Json(room_type_service::list_for_hotel(&state, hotel_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/room-types/{id}",
    params(("id" = Uuid, Path, description = "Room type ID")),
    request_body(content = RoomTypeUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated room type", body = ApiResponse<RoomType>),
        (status = 404, description = "Room type not found"),
    ),
    tag = "Room types"
)]
pub async fn update_room_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<RoomType>>> {
    let upload_dir = &state.config.upload_dir;
    let form = uploads::read_form(multipart, upload_dir, MAX_ROOM_TYPE_IMAGES).await?;
    let stored = form.images.clone();
    let result = async {
        let payload = update_request_from_form(form)?;
        room_type_service::update_room_type(&state, id, payload).await
    }
    .await;
    Ok(Json(
        uploads::discard_on_error(upload_dir, &stored, result).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/room-types/{id}",
    params(("id" = Uuid, Path, description = "Room type ID")),
    responses(
        (status = 200, description = "Room type deleted and unlinked", body = ApiResponse<RoomType>),
        (status = 404, description = "Room type not found"),
    ),
    tag = "Room types"
)]
pub async fn delete_room_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RoomType>>> {
    Ok(Json(room_type_service::delete_room_type(&state, id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_form_requires_a_well_formed_hotel_id() {
        let form = UploadedForm::from_fields([
            ("hotel_id", "not-a-uuid"),
            ("type", "Deluxe"),
            ("base_price", "120"),
        ]);
        assert!(matches!(
            create_request_from_form(form),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn create_form_defaults_are_left_to_the_service() {
        let hotel_id = Uuid::new_v4().to_string();
        let form = UploadedForm::from_fields([
            ("hotel_id", hotel_id.as_str()),
            ("type", "Deluxe"),
            ("base_price", "120"),
        ]);
        let request = create_request_from_form(form).unwrap();
        assert_eq!(request.multiplier, None);
        assert_eq!(request.available, None);
        assert!(request.images.is_empty());
    }

    #[test]
    fn patch_cannot_move_room_type() {
        let form = UploadedForm::from_fields([("hotel_id", Uuid::new_v4().to_string())]);
        assert!(matches!(
            update_request_from_form(form),
            Err(AppError::ValidationFailed(_))
        ));
    }
}
