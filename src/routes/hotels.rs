use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::hotels::{
        CreateHotelRequest, HotelList, HotelUploadForm, LocationPatch, UpdateHotelRequest,
    },
    error::{AppError, AppResult},
    models::{Hotel, Location},
    response::ApiResponse,
    routes::params::HotelSearchQuery,
    services::hotel_service,
    state::AppState,
    uploads::{self, UploadedForm},
    validation::FieldErrors,
};

pub const MAX_HOTEL_IMAGES: usize = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_hotels).post(create_hotel))
        .route(
            "/{id}",
            get(get_hotel).patch(update_hotel).delete(delete_hotel),
        )
}

/// Build a create request from form fields. `location` arrives as JSON text.
pub fn create_request_from_form(form: UploadedForm) -> AppResult<CreateHotelRequest> {
    let mut errors = FieldErrors::new();

    let name = form.required_text("name", &mut errors);
    let base_price = form.required_parse::<f64>("base_price", &mut errors);
    let number_of_rooms = form.required_parse::<i32>("number_of_rooms", &mut errors);
    let ratings = form.parse::<f64>("ratings", &mut errors);
    let property_type = form.required_text("property_type", &mut errors);
    let email = form.required_text("email", &mut errors);
    let phone_number = form.required_text("phone_number", &mut errors);

    let location = match form.text("location") {
        Some(raw) => match serde_json::from_str::<Location>(&raw) {
            Ok(location) => Some(location),
            Err(err) => {
                errors.push("location", format!("Location is not valid: {err}"));
                None
            }
        },
        None => {
            errors.push("location", "Location is required");
            None
        }
    };

    match (base_price, number_of_rooms, location) {
        (Some(base_price), Some(number_of_rooms), Some(location)) if errors.is_empty() => {
            Ok(CreateHotelRequest {
                name,
                base_price,
                number_of_rooms,
                location,
                ratings,
                property_type,
                images: form.images.clone(),
                email,
                description: form.text("description"),
                phone_number,
            })
        }
        _ => {
            errors.into_result()?;
            Err(AppError::InvalidInput("Incomplete hotel form".into()))
        }
    }
}

/// Build a patch from form fields. Only fields present in the form are set.
pub fn update_request_from_form(form: UploadedForm) -> AppResult<UpdateHotelRequest> {
    let mut errors = FieldErrors::new();

    let location = match form.text("location") {
        Some(raw) => match serde_json::from_str::<LocationPatch>(&raw) {
            Ok(location) => Some(location),
            Err(err) => {
                errors.push("location", format!("Location is not valid: {err}"));
                None
            }
        },
        None => None,
    };

    let patch = UpdateHotelRequest {
        name: form.text("name"),
        base_price: form.parse("base_price", &mut errors),
        number_of_rooms: form.parse("number_of_rooms", &mut errors),
        location,
        ratings: form.parse("ratings", &mut errors),
        property_type: form.text("property_type"),
        images: Some(form.images.clone()).filter(|images| !images.is_empty()),
        email: form.text("email"),
        description: form.text("description"),
        phone_number: form.text("phone_number"),
    };

    errors.into_result()?;
    Ok(patch)
}

#[utoipa::path(
    get,
    path = "/api/hotels",
    params(HotelSearchQuery),
    responses(
        (status = 200, description = "Hotels matching every given filter", body = ApiResponse<HotelList>)
    ),
    tag = "Hotels"
)]
pub async fn search_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelSearchQuery>,
) -> AppResult<Json<ApiResponse<HotelList>>> {
    Ok(Json(hotel_service::search_hotels(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/hotels/{id}",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Get hotel", body = ApiResponse<Hotel>),
        (status = 404, description = "Hotel not found"),
    ),
    tag = "Hotels"
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Hotel>>> {
    Ok(Json(hotel_service::get_hotel(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/hotels",
    request_body(content = HotelUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Create hotel", body = ApiResponse<Hotel>),
        (status = 400, description = "Field validation errors"),
    ),
    tag = "Hotels"
)]
pub async fn create_hotel(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Hotel>>)> {
    let upload_dir = &state.config.upload_dir;
    let form = uploads::read_form(multipart, upload_dir, MAX_HOTEL_IMAGES).await?;
    let stored = form.images.clone();
    let result = async {
        let payload = create_request_from_form(form)?;
        hotel_service::create_hotel(&state, payload).await
    }
    .await;
    let response = uploads::discard_on_error(upload_dir, &stored, result).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/hotels/{id}",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    request_body(content = HotelUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated hotel", body = ApiResponse<Hotel>),
        (status = 400, description = "Field validation errors"),
        (status = 404, description = "Hotel not found"),
    ),
    tag = "Hotels"
)]
pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Hotel>>> {
    let upload_dir = &state.config.upload_dir;
    let form = uploads::read_form(multipart, upload_dir, MAX_HOTEL_IMAGES).await?;
    let stored = form.images.clone();
    let result = async {
        let payload = update_request_from_form(form)?;
        hotel_service::update_hotel(&state, id, payload).await
    }
    .await;
    Ok(Json(
        uploads::discard_on_error(upload_dir, &stored, result).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/hotels/{id}",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Deleted hotel", body = ApiResponse<Hotel>),
        (status = 404, description = "Hotel not found"),
    ),
    tag = "Hotels"
)]
pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Hotel>>> {
    Ok(Json(hotel_service::delete_hotel(&state, id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> UploadedForm {
        let mut form = UploadedForm::from_fields([
            ("name", "Sea Breeze"),
            ("base_price", "150"),
            ("number_of_rooms", "10"),
            (
                "location",
                r#"{"name":"Lisbon","address":"Rua Augusta 1","latitude":38.7,"longitude":-9.1}"#,
            ),
            ("property_type", "Resort"),
            ("email", "a@b.com"),
            ("phone_number", "0123456789"),
        ]);
        form.images.push("/uploads/images-1-a-pool.jpg".into());
        form
    }

    #[test]
    fn complete_form_builds_a_request() {
        let request = create_request_from_form(complete_form()).unwrap();
        assert_eq!(request.base_price, 150.0);
        assert_eq!(request.location.name, "Lisbon");
        assert_eq!(request.images.len(), 1);
        assert_eq!(request.ratings, None);
    }

    #[test]
    fn missing_and_malformed_fields_are_listed() {
        let form = UploadedForm::from_fields([
            ("name", "Sea Breeze"),
            ("base_price", "lots"),
            ("location", "{not json"),
        ]);
        let Err(AppError::ValidationFailed(errors)) = create_request_from_form(form) else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"base_price"));
        assert!(fields.contains(&"number_of_rooms"));
        assert!(fields.contains(&"location"));
        assert!(fields.contains(&"phone_number"));
    }

    #[test]
    fn patch_form_only_sets_present_fields() {
        let form = UploadedForm::from_fields([
            ("base_price", "99.5"),
            ("location", r#"{"address":"New Street 5"}"#),
        ]);
        let patch = update_request_from_form(form).unwrap();
        assert_eq!(patch.base_price, Some(99.5));
        assert_eq!(patch.name, None);
        assert_eq!(patch.images, None);
        assert_eq!(
            patch.location,
            Some(LocationPatch {
                address: Some("New Street 5".into()),
                ..Default::default()
            })
        );
    }
}
