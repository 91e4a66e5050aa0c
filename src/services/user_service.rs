use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::users::{UserList, UserRequest},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, paginate},
    state::AppState,
    validation::{FieldErrors, validate_email, validate_required},
};

fn validate_user(payload: &UserRequest) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(
        "first_name",
        validate_required(&payload.first_name, "First name"),
    );
    errors.check(
        "last_name",
        validate_required(&payload.last_name, "Last name"),
    );
    errors.check("email_address", validate_email(&payload.email_address));
    errors.into_result()
}

pub async fn list_users(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    let window = pagination.normalize();
    let finder = Users::find().order_by_asc(Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;

    let items = paginate(finder, window.as_ref())
        .all(&state.orm)
        .await?
        .into_iter()
        .map(user_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::page(window.as_ref(), total)),
    ))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<User>> {
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(user_from_entity)
        .ok_or(AppError::NotFound("User"))?;
    Ok(ApiResponse::success("User", user, None))
}

pub async fn create_user(state: &AppState, payload: UserRequest) -> AppResult<ApiResponse<User>> {
    validate_user(&payload)?;

    let user = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email_address: Set(payload.email_address),
        image_url: Set(payload.image_url),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "User created",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

/// Replace the profile fields of an account.
pub async fn update_user(
    state: &AppState,
    id: Uuid,
    payload: UserRequest,
) -> AppResult<ApiResponse<User>> {
    validate_user(&payload)?;

    let existing = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let mut active: ActiveModel = existing.into();
    active.first_name = Set(payload.first_name);
    active.last_name = Set(payload.last_name);
    active.email_address = Set(payload.email_address);
    active.image_url = Set(payload.image_url);
    let user = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        user_from_entity(user),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Users::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User"));
    }

    Ok(ApiResponse::acknowledged(
        "User deleted",
        serde_json::json!({ "id": id }),
    ))
}

pub fn user_from_entity(model: UserModel) -> User {
    User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email_address: model.email_address,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
