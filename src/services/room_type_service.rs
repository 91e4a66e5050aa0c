use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::room_types::{CreateRoomTypeRequest, RoomTypeList, UpdateRoomTypeRequest},
    entity::{
        PathList,
        room_types::{ActiveModel, Column, Entity as RoomTypes, Model as RoomTypeModel},
    },
    error::{AppError, AppResult},
    models::RoomType,
    response::{ApiResponse, Meta},
    services::inventory_linker,
    state::AppState,
    uploads,
    validation::{FieldErrors, validate_price, validate_required},
};

fn validate_room_type(
    room_type: &str,
    base_price: f64,
    multiplier: f64,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    errors.check("type", validate_required(room_type, "Room type"));
    errors.check("base_price", validate_price(base_price, "Base price"));
    if !multiplier.is_finite() || multiplier <= 0.0 {
        errors.push("multiplier", "Multiplier must be greater than 0");
    }
    errors.into_result()
}

/// Create a room type and link it to its hotel in one transaction. A room
/// type for a missing hotel is rejected, so no orphan is ever written.
pub async fn create_room_type(
    state: &AppState,
    payload: CreateRoomTypeRequest,
) -> AppResult<ApiResponse<RoomType>> {
    let multiplier = payload.multiplier.unwrap_or(1.0);
    validate_room_type(&payload.room_type, payload.base_price, multiplier)?;

    let txn = state.orm.begin().await?;

    let hotel = inventory_linker::find_hotel_for_update(&txn, payload.hotel_id)
        .await?
        .ok_or(AppError::NotFound("Hotel"))?;

    let room_type = ActiveModel {
        id: Set(Uuid::new_v4()),
        hotel_id: Set(hotel.id),
        room_type: Set(payload.room_type),
        description: Set(payload.description),
        images: Set(PathList(payload.images)),
        base_price: Set(payload.base_price),
        multiplier: Set(multiplier),
        available: Set(payload.available.unwrap_or(true)),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    inventory_linker::link_room_type(&txn, hotel, room_type.id).await?;

    txn.commit().await?;

    tracing::info!(room_type_id = %room_type.id, hotel_id = %room_type.hotel_id, "room type created");
    audit::record(
        &state.orm,
        None,
        "room_type_create",
        "room_types",
        serde_json::json!({ "room_type_id": room_type.id, "hotel_id": room_type.hotel_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Room type created",
        room_type_from_entity(room_type),
        Some(Meta::empty()),
    ))
}

pub async fn list_for_hotel(
    state: &AppState,
    hotel_id: Uuid,
) -> AppResult<ApiResponse<RoomTypeList>> {
    let items = RoomTypes::find()
        .filter(Column::HotelId.eq(hotel_id))
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(room_type_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Room types",
        RoomTypeList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_room_type(
    state: &AppState,
    id: Uuid,
    payload: UpdateRoomTypeRequest,
) -> AppResult<ApiResponse<RoomType>> {
    let existing = RoomTypes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Room type"))?;

    let room_type = payload.room_type.unwrap_or_else(|| existing.room_type.clone());
    let base_price = payload.base_price.unwrap_or(existing.base_price);
    let multiplier = payload.multiplier.unwrap_or(existing.multiplier);
    validate_room_type(&room_type, base_price, multiplier)?;

    let images = payload.images.filter(|images| !images.is_empty());
    let replaced: Vec<String> = match &images {
        Some(images) => existing
            .images
            .0
            .iter()
            .filter(|image| !images.contains(*image))
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mut active: ActiveModel = existing.into();
    active.room_type = Set(room_type);
    active.base_price = Set(base_price);
    active.multiplier = Set(multiplier);
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }
    if let Some(images) = images {
        active.images = Set(PathList(images));
    }

    let room_type = active.update(&state.orm).await?;
    uploads::discard(&state.config.upload_dir, &replaced).await;

    Ok(ApiResponse::success(
        "Updated",
        room_type_from_entity(room_type),
        Some(Meta::empty()),
    ))
}

/// Delete a room type and unlink it from its hotel in one transaction.
pub async fn delete_room_type(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RoomType>> {
    let txn = state.orm.begin().await?;

    let room_type = RoomTypes::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Room type"))?;

    RoomTypes::delete_by_id(id).exec(&txn).await?;
    inventory_linker::unlink_room_type(&txn, room_type.hotel_id, room_type.id).await?;

    txn.commit().await?;

    tracing::info!(room_type_id = %id, hotel_id = %room_type.hotel_id, "room type deleted");
    audit::record(
        &state.orm,
        None,
        "room_type_delete",
        "room_types",
        serde_json::json!({ "room_type_id": id, "hotel_id": room_type.hotel_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        room_type_from_entity(room_type),
        Some(Meta::empty()),
    ))
}

pub fn room_type_from_entity(model: RoomTypeModel) -> RoomType {
    RoomType {
        id: model.id,
        hotel_id: model.hotel_id,
        room_type: model.room_type,
        description: model.description,
        images: model.images.0,
        base_price: model.base_price,
        multiplier: model.multiplier,
        available: model.available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
