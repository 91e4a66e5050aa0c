use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::hotels::{CreateHotelRequest, HotelList, UpdateHotelRequest},
    entity::{
        IdList, PathList,
        hotels::{ActiveModel, Column, Entity as Hotels, Model as HotelModel},
        room_types::{Column as RoomTypeCol, Entity as RoomTypes},
    },
    error::{AppError, AppResult},
    models::{Hotel, Location},
    response::{ApiResponse, Meta},
    routes::params::{HotelSearchQuery, HotelSortBy, paginate},
    state::AppState,
    uploads,
    validation::validate_hotel,
};

/// Build the filter for a listing search. Every given filter must hold; the
/// free-text query matches the hotel name or the location name.
pub fn search_condition(query: &HotelSearchQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = query.search_query.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(Column::Name)))
                        .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(Column::LocationName)))
                        .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
                ),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::BasePrice.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::BasePrice.lte(max_price));
    }
    if let Some(min_rooms) = query.min_rooms {
        condition = condition.add(Column::NumberOfRooms.gte(min_rooms));
    }
    if let Some(max_rooms) = query.max_rooms {
        condition = condition.add(Column::NumberOfRooms.lte(max_rooms));
    }
    if let Some(property_type) = query.property_type.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::PropertyType.eq(property_type.clone()));
    }

    condition
}

fn apply_sort(finder: Select<Hotels>, sort_by: Option<HotelSortBy>) -> Select<Hotels> {
    let finder = match sort_by {
        Some(HotelSortBy::PriceAsc) => finder.order_by_asc(Column::BasePrice),
        Some(HotelSortBy::PriceDesc) => finder.order_by_desc(Column::BasePrice),
        Some(HotelSortBy::Rating) => finder.order_by_desc(Column::Ratings),
        None => finder,
    };
    // insertion order breaks ties and is the natural order
    finder.order_by_asc(Column::CreatedAt).order_by_asc(Column::Id)
}

const LIKE_ESCAPE: char = '!';

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub async fn search_hotels(
    state: &AppState,
    query: HotelSearchQuery,
) -> AppResult<ApiResponse<HotelList>> {
    let window = query.pagination().normalize();
    let finder = apply_sort(Hotels::find().filter(search_condition(&query)), query.sort_by);

    let total = finder.clone().count(&state.orm).await?;

    let items = paginate(finder, window.as_ref())
        .all(&state.orm)
        .await?
        .into_iter()
        .map(hotel_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Hotels",
        HotelList { items },
        Some(Meta::page(window.as_ref(), total)),
    ))
}

pub async fn get_hotel(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Hotel>> {
    let hotel = Hotels::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(hotel_from_entity)
        .ok_or(AppError::NotFound("Hotel"))?;
    Ok(ApiResponse::success("Hotel", hotel, None))
}

pub async fn create_hotel(
    state: &AppState,
    payload: CreateHotelRequest,
) -> AppResult<ApiResponse<Hotel>> {
    validate_hotel(&payload)?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        base_price: Set(payload.base_price),
        number_of_rooms: Set(payload.number_of_rooms),
        location_name: Set(payload.location.name),
        location_address: Set(payload.location.address),
        latitude: Set(payload.location.latitude),
        longitude: Set(payload.location.longitude),
        ratings: Set(payload.ratings.unwrap_or(0.0)),
        property_type: Set(payload.property_type),
        images: Set(PathList(payload.images)),
        email: Set(payload.email),
        description: Set(payload.description),
        phone_number: Set(payload.phone_number),
        // filled by the inventory linker as room types are created
        room_types: Set(IdList::default()),
        created_at: Set(Utc::now().into()),
    };
    let hotel = active.insert(&state.orm).await?;
    tracing::info!(hotel_id = %hotel.id, name = %hotel.name, "hotel created");

    Ok(ApiResponse::success(
        "Hotel created",
        hotel_from_entity(hotel),
        Some(Meta::empty()),
    ))
}

/// Merge a patch over the stored hotel. Location fields are merged one by
/// one; images are replaced only when new ones were uploaded.
pub fn merge_patch(existing: &HotelModel, patch: UpdateHotelRequest) -> CreateHotelRequest {
    let location = patch.location.unwrap_or_default();
    CreateHotelRequest {
        name: patch.name.unwrap_or_else(|| existing.name.clone()),
        base_price: patch.base_price.unwrap_or(existing.base_price),
        number_of_rooms: patch.number_of_rooms.unwrap_or(existing.number_of_rooms),
        location: Location {
            name: location
                .name
                .unwrap_or_else(|| existing.location_name.clone()),
            address: location
                .address
                .unwrap_or_else(|| existing.location_address.clone()),
            latitude: location.latitude.unwrap_or(existing.latitude),
            longitude: location.longitude.unwrap_or(existing.longitude),
        },
        ratings: Some(patch.ratings.unwrap_or(existing.ratings)),
        property_type: patch
            .property_type
            .unwrap_or_else(|| existing.property_type.clone()),
        images: patch
            .images
            .filter(|images| !images.is_empty())
            .unwrap_or_else(|| existing.images.0.clone()),
        email: patch.email.unwrap_or_else(|| existing.email.clone()),
        description: patch.description.or_else(|| existing.description.clone()),
        phone_number: patch
            .phone_number
            .unwrap_or_else(|| existing.phone_number.clone()),
    }
}

pub async fn update_hotel(
    state: &AppState,
    id: Uuid,
    payload: UpdateHotelRequest,
) -> AppResult<ApiResponse<Hotel>> {
    let existing = Hotels::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Hotel"))?;

    let merged = merge_patch(&existing, payload);
    validate_hotel(&merged)?;

    let replaced: Vec<String> = existing
        .images
        .0
        .iter()
        .filter(|image| !merged.images.contains(*image))
        .cloned()
        .collect();

    let mut active: ActiveModel = existing.into();
    active.name = Set(merged.name);
    active.base_price = Set(merged.base_price);
    active.number_of_rooms = Set(merged.number_of_rooms);
    active.location_name = Set(merged.location.name);
    active.location_address = Set(merged.location.address);
    active.latitude = Set(merged.location.latitude);
    active.longitude = Set(merged.location.longitude);
    active.ratings = Set(merged.ratings.unwrap_or(0.0));
    active.property_type = Set(merged.property_type);
    active.images = Set(PathList(merged.images));
    active.email = Set(merged.email);
    active.description = Set(merged.description);
    active.phone_number = Set(merged.phone_number);
    let hotel = active.update(&state.orm).await?;

    uploads::discard(&state.config.upload_dir, &replaced).await;

    Ok(ApiResponse::success(
        "Updated",
        hotel_from_entity(hotel),
        Some(Meta::empty()),
    ))
}

/// Delete a hotel together with its room types. Bookings are kept; they
/// carry the hotel name snapshot.
pub async fn delete_hotel(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Hotel>> {
    let txn = state.orm.begin().await?;

    let hotel = Hotels::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Hotel"))?;

    let removed = RoomTypes::delete_many()
        .filter(RoomTypeCol::HotelId.eq(id))
        .exec(&txn)
        .await?;
    Hotels::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(hotel_id = %id, room_types_removed = removed.rows_affected, "hotel deleted");
    audit::record(
        &state.orm,
        None,
        "hotel_delete",
        "hotels",
        serde_json::json!({ "hotel_id": id, "room_types_removed": removed.rows_affected }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        hotel_from_entity(hotel),
        Some(Meta::empty()),
    ))
}

pub fn hotel_from_entity(model: HotelModel) -> Hotel {
    Hotel {
        id: model.id,
        name: model.name,
        base_price: model.base_price,
        number_of_rooms: model.number_of_rooms,
        location: Location {
            name: model.location_name,
            address: model.location_address,
            latitude: model.latitude,
            longitude: model.longitude,
        },
        ratings: model.ratings,
        property_type: model.property_type,
        images: model.images.0,
        email: model.email,
        description: model.description,
        phone_number: model.phone_number,
        room_types: model.room_types.0,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
