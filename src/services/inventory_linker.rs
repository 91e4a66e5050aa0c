//! Keeps `hotels.room_types` in step with the `room_types` table.
//!
//! Link and unlink take the caller's connection so they run inside the same
//! transaction as the room type insert or delete. [`reconcile`] rebuilds
//! every list from the room type rows for stores that drifted anyway.

use std::collections::HashMap;

use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    IdList,
    hotels::{ActiveModel as HotelActive, Model as HotelModel},
    room_types::Column as RoomTypeCol,
    Hotels, RoomTypes,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReconcileReport {
    pub hotels_checked: u64,
    pub hotels_repaired: u64,
    /// Room types whose hotel no longer exists.
    pub orphaned_room_types: Vec<Uuid>,
}

/// Load a hotel row, locked for update on backends that support it.
pub async fn find_hotel_for_update<C: ConnectionTrait>(
    conn: &C,
    hotel_id: Uuid,
) -> Result<Option<HotelModel>, DbErr> {
    Hotels::find_by_id(hotel_id)
        .lock(LockType::Update)
        .one(conn)
        .await
}

/// Append `room_type_id` to the hotel's list unless it is already there.
pub async fn link_room_type<C: ConnectionTrait>(
    conn: &C,
    hotel: HotelModel,
    room_type_id: Uuid,
) -> Result<HotelModel, DbErr> {
    let Some(ids) = with_room_type(&hotel.room_types.0, room_type_id) else {
        return Ok(hotel);
    };
    let hotel_id = hotel.id;
    let mut active: HotelActive = hotel.into();
    active.room_types = Set(IdList(ids));
    let hotel = active.update(conn).await?;
    tracing::debug!(%hotel_id, %room_type_id, "room type linked");
    Ok(hotel)
}

/// Remove every occurrence of `room_type_id` from the hotel's list. Returns
/// `None` when the hotel is gone.
pub async fn unlink_room_type<C: ConnectionTrait>(
    conn: &C,
    hotel_id: Uuid,
    room_type_id: Uuid,
) -> Result<Option<HotelModel>, DbErr> {
    let Some(hotel) = find_hotel_for_update(conn, hotel_id).await? else {
        tracing::warn!(%hotel_id, %room_type_id, "unlink skipped: hotel missing");
        return Ok(None);
    };
    let Some(ids) = without_room_type(&hotel.room_types.0, room_type_id) else {
        return Ok(Some(hotel));
    };
    let mut active: HotelActive = hotel.into();
    active.room_types = Set(IdList(ids));
    let hotel = active.update(conn).await?;
    tracing::debug!(%hotel_id, %room_type_id, "room type unlinked");
    Ok(Some(hotel))
}

/// Rewrite every hotel's list to exactly the room types that reference it.
pub async fn reconcile(conn: &DatabaseConnection) -> Result<ReconcileReport, DbErr> {
    let txn = conn.begin().await?;

    let hotels = Hotels::find().lock(LockType::Update).all(&txn).await?;
    let room_types = RoomTypes::find()
        .order_by_asc(RoomTypeCol::CreatedAt)
        .order_by_asc(RoomTypeCol::Id)
        .all(&txn)
        .await?;

    let mut referencing: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for room_type in &room_types {
        referencing
            .entry(room_type.hotel_id)
            .or_default()
            .push(room_type.id);
    }

    let mut report = ReconcileReport::default();
    for hotel in hotels {
        report.hotels_checked += 1;
        let wanted = referencing.remove(&hotel.id).unwrap_or_default();
        if let Some(ids) = plan_links(&hotel.room_types.0, &wanted) {
            tracing::info!(
                hotel_id = %hotel.id,
                before = hotel.room_types.0.len(),
                after = ids.len(),
                "repairing room type links"
            );
            let mut active: HotelActive = hotel.into();
            active.room_types = Set(IdList(ids));
            active.update(&txn).await?;
            report.hotels_repaired += 1;
        }
    }

    // Whatever is left references hotels that no longer exist.
    report.orphaned_room_types = referencing.into_values().flatten().collect();
    report.orphaned_room_types.sort();

    txn.commit().await?;
    Ok(report)
}

/// The list with `id` appended, or `None` when it is already present.
pub fn with_room_type(current: &[Uuid], id: Uuid) -> Option<Vec<Uuid>> {
    if current.contains(&id) {
        return None;
    }
    let mut ids = current.to_vec();
    ids.push(id);
    Some(ids)
}

/// The list without any `id`, or `None` when it was absent.
pub fn without_room_type(current: &[Uuid], id: Uuid) -> Option<Vec<Uuid>> {
    if !current.contains(&id) {
        return None;
    }
    Some(current.iter().copied().filter(|x| *x != id).collect())
}

/// Target list for a hotel: current ids that still reference it keep their
/// order (duplicates dropped), missing ones are appended in `wanted` order.
/// `None` when `current` is already correct.
pub fn plan_links(current: &[Uuid], wanted: &[Uuid]) -> Option<Vec<Uuid>> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(wanted.len());
    for id in current {
        if wanted.contains(id) && !ids.contains(id) {
            ids.push(*id);
        }
    }
    for id in wanted {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    (ids != current).then_some(ids)
}
