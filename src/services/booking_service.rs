//! Booking engine.
//!
//! A booking is written only after the gateway reports a captured charge.
//! Lookups run in a fixed order (user, hotel id format, hotel) so a request
//! that references a missing account or listing never reaches the gateway.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::bookings::{BookingDetails, BookingList, CreateBookingRequest, UpdateBookingRequest},
    entity::{
        bookings::{ActiveModel, Column, Entity as Bookings, Model as BookingModel},
        hotels::{Column as HotelCol, Entity as Hotels},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    models::{Booking, Hotel, User},
    payment::{CURRENCY, ChargeRequest, GatewayError, PaymentStatus, to_minor_units},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, paginate},
    services::{hotel_service::hotel_from_entity, user_service::user_from_entity},
    state::AppState,
    validation::{FieldErrors, validate_required},
};

fn check_stay(
    errors: &mut FieldErrors,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    total_price: f64,
    number_of_guests: i32,
) {
    if check_out <= check_in {
        errors.push("check_out_date", "Check-out date must be after check-in date");
    }
    if !total_price.is_finite() || total_price <= 0.0 {
        errors.push("total_price", "Total price must be greater than 0");
    }
    if number_of_guests < 1 {
        errors.push("number_of_guests", "Number of guests must be at least 1");
    }
}

fn validate_request(payload: &CreateBookingRequest) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    errors.check(
        "payment_method_id",
        validate_required(&payload.payment_method_id, "Payment method"),
    );
    errors.check("user_email", validate_required(&payload.user_email, "User email"));
    errors.check("room_type", validate_required(&payload.room_type, "Room type"));
    check_stay(
        &mut errors,
        payload.check_in_date,
        payload.check_out_date,
        payload.total_price,
        payload.number_of_guests,
    );
    errors.into_result()
}

pub async fn create_booking(
    state: &AppState,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    validate_request(&payload)?;

    let user_email = payload.user_email.trim();
    let Some(user) = Users::find()
        .filter(UserCol::EmailAddress.eq(user_email))
        .one(&state.orm)
        .await?
    else {
        tracing::warn!(email = %user_email, "booking rejected: user not found");
        return Err(AppError::NotFound("User"));
    };

    let hotel_id = Uuid::parse_str(payload.hotel_id.trim())
        .map_err(|_| AppError::InvalidInput("Invalid hotel ID format".into()))?;

    let Some(hotel) = Hotels::find_by_id(hotel_id).one(&state.orm).await? else {
        tracing::warn!(%hotel_id, "booking rejected: hotel not found");
        return Err(AppError::NotFound("Hotel"));
    };

    let charge = ChargeRequest {
        amount_minor: to_minor_units(payload.total_price),
        currency: CURRENCY.to_string(),
        payment_method_id: payload.payment_method_id.clone(),
    };
    let intent = match state.gateway.authorize_and_capture(&charge).await {
        Ok(intent) => intent,
        Err(GatewayError::Declined(reason)) => {
            tracing::info!(user_id = %user.id, %hotel_id, reason = %reason, "payment declined");
            return Err(AppError::PaymentFailed(reason));
        }
        Err(err) => return Err(err.into()),
    };
    if intent.status != PaymentStatus::Succeeded {
        tracing::info!(
            user_id = %user.id,
            %hotel_id,
            payment_intent_id = %intent.id,
            status = ?intent.status,
            "payment did not succeed"
        );
        return Err(AppError::PaymentFailed(format!(
            "payment {} ended with status {:?}",
            intent.id, intent.status
        )));
    }

    // The charge is captured from here on. A failed write cannot be undone
    // by the store, so it is logged with the payment reference.
    let inserted = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        hotel_id: Set(hotel.id),
        hotel_name: Set(hotel.name.clone()),
        check_in_date: Set(payload.check_in_date.into()),
        check_out_date: Set(payload.check_out_date.into()),
        total_price: Set(payload.total_price),
        room_type: Set(payload.room_type.trim().to_string()),
        number_of_guests: Set(payload.number_of_guests),
        payment_intent_id: Set(intent.id.clone()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await;

    let booking = match inserted {
        Ok(booking) => booking,
        Err(err) => {
            tracing::error!(
                payment_intent_id = %intent.id,
                user_id = %user.id,
                %hotel_id,
                error = %err,
                "payment captured but booking was not saved"
            );
            return Err(err.into());
        }
    };

    tracing::info!(
        booking_id = %booking.id,
        user_id = %user.id,
        %hotel_id,
        payment_intent_id = %booking.payment_intent_id,
        amount_minor = charge.amount_minor,
        "booking created"
    );
    audit::record(
        &state.orm,
        Some(user.id),
        "booking_create",
        "bookings",
        serde_json::json!({
            "booking_id": booking.id,
            "hotel_id": hotel.id,
            "payment_intent_id": booking.payment_intent_id,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Booking created",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

pub async fn list_bookings(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<BookingList>> {
    let window = pagination.normalize();
    let finder = Bookings::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await?;

    let bookings = paginate(finder, window.as_ref()).all(&state.orm).await?;

    let items = expand(state, bookings).await?;

    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(Meta::page(window.as_ref(), total)),
    ))
}

pub async fn get_booking(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BookingDetails>> {
    let booking = Bookings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;

    let details = expand(state, vec![booking])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Booking"))?;

    Ok(ApiResponse::success("Booking", details, Some(Meta::empty())))
}

/// Administrative patch. No payment or inventory side effects.
pub async fn update_booking(
    state: &AppState,
    id: Uuid,
    payload: UpdateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let existing = Bookings::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Booking"))?;

    let check_in = payload
        .check_in_date
        .unwrap_or_else(|| existing.check_in_date.with_timezone(&Utc));
    let check_out = payload
        .check_out_date
        .unwrap_or_else(|| existing.check_out_date.with_timezone(&Utc));
    let total_price = payload.total_price.unwrap_or(existing.total_price);
    let number_of_guests = payload.number_of_guests.unwrap_or(existing.number_of_guests);

    let mut errors = FieldErrors::new();
    check_stay(&mut errors, check_in, check_out, total_price, number_of_guests);
    if let Some(room_type) = payload.room_type.as_deref() {
        errors.check("room_type", validate_required(room_type, "Room type"));
    }
    errors.into_result()?;

    let mut active: ActiveModel = existing.into();
    active.check_in_date = Set(check_in.into());
    active.check_out_date = Set(check_out.into());
    active.total_price = Set(total_price);
    active.number_of_guests = Set(number_of_guests);
    if let Some(user_id) = payload.user_id {
        active.user_id = Set(user_id);
    }
    if let Some(hotel_id) = payload.hotel_id {
        active.hotel_id = Set(hotel_id);
    }
    if let Some(hotel_name) = payload.hotel_name {
        active.hotel_name = Set(hotel_name);
    }
    if let Some(room_type) = payload.room_type {
        active.room_type = Set(room_type);
    }
    if let Some(payment_intent_id) = payload.payment_intent_id {
        active.payment_intent_id = Set(payment_intent_id);
    }

    let booking = active.update(&state.orm).await?;
    tracing::info!(booking_id = %booking.id, "booking updated");

    Ok(ApiResponse::success(
        "Updated",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

pub async fn delete_booking(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Bookings::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Booking"));
    }

    tracing::info!(booking_id = %id, "booking deleted");
    audit::record(
        &state.orm,
        None,
        "booking_delete",
        "bookings",
        serde_json::json!({ "booking_id": id }),
    )
    .await;

    Ok(ApiResponse::acknowledged(
        "Booking deleted successfully",
        serde_json::json!({ "id": id }),
    ))
}

/// Attach users and hotels with one query per table.
async fn expand(state: &AppState, bookings: Vec<BookingModel>) -> AppResult<Vec<BookingDetails>> {
    let mut user_ids: Vec<Uuid> = bookings.iter().map(|b| b.user_id).collect();
    user_ids.sort();
    user_ids.dedup();
    let mut hotel_ids: Vec<Uuid> = bookings.iter().map(|b| b.hotel_id).collect();
    hotel_ids.sort();
    hotel_ids.dedup();

    let users: HashMap<Uuid, User> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(user_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|u| (u.id, user_from_entity(u)))
            .collect()
    };
    let hotels: HashMap<Uuid, Hotel> = if hotel_ids.is_empty() {
        HashMap::new()
    } else {
        Hotels::find()
            .filter(HotelCol::Id.is_in(hotel_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|h| (h.id, hotel_from_entity(h)))
            .collect()
    };

    Ok(bookings
        .into_iter()
        .map(|booking| BookingDetails {
            user: users.get(&booking.user_id).cloned(),
            hotel: hotels.get(&booking.hotel_id).cloned(),
            booking: booking_from_entity(booking),
        })
        .collect())
}

pub fn booking_from_entity(model: BookingModel) -> Booking {
    Booking {
        id: model.id,
        user_id: model.user_id,
        hotel_id: model.hotel_id,
        hotel_name: model.hotel_name,
        check_in_date: model.check_in_date.with_timezone(&Utc),
        check_out_date: model.check_out_date.with_timezone(&Utc),
        total_price: model.total_price,
        room_type: model.room_type,
        number_of_guests: model.number_of_guests,
        payment_intent_id: model.payment_intent_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
