mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use common::{Outcome, create_hotel, create_user, hotel_request, setup};
use hotel_booking_api::{
    dto::{bookings::CreateBookingRequest, hotels::UpdateHotelRequest},
    entity::Bookings,
    error::AppError,
    payment::PaymentStatus,
    routes::{create_api_router, params::Pagination},
    services::{booking_service, hotel_service},
    state::AppState,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use tower::ServiceExt;
use uuid::Uuid;

fn booking_request(email: &str, hotel_id: impl Into<String>, total_price: f64) -> CreateBookingRequest {
    let check_in = Utc::now() + Duration::days(7);
    CreateBookingRequest {
        payment_method_id: "pm_card_visa".into(),
        user_email: email.into(),
        hotel_id: hotel_id.into(),
        room_type: "Deluxe".into(),
        number_of_guests: 2,
        total_price,
        check_in_date: check_in,
        check_out_date: check_in + Duration::days(3),
    }
}

async fn booking_count(state: &AppState) -> anyhow::Result<u64> {
    Ok(Bookings::find().count(&state.orm).await?)
}

fn api(state: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(state)
}

#[tokio::test]
async fn captured_payment_creates_booking_with_hotel_snapshot() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    let user = create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;

    let response = booking_service::create_booking(
        &app.state,
        booking_request("ada@guest.com", hotel.id.to_string(), 150.0),
    )
    .await?;
    let booking = response.data.expect("booking data");

    assert_eq!(booking.user_id, user.id);
    assert_eq!(booking.hotel_id, hotel.id);
    assert_eq!(booking.hotel_name, "Harbour View");
    assert_eq!(booking.total_price, 150.0);
    assert_eq!(booking.payment_intent_id, "pi_test_1");

    let charges = app.gateway.charges();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].amount_minor, 15000);
    assert_eq!(charges[0].currency, "usd");
    assert_eq!(charges[0].payment_method_id, "pm_card_visa");
    assert_eq!(booking_count(&app.state).await?, 1);
    Ok(())
}

#[tokio::test]
async fn fractional_totals_are_rounded_to_cents() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;

    booking_service::create_booking(
        &app.state,
        booking_request("ada@guest.com", hotel.id.to_string(), 19.125),
    )
    .await?;

    assert_eq!(app.gateway.charges()[0].amount_minor, 1913);
    Ok(())
}

#[tokio::test]
async fn declined_payment_never_writes_a_booking() -> anyhow::Result<()> {
    let app = setup(Outcome::Decline("Your card was declined.")).await?;
    create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;

    for _ in 0..2 {
        let result = booking_service::create_booking(
            &app.state,
            booking_request("ada@guest.com", hotel.id.to_string(), 150.0),
        )
        .await;
        assert!(matches!(result, Err(AppError::PaymentFailed(_))));
    }

    assert_eq!(app.gateway.calls(), 2);
    assert_eq!(booking_count(&app.state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn unfinished_payment_is_treated_as_failed() -> anyhow::Result<()> {
    let app = setup(Outcome::Status(PaymentStatus::RequiresAction)).await?;
    create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;

    let result = booking_service::create_booking(
        &app.state,
        booking_request("ada@guest.com", hotel.id.to_string(), 150.0),
    )
    .await;

    assert!(matches!(result, Err(AppError::PaymentFailed(_))));
    assert_eq!(booking_count(&app.state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn lookups_fail_before_any_charge() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;

    let unknown_user = booking_service::create_booking(
        &app.state,
        booking_request("nobody@guest.com", hotel.id.to_string(), 150.0),
    )
    .await;
    assert!(matches!(unknown_user, Err(AppError::NotFound("User"))));

    let malformed_id = booking_service::create_booking(
        &app.state,
        booking_request("ada@guest.com", "not-a-hotel-id", 150.0),
    )
    .await;
    assert!(matches!(malformed_id, Err(AppError::InvalidInput(_))));

    let missing_hotel = booking_service::create_booking(
        &app.state,
        booking_request("ada@guest.com", Uuid::new_v4().to_string(), 150.0),
    )
    .await;
    assert!(matches!(missing_hotel, Err(AppError::NotFound("Hotel"))));

    // unknown user wins over a malformed hotel id
    let both = booking_service::create_booking(
        &app.state,
        booking_request("nobody@guest.com", "not-a-hotel-id", 150.0),
    )
    .await;
    assert!(matches!(both, Err(AppError::NotFound("User"))));

    assert_eq!(app.gateway.calls(), 0);
    assert_eq!(booking_count(&app.state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn invalid_body_is_rejected_before_lookups() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;

    let mut request = booking_request("nobody@guest.com", "not-a-hotel-id", 150.0);
    request.check_out_date = request.check_in_date - Duration::days(1);
    let result = booking_service::create_booking(&app.state, request).await;

    assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    assert_eq!(app.gateway.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn hotel_name_is_a_snapshot() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;

    let booking = booking_service::create_booking(
        &app.state,
        booking_request("ada@guest.com", hotel.id.to_string(), 150.0),
    )
    .await?
    .data
    .expect("booking data");

    hotel_service::update_hotel(
        &app.state,
        hotel.id,
        UpdateHotelRequest {
            name: Some("Riverside Lodge".into()),
            ..Default::default()
        },
    )
    .await?;

    let details = booking_service::get_booking(&app.state, booking.id)
        .await?
        .data
        .expect("booking details");
    assert_eq!(details.booking.hotel_name, "Harbour View");
    assert_eq!(details.hotel.expect("hotel").name, "Riverside Lodge");
    Ok(())
}

#[tokio::test]
async fn listing_expands_users_and_hotels() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    let user = create_user(&app.state, "ada@guest.com").await?;
    let kept = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;
    let removed = create_hotel(&app.state, hotel_request("Old Mill", 90.0, "Inn")).await?;

    for hotel_id in [kept.id, removed.id] {
        booking_service::create_booking(
            &app.state,
            booking_request("ada@guest.com", hotel_id.to_string(), 120.0),
        )
        .await?;
    }
    hotel_service::delete_hotel(&app.state, removed.id).await?;

    let response = booking_service::list_bookings(&app.state, Pagination::default()).await?;
    let meta = response.meta.expect("meta");
    assert_eq!(meta.total, Some(2));

    let items = response.data.expect("bookings").items;
    assert_eq!(items.len(), 2);
    for details in &items {
        assert_eq!(details.user.as_ref().map(|u| u.id), Some(user.id));
        if details.booking.hotel_id == kept.id {
            assert_eq!(details.hotel.as_ref().map(|h| h.id), Some(kept.id));
        } else {
            assert!(details.hotel.is_none());
            assert_eq!(details.booking.hotel_name, "Old Mill");
        }
    }
    Ok(())
}

#[tokio::test]
async fn http_unknown_email_is_not_found() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;
    let body = serde_json::json!({
        "payment_method_id": "pm_card_visa",
        "user_email": "nobody@guest.com",
        "hotel_id": hotel.id,
        "room_type": "Deluxe",
        "number_of_guests": 2,
        "total_price": 150.0,
        "check_in_date": "2030-01-10T14:00:00Z",
        "check_out_date": "2030-01-12T11:00:00Z",
    });

    let response = api(app.state.clone())
        .oneshot(
            Request::post("/api/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(json["message"], "User not found");
    assert_eq!(app.gateway.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn http_successful_booking_is_created() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    create_user(&app.state, "ada@guest.com").await?;
    let hotel = create_hotel(&app.state, hotel_request("Harbour View", 150.0, "Hotel")).await?;
    let body = serde_json::json!({
        "payment_instrument_id": "pm_card_visa",
        "user_email": "ada@guest.com",
        "hotel_id": hotel.id,
        "room_type": "Deluxe",
        "number_of_guests": 2,
        "total_price": 150.0,
        "check_in_date": "2030-01-10T14:00:00Z",
        "check_out_date": "2030-01-12T11:00:00Z",
    });

    let response = api(app.state.clone())
        .oneshot(
            Request::post("/api/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(json["data"]["hotel_name"], "Harbour View");
    assert_eq!(json["data"]["total_price"], 150.0);
    Ok(())
}

#[tokio::test]
async fn http_booking_changes_need_an_admin_token() -> anyhow::Result<()> {
    let app = setup(Outcome::Succeed).await?;
    let id = Uuid::new_v4();

    let response = api(app.state.clone())
        .oneshot(
            Request::put(format!("/api/bookings/{id}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = api(app.state.clone())
        .oneshot(
            Request::delete(format!("/api/bookings/{id}"))
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
