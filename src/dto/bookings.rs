use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Booking, Hotel, User};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    #[serde(alias = "payment_instrument_id")]
    pub payment_method_id: String,
    pub user_email: String,
    /// Kept as text so a malformed id is reported as such rather than as a
    /// body parse failure.
    pub hotel_id: String,
    pub room_type: String,
    pub number_of_guests: i32,
    pub total_price: f64,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    pub user_id: Option<Uuid>,
    pub hotel_id: Option<Uuid>,
    pub hotel_name: Option<String>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub total_price: Option<f64>,
    pub room_type: Option<String>,
    pub number_of_guests: Option<i32>,
    pub payment_intent_id: Option<String>,
}

/// A booking with its user and hotel expanded. Either side is `null` when
/// the referenced record no longer exists.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDetails {
    pub booking: Booking,
    pub user: Option<User>,
    pub hotel: Option<Hotel>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct BookingList {
    #[schema(value_type = Vec<BookingDetails>)]
    pub items: Vec<BookingDetails>,
}
