use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub base_price: f64,
    pub number_of_rooms: i32,
    pub location: Location,
    pub ratings: f64,
    pub property_type: String,
    pub images: Vec<String>,
    pub email: String,
    pub description: Option<String>,
    pub phone_number: String,
    pub room_types: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoomType {
    pub id: Uuid,
    pub hotel_id: Uuid,
    #[serde(rename = "type")]
    pub room_type: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub base_price: f64,
    pub multiplier: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    /// Hotel name at the time of booking.
    pub hotel_name: String,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: f64,
    pub room_type: String,
    pub number_of_guests: i32,
    pub payment_intent_id: String,
    pub created_at: DateTime<Utc>,
}
