use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Hotel, Location};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateHotelRequest {
    pub name: String,
    pub base_price: f64,
    pub number_of_rooms: i32,
    pub location: Location,
    pub ratings: Option<f64>,
    pub property_type: String,
    pub images: Vec<String>,
    pub email: String,
    pub description: Option<String>,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateHotelRequest {
    pub name: Option<String>,
    pub base_price: Option<f64>,
    pub number_of_rooms: Option<i32>,
    pub location: Option<LocationPatch>,
    pub ratings: Option<f64>,
    pub property_type: Option<String>,
    /// Replaces the stored images when present and non-empty.
    pub images: Option<Vec<String>>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
}

/// Multipart body accepted by hotel create and patch. Documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct HotelUploadForm {
    pub name: String,
    pub base_price: f64,
    pub number_of_rooms: i32,
    /// JSON object: `{"name", "address", "latitude", "longitude"}`.
    pub location: String,
    pub ratings: Option<f64>,
    pub property_type: String,
    pub email: String,
    pub description: Option<String>,
    pub phone_number: String,
    /// Up to 10 image files.
    pub images: Vec<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct HotelList {
    #[schema(value_type = Vec<Hotel>)]
    pub items: Vec<Hotel>,
}
