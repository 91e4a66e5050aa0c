use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::RoomType;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRoomTypeRequest {
    pub hotel_id: Uuid,
    #[serde(rename = "type")]
    pub room_type: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub base_price: f64,
    pub multiplier: Option<f64>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRoomTypeRequest {
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub base_price: Option<f64>,
    pub multiplier: Option<f64>,
    pub available: Option<bool>,
}

/// Multipart body accepted by room type create and patch. Documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct RoomTypeUploadForm {
    pub hotel_id: Uuid,
    pub r#type: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub multiplier: Option<f64>,
    pub available: Option<bool>,
    /// Up to 5 image files.
    pub images: Vec<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct RoomTypeList {
    #[schema(value_type = Vec<RoomType>)]
    pub items: Vec<RoomType>,
}
