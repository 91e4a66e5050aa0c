use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        bookings::{BookingDetails, BookingList, CreateBookingRequest, UpdateBookingRequest},
        hotels::{CreateHotelRequest, HotelList, HotelUploadForm, LocationPatch, UpdateHotelRequest},
        payments::PaymentIntentResponse,
        room_types::{
            CreateRoomTypeRequest, RoomTypeList, RoomTypeUploadForm, UpdateRoomTypeRequest,
        },
        users::{UserList, UserRequest},
    },
    error::FieldError,
    models::{Booking, Hotel, Location, RoomType, User},
    response::{ApiResponse, Meta},
    routes::{admin, bookings, health, hotels, params, payments, room_types, users},
    services::inventory_linker::ReconcileReport,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        hotels::search_hotels,
        hotels::get_hotel,
        hotels::create_hotel,
        hotels::update_hotel,
        hotels::delete_hotel,
        room_types::create_room_type,
        room_types::list_room_types,
        room_types::update_room_type,
        room_types::delete_room_type,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::update_booking,
        bookings::delete_booking,
        payments::create_payment_intent,
        admin::reconcile_inventory
    ),
    components(
        schemas(
            User,
            Location,
            Hotel,
            RoomType,
            Booking,
            FieldError,
            CreateHotelRequest,
            UpdateHotelRequest,
            LocationPatch,
            HotelUploadForm,
            HotelList,
            CreateRoomTypeRequest,
            UpdateRoomTypeRequest,
            RoomTypeUploadForm,
            RoomTypeList,
            UserRequest,
            UserList,
            CreateBookingRequest,
            UpdateBookingRequest,
            BookingDetails,
            BookingList,
            PaymentIntentResponse,
            ReconcileReport,
            params::Pagination,
            params::HotelSearchQuery,
            params::HotelSortBy,
            health::HealthData,
            Meta,
            ApiResponse<Hotel>,
            ApiResponse<HotelList>,
            ApiResponse<RoomType>,
            ApiResponse<RoomTypeList>,
            ApiResponse<User>,
            ApiResponse<UserList>,
            ApiResponse<Booking>,
            ApiResponse<BookingDetails>,
            ApiResponse<BookingList>,
            ApiResponse<PaymentIntentResponse>,
            ApiResponse<ReconcileReport>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Hotels", description = "Hotel listing and search endpoints"),
        (name = "Room types", description = "Room type endpoints; each write keeps the hotel's room type list in step"),
        (name = "Users", description = "User endpoints"),
        (name = "Bookings", description = "Booking endpoints; creation charges the card first"),
        (name = "Payments", description = "Payment intent endpoints"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_router_path_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/hotels",
            "/api/hotels/{id}",
            "/api/room-types",
            "/api/room-types/hotel/{hotel_id}",
            "/api/room-types/{id}",
            "/api/users",
            "/api/users/{id}",
            "/api/bookings",
            "/api/bookings/{id}",
            "/api/payments/intent",
            "/api/admin/inventory/reconcile",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
