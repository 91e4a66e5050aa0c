pub mod booking_service;
pub mod hotel_service;
pub mod inventory_linker;
pub mod payment_service;
pub mod room_type_service;
pub mod user_service;
