pub mod bookings;
pub mod hotels;
pub mod payments;
pub mod room_types;
pub mod users;
