pub mod audit_logs;
pub mod bookings;
pub mod hotels;
pub mod room_types;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use bookings::Entity as Bookings;
pub use hotels::Entity as Hotels;
pub use room_types::Entity as RoomTypes;
pub use users::Entity as Users;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered list of record ids stored as a JSON array column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct IdList(pub Vec<Uuid>);

/// Ordered list of stored file paths kept as a JSON array column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PathList(pub Vec<String>);
