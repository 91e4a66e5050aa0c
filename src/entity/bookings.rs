use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    /// Copied from the hotel when the booking is made; never refreshed.
    pub hotel_name: String,
    pub check_in_date: DateTimeWithTimeZone,
    pub check_out_date: DateTimeWithTimeZone,
    pub total_price: f64,
    pub room_type: String,
    pub number_of_guests: i32,
    pub payment_intent_id: String,
    pub created_at: DateTimeWithTimeZone,
}

// No foreign keys: bookings are kept after the user or hotel is removed.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
