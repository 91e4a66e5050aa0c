use sea_orm::entity::prelude::*;

use super::{IdList, PathList};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hotels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub base_price: f64,
    pub number_of_rooms: i32,
    pub location_name: String,
    pub location_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ratings: f64,
    pub property_type: String,
    pub images: PathList,
    pub email: String,
    pub description: Option<String>,
    pub phone_number: String,
    /// Ids of the room types owned by this hotel, in link order. Maintained
    /// by the inventory linker only.
    pub room_types: IdList,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::room_types::Entity")]
    RoomTypes,
}

impl Related<super::room_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
