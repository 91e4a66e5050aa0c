use chrono::Utc;
use hotel_booking_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        IdList, PathList, hotels, room_types, users,
        Hotels, Users,
    },
    services::inventory_linker,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let user_id = ensure_user(&orm, "guest@example.com", "Ada", "Guest").await?;
    let hotel_id = seed_hotel(&orm).await?;

    println!("Seed completed. User ID: {user_id}, Hotel ID: {hotel_id}");
    Ok(())
}

async fn ensure_user<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::EmailAddress.eq(email))
        .one(conn)
        .await?
    {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email_address: Set(email.to_string()),
        image_url: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    println!("Ensured user {email}");
    Ok(user.id)
}

async fn seed_hotel(orm: &DatabaseConnection) -> anyhow::Result<Uuid> {
    let name = "Harbour View";
    if let Some(existing) = Hotels::find()
        .filter(hotels::Column::Name.eq(name))
        .one(orm)
        .await?
    {
        println!("Hotel {name} already present");
        return Ok(existing.id);
    }

    let txn = orm.begin().await?;

    let hotel = hotels::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        base_price: Set(150.0),
        number_of_rooms: Set(24),
        location_name: Set("Lisbon".to_string()),
        location_address: Set("Rua Augusta 1".to_string()),
        latitude: Set(38.7101),
        longitude: Set(-9.1366),
        ratings: Set(4.5),
        property_type: Set("Hotel".to_string()),
        images: Set(PathList::default()),
        email: Set("stay@harbourview.example".to_string()),
        description: Set(Some("Rooms over the river".to_string())),
        phone_number: Set("+351210000000".to_string()),
        room_types: Set(IdList::default()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let mut linked = hotel;
    for (kind, multiplier) in [("Standard", 1.0), ("Deluxe", 1.4), ("Suite", 2.0)] {
        let room_type = room_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            hotel_id: Set(linked.id),
            room_type: Set(kind.to_string()),
            description: Set(None),
            images: Set(PathList::default()),
            base_price: Set(linked.base_price),
            multiplier: Set(multiplier),
            available: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;
        linked = inventory_linker::link_room_type(&txn, linked, room_type.id).await?;
    }

    txn.commit().await?;

    println!("Seeded hotel {name} with {} room types", linked.room_types.0.len());
    Ok(linked.id)
}
