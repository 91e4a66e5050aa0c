use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

use crate::entity::{AuditLogs, Bookings, Hotels, RoomTypes, Users, bookings, users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Hotels first: room_types carries a foreign key to it.
        manager
            .create_table(schema.create_table_from_entity(Hotels).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(RoomTypes).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Users).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Bookings).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(AuditLogs).if_not_exists().to_owned())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email_address")
                    .table(Users)
                    .col(users::Column::EmailAddress)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_id")
                    .table(Bookings)
                    .col(bookings::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoomTypes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hotels).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
