use sea_orm_migration::{prelude::*, schema::*};

use super::m20240710_000001_create_users::User;
use super::m20240711_000002_create_parking_spots::ParkingSpot;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::UserId).not_null())
                    .col(uuid(Booking::ParkingSpotId).not_null())
                    .col(timestamp_with_time_zone(Booking::StartDate).not_null())
                    .col(timestamp_with_time_zone(Booking::EndDate).not_null())
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Booking::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Booking::StartDate).lt(Expr::col(Booking::EndDate)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_parking_spot")
                            .from(Booking::Table, Booking::ParkingSpotId)
                            .to(ParkingSpot::Table, ParkingSpot::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the per-spot overlap lookup.
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_spot_range")
                    .table(Booking::Table)
                    .col(Booking::ParkingSpotId)
                    .col(Booking::StartDate)
                    .col(Booking::EndDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    #[sea_orm(iden = "bookings")]
    Table,
    Id,
    UserId,
    ParkingSpotId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}
