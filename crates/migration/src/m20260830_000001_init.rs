//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for openrent:
//!
//! - `users`: accounts for tenants, landlords and admins
//! - `rental_houses`: listings advertised by landlords
//! - `rental_requests`: tenant applications against listings
//! - `orders`: payment transactions for approved requests
//!
//! Cross-table references carry no foreign keys. Deletes are hard and may
//! leave dangling references; read paths resolve those as not found.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Password,
    Role,
    Phone,
    Address,
    CreatedAt,
}

#[derive(Iden)]
enum RentalHouses {
    Table,
    Id,
    LandlordId,
    Location,
    Description,
    RentMinor,
    Bedrooms,
    ImageUrls,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum RentalRequests {
    Table,
    Id,
    RentalHouseId,
    TenantId,
    Status,
    Message,
    Phone,
    CreatedAt,
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    RentalRequestId,
    TenantId,
    AmountMinor,
    Status,
    TransactionId,
    IdempotencyKey,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::Address).string())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Rental houses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RentalHouses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RentalHouses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RentalHouses::LandlordId).string().not_null())
                    .col(ColumnDef::new(RentalHouses::Location).string().not_null())
                    .col(
                        ColumnDef::new(RentalHouses::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalHouses::RentMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RentalHouses::Bedrooms).integer().not_null())
                    .col(ColumnDef::new(RentalHouses::ImageUrls).string().not_null())
                    .col(
                        ColumnDef::new(RentalHouses::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(RentalHouses::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-rental_houses-landlord_id")
                    .table(RentalHouses::Table)
                    .col(RentalHouses::LandlordId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Rental requests
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RentalRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RentalRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RentalRequests::RentalHouseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalRequests::TenantId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentalRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(RentalRequests::Message).string())
                    .col(ColumnDef::new(RentalRequests::Phone).string())
                    .col(
                        ColumnDef::new(RentalRequests::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-rental_requests-rental_house_id")
                    .table(RentalRequests::Table)
                    .col(RentalRequests::RentalHouseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-rental_requests-tenant_id")
                    .table(RentalRequests::Table)
                    .col(RentalRequests::TenantId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Orders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::RentalRequestId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::TenantId).string().not_null())
                    .col(ColumnDef::new(Orders::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Orders::TransactionId).string())
                    .col(ColumnDef::new(Orders::IdempotencyKey).string())
                    .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-orders-rental_request_id")
                    .table(Orders::Table)
                    .col(Orders::RentalRequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RentalRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RentalHouses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
