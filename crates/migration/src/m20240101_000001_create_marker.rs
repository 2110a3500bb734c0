//! Create `marker` table.
//!
//! Road markers placed on the map; one marker per coordinate pair.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_MARKER_COORDINATES: &str = "idx_marker_coordinates";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Marker::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Marker::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Marker::Kind, 32).not_null())
                    .col(double(Marker::Latitude).not_null())
                    .col(double(Marker::Longitude).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_MARKER_COORDINATES)
                    .table(Marker::Table)
                    .col(Marker::Latitude)
                    .col(Marker::Longitude)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_MARKER_COORDINATES).table(Marker::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Marker::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Marker { Table, Id, Kind, Latitude, Longitude }
