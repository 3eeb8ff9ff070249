use sea_orm_migration::{prelude::*, schema::*};

use crate::m20241129_000001_create_orders::Orders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Withdrawals::Table)
                    .if_not_exists()
                    .col(pk_uuid(Withdrawals::Id))
                    .col(uuid(Withdrawals::OrderId))
                    .col(string(Withdrawals::OrderNumber))
                    .col(big_integer(Withdrawals::Sum))
                    .col(
                        timestamp_with_time_zone(Withdrawals::ProcessedDate)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_withdrawals_order_id")
                            .from(Withdrawals::Table, Withdrawals::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_withdrawals_order_id")
                    .table(Withdrawals::Table)
                    .col(Withdrawals::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Withdrawals::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Withdrawals {
    Table,
    Id,
    OrderId,
    OrderNumber,
    Sum,
    ProcessedDate,
}
