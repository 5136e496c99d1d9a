use sea_orm_migration::prelude::*;

/// 短链接令牌列宽，令牌长度配置不能超过此值
pub const TOKEN_COLUMN_WIDTH: u32 = 20;
/// 原始路径列宽（字符数）
pub const ORIGIN_COLUMN_WIDTH: u32 = 200;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // origin_path 作为自然主键：同一路径最多一个令牌
        manager
            .create_table(
                Table::create()
                    .table(ShortLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShortLink::OriginPath)
                            .string_len(ORIGIN_COLUMN_WIDTH)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ShortLink::Token)
                            .string_len(TOKEN_COLUMN_WIDTH)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 令牌全局唯一，由存储层保证
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_links_token")
                    .table(ShortLink::Table)
                    .col(ShortLink::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_short_links_token").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ShortLink::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShortLink {
    #[sea_orm(iden = "short_links")]
    Table,
    OriginPath,
    Token,
}
