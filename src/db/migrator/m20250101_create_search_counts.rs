use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchCounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchCounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchCounts::SearchTerm).string().not_null())
                    .col(
                        ColumnDef::new(SearchCounts::Count)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(SearchCounts::MovieId).big_integer().not_null())
                    .col(ColumnDef::new(SearchCounts::PosterUrl).string().not_null())
                    .col(ColumnDef::new(SearchCounts::CreatedAt).string().not_null())
                    .col(ColumnDef::new(SearchCounts::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Not unique: one record per term is kept by read-before-write.
        manager
            .create_index(
                Index::create()
                    .name("idx_search_counts_term")
                    .table(SearchCounts::Table)
                    .col(SearchCounts::SearchTerm)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_search_counts_count")
                    .table(SearchCounts::Table)
                    .col(SearchCounts::Count)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchCounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchCounts {
    Table,
    Id,
    SearchTerm,
    Count,
    MovieId,
    PosterUrl,
    CreatedAt,
    UpdatedAt,
}
