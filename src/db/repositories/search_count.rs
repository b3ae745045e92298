use crate::entities::{prelude::*, search_counts};
use crate::models::{NewSearchCount, SearchCountRecord};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub struct SearchCountRepository {
    conn: DatabaseConnection,
}

impl SearchCountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_term(&self, term: &str) -> Result<Option<SearchCountRecord>, DbErr> {
        let row = SearchCounts::find()
            .filter(search_counts::Column::SearchTerm.eq(term))
            .order_by_asc(search_counts::Column::CreatedAt)
            .one(&self.conn)
            .await?;

        Ok(row.map(Into::into))
    }

    pub async fn create(&self, record: NewSearchCount) -> Result<SearchCountRecord, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();
        let id = uuid::Uuid::new_v4().simple().to_string();

        let active_model = search_counts::ActiveModel {
            id: Set(id.clone()),
            search_term: Set(record.search_term),
            count: Set(record.count),
            movie_id: Set(record.movie_id),
            poster_url: Set(record.poster_url),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        SearchCounts::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        SearchCounts::find_by_id(id.clone())
            .one(&self.conn)
            .await?
            .map(Into::into)
            .ok_or_else(|| DbErr::RecordNotFound(format!("search count {id}")))
    }

    pub async fn update_count(&self, id: &str, count: i64) -> Result<(), DbErr> {
        let result = SearchCounts::update_many()
            .col_expr(
                search_counts::Column::Count,
                sea_orm::sea_query::Expr::value(count),
            )
            .col_expr(
                search_counts::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(search_counts::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("search count {id}")));
        }

        Ok(())
    }

    pub async fn top_by_count(&self, limit: u64) -> Result<Vec<SearchCountRecord>, DbErr> {
        let rows = SearchCounts::find()
            .order_by_desc(search_counts::Column::Count)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count_all(&self) -> Result<u64, DbErr> {
        SearchCounts::find().count(&self.conn).await
    }
}
