use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select};

use crate::schemas::ListQuery;

/// One page of a filtered listing, together with the pagination metadata
/// the list endpoints report back to the client.
#[derive(Debug)]
pub struct Page<M> {
    pub rows: Vec<M>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

/// Run a prepared select as a paginated query.
///
/// The page number and page size come from [`ListQuery`], which already
/// falls back to `page=1` / `limit=10` for missing or non-numeric values.
/// Requesting a page past the end yields an empty `rows` with the totals
/// still filled in.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    query: &ListQuery,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
{
    let page = query.page();
    let limit = query.limit();

    let paginator = select.paginate(db, limit);
    let total_count = paginator.num_items().await?;
    let total_pages = total_count.div_ceil(limit);
    let rows = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        rows,
        current_page: page,
        total_pages,
        total_count,
    })
}

/// Case-insensitive substring condition on a text column.
///
/// Lowercases both sides so the match behaves the same on SQLite and
/// PostgreSQL.
pub fn contains_ci(column: impl IntoColumnRef, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}
