//! Pagination and ordering helpers over SeaORM selects.
use contracts::{PageRequest, SortOrder};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryOrder, Select,
};

use crate::errors::ServiceError;

pub fn order_of(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// Orders by the column mapped from `page.sort`, falling back to `default`.
pub fn apply_sort<E, C>(select: Select<E>, page: &PageRequest, map: impl Fn(&str) -> Option<C>, default: C) -> Select<E>
where
    E: EntityTrait,
    C: sea_orm::ColumnTrait,
{
    let col = page.sort.as_deref().and_then(map).unwrap_or(default);
    select.order_by(col, order_of(page.order))
}

/// Fetches one page and the total row count.
pub async fn fetch_page<'db, E, M, C>(
    db: &'db C,
    select: Select<E>,
    page: &PageRequest,
) -> Result<(Vec<M>, u64), ServiceError>
where
    C: ConnectionTrait,
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync + 'db,
{
    let paginator = select.paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.index()).await?;
    Ok((rows, total))
}

/// Escapes LIKE wildcards so user input only matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring match against any of `columns`.
pub fn search_any<C: sea_orm::ColumnTrait>(columns: &[C], term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.trim().to_lowercase()));
    columns.iter().fold(Condition::any(), |cond, col| {
        cond.add(Expr::expr(Func::lower(Expr::col(*col))).like(LikeExpr::new(pattern.as_str()).escape('\\')))
    })
}

/// Lowercase substring test used by the mock repositories.
pub fn matches_search(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.trim().to_lowercase();
    fields.iter().flatten().any(|f| f.to_lowercase().contains(&needle))
}

/// In-memory paging used by the mock repositories.
pub fn slice_page<T: Clone>(items: &[T], page: &PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}
