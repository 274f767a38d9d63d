//! PostgreSQL-backed capture store.
//!
//! Batches are written inside one transaction with `RETURNING id`, so the
//! sequence order matches input order and a failed batch leaves no rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{PageSize, trim_to_page};
use tracing::debug;

use crate::domain::ports::{WebhookPage, WebhookRepository, WebhookRepositoryError};
use crate::domain::{NewWebhook, Webhook, WebhookBoundary, WebhookId};

use super::models::{NewWebhookRow, WebhookRow};
use super::pool::{DbPool, PoolError};
use super::schema::webhooks;

/// Diesel implementation of [`WebhookRepository`].
#[derive(Clone)]
pub struct DieselWebhookRepository {
    pool: DbPool,
}

impl DieselWebhookRepository {
    /// Create a repository over `pool`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use webhook_inspector::outbound::persistence::{
    ///     DbPool, DieselWebhookRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/webhooks")).await?;
    /// let repository = DieselWebhookRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> WebhookRepositoryError {
    WebhookRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> WebhookRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let error_message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                error = %error_message,
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error_message, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            WebhookRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            WebhookRepositoryError::query(info.message().to_owned())
        }
        _ => WebhookRepositoryError::query(error_message),
    }
}

fn to_rows(webhooks: &[NewWebhook]) -> Result<Vec<NewWebhookRow<'_>>, WebhookRepositoryError> {
    webhooks
        .iter()
        .map(NewWebhookRow::try_from_domain)
        .collect::<Result<Vec<_>, _>>()
        .map_err(WebhookRepositoryError::query)
}

fn to_domain(rows: Vec<WebhookRow>) -> Result<Vec<Webhook>, WebhookRepositoryError> {
    rows.into_iter()
        .map(Webhook::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(WebhookRepositoryError::query)
}

fn to_ids(raw: Vec<i64>) -> Result<Vec<WebhookId>, WebhookRepositoryError> {
    raw.into_iter()
        .map(|id| WebhookId::new(id).map_err(|err| WebhookRepositoryError::query(err.to_string())))
        .collect()
}

fn limit_for(size: PageSize) -> Result<i64, WebhookRepositoryError> {
    i64::try_from(size.fetch_limit())
        .map_err(|_| WebhookRepositoryError::query("page size exceeds query limit"))
}

async fn insert_rows(
    conn: &mut AsyncPgConnection,
    rows: &[NewWebhookRow<'_>],
) -> Result<Vec<i64>, diesel::result::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    diesel::insert_into(webhooks::table)
        .values(rows)
        .returning(webhooks::id)
        .get_results(conn)
        .await
}

#[async_trait]
impl WebhookRepository for DieselWebhookRepository {
    async fn insert_many(
        &self,
        webhooks: &[NewWebhook],
    ) -> Result<Vec<WebhookId>, WebhookRepositoryError> {
        let rows = to_rows(webhooks)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids = conn
            .transaction(|conn| async move { insert_rows(conn, &rows).await }.scope_boxed())
            .await
            .map_err(map_diesel_error)?;

        to_ids(ids)
    }

    async fn clear(&self) -> Result<u64, WebhookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(webhooks::table)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(deleted).map_err(|_| WebhookRepositoryError::query("delete count overflow"))
    }

    async fn replace_all(
        &self,
        webhooks: &[NewWebhook],
    ) -> Result<Vec<WebhookId>, WebhookRepositoryError> {
        let rows = to_rows(webhooks)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (cleared, ids) = conn
            .transaction(|conn| {
                async move {
                    let cleared = diesel::delete(webhooks::table).execute(conn).await?;
                    let ids = insert_rows(conn, &rows).await?;
                    Ok::<_, diesel::result::Error>((cleared, ids))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        debug!(cleared, inserted = ids.len(), "capture store replaced");
        to_ids(ids)
    }

    async fn page(
        &self,
        after: Option<WebhookBoundary>,
        size: PageSize,
    ) -> Result<WebhookPage, WebhookRepositoryError> {
        let mut query = webhooks::table
            .select(WebhookRow::as_select())
            .order((webhooks::created_at.desc(), webhooks::id.desc()))
            .limit(limit_for(size)?)
            .into_boxed();

        if let Some(boundary) = after {
            query = query.filter(
                webhooks::created_at.lt(boundary.created_at).or(webhooks::created_at
                    .eq(boundary.created_at)
                    .and(webhooks::id.lt(boundary.id.get()))),
            );
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<WebhookRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        let mut webhooks = to_domain(rows)?;
        let has_more = trim_to_page(&mut webhooks, size);
        Ok(WebhookPage { webhooks, has_more })
    }

    async fn get_by_id(&self, id: WebhookId) -> Result<Option<Webhook>, WebhookRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = webhooks::table
            .filter(webhooks::id.eq(id.get()))
            .select(WebhookRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Webhook::try_from)
            .transpose()
            .map_err(WebhookRepositoryError::query)
    }

    async fn find_by_ids(
        &self,
        ids: &[WebhookId],
    ) -> Result<Vec<Webhook>, WebhookRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<WebhookRow> = webhooks::table
            .filter(webhooks::id.eq_any(raw))
            .order((webhooks::created_at.desc(), webhooks::id.desc()))
            .select(WebhookRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        to_domain(rows)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; query behaviour is exercised against the
    //! in-memory adapter, which shares the port contract.

    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::checkout("timed out"))]
    #[case(PoolError::build("bad url"))]
    fn pool_errors_map_to_connection(#[case] error: PoolError) {
        assert!(matches!(
            map_pool_error(error),
            WebhookRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert_eq!(
            map_diesel_error(error),
            WebhookRepositoryError::connection("server closed the connection")
        );
    }

    #[rstest]
    fn constraint_violation_maps_to_query() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("webhooks_status_code_check".to_owned()),
        );
        assert!(matches!(
            map_diesel_error(error),
            WebhookRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn other_diesel_errors_map_to_query() {
        assert!(matches!(
            map_diesel_error(DieselError::RollbackTransaction),
            WebhookRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn page_limit_fetches_one_extra_row() {
        let size = PageSize::new(20).expect("valid size");
        assert_eq!(limit_for(size), Ok(21));
    }

    #[rstest]
    fn non_positive_ids_from_the_store_are_rejected() {
        assert!(to_ids(vec![1, 0]).is_err());
    }
}
