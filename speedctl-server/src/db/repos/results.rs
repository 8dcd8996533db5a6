//! Result repository
//!
//! Read-only queries against the `results` table. A repository borrows one
//! checked-out connection; the caller owns the checkout and returns it to the
//! pool by dropping it.

use chrono::{DateTime, Utc};
use sqlx::MySqlConnection;
use sqlx::Row;

use super::DbError;
use crate::db::row::{decode_row, number_column, value_column};
use crate::models::{
    format_timestamp, Averages, ColumnValue, DownloadPoint, DynamicRow, PageRequest, PageSummary,
    UtcDay,
};

/// Result repository
pub struct ResultRepo<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> ResultRepo<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    /// Download samples recorded during `day`.
    pub async fn downloads_on(&mut self, day: UtcDay) -> Result<Vec<DownloadPoint>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT created_at, download
            FROM results
            WHERE created_at >= ? AND created_at < ?
            ORDER BY id
            "#,
        )
        .bind(day.start())
        .bind(day.end())
        .fetch_all(&mut *self.conn)
        .await?;

        rows.iter()
            .map(|row| {
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                Ok::<_, DbError>(DownloadPoint {
                    date: format_timestamp(&created_at),
                    download: number_column(row, "download")?,
                })
            })
            .collect()
    }

    /// Upload values recorded during `day`.
    pub async fn uploads_on(&mut self, day: UtcDay) -> Result<Vec<Option<f64>>, DbError> {
        self.column_on(Metric::Upload, day).await
    }

    /// Ping values recorded during `day`.
    pub async fn pings_on(&mut self, day: UtcDay) -> Result<Vec<Option<f64>>, DbError> {
        self.column_on(Metric::Ping, day).await
    }

    /// Mean download, upload and ping over `day`.
    ///
    /// `AVG` over zero rows is NULL, which surfaces as `None`.
    pub async fn averages_on(&mut self, day: UtcDay) -> Result<Averages, DbError> {
        let row = sqlx::query(
            r#"
            SELECT
                AVG(download) AS avg_download,
                AVG(upload) AS avg_upload,
                AVG(ping) AS avg_ping
            FROM results
            WHERE created_at >= ? AND created_at < ?
            "#,
        )
        .bind(day.start())
        .bind(day.end())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(Averages {
            average_download: number_column(&row, "avg_download")?,
            average_upload: number_column(&row, "avg_upload")?,
            average_ping: number_column(&row, "avg_ping")?,
        })
    }

    /// Every row with every column.
    pub async fn all(&mut self) -> Result<Vec<DynamicRow>, DbError> {
        let rows = sqlx::query("SELECT * FROM results")
            .fetch_all(&mut *self.conn)
            .await?;

        rows.iter()
            .map(|row| decode_row(row).map_err(DbError::from))
            .collect()
    }

    /// The `data` payload of every row.
    pub async fn all_data(&mut self) -> Result<Vec<ColumnValue>, DbError> {
        let rows = sqlx::query("SELECT data FROM results ORDER BY id")
            .fetch_all(&mut *self.conn)
            .await?;

        rows.iter()
            .map(|row| value_column(row, "data").map_err(DbError::from))
            .collect()
    }

    /// One page of rows, newest id first, with page counts.
    pub async fn page(&mut self, page: PageRequest) -> Result<PageSummary<DynamicRow>, DbError> {
        let count = sqlx::query("SELECT COUNT(*) AS total_rows FROM results")
            .fetch_one(&mut *self.conn)
            .await?;
        let total_rows = number_column(&count, "total_rows")?.unwrap_or(0.0) as i64;

        let rows = sqlx::query(
            r#"
            SELECT *
            FROM results
            ORDER BY id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        let data = rows
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageSummary::new(total_rows, page, data))
    }

    /// The `data` payload of the row with this id.
    pub async fn data_by_id(&mut self, id: i64) -> Result<ColumnValue, DbError> {
        let row = sqlx::query("SELECT data FROM results WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "result",
                id: id.to_string(),
            })?;

        Ok(value_column(&row, "data")?)
    }

    async fn column_on(
        &mut self,
        column: Metric,
        day: UtcDay,
    ) -> Result<Vec<Option<f64>>, DbError> {
        let sql = format!(
            "SELECT {} FROM results WHERE created_at >= ? AND created_at < ? ORDER BY id",
            column.as_str()
        );
        let rows = sqlx::query(&sql)
            .bind(day.start())
            .bind(day.end())
            .fetch_all(&mut *self.conn)
            .await?;

        rows.iter()
            .map(|row| number_column(row, column.as_str()).map_err(DbError::from))
            .collect()
    }
}

/// Per-day metric columns.
///
/// Column names come from this enum only, never from request input.
#[derive(Debug, Clone, Copy)]
enum Metric {
    Upload,
    Ping,
}

impl Metric {
    fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Ping => "ping",
        }
    }
}

