//! The `running_total` column: a REAL copy of the total inside the payload,
//! kept so a saved estimation can be listed without decoding it.

use estimate_core::CacheError;
use estimate_core::pricing::common::round_half_up;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Reads a nullable REAL column back as an amount rounded to cents.
pub(crate) fn read_total(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, CacheError> {
    let real: Option<f64> = row
        .try_get(column)
        .map_err(|e| CacheError::Storage(format!("cannot read '{column}': {e}")))?;

    real.map(|value| {
        Decimal::try_from(value)
            .map(round_half_up)
            .map_err(|e| CacheError::Storage(format!("'{column}' holds {value}: {e}")))
    })
    .transpose()
}

/// The value written to the REAL column.
pub(crate) fn total_to_real(total: Decimal) -> Option<f64> {
    total.to_f64()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database")
    }

    #[tokio::test]
    async fn reads_real_as_cents() {
        let pool = pool().await;
        let row = sqlx::query("SELECT 9000.5 AS total, 0.125 AS tiny")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(read_total(&row, "total"), Ok(Some(dec!(9000.50))));
        assert_eq!(read_total(&row, "tiny"), Ok(Some(dec!(0.13))));
    }

    #[tokio::test]
    async fn null_is_no_total() {
        let pool = pool().await;
        let row = sqlx::query("SELECT NULL AS total").fetch_one(&pool).await.unwrap();

        assert_eq!(read_total(&row, "total"), Ok(None));
    }

    #[tokio::test]
    async fn missing_column_is_a_storage_error() {
        let pool = pool().await;
        let row = sqlx::query("SELECT 1.5 AS total").fetch_one(&pool).await.unwrap();

        let err = read_total(&row, "running_total").unwrap_err();

        assert!(matches!(err, CacheError::Storage(msg) if msg.starts_with("cannot read 'running_total'")));
    }

    #[test]
    fn totals_convert_to_real() {
        assert_eq!(total_to_real(dec!(11880.00)), Some(11880.0));
        assert_eq!(total_to_real(Decimal::ZERO), Some(0.0));
    }
}
