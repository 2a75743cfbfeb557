use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::instrument;

use crate::models::{QrCodeModel, QrCodeSubmission};
use crate::store::QrCodeStore;

const QR_CODE_COLUMNS: &str =
    "id, shop, title, product_id, product_handle, product_variant_id, destination, scans, created_at";

#[derive(Clone, Debug)]
pub struct PgQrCodeStore {
    pg_pool: Pool<Postgres>,
}

impl PgQrCodeStore {
    pub fn new(pg_pool: Pool<Postgres>) -> Self {
        Self { pg_pool }
    }
}

#[async_trait]
impl QrCodeStore for PgQrCodeStore {
    #[instrument(name = "Store: Fetch QR code by id", skip(self))]
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<QrCodeModel>> {
        let row = sqlx::query_as::<_, QrCodeModel>(&format!(
            "SELECT {QR_CODE_COLUMNS} FROM qr_codes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pg_pool)
        .await?;
        Ok(row)
    }

    #[instrument(name = "Store: Fetch QR codes for shop", skip(self))]
    async fn find_all_by_shop(&self, shop: &str) -> anyhow::Result<Vec<QrCodeModel>> {
        let rows = sqlx::query_as::<_, QrCodeModel>(&format!(
            "SELECT {QR_CODE_COLUMNS} FROM qr_codes WHERE shop = $1 ORDER BY id DESC"
        ))
        .bind(shop)
        .fetch_all(&self.pg_pool)
        .await?;
        Ok(rows)
    }

    #[instrument(name = "Store: Create QR code", skip(self, data), fields(shop = %data.shop))]
    async fn create(&self, data: &QrCodeSubmission) -> anyhow::Result<QrCodeModel> {
        let row = sqlx::query_as::<_, QrCodeModel>(&format!(
            "INSERT INTO qr_codes \
             (shop, title, product_id, product_handle, product_variant_id, destination) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {QR_CODE_COLUMNS}"
        ))
        .bind(&data.shop)
        .bind(&data.title)
        .bind(&data.product_id)
        .bind(&data.product_handle)
        .bind(&data.product_variant_id)
        .bind(&data.destination)
        .fetch_one(&self.pg_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert QR code: {:?}", e);
            e
        })?;
        Ok(row)
    }

    #[instrument(name = "Store: Update QR code", skip(self, data))]
    async fn update(
        &self,
        id: i64,
        data: &QrCodeSubmission,
    ) -> anyhow::Result<Option<QrCodeModel>> {
        let row = sqlx::query_as::<_, QrCodeModel>(&format!(
            "UPDATE qr_codes \
             SET title = $2, product_id = $3, product_handle = $4, \
                 product_variant_id = $5, destination = $6 \
             WHERE id = $1 \
             RETURNING {QR_CODE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.title)
        .bind(&data.product_id)
        .bind(&data.product_handle)
        .bind(&data.product_variant_id)
        .bind(&data.destination)
        .fetch_optional(&self.pg_pool)
        .await?;
        Ok(row)
    }

    #[instrument(name = "Store: Delete QR code", skip(self))]
    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id)
            .execute(&self.pg_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(name = "Store: Increment scan count", skip(self))]
    async fn increment_scans(&self, id: i64) -> anyhow::Result<Option<QrCodeModel>> {
        let row = sqlx::query_as::<_, QrCodeModel>(&format!(
            "UPDATE qr_codes SET scans = scans + 1 WHERE id = $1 RETURNING {QR_CODE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pg_pool)
        .await?;
        Ok(row)
    }
}
