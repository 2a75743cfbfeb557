pub mod qr_code;

use async_trait::async_trait;

use crate::models::{QrCodeModel, QrCodeSubmission};

pub use qr_code::PgQrCodeStore;

/// Persistence interface for QR code records. Injected into the service so
/// tests can substitute an in-memory fake.
#[async_trait]
pub trait QrCodeStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<QrCodeModel>>;

    /// All records for a shop, most recently created first.
    async fn find_all_by_shop(&self, shop: &str) -> anyhow::Result<Vec<QrCodeModel>>;

    async fn create(&self, data: &QrCodeSubmission) -> anyhow::Result<QrCodeModel>;

    async fn update(
        &self,
        id: i64,
        data: &QrCodeSubmission,
    ) -> anyhow::Result<Option<QrCodeModel>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;

    /// Bumps the scan counter and returns the updated record.
    async fn increment_scans(&self, id: i64) -> anyhow::Result<Option<QrCodeModel>>;
}
