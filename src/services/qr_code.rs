use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::instrument;

use crate::catalog::CatalogClient;
use crate::errors::QrCodeError;
use crate::models::{EnrichedQrCode, QrCodeModel, QrCodeSubmission};
use crate::qr::QrRenderer;
use crate::store::QrCodeStore;

/// Required-field check run before any write. Returns `None` when the
/// submission is clean, otherwise one fixed message per missing field.
pub fn validate(data: &QrCodeSubmission) -> Option<HashMap<&'static str, &'static str>> {
    let mut errors = HashMap::new();

    if data.title.is_empty() {
        errors.insert("title", "Title is required");
    }

    if data.product_id.is_empty() {
        errors.insert("productId", "Product is required");
    }

    if data.destination.is_empty() {
        errors.insert("destination", "Destination is required");
    }

    if errors.is_empty() { None } else { Some(errors) }
}

#[derive(Clone)]
pub struct QrCodeService {
    store: Arc<dyn QrCodeStore>,
    catalog: Arc<dyn CatalogClient>,
    renderer: Arc<dyn QrRenderer>,
    base_url: String,
}

impl QrCodeService {
    pub fn new(
        store: Arc<dyn QrCodeStore>,
        catalog: Arc<dyn CatalogClient>,
        renderer: Arc<dyn QrRenderer>,
        base_url: String,
    ) -> Self {
        Self {
            store,
            catalog,
            renderer,
            base_url,
        }
    }

    /// Load one record and enrich it. `Ok(None)` when the id is unknown or
    /// belongs to another shop; the catalog is never queried in that case.
    #[instrument(name = "Service: Resolve QR code", skip(self))]
    pub async fn resolve(
        &self,
        id: i64,
        shop: &str,
    ) -> Result<Option<EnrichedQrCode>, QrCodeError> {
        let Some(qr_code) = self
            .store
            .find_by_id(id)
            .await
            .map_err(QrCodeError::Store)?
        else {
            return Ok(None);
        };

        if qr_code.shop != shop {
            tracing::warn!(%shop, "QR code belongs to a different shop");
            return Ok(None);
        }

        self.enrich(qr_code).await.map(Some)
    }

    /// All enriched records for a shop, most recently created first.
    ///
    /// Enrichments run concurrently but the result keeps the store's
    /// id-descending order. Any single catalog failure aborts the whole
    /// batch; a partial listing would misrepresent the merchant's codes.
    #[instrument(name = "Service: Resolve all QR codes", skip(self))]
    pub async fn resolve_all(&self, shop: &str) -> Result<Vec<EnrichedQrCode>, QrCodeError> {
        let qr_codes = self
            .store
            .find_all_by_shop(shop)
            .await
            .map_err(QrCodeError::Store)?;

        if qr_codes.is_empty() {
            return Ok(Vec::new());
        }

        try_join_all(qr_codes.into_iter().map(|qr_code| self.enrich(qr_code))).await
    }

    /// Validate and persist a new record, returning its enriched view.
    #[instrument(name = "Service: Create QR code", skip(self, data), fields(shop = %data.shop))]
    pub async fn create(&self, data: &QrCodeSubmission) -> Result<EnrichedQrCode, QrCodeError> {
        if let Some(errors) = validate(data) {
            return Err(QrCodeError::Invalid(errors));
        }

        let qr_code = self.store.create(data).await.map_err(QrCodeError::Store)?;
        self.enrich(qr_code).await
    }

    /// Validate and re-submit an existing record. `Ok(None)` when the id is
    /// unknown.
    #[instrument(name = "Service: Update QR code", skip(self, data))]
    pub async fn update(
        &self,
        id: i64,
        data: &QrCodeSubmission,
    ) -> Result<Option<EnrichedQrCode>, QrCodeError> {
        if let Some(errors) = validate(data) {
            return Err(QrCodeError::Invalid(errors));
        }

        let Some(qr_code) = self
            .store
            .update(id, data)
            .await
            .map_err(QrCodeError::Store)?
        else {
            return Ok(None);
        };

        self.enrich(qr_code).await.map(Some)
    }

    #[instrument(name = "Service: Delete QR code", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, QrCodeError> {
        self.store.delete(id).await.map_err(QrCodeError::Store)
    }

    /// Record one scan and hand back the redirect target.
    #[instrument(name = "Service: Record scan", skip(self))]
    pub async fn record_scan(&self, id: i64) -> Result<Option<String>, QrCodeError> {
        let Some(qr_code) = self
            .store
            .increment_scans(id)
            .await
            .map_err(QrCodeError::Store)?
        else {
            return Ok(None);
        };

        qr_code.destination_url().map(Some)
    }

    /// Merge a record with live catalog data and the derived fields.
    ///
    /// "Product absent" is normalized to `product_deleted = true`; a failing
    /// catalog query is surfaced as `CatalogUnavailable` instead, so the UI
    /// can tell a deleted product from an unreachable catalog.
    #[instrument(name = "Service: Enrich QR code", skip(self, qr_code), fields(qr_id = qr_code.id))]
    async fn enrich(&self, qr_code: QrCodeModel) -> Result<EnrichedQrCode, QrCodeError> {
        let product = self
            .catalog
            .query_product(&qr_code.product_id)
            .await
            .map_err(QrCodeError::CatalogUnavailable)?;

        // Independent of the catalog outcome: derived from stored fields only.
        let destination_url = qr_code.destination_url()?;

        let scan_url = self.scan_url(qr_code.id);
        let image = self
            .renderer
            .to_data_url(&scan_url)
            .await
            .map_err(QrCodeError::Render)?;

        let (product_deleted, product_title, product_image, product_alt) = match product {
            Some(product) => (false, product.title, product.image_url, product.image_alt),
            None => (true, String::new(), String::new(), String::new()),
        };

        Ok(EnrichedQrCode {
            qr_code,
            product_deleted,
            product_title,
            product_image,
            product_alt,
            destination_url,
            image,
        })
    }

    /// The stable, id-keyed URL the rendered image encodes. The scan endpoint
    /// redirects to the destination URL at scan time, so the printed code
    /// stays valid when the destination changes.
    fn scan_url(&self, id: i64) -> String {
        format!("{}/qrcodes/{id}/scan", self.base_url.trim_end_matches('/'))
    }
}
