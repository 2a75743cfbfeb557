use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::errors::QrCodeError;

const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeModel {
    pub id: i64,
    pub shop: String,
    pub title: String,
    pub product_id: String,
    pub product_handle: String,
    pub product_variant_id: String,
    pub destination: String,
    pub scans: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl QrCodeModel {
    /// Where a scan of this code ultimately redirects. Derived from stored
    /// fields only; live catalog state never changes the result.
    pub fn destination_url(&self) -> Result<String, QrCodeError> {
        match self.destination.as_str() {
            "product" => Ok(format!(
                "https://{}/products/{}",
                self.shop, self.product_handle
            )),
            "variant" => {
                let digits = self
                    .product_variant_id
                    .strip_prefix(VARIANT_GID_PREFIX)
                    .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
                    .ok_or_else(|| {
                        QrCodeError::InvalidVariantId(self.product_variant_id.clone())
                    })?;
                Ok(format!("https://{}/cart/{}:1", self.shop, digits))
            }
            other => Err(QrCodeError::UnknownDestination(other.to_string())),
        }
    }
}

/// Incoming payload for create/update. Missing fields deserialize to empty
/// strings so the validator can report every absent field at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrCodeSubmission {
    pub title: String,
    pub shop: String,
    pub product_id: String,
    pub product_handle: String,
    pub product_variant_id: String,
    pub destination: String,
}

/// A record merged with live catalog data and derived fields. Computed fresh
/// on every read, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedQrCode {
    #[serde(flatten)]
    pub qr_code: QrCodeModel,
    pub product_deleted: bool,
    pub product_title: String,
    pub product_image: String,
    pub product_alt: String,
    pub destination_url: String,
    pub image: String,
}
