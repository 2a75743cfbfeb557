use std::collections::HashMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrCodeError {
    /// A stored `product_variant_id` does not look like
    /// `gid://shopify/ProductVariant/<digits>`. The stored record is corrupt;
    /// callers must not try to repair it.
    #[error("unrecognized product variant id `{0}`")]
    InvalidVariantId(String),

    /// The `destination` column holds a value outside the modeled set.
    #[error("unknown destination `{0}`")]
    UnknownDestination(String),

    /// The catalog query itself failed (transport or GraphQL-level error).
    /// Distinct from "query succeeded, product absent", which is reported as
    /// `product_deleted = true` on the enriched view.
    #[error("product catalog unavailable")]
    CatalogUnavailable(#[source] anyhow::Error),

    #[error("failed to render QR code image")]
    Render(#[source] anyhow::Error),

    #[error("record store failure")]
    Store(#[source] anyhow::Error),

    /// Field-level validation failures for a submission. Not a fault: the
    /// web layer renders these as inline messages.
    #[error("invalid QR code submission")]
    Invalid(HashMap<&'static str, &'static str>),
}

impl IntoResponse for QrCodeError {
    fn into_response(self) -> Response {
        match self {
            QrCodeError::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            QrCodeError::CatalogUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Product catalog is unavailable" })),
            )
                .into_response(),
            QrCodeError::InvalidVariantId(_)
            | QrCodeError::UnknownDestination(_)
            | QrCodeError::Render(_)
            | QrCodeError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An unexpected error occurred" })),
            )
                .into_response(),
        }
    }
}
