use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use tracing::instrument;

use crate::errors::QrCodeError;
use crate::models::QrCodeSubmission;
use crate::startup::AppState;

use tracing::{info, warn};

#[derive(serde::Deserialize)]
pub struct ShopQuery {
    pub shop: String,
}

#[instrument(name = "HTTP: List QR codes", skip(state, query), fields(shop = %query.shop))]
pub async fn list_qr_codes(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse, QrCodeError> {
    let qr_codes = state.qr_code_service.resolve_all(&query.shop).await?;
    Ok(Json(qr_codes))
}

#[instrument(name = "HTTP: Get QR code", skip(state, query), fields(shop = %query.shop))]
pub async fn get_qr_code(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse, QrCodeError> {
    match state.qr_code_service.resolve(id, &query.shop).await? {
        Some(qr_code) => Ok(Json(qr_code).into_response()),
        None => {
            warn!(qr_id = id, "QR code not found");
            Ok((StatusCode::NOT_FOUND, "QR code not found").into_response())
        }
    }
}

#[instrument(name = "HTTP: Create QR code", skip(state, data), fields(shop = %data.shop))]
pub async fn create_qr_code(
    State(state): State<AppState>,
    Json(data): Json<QrCodeSubmission>,
) -> Result<impl IntoResponse, QrCodeError> {
    let qr_code = state.qr_code_service.create(&data).await?;
    Ok((StatusCode::CREATED, Json(qr_code)))
}

#[instrument(name = "HTTP: Update QR code", skip(state, data))]
pub async fn update_qr_code(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(data): Json<QrCodeSubmission>,
) -> Result<impl IntoResponse, QrCodeError> {
    match state.qr_code_service.update(id, &data).await? {
        Some(qr_code) => Ok(Json(qr_code).into_response()),
        None => Ok((StatusCode::NOT_FOUND, "QR code not found").into_response()),
    }
}

#[instrument(name = "HTTP: Delete QR code", skip(state))]
pub async fn delete_qr_code(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, QrCodeError> {
    if state.qr_code_service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, "QR code not found").into_response())
    }
}

/// The endpoint the printed code encodes. Counts the scan, then sends the
/// shopper to the record's destination.
#[instrument(name = "HTTP: Scan QR code", skip(state))]
pub async fn scan_qr_code(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, QrCodeError> {
    match state.qr_code_service.record_scan(id).await? {
        Some(url) => {
            info!(qr_id = id, "Redirecting scan to {}", url);
            Ok(Redirect::temporary(&url).into_response())
        }
        None => {
            warn!(qr_id = id, "Scanned QR code does not exist");
            Ok((StatusCode::NOT_FOUND, "QR code not found").into_response())
        }
    }
}
