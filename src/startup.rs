use std::sync::Arc;

use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;

use crate::catalog::ShopifyCatalogClient;
use crate::configuration::get_configuration;
use crate::qr::SvgQrRenderer;
use crate::routes::qr_code::{
    create_qr_code, delete_qr_code, get_qr_code, list_qr_codes, scan_qr_code, update_qr_code,
};
use crate::services::QrCodeService;
use crate::store::PgQrCodeStore;

#[derive(Clone)]
pub struct AppState {
    pub qr_code_service: QrCodeService,
}

pub async fn run() {
    let cfg = get_configuration().expect("could not get config");

    let pg_pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(cfg.database.with_db());

    let store = PgQrCodeStore::new(pg_pool);
    let catalog = ShopifyCatalogClient::new(
        &cfg.catalog.shop_domain,
        &cfg.catalog.api_version,
        cfg.catalog.access_token,
    );
    let qr_code_service = QrCodeService::new(
        Arc::new(store),
        Arc::new(catalog),
        Arc::new(SvgQrRenderer),
        cfg.application.base_url,
    );

    let app_state = AppState { qr_code_service };
    let app = Router::new()
        .route("/qrcodes", get(list_qr_codes).post(create_qr_code))
        .route(
            "/qrcodes/{id}",
            get(get_qr_code).put(update_qr_code).delete(delete_qr_code),
        )
        .route("/qrcodes/{id}/scan", get(scan_qr_code))
        .with_state(app_state);

    let address = format!("{}:{}", cfg.application.host, cfg.application.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("could not bind listener");
    axum::serve(listener, app)
        .await
        .expect("could not start server");
}
