use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use qrcode::QrCode;
use qrcode::render::svg;

/// Renders a URL into a scannable code image, returned as a data URI.
#[async_trait]
pub trait QrRenderer: Send + Sync {
    async fn to_data_url(&self, url: &str) -> anyhow::Result<String>;
}

/// Renders codes as base64-encoded SVG data URIs.
#[derive(Clone, Debug, Default)]
pub struct SvgQrRenderer;

#[async_trait]
impl QrRenderer for SvgQrRenderer {
    async fn to_data_url(&self, url: &str) -> anyhow::Result<String> {
        let code = QrCode::new(url.as_bytes())?;
        let image = code
            .render::<svg::Color<'_>>()
            .min_dimensions(200, 200)
            .build();
        Ok(format!(
            "data:image/svg+xml;base64,{}",
            BASE64.encode(image.as_bytes())
        ))
    }
}
