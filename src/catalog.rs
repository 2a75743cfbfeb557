use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

const PRODUCT_QUERY: &str = r#"
query supplementQRCode($id: ID!) {
  product(id: $id) {
    title
    media(first: 1) {
      nodes {
        preview {
          image {
            altText
            url
          }
        }
      }
    }
  }
}
"#;

/// The product fields a QR code is supplemented with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSummary {
    pub title: String,
    pub image_url: String,
    pub image_alt: String,
}

/// Read-only view of the remote product catalog.
///
/// `Ok(None)` means the query succeeded and the product no longer exists;
/// any transport or GraphQL-level failure is an `Err`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn query_product(&self, product_id: &str) -> anyhow::Result<Option<ProductSummary>>;
}

/// Queries the Shopify Admin GraphQL API for product metadata.
#[derive(Clone, Debug)]
pub struct ShopifyCatalogClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

impl ShopifyCatalogClient {
    pub fn new(shop_domain: &str, api_version: &str, access_token: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("https://{shop_domain}/admin/api/{api_version}/graphql.json"),
            access_token,
        }
    }
}

#[async_trait]
impl CatalogClient for ShopifyCatalogClient {
    #[instrument(name = "Catalog: Query product", skip(self))]
    async fn query_product(&self, product_id: &str) -> anyhow::Result<Option<ProductSummary>> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", self.access_token.expose_secret())
            .json(&json!({
                "query": PRODUCT_QUERY,
                "variables": { "id": product_id },
            }))
            .send()
            .await
            .context("failed to reach the product catalog")?
            .error_for_status()
            .context("product catalog returned an error status")?;

        let body: GraphqlResponse = response
            .json()
            .await
            .context("failed to decode catalog response")?;

        if let Some(errors) = body.errors {
            anyhow::bail!("catalog query failed: {errors}");
        }

        let product = body.data.and_then(|data| data.product);
        Ok(product.map(ProductSummary::from))
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    title: Option<String>,
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    nodes: Vec<MediaNode>,
}

#[derive(Debug, Deserialize)]
struct MediaNode {
    preview: Option<Preview>,
}

#[derive(Debug, Deserialize)]
struct Preview {
    image: Option<Image>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Image {
    url: Option<String>,
    alt_text: Option<String>,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        // Individually missing sub-fields (e.g. a product with no media)
        // collapse to empty strings rather than propagating nulls.
        let image = product
            .media
            .and_then(|media| media.nodes.into_iter().next())
            .and_then(|node| node.preview)
            .and_then(|preview| preview.image);

        Self {
            title: product.title.unwrap_or_default(),
            image_url: image
                .as_ref()
                .and_then(|image| image.url.clone())
                .unwrap_or_default(),
            image_alt: image
                .and_then(|image| image.alt_text)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_response_maps_every_field() {
        let body: GraphqlResponse = serde_json::from_value(serde_json::json!({
            "data": {
                "product": {
                    "title": "Test Product",
                    "media": {
                        "nodes": [{
                            "preview": {
                                "image": {
                                    "url": "https://example.com/image.jpg",
                                    "altText": "Test Image"
                                }
                            }
                        }]
                    }
                }
            }
        }))
        .unwrap();

        let product = body.data.unwrap().product.unwrap();
        assert_eq!(
            ProductSummary::from(product),
            ProductSummary {
                title: "Test Product".to_string(),
                image_url: "https://example.com/image.jpg".to_string(),
                image_alt: "Test Image".to_string(),
            }
        );
    }

    #[test]
    fn absent_product_decodes_to_none() {
        let body: GraphqlResponse =
            serde_json::from_value(serde_json::json!({ "data": { "product": null } })).unwrap();
        assert!(body.data.unwrap().product.is_none());
    }

    #[test]
    fn missing_media_collapses_to_empty_strings() {
        let body: GraphqlResponse = serde_json::from_value(serde_json::json!({
            "data": { "product": { "title": "Bare Product", "media": { "nodes": [] } } }
        }))
        .unwrap();

        let summary = ProductSummary::from(body.data.unwrap().product.unwrap());
        assert_eq!(summary.title, "Bare Product");
        assert_eq!(summary.image_url, "");
        assert_eq!(summary.image_alt, "");
    }
}
