//! Open Food Facts catalog client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{ProductLookup, SearchHit};
use crate::error::LookupError;
use crate::product::{CatalogProduct, Product};

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Vec<Value>,
}

#[derive(Deserialize)]
struct BarcodeResponse {
    #[serde(default)]
    product: Option<Value>,
}

/// HTTP client for the Open Food Facts search and product endpoints.
pub struct OpenFoodFactsClient {
    inner: reqwest::Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    /// Build a client with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("eco-scorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/cgi/search.pl?search_terms={}&search_simple=1&json=1",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    fn barcode_url(&self, barcode: &str) -> String {
        format!(
            "{}/api/v0/product/{}.json",
            self.base_url,
            urlencoding::encode(barcode)
        )
    }

    async fn get_text(&self, url: &str) -> Result<String, LookupError> {
        let response = self.inner.get(url).send().await.map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response.text().await.map_err(map_transport)
    }
}

fn map_transport(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::RequestFailed(e)
    }
}

/// First product of a search response, if any.
pub(crate) fn parse_search_response(body: &str) -> Result<Option<CatalogProduct>, LookupError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

    match response.products.into_iter().next() {
        Some(first) => serde_json::from_value(first)
            .map(Some)
            .map_err(|e| LookupError::InvalidResponse(e.to_string())),
        None => Ok(None),
    }
}

/// Product of a barcode response; `None` when the catalog has no such barcode.
pub(crate) fn parse_barcode_response(body: &str) -> Result<Option<CatalogProduct>, LookupError> {
    let response: BarcodeResponse =
        serde_json::from_str(body).map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

    match response.product {
        Some(product @ Value::Object(_)) => {
            let is_empty = product.as_object().map_or(true, |o| o.is_empty());
            if is_empty {
                return Ok(None);
            }
            serde_json::from_value(product)
                .map(Some)
                .map_err(|e| LookupError::InvalidResponse(e.to_string()))
        }
        _ => Ok(None),
    }
}

#[async_trait]
impl ProductLookup for OpenFoodFactsClient {
    async fn search(&self, name: &str) -> Result<SearchHit, LookupError> {
        let body = self.get_text(&self.search_url(name)).await?;
        let hit = parse_search_response(&body)?
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;

        // Search hits are abbreviated; the barcode record carries the full ingredient list.
        match hit.code.clone().filter(|c| !c.trim().is_empty()) {
            Some(code) => Ok(SearchHit::Barcode {
                code,
                partial: hit.into(),
            }),
            None => Ok(SearchHit::Complete(hit.into())),
        }
    }

    async fn lookup_by_barcode(&self, barcode: &str) -> Result<Product, LookupError> {
        let body = self.get_text(&self.barcode_url(barcode)).await?;
        parse_barcode_response(&body)?
            .map(Product::from)
            .ok_or_else(|| LookupError::NotFound(barcode.to_string()))
    }
}
