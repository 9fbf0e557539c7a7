// src/api/client.rs
//! HTTP client for the order search API.
//!
//! A thin wrapper around reqwest that handles authentication and the search
//! request shape. Response interpretation lives in [`super::parser`].

use super::types::SearchRequest;
use crate::error::AppError;
use crate::model::OrderRecord;
use crate::types::{ApiKey, AuthHeaderName, TimeWindow, ValidatedUrl};
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::time::Duration;

const SEARCH_ENDPOINT: &str = "orders/search";

/// A thin wrapper around reqwest Client for order search requests.
#[derive(Clone)]
pub struct OrderSearchClient {
    client: Client,
    search_url: String,
}

impl OrderSearchClient {
    /// Creates a new HTTP client that sends the credential on every request.
    pub fn new(
        base_url: &ValidatedUrl,
        api_key: &ApiKey,
        auth_header: &AuthHeaderName,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key, auth_header)?)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            search_url: base_url.endpoint(SEARCH_ENDPOINT),
        })
    }

    /// Creates the default headers for search requests.
    fn create_headers(
        api_key: &ApiKey,
        auth_header: &AuthHeaderName,
    ) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let name = header::HeaderName::from_bytes(auth_header.as_str().as_bytes()).map_err(
            |e| AppError::MissingConfiguration(format!("Invalid auth header name: {}", e)),
        )?;
        let mut value = header::HeaderValue::from_str(api_key.as_str()).map_err(|e| {
            AppError::MissingConfiguration(format!("Invalid API key format: {}", e))
        })?;
        value.set_sensitive(true);
        headers.insert(name, value);

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a POST request with JSON body to `url`.
    async fn post<T: Serialize>(&self, url: &str, body: &T) -> Result<Response, AppError> {
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::OrderSource for OrderSearchClient {
    async fn search_page(
        &self,
        window: &TimeWindow,
        page: u32,
    ) -> Result<Vec<OrderRecord>, AppError> {
        let request = SearchRequest::for_window(window, page);
        let response = self.post(&self.search_url, &request).await?;
        let result = extract_response_text(response).await?;
        super::parser::parse_search_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
