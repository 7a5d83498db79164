//! HTTP client for the vehicle listing endpoint.
//!
//! Performs the single GET that feeds the remote storefront.

use crate::config::Config;
use crate::vehicles::models::{VehicleRecord, decode_vehicles};
use crate::vehicles::source::DataSource;
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;

/// Vehicle listing client.
#[derive(Debug, Clone)]
pub struct VehicleClient {
    /// HTTP client for API requests
    client: Client,
    /// Listing endpoint, fetched without query parameters
    endpoint: Url,
}

impl VehicleClient {
    /// Create a client for an endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - Absolute URL of the listing
    /// * `timeout` - Optional request timeout
    ///
    /// # Returns
    /// * `Result<VehicleClient>` - New client or error if the URL is invalid
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid vehicle endpoint: {}", endpoint))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Create a client from configuration.
    ///
    /// # Details
    /// Fails when the configured source is the embedded catalog.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.source {
            DataSource::Remote { endpoint } => Self::new(endpoint, config.request_timeout()),
            DataSource::Static => Err(anyhow::anyhow!(
                "The static catalog does not use the vehicle endpoint"
            )),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the vehicle listing.
    ///
    /// # Returns
    /// * `Result<Vec<VehicleRecord>>` - Valid vehicles in response order or error
    ///
    /// # Details
    /// Expects a JSON array of vehicle objects. Transport errors, non-success
    /// statuses and a body that is not an array are errors; individual
    /// malformed vehicles are skipped.
    pub async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>> {
        tracing::info!(endpoint = %self.endpoint, "Fetching vehicle listing");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .context("Failed to fetch vehicles from listing endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Vehicle listing error ({}): {}",
                status,
                error_text
            ));
        }

        let items: Vec<Value> = response
            .json()
            .await
            .context("Failed to parse vehicle listing response")?;

        let total = items.len();
        let vehicles = decode_vehicles(items);
        tracing::info!(received = total, accepted = vehicles.len(), "Vehicle listing decoded");

        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_client_rejects_invalid_endpoint() {
        assert!(VehicleClient::new("not a url", None).is_err());
    }

    #[test]
    fn test_client_from_config_requires_remote_source() {
        let config = Config::default();
        assert!(VehicleClient::from_config(&config).is_err());

        let remote = Config {
            source: DataSource::remote("http://localhost:3001/veiculos"),
            ..Config::default()
        };
        let client = VehicleClient::from_config(&remote).unwrap();
        assert_eq!(client.endpoint().path(), "/veiculos");
    }

    #[tokio::test]
    async fn test_fetch_vehicles_decodes_listing() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/veiculos");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!([
                        {"id": 1, "brand": "Toyota", "model": "Corolla", "year": 2020, "price": 35000, "image": "/corolla.png"},
                        {"id": 2, "brand": "Honda", "model": "Civic", "year": 2018, "price": "45000"},
                        {"id": 3, "brand": "Ford", "model": "Mustang", "year": 2022}
                    ]));
            })
            .await;

        let client = VehicleClient::new(&server.url("/veiculos"), None).unwrap();
        let vehicles = client.fetch_vehicles().await.unwrap();

        mock.assert_async().await;
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].model, "Corolla");
        assert_eq!(vehicles[0].image_or_placeholder(), "/corolla.png");
        assert_eq!(vehicles[1].price, 45000.0);
    }

    #[tokio::test]
    async fn test_fetch_vehicles_reports_http_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/veiculos");
                then.status(500).body("boom");
            })
            .await;

        let client = VehicleClient::new(&server.url("/veiculos"), None).unwrap();
        let err = client.fetch_vehicles().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_vehicles_rejects_non_array_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/veiculos");
                then.status(200).json_body(json!({"veiculos": []}));
            })
            .await;

        let client = VehicleClient::new(&server.url("/veiculos"), None).unwrap();
        assert!(client.fetch_vehicles().await.is_err());
    }
}
