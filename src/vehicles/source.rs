//! Vehicle data sources and the one-shot load task.

use crate::filter::FieldSet;
use crate::vehicles::client::VehicleClient;
use crate::vehicles::models::VehicleRecord;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Listing endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3001/veiculos";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Where the storefront gets its vehicles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Embedded sample catalog, available immediately
    #[default]
    Static,
    /// Listing fetched once from an HTTP endpoint
    Remote {
        #[serde(default = "default_endpoint")]
        endpoint: String,
    },
}

impl DataSource {
    pub fn remote(endpoint: impl Into<String>) -> Self {
        DataSource::Remote {
            endpoint: endpoint.into(),
        }
    }

    /// Filter fields the source's storefront offers out of the box.
    pub fn default_fields(&self) -> FieldSet {
        match self {
            DataSource::Static => FieldSet::full(),
            DataSource::Remote { .. } => FieldSet::reduced(),
        }
    }

    /// Whether cards link to a details view by default.
    pub fn offers_details(&self) -> bool {
        matches!(self, DataSource::Static)
    }

    /// Short human-readable description for the header.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Static => "catálogo local".to_string(),
            DataSource::Remote { endpoint } => endpoint.clone(),
        }
    }
}

/// A listing fetch running on the tokio runtime.
///
/// The task belongs to whoever holds it: dropping the `LoadTask` aborts
/// the request, so a result can never outlive its owner.
#[derive(Debug)]
pub struct LoadTask {
    generation: u64,
    handle: JoinHandle<Result<Vec<VehicleRecord>>>,
}

impl LoadTask {
    /// Spawn the fetch. Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `client` - Client configured for the listing endpoint
    /// * `generation` - Token identifying this load to its owner
    pub fn spawn(client: VehicleClient, generation: u64) -> Self {
        let handle = tokio::spawn(async move { client.fetch_vehicles().await });
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the fetch; a later `join` reports the cancellation.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the fetch to complete.
    ///
    /// # Details
    /// A panicked or aborted task is reported as an error.
    pub async fn join(&mut self) -> Result<Vec<VehicleRecord>> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("Vehicle load task failed: {}", e)),
        }
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.abort();
    }
}
