//! Vehicle listing data module.
//!
//! Provides the vehicle model, the embedded catalog and the listing client.

pub mod catalog;
pub mod client;
pub mod models;
pub mod source;

pub use client::VehicleClient;
pub use models::{CurrencyFormat, VehicleRecord};
pub use source::{DataSource, LoadTask};
