//! DGI Motors storefront library.
//!
//! The filter core ([`filter`]) narrows a vehicle list by optional criteria;
//! the remaining modules load vehicles and drive the terminal UI around it.

pub mod app;
pub mod config;
pub mod filter;
pub mod input;
pub mod logging;
pub mod ui;
pub mod vehicles;
