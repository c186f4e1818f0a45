//! spots-core - Core library for Spots
//!
//! This crate contains the spot model, the spot store and its storage
//! backends, and the location, geocoding, and map collaborators shared by
//! every Spots client.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod geocode;
pub mod location;
pub mod maps;
pub mod models;
pub mod services;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use models::{Spot, SpotId};
