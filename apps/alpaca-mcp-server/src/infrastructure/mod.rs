//! Infrastructure Layer
//!
//! Adapters implementing the application ports against the Alpaca REST APIs,
//! plus configuration loading.

pub mod alpaca;
pub mod config;
