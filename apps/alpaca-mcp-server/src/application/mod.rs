//! Application Layer
//!
//! Ports the tools call through, and the response shapes they return.

pub mod dto;
pub mod ports;
