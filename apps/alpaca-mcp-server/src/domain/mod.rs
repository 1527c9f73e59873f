//! Domain Layer
//!
//! Trading vocabulary and the rules that can be checked without talking to
//! the brokerage. Nothing in here performs I/O.
//!
//! # Bounded Contexts
//!
//! - [`order`]: Order sides, types, time-in-force and price field rules
//! - [`market_data`]: Bar timeframes and historical query windows
//! - [`options`]: OCC contract symbols and multi-leg strategy classification

pub mod market_data;
pub mod options;
pub mod order;
