//! Market Data Value Objects

mod timeframe;

pub use timeframe::{BarWindow, Timeframe, TimeframeError, TimeframeUnit};
