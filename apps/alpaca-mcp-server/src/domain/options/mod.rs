//! Option Contract Value Objects
//!
//! OCC symbol parsing and classification of multi-leg strategies, used to
//! explain permission rejections.

mod occ_symbol;
mod strategy;

pub use occ_symbol::{ContractType, OccSymbol, OccSymbolError};
pub use strategy::{LegIntent, ShortStrategy};
