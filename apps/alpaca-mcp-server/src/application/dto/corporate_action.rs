//! Corporate action announcement DTO

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dividend, split, merger or spinoff announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateAnnouncement {
    /// Announcement ID.
    pub id: String,
    /// Corporate action ID.
    pub corporate_action_id: String,
    /// Action type (`dividend`, `split`, `merger`, `spinoff`).
    pub ca_type: String,
    /// Action sub-type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_sub_type: Option<String>,
    /// Symbol of the initiating company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiating_symbol: Option<String>,
    /// CUSIP of the initiating company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiating_original_cusip: Option<String>,
    /// Symbol of the target company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_symbol: Option<String>,
    /// CUSIP of the target company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_original_cusip: Option<String>,
    /// Declaration date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration_date: Option<NaiveDate>,
    /// Ex-date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ex_date: Option<NaiveDate>,
    /// Record date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_date: Option<NaiveDate>,
    /// Payable date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable_date: Option<NaiveDate>,
    /// Cash amount per share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<Decimal>,
    /// Old rate (splits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_rate: Option<Decimal>,
    /// New rate (splits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_rate: Option<Decimal>,
}
