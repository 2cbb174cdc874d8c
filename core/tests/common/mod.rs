//! Shared fixture builders for the integration tests.

#![allow(dead_code)]

use amlgraph_core::config::DetectionConfig;
use amlgraph_core::record::{AccountRecord, TransactionRecord};

pub fn account(id: &str, country: &str) -> AccountRecord {
    AccountRecord {
        account_id: id.into(),
        owner_name: format!("Owner {id}"),
        registration_date: "2021-06-01".into(),
        country: country.into(),
        is_suspicious: None,
        suspicious_type: None,
        suspicious_role: None,
    }
}

pub fn tx(id: &str, src: &str, dst: &str, amount: f64, value_date: &str) -> TransactionRecord {
    TransactionRecord {
        transaction_id: id.into(),
        src_account: src.into(),
        src_account_country: None,
        dst_account: dst.into(),
        dst_account_country: None,
        amount,
        currency: "CNY".into(),
        value_date: value_date.into(),
        is_suspicious: None,
        suspicious_type: None,
    }
}

pub fn high_risk_config(countries: &[&str]) -> DetectionConfig {
    DetectionConfig {
        high_risk_countries: countries.iter().map(|c| c.to_string()).collect(),
        ..DetectionConfig::default()
    }
}
