//! scan-runner: headless AML motif detection runner.
//!
//! Usage:
//!   scan-runner --accounts mock_data/account.csv --transactions mock_data/transaction.csv
//!   scan-runner --accounts a.csv --transactions t.csv --out result --config detection.json
//!   scan-runner --accounts a.csv --transactions t.csv --high-risk "KP,IR,SY"
//!
//! Reads the two input CSVs, runs the detection engine, and writes
//! `detected_account.csv` and `detected_transaction.csv` to the output
//! directory. A failed run exits non-zero with the error on stderr, so
//! downstream consumers never mistake a failure for zero findings.

use amlgraph_core::{config::DetectionConfig, dataset, engine::DetectionEngine};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let accounts_path = require_arg(&args, "--accounts")?;
    let transactions_path = require_arg(&args, "--transactions")?;
    let out_dir = optional_arg(&args, "--out").unwrap_or_else(|| "result".to_string());

    let mut config = match optional_arg(&args, "--config") {
        Some(path) => DetectionConfig::load(&path)?,
        None => DetectionConfig::default(),
    };
    if let Some(list) = optional_arg(&args, "--high-risk") {
        config.high_risk_countries = list
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }

    println!("scan-runner — AML motif detection");
    println!("  accounts:     {accounts_path}");
    println!("  transactions: {transactions_path}");
    println!("  out:          {out_dir}");
    println!("  high-risk:    {:?}", config.high_risk_countries);
    println!();

    let accounts = dataset::read_accounts(&accounts_path)
        .with_context(|| format!("reading {accounts_path}"))?;
    let transactions = dataset::read_transactions(&transactions_path)
        .with_context(|| format!("reading {transactions_path}"))?;
    log::info!(
        "loaded {} account(s), {} transaction(s)",
        accounts.len(),
        transactions.len()
    );

    let engine = DetectionEngine::new(config)?;
    let outcome = engine.run(&accounts, &transactions)?;

    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {out_dir}"))?;
    let account_out = Path::new(&out_dir).join("detected_account.csv");
    let transaction_out = Path::new(&out_dir).join("detected_transaction.csv");
    dataset::write_labeled_accounts(&account_out, &outcome.label_accounts(&accounts))?;
    dataset::write_labeled_transactions(&transaction_out, &outcome.label_transactions(&transactions))?;

    let summary = outcome.summary();
    println!("detection complete");
    println!("  matched groups:          {}", summary.group_count);
    println!("  suspicious accounts:     {}", summary.suspicious_accounts);
    println!("  suspicious transactions: {}", summary.suspicious_transactions);
    for (pattern, count) in &summary.accounts_by_pattern {
        println!("    {pattern}: {count} account(s)");
    }
    println!();
    println!("results written to {}", out_dir);

    Ok(())
}

fn require_arg(args: &[String], flag: &str) -> Result<String> {
    optional_arg(args, flag).with_context(|| format!("missing required argument {flag} <value>"))
}

fn optional_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}
