//! Cross-pattern aggregation tests: precedence, determinism, coverage.

mod common;

use amlgraph_core::{
    config::DetectionConfig,
    engine::DetectionEngine,
    finding::{PatternType, Role},
    record::{AccountRecord, TransactionRecord},
};
use common::{account, high_risk_config, tx};

/// Triangle on 10000001/2/3 plus a five-source star into 10000001 on a
/// different day, so the same account is hit by two families.
fn loop_and_star_fixture() -> (Vec<AccountRecord>, Vec<TransactionRecord>) {
    let mut accounts = vec![
        account("10000001", "CN"),
        account("10000002", "CN"),
        account("10000003", "CN"),
    ];
    let mut transactions = vec![
        tx("TXN000001", "10000001", "10000002", 5000.0, "2023-03-01 09:00:00"),
        tx("TXN000002", "10000002", "10000003", 5000.0, "2023-03-01 10:00:00"),
        tx("TXN000003", "10000003", "10000001", 5000.0, "2023-03-01 11:00:00"),
    ];
    for i in 1..=5 {
        let source = format!("3000000{i}");
        accounts.push(account(&source, "CN"));
        transactions.push(tx(
            &format!("TXN00010{i}"),
            &source,
            "10000001",
            8000.0,
            "2023-04-01 10:00:00",
        ));
    }
    (accounts, transactions)
}

/// An account in both a loop and a star keeps the loop label only.
#[test]
fn loop_takes_precedence_over_star() {
    let engine = DetectionEngine::new(DetectionConfig::default()).expect("valid config");
    let (accounts, transactions) = loop_and_star_fixture();

    let outcome = engine.run(&accounts, &transactions).expect("run");

    // Both families matched.
    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups[0].pattern, PatternType::CircularTransfer);
    assert_eq!(outcome.groups[1].pattern, PatternType::StarFanIn);

    // 10000001 is the star's sink, but the loop wrote first.
    let finding = outcome.account_finding("10000001").expect("finding");
    assert_eq!(finding.pattern, PatternType::CircularTransfer);
    assert_eq!(finding.role, Role::Launderer);

    // The star's sources still carry the star label.
    for i in 1..=5 {
        let finding = outcome
            .account_finding(&format!("3000000{i}"))
            .expect("finding");
        assert_eq!(finding.pattern, PatternType::StarFanIn);
        assert_eq!(finding.role, Role::Accomplice);
    }
}

/// A transaction shared by a loop and a star keeps the loop label.
#[test]
fn transaction_precedence_follows_family_order() {
    let engine = DetectionEngine::new(DetectionConfig::default()).expect("valid config");

    // Triangle edge TXN000003 (10000003 -> 10000001) doubles as one of the
    // star's five same-day sub-threshold deposits into 10000001.
    let mut accounts = vec![
        account("10000001", "CN"),
        account("10000002", "CN"),
        account("10000003", "CN"),
    ];
    let mut transactions = vec![
        tx("TXN000001", "10000001", "10000002", 5000.0, "2023-03-01 09:00:00"),
        tx("TXN000002", "10000002", "10000003", 5000.0, "2023-03-01 10:00:00"),
        tx("TXN000003", "10000003", "10000001", 5000.0, "2023-03-01 11:00:00"),
    ];
    for i in 1..=4 {
        let source = format!("3000000{i}");
        accounts.push(account(&source, "CN"));
        transactions.push(tx(
            &format!("TXN00010{i}"),
            &source,
            "10000001",
            8000.0,
            "2023-03-01 12:00:00",
        ));
    }

    let outcome = engine.run(&accounts, &transactions).expect("run");

    let star = outcome
        .groups
        .iter()
        .find(|g| g.pattern == PatternType::StarFanIn)
        .expect("star group");
    assert!(
        star.transactions.contains(&"TXN000003".to_string()),
        "the triangle edge is a member of the star group"
    );
    assert_eq!(
        outcome.transaction_pattern("TXN000003"),
        Some(PatternType::CircularTransfer),
        "but the loop family wrote its label first"
    );
}

/// Within one family, the first discovered group wins for shared ids.
#[test]
fn within_family_first_writer_wins() {
    let engine = DetectionEngine::new(DetectionConfig::default()).expect("valid config");

    // Two triangles sharing 10000001. The first triangle's edges carry the
    // smaller transaction ids, so it is discovered first; its earliest edge
    // belongs to 10000001, making it the launderer there. In the second
    // triangle 10000001 would only be an accomplice.
    let accounts = vec![
        account("10000001", "CN"),
        account("10000002", "CN"),
        account("10000003", "CN"),
        account("10000004", "CN"),
        account("10000005", "CN"),
    ];
    let transactions = vec![
        tx("TXN000001", "10000001", "10000002", 5000.0, "2023-03-01 09:00:00"),
        tx("TXN000002", "10000002", "10000003", 5000.0, "2023-03-01 10:00:00"),
        tx("TXN000003", "10000003", "10000001", 5000.0, "2023-03-01 11:00:00"),
        tx("TXN000004", "10000001", "10000004", 7000.0, "2023-03-02 09:00:00"),
        tx("TXN000005", "10000004", "10000005", 7000.0, "2023-03-02 08:00:00"),
        tx("TXN000006", "10000005", "10000001", 7000.0, "2023-03-02 10:00:00"),
    ];

    let outcome = engine.run(&accounts, &transactions).expect("run");

    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups[0].launderer, "10000001");
    assert_eq!(outcome.groups[1].launderer, "10000004");

    let finding = outcome.account_finding("10000001").expect("finding");
    assert_eq!(
        finding.role,
        Role::Launderer,
        "the first discovered triangle fixed the role"
    );
}

/// Everything the engine emits is a pure function of its input: two runs
/// over identical records produce identical labeled output.
#[test]
fn identical_runs_produce_identical_output() {
    let config = high_risk_config(&["XR"]);

    let mut accounts = vec![
        account("10000001", "CN"),
        account("10000002", "CN"),
        account("10000003", "CN"),
        account("10000006", "US"),
        account("10000007", "GB"),
        account("10000009", "XR"),
    ];
    let mut transactions = vec![
        // triangle
        tx("TXN000001", "10000001", "10000002", 5000.0, "2023-03-01 09:00:00"),
        tx("TXN000002", "10000002", "10000003", 5000.0, "2023-03-01 10:00:00"),
        tx("TXN000003", "10000003", "10000001", 5000.0, "2023-03-01 11:00:00"),
        // chain into the high-risk terminal
        tx("TXN000011", "10000001", "10000006", 1500.0, "2023-06-01 09:00:00"),
        tx("TXN000012", "10000006", "10000007", 2500.0, "2023-06-01 10:00:00"),
        tx("TXN000013", "10000007", "10000009", 3500.0, "2023-06-01 11:00:00"),
    ];
    // star into 10000002
    for i in 1..=5 {
        let source = format!("3000000{i}");
        accounts.push(account(&source, "CN"));
        transactions.push(tx(
            &format!("TXN00010{i}"),
            &source,
            "10000002",
            8000.0,
            "2023-04-01 10:00:00",
        ));
    }

    let run = |config: DetectionConfig| {
        let engine = DetectionEngine::new(config).expect("valid config");
        let outcome = engine.run(&accounts, &transactions).expect("run");
        (
            outcome.label_accounts(&accounts),
            outcome.label_transactions(&transactions),
            outcome.groups,
        )
    };

    let (accounts_a, transactions_a, groups_a) = run(config.clone());
    let (accounts_b, transactions_b, groups_b) = run(config);

    assert_eq!(groups_a, groups_b, "group discovery order diverged");
    assert_eq!(accounts_a, accounts_b, "account labels diverged");
    assert_eq!(transactions_a, transactions_b, "transaction labels diverged");
}

/// Every input id appears exactly once in the labeled output, in input
/// order, defaulted to not-suspicious.
#[test]
fn round_trip_coverage() {
    let engine = DetectionEngine::new(DetectionConfig::default()).expect("valid config");

    let mut accounts = vec![
        account("10000001", "CN"),
        account("10000002", "CN"),
        account("10000003", "CN"),
    ];
    let mut transactions = vec![
        tx("TXN000001", "10000001", "10000002", 5000.0, "2023-03-01 09:00:00"),
        tx("TXN000002", "10000002", "10000003", 5000.0, "2023-03-01 10:00:00"),
        tx("TXN000003", "10000003", "10000001", 5000.0, "2023-03-01 11:00:00"),
    ];
    // Bystanders the detectors never touch.
    accounts.push(account("99999998", "US"));
    accounts.push(account("99999999", "GB"));
    transactions.push(tx(
        "TXN000900",
        "99999998",
        "99999999",
        123.45,
        "2023-08-01 09:00:00",
    ));

    let outcome = engine.run(&accounts, &transactions).expect("run");
    let labeled_accounts = outcome.label_accounts(&accounts);
    let labeled_transactions = outcome.label_transactions(&transactions);

    assert_eq!(labeled_accounts.len(), accounts.len());
    assert_eq!(labeled_transactions.len(), transactions.len());
    for (input, output) in accounts.iter().zip(&labeled_accounts) {
        assert_eq!(input.account_id, output.account_id, "input order preserved");
    }

    let bystander = labeled_accounts
        .iter()
        .find(|r| r.account_id == "99999999")
        .expect("bystander present");
    assert!(!bystander.detected_suspicious);
    assert!(bystander.detected_suspicious_type.is_empty());
    assert!(bystander.detected_suspicious_role.is_empty());

    let flagged = labeled_accounts
        .iter()
        .find(|r| r.account_id == "10000001")
        .expect("flagged present");
    assert!(flagged.detected_suspicious);
    assert_eq!(flagged.detected_suspicious_type, "circular_transfer");
    assert_eq!(flagged.detected_suspicious_role, "launderer");

    let clean_tx = labeled_transactions
        .iter()
        .find(|r| r.transaction_id == "TXN000900")
        .expect("clean transaction present");
    assert!(!clean_tx.detected_suspicious);
    assert!(clean_tx.detected_suspicious_type.is_empty());
}
