//! Drives a whole console session against an on-disk fixture: config file
//! in, scripted commands, CSV file out.

use std::io::Write;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_console::app::{MSG_ADDED, MSG_EXPORTED, MSG_LOAD_FAILED, MSG_UPDATED};
use tax_console::{ConsoleConfig, MessageType, TaxApp, session};
use tax_core::SourceConfig;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("tax_rates.json")
}

async fn load_app(config: &ConsoleConfig) -> TaxApp {
    let mut app = TaxApp::new();
    let notice = app.load(&tax_data::build_registry(), &config.source).await;
    assert_eq!(notice.kind, MessageType::Info, "load failed: {notice}");
    app
}

fn config_from_file() -> ConsoleConfig {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "log_level = \"warn\"\n\n[source]\nbackend = \"fixture\"\nlocation = {:?}\n",
        fixture_path().display().to_string()
    )
    .unwrap();
    ConsoleConfig::load(Some(file.path())).expect("config should parse")
}

#[tokio::test]
async fn test_config_file_selects_fixture() {
    let config = config_from_file();

    let app = load_app(&config).await;

    assert_eq!(config.log_level(), "warn");
    assert_eq!(app.store().len(), 2);
    assert_eq!(
        app.state.source,
        Some(format!("fixture:{}", fixture_path().display()))
    );
}

#[tokio::test]
async fn test_scripted_session_then_export() {
    let mut app = load_app(&config_from_file()).await;
    let out_dir = tempfile::tempdir().unwrap();
    let script = format!(
        "\
edit tax_2 --rate 8.25 --description \"State, plus local\"
add --region US_WA --country \"United States\" --state Washington --rate 6.5 --name \"WA Sales Tax\"
delete tax_1
calc --region US_TX --amount 200
export --out {:?}
quit
",
        out_dir.path().display().to_string()
    );

    let mut out = Vec::new();
    session::run_session(&mut app, script.as_bytes(), &mut out, false).unwrap();
    let output = String::from_utf8(out).unwrap();

    for expected in [MSG_UPDATED, MSG_ADDED, MSG_EXPORTED] {
        assert!(output.contains(&format!("success: {expected}\n")), "missing {expected}: {output}");
    }
    assert!(output.contains("Total: $216.50\n"), "got: {output}");

    let csv = std::fs::read_to_string(out_dir.path().join("tax-rates.csv")).unwrap();
    assert_eq!(
        csv,
        "\
Region,Country,State,City,Rate (%),Name,Description,Registration Number,Status
US_TX,United States,Texas,,8.2500,Texas State Sales Tax,\"State, plus local\",,Active
US_WA,United States,Washington,,6.5000,WA Sales Tax,,,Active
"
    );
}

#[tokio::test]
async fn test_edit_preserves_identity() {
    let mut app = load_app(&config_from_file()).await;
    let before = app.store().get("tax_2").unwrap().clone();

    let mut out = Vec::new();
    session::run_line(&mut app, "edit tax_2 --name \"Texas Sales Tax\"", &mut out).unwrap();

    let after = app.store().get("tax_2").unwrap();
    assert_eq!(after.name, "Texas Sales Tax");
    assert_eq!(after.rate, dec!(0.0625));
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.effective, before.effective);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_missing_fixture_starts_empty() {
    let mut app = TaxApp::new();
    let config = SourceConfig {
        backend: "fixture".to_string(),
        location: fixture_path().with_file_name("missing.json").display().to_string(),
    };

    let notice = app.load(&tax_data::build_registry(), &config).await;

    assert_eq!(notice.message, MSG_LOAD_FAILED);
    let mut out = Vec::new();
    session::run_line(&mut app, "summary", &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().starts_with("Total Tax Rates: 0\n"));
}

#[tokio::test]
async fn test_unknown_backend_is_a_load_failure() {
    let mut app = TaxApp::new();
    let config = SourceConfig {
        backend: "postgres".to_string(),
        location: String::new(),
    };

    let notice = app.load(&tax_data::build_registry(), &config).await;

    assert!(notice.is_error());
    assert!(app.store().is_empty());
}
