//! End-to-end tests: fixture file in, store mutations, calculation, CSV out.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{
    CalculationError, SourceConfig, SourceError, TaxRateInput, TaxRateStore, calculate_for_region,
};
use tax_data::{FixtureLoader, FixtureSource, TaxRateExporter, build_registry};

const TEST_FIXTURE: &str = include_str!("../test-data/tax_rates.json");

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join("tax_rates.json")
}

async fn load_store() -> TaxRateStore {
    TaxRateStore::load_from(&FixtureSource::new(fixture_path()))
        .await
        .expect("Failed to load fixture")
}

#[tokio::test]
async fn test_load_fixture_through_registry() {
    let config = SourceConfig {
        backend: "fixture".to_string(),
        location: fixture_path().display().to_string(),
    };

    let source = build_registry().create(&config).await.expect("Failed to create source");
    let store = TaxRateStore::load_from(source.as_ref()).await.expect("Failed to load");

    assert_eq!(store.rates(), FixtureLoader::parse_str(TEST_FIXTURE).unwrap().as_slice());
}

#[tokio::test]
async fn test_missing_fixture_leaves_caller_with_empty_store() {
    let source = FixtureSource::new("/no/such/tax-rates.json");

    let store = match TaxRateStore::load_from(&source).await {
        Ok(store) => store,
        Err(SourceError::NotFound(_)) => TaxRateStore::new(),
        Err(other) => panic!("expected NotFound, got {other:?}"),
    };

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_resolve_skips_inactive_and_prefers_earliest_active() {
    let store = load_store().await;

    let resolved = store.resolve("US_NY").expect("US_NY should resolve");

    // tax_2 is inactive; tax_3 and tax_4 are both active, tax_3 comes first.
    assert_eq!(resolved.id, "tax_3");
}

#[tokio::test]
async fn test_calculate_ontario_hst() {
    let store = load_store().await;

    let result = calculate_for_region(store.rates(), "CA_ON", dec!(100)).unwrap();

    assert_eq!(result.subtotal, dec!(100));
    assert_eq!(result.tax_amount, dec!(13));
    assert_eq!(result.total, dec!(113));
    assert_eq!(result.applied_rates[0].region, "CA_ON");
}

#[tokio::test]
async fn test_calculate_after_toggle_and_remove() {
    let mut store = load_store().await;

    store.toggle("tax_3");
    let result = calculate_for_region(store.rates(), "US_NY", dec!(200)).unwrap();
    assert_eq!(result.tax_amount, dec!(16));

    store.remove("tax_4");
    assert_eq!(
        calculate_for_region(store.rates(), "US_NY", dec!(200)),
        Err(CalculationError::NoActiveRate("US_NY".to_string()))
    );
}

#[tokio::test]
async fn test_summary_of_fixture() {
    let store = load_store().await;

    let summary = store.summary();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.active, 3);
    assert_eq!(summary.canada, 1);
    assert_eq!(summary.united_states, 3);
}

#[tokio::test]
async fn test_export_fixture() {
    let store = load_store().await;

    let csv = TaxRateExporter::to_csv(store.rates()).expect("Failed to export");

    let expected = "\
Region,Country,State,City,Rate (%),Name,Description,Registration Number,Status
CA_ON,Canada,Ontario,Toronto,13.0000,Ontario HST,\"Harmonized Sales Tax, federal and provincial\",123456789RT0001,Active
US_NY,United States,New York,,4.0000,New York State Sales Tax,State portion only,,Inactive
US_NY,United States,New York,New York City,8.8750,New York City Sales Tax,\"State, city and MCTD\",,Active
US_NY,United States,New York,Buffalo,8.0000,Erie County Sales Tax,,,Active
";
    assert_eq!(csv, expected);
}

#[tokio::test]
async fn test_added_rate_is_exported_last_with_percentage() {
    let mut store = load_store().await;
    store
        .add(TaxRateInput {
            region: "CA_QC".to_string(),
            country: "Canada".to_string(),
            state: "Quebec".to_string(),
            rate_percent: dec!(14.975),
            name: "Quebec GST + QST".to_string(),
            ..Default::default()
        })
        .expect("Failed to add");

    let csv = TaxRateExporter::to_csv(store.rates()).unwrap();
    let last = csv.lines().last().unwrap();

    assert_eq!(last, "CA_QC,Canada,Quebec,,14.9750,Quebec GST + QST,,,Active");
}

#[tokio::test]
async fn test_export_to_file() {
    let store = load_store().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(tax_data::EXPORT_FILE_NAME);

    let file = std::fs::File::create(&path).unwrap();
    TaxRateExporter::write_csv(store.rates(), file).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, TaxRateExporter::to_csv(store.rates()).unwrap());
}
