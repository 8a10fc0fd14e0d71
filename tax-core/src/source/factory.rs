use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::{SourceError, TaxRateSource};

/// Where the store's tax rates come from at startup.
///
/// This is the `[source]` table of the console's config file. `memory`
/// serves the demo rates bundled with the binary; `fixture` reads a JSON
/// document whose path is `location`.
///
/// ```toml
/// [source]
/// backend = "fixture"
/// location = "data/tax-rates.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub backend: String,
    /// Fixture path for `fixture`; unused by `memory`.
    pub location: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            location: String::new(),
        }
    }
}

/// Turns a [`SourceConfig`] into a tax rate source of one kind.
#[async_trait]
pub trait SourceFactory: Send + Sync {
    /// The `backend` value this factory answers to.
    fn backend_name(&self) -> &'static str;

    /// Check `config.location` and open the source. Nothing is read until
    /// [`TaxRateSource::fetch_tax_rates`] is called.
    async fn create(&self, config: &SourceConfig) -> Result<Box<dyn TaxRateSource>, SourceError>;
}

/// The tax rate sources the console can load from, by backend name.
pub struct SourceRegistry {
    factories: HashMap<&'static str, Box<dyn SourceFactory>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Add a source kind. A later factory with the same name wins.
    pub fn register(&mut self, factory: Box<dyn SourceFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Open the tax rate source named by `config.backend`.
    ///
    /// # Errors
    ///
    /// [`SourceError::Configuration`] when no source of that kind is
    /// registered, otherwise whatever the factory reports about `location`.
    pub async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn TaxRateSource>, SourceError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(SourceError::Configuration(format!(
                "no tax rate source named '{}' (registered: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        factory.create(config).await
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::TaxRate;

    use super::*;

    fn ontario() -> TaxRate {
        let stamp = Utc.timestamp_millis_opt(0).unwrap();
        TaxRate {
            id: "tax_1".to_string(),
            region: "CA_ON".to_string(),
            country: "Canada".to_string(),
            state: Some("Ontario".to_string()),
            city: None,
            rate: dec!(0.13),
            name: "Ontario HST".to_string(),
            description: String::new(),
            registration_number: None,
            effective: true,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    struct ListSource {
        label: String,
        rates: Vec<TaxRate>,
    }

    #[async_trait]
    impl TaxRateSource for ListSource {
        fn describe(&self) -> String {
            self.label.clone()
        }

        async fn fetch_tax_rates(&self) -> Result<Vec<TaxRate>, SourceError> {
            Ok(self.rates.clone())
        }
    }

    /// Serves one Ontario record and remembers every location it was
    /// opened with.
    struct ListFactory {
        name: &'static str,
        opened: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SourceFactory for ListFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(&self, config: &SourceConfig) -> Result<Box<dyn TaxRateSource>, SourceError> {
            self.opened.lock().unwrap().push(config.location.clone());
            Ok(Box::new(ListSource {
                label: format!("{}:{}", self.name, config.location),
                rates: vec![ontario()],
            }))
        }
    }

    /// A fixture-style factory that needs a path.
    struct PathRequiredFactory;

    #[async_trait]
    impl SourceFactory for PathRequiredFactory {
        fn backend_name(&self) -> &'static str {
            "fixture"
        }

        async fn create(&self, config: &SourceConfig) -> Result<Box<dyn TaxRateSource>, SourceError> {
            Err(SourceError::NotFound(config.location.clone()))
        }
    }

    fn list_factory(name: &'static str) -> (Box<dyn SourceFactory>, Arc<Mutex<Vec<String>>>) {
        let opened = Arc::new(Mutex::new(Vec::new()));
        let factory = ListFactory {
            name,
            opened: Arc::clone(&opened),
        };
        (Box::new(factory), opened)
    }

    fn config(backend: &str, location: &str) -> SourceConfig {
        SourceConfig {
            backend: backend.to_string(),
            location: location.to_string(),
        }
    }

    #[test]
    fn default_config_uses_bundled_rates() {
        assert_eq!(SourceConfig::default(), config("memory", ""));
    }

    #[test]
    fn config_reads_source_table() {
        #[derive(Deserialize)]
        struct File {
            source: SourceConfig,
        }

        let file: File =
            toml::from_str("[source]\nbackend = \"fixture\"\nlocation = \"rates.json\"\n").unwrap();

        assert_eq!(file.source, config("fixture", "rates.json"));
    }

    #[test]
    fn empty_registry_has_no_backends() {
        assert!(SourceRegistry::default().available_backends().is_empty());
    }

    #[test]
    fn available_backends_are_sorted() {
        let mut registry = SourceRegistry::new();
        registry.register(list_factory("memory").0);
        registry.register(list_factory("fixture").0);

        assert_eq!(registry.available_backends(), vec!["fixture", "memory"]);
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let mut registry = SourceRegistry::new();
        let (first, first_opened) = list_factory("fixture");
        let (second, second_opened) = list_factory("fixture");
        registry.register(first);
        registry.register(second);

        registry.create(&config("fixture", "rates.json")).await.unwrap();

        assert_eq!(registry.available_backends(), vec!["fixture"]);
        assert!(first_opened.lock().unwrap().is_empty());
        assert_eq!(*second_opened.lock().unwrap(), vec!["rates.json"]);
    }

    #[tokio::test]
    async fn create_opens_named_source_with_its_location() {
        let mut registry = SourceRegistry::new();
        let (fixture, fixture_opened) = list_factory("fixture");
        let (memory, memory_opened) = list_factory("memory");
        registry.register(fixture);
        registry.register(memory);

        let source = registry.create(&config("fixture", "data/tax-rates.json")).await.unwrap();

        assert_eq!(source.describe(), "fixture:data/tax-rates.json");
        assert_eq!(source.fetch_tax_rates().await.unwrap(), vec![ontario()]);
        assert_eq!(*fixture_opened.lock().unwrap(), vec!["data/tax-rates.json"]);
        assert!(memory_opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_backend_lists_registered_sources() {
        let mut registry = SourceRegistry::new();
        registry.register(list_factory("memory").0);
        registry.register(list_factory("fixture").0);

        let result = registry.create(&config("postgres", "")).await;

        let Err(SourceError::Configuration(msg)) = result else {
            panic!("expected a configuration error");
        };
        assert_eq!(msg, "no tax rate source named 'postgres' (registered: fixture, memory)");
    }

    #[tokio::test]
    async fn create_surfaces_factory_error() {
        let mut registry = SourceRegistry::new();
        registry.register(Box::new(PathRequiredFactory));

        let result = registry.create(&config("fixture", "missing.json")).await;

        assert!(matches!(result, Err(SourceError::NotFound(path)) if path == "missing.json"));
    }
}
