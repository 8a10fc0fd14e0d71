use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tax_core::{
    CalculationError, SourceConfig, SourceRegistry, TaxRateInput, TaxRateStore,
    calculate_for_region,
};
use tax_data::{EXPORT_FILE_NAME, TaxRateExporter};
use tracing::{error, info, warn};

use crate::cli::RateArgs;
use crate::state::AppState;
use crate::utils::{ParseDecimalError, parse_decimal, parse_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Error,
}

/// Outcome of one console action, shown to the user and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: MessageType,
    pub message: String,
}

impl Notice {
    pub fn new(kind: MessageType, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageType::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            MessageType::Info => "info",
            MessageType::Success => "success",
            MessageType::Error => "error",
        };
        write!(f, "{label}: {}", self.message)
    }
}

pub const MSG_LOAD_FAILED: &str = "Failed to load tax rates";
pub const MSG_REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const MSG_ADDED: &str = "Tax rate added successfully";
pub const MSG_UPDATED: &str = "Tax rate updated successfully";
pub const MSG_ACTIVATED: &str = "Tax rate activated";
pub const MSG_DEACTIVATED: &str = "Tax rate deactivated";
pub const MSG_DELETED: &str = "Tax rate deleted successfully";
pub const MSG_CALC_INPUT: &str = "Please enter an amount and select a region";
pub const MSG_NO_RATE: &str = "No tax rate found for selected region";
pub const MSG_EXPORTED: &str = "Tax rates exported successfully";
pub const MSG_OUT_OF_RANGE: &str = "Amount is too large to calculate tax on";

/// The tax rate console: one store, the actions that change it, and the
/// notice each action produced.
#[derive(Debug, Default)]
pub struct TaxApp {
    pub state: AppState,
    pub status_message: Option<Notice>,
}

impl TaxApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: TaxRateStore) -> Self {
        Self {
            state: AppState::new(store),
            status_message: None,
        }
    }

    pub fn store(&self) -> &TaxRateStore {
        &self.state.store
    }

    pub fn show_message(&mut self, msg: impl Into<String>, msg_type: MessageType) -> Notice {
        let notice = Notice::new(msg_type, msg);
        match notice.kind {
            MessageType::Error => warn!(message = %notice.message, "notice"),
            MessageType::Info | MessageType::Success => {
                info!(message = %notice.message, "notice")
            }
        }
        self.status_message = Some(notice.clone());
        notice
    }

    /// Replaces the store with the contents of the configured source.
    ///
    /// Any failure, from an unknown backend to a malformed document, leaves
    /// an empty store and an error notice.
    pub async fn load(&mut self, registry: &SourceRegistry, config: &SourceConfig) -> Notice {
        let loaded = match registry.create(config).await {
            Ok(source) => {
                let label = source.describe();
                TaxRateStore::load_from(source.as_ref())
                    .await
                    .map(|store| (store, label))
            }
            Err(e) => Err(e),
        };

        match loaded {
            Ok((store, label)) => {
                let count = store.len();
                self.state = AppState::new(store);
                self.state.source = Some(label.clone());
                let message = format!("Loaded {count} tax rates from {label}");
                self.show_message(message, MessageType::Info)
            }
            Err(e) => {
                error!(error = %e, backend = %config.backend, "failed to load tax rates");
                self.state = AppState::default();
                self.show_message(MSG_LOAD_FAILED, MessageType::Error)
            }
        }
    }

    /// Adds a new, active rate from form fields.
    pub fn add_tax_rate(&mut self, fields: &RateArgs) -> Notice {
        let input = match fill_input(fields, TaxRateInput::default()) {
            Ok(input) => input,
            Err(e) => return self.show_message(e.to_string(), MessageType::Error),
        };

        match self.state.store.add(input).map(|_| ()) {
            Ok(()) => self.show_message(MSG_ADDED, MessageType::Success),
            Err(_) => self.show_message(MSG_REQUIRED_FIELDS, MessageType::Error),
        }
    }

    /// Edits rate `id`. The form starts from the stored record; only the
    /// fields given in `fields` change.
    pub fn update_tax_rate(&mut self, id: &str, fields: &RateArgs) -> Notice {
        let Some(existing) = self.state.store.get(id) else {
            return self.not_found(id);
        };
        let input = match fill_input(fields, TaxRateInput::from(existing)) {
            Ok(input) => input,
            Err(e) => return self.show_message(e.to_string(), MessageType::Error),
        };

        match self.state.store.update(id, input).map(|updated| updated.is_some()) {
            Ok(true) => self.show_message(MSG_UPDATED, MessageType::Success),
            Ok(false) => self.not_found(id),
            Err(_) => self.show_message(MSG_REQUIRED_FIELDS, MessageType::Error),
        }
    }

    pub fn toggle_tax_rate(&mut self, id: &str) -> Notice {
        match self.state.store.toggle(id) {
            Some(true) => self.show_message(MSG_ACTIVATED, MessageType::Success),
            Some(false) => self.show_message(MSG_DEACTIVATED, MessageType::Success),
            None => self.not_found(id),
        }
    }

    pub fn delete_tax_rate(&mut self, id: &str) -> Notice {
        if self.state.store.remove(id) {
            self.show_message(MSG_DELETED, MessageType::Success)
        } else {
            self.not_found(id)
        }
    }

    /// Runs the calculator panel: `amount` is the text typed into the amount
    /// field. The result is kept in [`AppState::last_calculation`].
    pub fn calculate_tax(&mut self, region: &str, amount: &str) -> Notice {
        let amount = match parse_decimal(amount) {
            Ok(amount) => amount,
            Err(e) => return self.show_message(e.to_string(), MessageType::Error),
        };

        match calculate_for_region(self.state.store.rates(), region, amount) {
            Ok(calculation) => {
                self.state.last_calculation = Some(calculation);
                self.show_message(format!("Tax calculated for {region}"), MessageType::Info)
            }
            Err(CalculationError::MissingInput) => {
                self.show_message(MSG_CALC_INPUT, MessageType::Error)
            }
            Err(CalculationError::NoActiveRate(_)) => {
                self.show_message(MSG_NO_RATE, MessageType::Error)
            }
            Err(CalculationError::Overflow { .. }) => {
                self.show_message(MSG_OUT_OF_RANGE, MessageType::Error)
            }
        }
    }

    /// Writes every rate, active or not, as CSV.
    pub fn export_tax_rates<W: Write>(&mut self, writer: W) -> Notice {
        match TaxRateExporter::write_csv(self.state.store.rates(), writer) {
            Ok(()) => {
                info!(rows = self.state.store.len(), "exported tax rates");
                self.show_message(MSG_EXPORTED, MessageType::Success)
            }
            Err(e) => {
                error!(error = %e, "tax rate export failed");
                self.show_message(format!("Export failed: {e}"), MessageType::Error)
            }
        }
    }

    /// Exports to a file. A directory gets [`EXPORT_FILE_NAME`] inside it.
    pub fn export_to_path(&mut self, out: &Path) -> Notice {
        let path = export_path(out);
        match File::create(&path) {
            Ok(file) => {
                let notice = self.export_tax_rates(BufWriter::new(file));
                info!(path = %path.display(), "wrote CSV export");
                notice
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot create export file");
                self.show_message(
                    format!("Cannot write {}: {e}", path.display()),
                    MessageType::Error,
                )
            }
        }
    }

    fn not_found(&mut self, id: &str) -> Notice {
        self.show_message(format!("No tax rate with id {id}"), MessageType::Info)
    }
}

/// Where `--out` sends the export.
pub fn export_path(out: &Path) -> PathBuf {
    if out.is_dir() {
        out.join(EXPORT_FILE_NAME)
    } else {
        out.to_path_buf()
    }
}

/// Overlays the given form fields onto `base`.
fn fill_input(fields: &RateArgs, mut base: TaxRateInput) -> Result<TaxRateInput, ParseDecimalError> {
    let text_fields = [
        (&fields.region, &mut base.region),
        (&fields.country, &mut base.country),
        (&fields.state, &mut base.state),
        (&fields.city, &mut base.city),
        (&fields.name, &mut base.name),
        (&fields.description, &mut base.description),
        (&fields.registration_number, &mut base.registration_number),
    ];
    for (given, slot) in text_fields {
        if let Some(value) = given {
            *slot = value.clone();
        }
    }
    if let Some(rate) = &fields.rate {
        base.rate_percent = parse_percent(rate)?;
    }
    Ok(base)
}
