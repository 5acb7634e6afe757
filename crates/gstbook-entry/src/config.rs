//! # Entry Configuration
//!
//! Settings for the purchase-entry session, loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Loading Order (later wins)                           │
//! │                                                                         │
//! │  1. Defaults (this file)                                                │
//! │         │      home state "33", ₹, 20 suppliers per page, 6 suggestions │
//! │         ▼                                                               │
//! │  2. entry.toml in the platform config dir (if present)                  │
//! │         │      Linux:   ~/.config/gstbook/entry.toml                    │
//! │         │      macOS:   ~/Library/Application Support/com.gstbook.../   │
//! │         ▼                                                               │
//! │  3. Environment variables (GSTBOOK_*)                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # entry.toml
//! home_state_code = "29"
//! currency_symbol = "₹"
//! supplier_page_size = 50
//! suggestion_limit = 6
//! ```
//!
//! Read-only after load, so no mutex.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use gstbook_core::money::Money;
use gstbook_core::types::SupplierQuery;
use gstbook_core::{HomeState, DEFAULT_HOME_STATE_CODE, DEFAULT_SUGGESTION_LIMIT};

use crate::error::{ConfigError, ConfigResult};

/// Purchase-entry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Two-digit GST state code of the buyer.
    pub home_state_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Suppliers fetched per `get_suppliers` call.
    pub supplier_page_size: i64,

    /// Rows shown in the supplier and part dropdowns.
    pub suggestion_limit: usize,
}

impl Default for EntryConfig {
    fn default() -> Self {
        EntryConfig {
            home_state_code: DEFAULT_HOME_STATE_CODE.to_string(),
            currency_symbol: "₹".to_string(),
            supplier_page_size: 20,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl EntryConfig {
    /// Loads configuration from file and environment.
    ///
    /// `config_path` overrides the platform default location. A missing
    /// file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading entry config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load entry config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Checks every value is usable.
    ///
    /// ## Rules
    /// - `home_state_code` is exactly two ASCII digits
    /// - `supplier_page_size` is 1..=200
    /// - `suggestion_limit` is at least 1
    pub fn validate(&self) -> ConfigResult<()> {
        let code = &self.home_state_code;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Invalid(format!(
                "home_state_code must be two digits, got: '{}'",
                code
            )));
        }

        if !(1..=SupplierQuery::MAX_PAGE_SIZE).contains(&self.supplier_page_size) {
            return Err(ConfigError::Invalid(format!(
                "supplier_page_size must be between 1 and {}, got: {}",
                SupplierQuery::MAX_PAGE_SIZE,
                self.supplier_page_size
            )));
        }

        if self.suggestion_limit == 0 {
            return Err(ConfigError::Invalid(
                "suggestion_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Applies `GSTBOOK_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("GSTBOOK_HOME_STATE") {
            debug!(home_state = %code, "Overriding home state from environment");
            self.home_state_code = code.trim().to_string();
        }

        if let Some(symbol) = lookup("GSTBOOK_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(size) = lookup("GSTBOOK_SUPPLIER_PAGE_SIZE") {
            match size.trim().parse::<i64>() {
                Ok(n) => self.supplier_page_size = n,
                Err(_) => warn!(value = %size, "Ignoring invalid GSTBOOK_SUPPLIER_PAGE_SIZE"),
            }
        }

        if let Some(limit) = lookup("GSTBOOK_SUGGESTION_LIMIT") {
            match limit.trim().parse::<usize>() {
                Ok(n) => self.suggestion_limit = n,
                Err(_) => warn!(value = %limit, "Ignoring invalid GSTBOOK_SUGGESTION_LIMIT"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "gstbook", "gstbook")
            .map(|dirs| dirs.config_dir().join("entry.toml"))
    }

    /// The configured home state for the tax engine.
    pub fn home_state(&self) -> HomeState {
        HomeState::new(self.home_state_code.clone())
    }

    /// Formats an amount with the currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use gstbook_core::Money;
    /// use gstbook_entry::config::EntryConfig;
    ///
    /// let config = EntryConfig::default();
    /// assert_eq!(config.format_currency(Money::from_paise(123450)), "₹1234.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.rupees().abs(),
            amount.paise_part()
        )
    }
}
