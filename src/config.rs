//! Credentials and settings loaded from the JSON config file.
//!
//! ```json
//! {
//!   "mercadolibre": { "client_id": "...", "client_secret": "...", "refresh_token": "...", "user_id": "..." },
//!   "tiendanube": { "api_key": "...", "user_id": "..." },
//!   "settings": { "ml_commission": 13.0, "match_by_sku": true }
//! }
//! ```
//!
//! Every `settings` key is optional. Credential values may be JSON strings
//! or numbers (Mercado Libre hands out numeric client and user IDs).

use log::{debug, info};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::matcher::DEFAULT_NAME_LOCALE;
use crate::models::MatchStrategy;
use crate::pacing::DEFAULT_RATE_LIMIT_SECS;
use crate::pricing::{DEFAULT_COMMISSION_RATE, DEFAULT_ROUND_DIGITS, DEFAULT_TOLERANCE};
use crate::sync::SyncSettings;

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config/credentials.json";

const MAX_ROUND_DIGITS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MercadoLibreCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TiendaNubeCredentials {
    pub api_key: String,
    /// Store ID, part of every API path
    pub user_id: String,
}

/// Tunables from the `settings` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Commission percentage included in Mercado Libre prices
    pub ml_commission: f64,
    /// Seconds to wait before each Mercado Libre request
    pub ml_api_rate_limit: f64,
    /// Seconds to wait before each Tienda Nube request
    pub tn_api_rate_limit: f64,
    /// Match by SKU; false matches by product name
    pub match_by_sku: bool,
    pub price_round_digits: u32,
    /// Minimum price difference that triggers an update
    pub min_price_diff: f64,
    /// Tienda Nube name locale compared when matching by name
    pub name_locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ml_commission: DEFAULT_COMMISSION_RATE,
            ml_api_rate_limit: DEFAULT_RATE_LIMIT_SECS,
            tn_api_rate_limit: DEFAULT_RATE_LIMIT_SECS,
            match_by_sku: true,
            price_round_digits: DEFAULT_ROUND_DIGITS,
            min_price_diff: DEFAULT_TOLERANCE,
            name_locale: DEFAULT_NAME_LOCALE.to_string(),
        }
    }
}

impl Settings {
    pub fn match_strategy(&self) -> MatchStrategy {
        if self.match_by_sku {
            MatchStrategy::BySku
        } else {
            MatchStrategy::ByName
        }
    }

    fn validate(&self) -> Result<()> {
        validate_commission(self.ml_commission)?;
        if !self.min_price_diff.is_finite() || self.min_price_diff < 0.0 {
            return Err(SyncError::Configuration(format!(
                "min_price_diff must be zero or positive, got {}",
                self.min_price_diff
            )));
        }
        if self.price_round_digits > MAX_ROUND_DIGITS {
            return Err(SyncError::Configuration(format!(
                "price_round_digits must be at most {}, got {}",
                MAX_ROUND_DIGITS, self.price_round_digits
            )));
        }
        for (key, value) in [
            ("ml_api_rate_limit", self.ml_api_rate_limit),
            ("tn_api_rate_limit", self.tn_api_rate_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SyncError::Configuration(format!(
                    "{key} must be zero or positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Checks a commission percentage, from the config file or the command line.
///
/// A rate of -100 or below would divide by zero or flip the sign of prices.
pub fn validate_commission(rate_percent: f64) -> Result<()> {
    if !rate_percent.is_finite() || rate_percent <= -100.0 {
        return Err(SyncError::Configuration(format!(
            "ml_commission must be greater than -100, got {}",
            rate_percent
        )));
    }
    Ok(())
}

/// Parsed and validated config file
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mercadolibre: MercadoLibreCredentials,
    pub tiendanube: TiendaNubeCredentials,
    pub settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    mercadolibre: RawMercadoLibre,
    #[serde(default)]
    tiendanube: RawTiendaNube,
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Default, Deserialize)]
struct RawMercadoLibre {
    #[serde(default, deserialize_with = "string_or_number")]
    client_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    client_secret: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    refresh_token: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTiendaNube {
    #[serde(default, deserialize_with = "string_or_number")]
    api_key: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: Option<String>,
}

impl Config {
    /// Loads and validates the config file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Configuration(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&content).map_err(|e| match e {
            SyncError::Json(e) => {
                SyncError::Configuration(format!("Invalid JSON in {}: {}", path.display(), e))
            }
            other => other,
        })?;

        info!("Configuration loaded");
        Ok(config)
    }

    /// Parses and validates config JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(content)?;
        let mut missing = Vec::new();

        let ml = raw.mercadolibre;
        let ml_missing: Vec<&str> = [
            ("client_id", &ml.client_id),
            ("client_secret", &ml.client_secret),
            ("refresh_token", &ml.refresh_token),
            ("user_id", &ml.user_id),
        ]
        .into_iter()
        .filter(|(_, v)| is_blank(v))
        .map(|(k, _)| k)
        .collect();
        if !ml_missing.is_empty() {
            missing.push(format!(
                "Missing Mercado Libre credentials: {}",
                ml_missing.join(", ")
            ));
        }

        let tn = raw.tiendanube;
        let tn_missing: Vec<&str> = [("api_key", &tn.api_key), ("user_id", &tn.user_id)]
            .into_iter()
            .filter(|(_, v)| is_blank(v))
            .map(|(k, _)| k)
            .collect();
        if !tn_missing.is_empty() {
            missing.push(format!(
                "Missing Tienda Nube credentials: {}",
                tn_missing.join(", ")
            ));
        }

        if !missing.is_empty() {
            return Err(SyncError::Configuration(missing.join("; ")));
        }

        raw.settings.validate()?;
        debug!("Settings: {:?}", raw.settings);

        Ok(Self {
            mercadolibre: MercadoLibreCredentials {
                client_id: ml.client_id.unwrap_or_default(),
                client_secret: ml.client_secret.unwrap_or_default(),
                refresh_token: ml.refresh_token.unwrap_or_default(),
                user_id: ml.user_id.unwrap_or_default(),
            },
            tiendanube: TiendaNubeCredentials {
                api_key: tn.api_key.unwrap_or_default(),
                user_id: tn.user_id.unwrap_or_default(),
            },
            settings: raw.settings,
        })
    }

    /// Values consumed by the sync pass.
    pub fn sync_settings(&self, dry_run: bool) -> SyncSettings {
        SyncSettings {
            commission_rate_percent: self.settings.ml_commission,
            match_strategy: self.settings.match_strategy(),
            price_round_digits: self.settings.price_round_digits,
            min_price_diff_tolerance: self.settings.min_price_diff,
            dry_run,
            name_locale: self.settings.name_locale.clone(),
        }
    }
}

/// Writes a rotated Mercado Libre refresh token back into the config file.
///
/// Mercado Libre refresh tokens are single-use, so the next run depends on
/// this. All other content of the file is preserved.
pub fn persist_refresh_token<P: AsRef<Path>>(path: P, refresh_token: &str) -> Result<()> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut doc: serde_json::Value = serde_json::from_str(&content)?;

    let root = doc.as_object_mut().ok_or_else(|| {
        SyncError::Configuration(format!("{} does not contain a JSON object", path.display()))
    })?;
    let section = root
        .entry("mercadolibre")
        .or_insert_with(|| serde_json::json!({}));
    let section = section.as_object_mut().ok_or_else(|| {
        SyncError::Configuration("'mercadolibre' section is not an object".to_string())
    })?;
    section.insert(
        "refresh_token".to_string(),
        serde_json::Value::String(refresh_token.to_string()),
    );

    let mut serialized = serde_json::to_string_pretty(&doc)?;
    serialized.push('\n');

    let tmp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp_path, serialized)?;
    std::fs::rename(&tmp_path, path)?;

    info!("Stored new Mercado Libre refresh token in {}", path.display());
    Ok(())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Accepts a JSON string, number, or null.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
