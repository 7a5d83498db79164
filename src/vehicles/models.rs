//! Vehicle listing models and data structures.
//!
//! Contains the vehicle record shown in the storefront, the raw shape
//! returned by the listing endpoint, and price formatting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Image shown when a vehicle has no asset of its own.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Identifier of a vehicle, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleId {
    /// Numeric identifier (`"id": 3`)
    Number(i64),
    /// Textual identifier (`"id": "a1b2"`)
    Text(String),
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleId::Number(n) => write!(f, "{}", n),
            VehicleId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for VehicleId {
    fn from(value: i64) -> Self {
        VehicleId::Number(value)
    }
}

impl From<&str> for VehicleId {
    fn from(value: &str) -> Self {
        VehicleId::Text(value.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(value: String) -> Self {
        VehicleId::Text(value)
    }
}

/// Descriptive technical data. Display-only, never filtered on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSpecs {
    /// Engine description (e.g. "1.8L 4-cilindros")
    pub engine: Option<String>,
    /// Transmission type
    pub transmission: Option<String>,
    /// Mileage as free text
    pub mileage: Option<String>,
    /// Paint color
    pub color: Option<String>,
}

impl VehicleSpecs {
    /// Labelled entries that carry a value, in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Motor", &self.engine),
            ("Transmissão", &self.transmission),
            ("Quilometragem", &self.mileage),
            ("Cor", &self.color),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// One listed vehicle.
///
/// Records are immutable once loaded; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Unique identifier within the listing
    pub id: VehicleId,
    /// Manufacturer name
    pub brand: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: i32,
    /// Asking price, currency-agnostic, never negative
    pub price: f64,
    /// Display asset reference
    #[serde(default)]
    pub image: Option<String>,
    /// Short marketing description
    #[serde(default)]
    pub description: Option<String>,
    /// Technical details
    #[serde(default)]
    pub specs: Option<VehicleSpecs>,
}

impl VehicleRecord {
    /// Create a record with the fields the filter core looks at.
    pub fn new(
        id: impl Into<VehicleId>,
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            model: model.into(),
            year,
            price,
            image: None,
            description: None,
            specs: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_specs(mut self, specs: VehicleSpecs) -> Self {
        self.specs = Some(specs);
        self
    }

    /// Card heading, "brand model".
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }

    /// Image reference, falling back to the placeholder asset.
    pub fn image_or_placeholder(&self) -> &str {
        self.image
            .as_deref()
            .filter(|image| !image.trim().is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Price rendered with the given currency conventions.
    pub fn format_price(&self, currency: &CurrencyFormat) -> String {
        currency.format(self.price)
    }
}

/// Localized currency rendering.
///
/// Defaults to Brazilian real conventions: `R$ 35.000` and `R$ 1.234,50`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Symbol placed before the amount
    pub symbol: String,
    /// Digit group separator
    pub thousands_separator: String,
    /// Separator before the cents
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Format an amount. Cents are shown only when non-zero.
    pub fn format(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let cents = (amount.abs() * 100.0).round() as u64;
        let whole = cents / 100;
        let fraction = cents % 100;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(ch);
        }

        if fraction == 0 {
            format!("{} {}{}", self.symbol, sign, grouped)
        } else {
            format!(
                "{} {}{}{}{:02}",
                self.symbol, sign, grouped, self.decimal_separator, fraction
            )
        }
    }

    /// Read a typed amount back using these separators.
    ///
    /// # Returns
    /// * `Option<f64>` - None unless the text is a non-negative amount
    ///
    /// # Details
    /// Digit groups are optional, but when present every group after the
    /// first must have exactly three digits, so `40.000` reads as forty
    /// thousand under pt-BR and `1.5` is rejected.
    pub fn parse(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        let (whole, fraction) = match self.decimal_separator.as_str() {
            "" => (text, ""),
            sep => text.split_once(sep).unwrap_or((text, "")),
        };

        let digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        let mut normalized = String::with_capacity(text.len());
        if !self.thousands_separator.is_empty() && whole.contains(self.thousands_separator.as_str()) {
            for (i, group) in whole.split(self.thousands_separator.as_str()).enumerate() {
                let len_ok = if i == 0 { (1..=3).contains(&group.len()) } else { group.len() == 3 };
                if !len_ok || !digits(group) {
                    return None;
                }
                normalized.push_str(group);
            }
        } else if digits(whole) {
            normalized.push_str(whole);
        } else {
            return None;
        }

        if !digits(fraction) || (normalized.is_empty() && fraction.is_empty()) {
            return None;
        }
        if normalized.is_empty() {
            normalized.push('0');
        }
        if !fraction.is_empty() {
            normalized.push('.');
            normalized.push_str(fraction);
        }
        normalized.parse::<f64>().ok().filter(|amount| amount.is_finite())
    }

    /// Plain editable text for an amount, without symbol or grouping.
    pub fn input_text(&self, amount: f64) -> String {
        if amount.fract() == 0.0 {
            format!("{:.0}", amount)
        } else {
            amount.to_string().replace('.', &self.decimal_separator)
        }
    }
}

/// A record the listing endpoint returned that cannot be shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid vehicle record at position {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },
}

/// Vehicle object as served by the listing endpoint.
///
/// Numeric fields are kept as raw JSON so that numeric strings can be
/// accepted and everything else rejected with a precise reason.
#[derive(Debug, Deserialize)]
pub struct ApiVehicle {
    #[serde(default)]
    pub id: Option<VehicleId>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub specs: Option<Value>,
}

impl ApiVehicle {
    /// Validate and convert into a [`VehicleRecord`].
    ///
    /// # Arguments
    /// * `position` - Zero-based position in the response array
    ///
    /// # Details
    /// A missing `id` becomes the 1-based position. Malformed `specs` are
    /// dropped rather than rejecting the whole vehicle.
    pub fn into_record(self, position: usize) -> Result<VehicleRecord, RecordError> {
        let invalid = |reason: String| RecordError::InvalidRecord { position, reason };

        let brand = required_text(self.brand, "brand").map_err(invalid)?;
        let model = required_text(self.model, "model").map_err(invalid)?;
        let price = parse_price(self.price.as_ref()).map_err(invalid)?;
        let year = parse_year(self.year.as_ref()).map_err(invalid)?;

        let specs = match self.specs {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<VehicleSpecs>(raw) {
                Ok(specs) => Some(specs),
                Err(e) => {
                    tracing::debug!(position, error = %e, "ignoring malformed vehicle specs");
                    None
                }
            },
        };

        Ok(VehicleRecord {
            id: self.id.unwrap_or(VehicleId::Number(position as i64 + 1)),
            brand,
            model,
            year,
            price,
            image: self.image,
            description: self.description,
            specs,
        })
    }
}

/// Convert a decoded response array into records.
///
/// # Details
/// Entries that are not vehicle objects, fail validation, or repeat an
/// earlier id are logged and skipped. Order of the survivors is kept.
pub fn decode_vehicles(items: Vec<Value>) -> Vec<VehicleRecord> {
    let mut seen = HashSet::new();
    let mut vehicles = Vec::with_capacity(items.len());

    for (position, item) in items.into_iter().enumerate() {
        let converted = serde_json::from_value::<ApiVehicle>(item)
            .map_err(|e| RecordError::InvalidRecord {
                position,
                reason: e.to_string(),
            })
            .and_then(|api| api.into_record(position))
            .and_then(|record| {
                if seen.insert(record.id.clone()) {
                    Ok(record)
                } else {
                    Err(RecordError::InvalidRecord {
                        position,
                        reason: format!("duplicate id {}", record.id),
                    })
                }
            });

        match converted {
            Ok(record) => vehicles.push(record),
            Err(e) => tracing::warn!("Skipping vehicle: {}", e),
        }
    }

    vehicles
}

fn required_text(value: Option<String>, name: &str) -> Result<String, String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(format!("missing {}", name)),
    }
}

fn parse_price(value: Option<&Value>) -> Result<f64, String> {
    let price = match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("price out of range: {}", n))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("price is not numeric: {:?}", s))?,
        None | Some(Value::Null) => return Err("missing price".to_string()),
        Some(other) => return Err(format!("price is not numeric: {}", other)),
    };

    if !price.is_finite() || price < 0.0 {
        return Err(format!("price must be a non-negative amount: {}", price));
    }
    Ok(price)
}

fn parse_year(value: Option<&Value>) -> Result<i32, String> {
    let year = match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(year) => year,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => f as i64,
                _ => return Err(format!("year is not an integer: {}", n)),
            },
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("year is not an integer: {:?}", s))?,
        None | Some(Value::Null) => return Err("missing year".to_string()),
        Some(other) => return Err(format!("year is not an integer: {}", other)),
    };

    i32::try_from(year).map_err(|_| format!("year out of range: {}", year))
}
