//! Filter form input buffers.
//!
//! Keeps the raw text of every form field and converts it into criteria.
//! Text that does not parse never reaches the filter core: the criterion
//! is left unset and the field is flagged as invalid.

use crate::filter::{FilterCriteria, FilterField};
use crate::vehicles::CurrencyFormat;

/// Outcome of parsing one field's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedInput<T> {
    /// Nothing usable typed; the criterion is inactive
    Empty,
    /// A value to constrain on
    Value(T),
    /// Text that is not a valid value; the criterion is inactive
    Invalid,
}

impl<T> ParsedInput<T> {
    pub fn value(self) -> Option<T> {
        match self {
            ParsedInput::Value(value) => Some(value),
            ParsedInput::Empty | ParsedInput::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ParsedInput::Invalid)
    }
}

/// Parse a price bound written with the display separators.
///
/// # Details
/// Under pt-BR `40.000` and `1.234,5` are accepted. Negative, mis-grouped
/// and unparsable amounts are invalid. With `zero_disables`, `0` is `Empty`.
pub fn parse_price(text: &str, zero_disables: bool, currency: &CurrencyFormat) -> ParsedInput<f64> {
    if text.trim().is_empty() {
        return ParsedInput::Empty;
    }
    match currency.parse(text) {
        Some(price) if zero_disables && price == 0.0 => ParsedInput::Empty,
        Some(price) => ParsedInput::Value(price),
        None => ParsedInput::Invalid,
    }
}

/// Parse a year bound. With `zero_disables`, `0` is `Empty`.
pub fn parse_year(text: &str, zero_disables: bool) -> ParsedInput<i32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedInput::Empty;
    }
    match trimmed.parse::<i32>() {
        Ok(0) if zero_disables => ParsedInput::Empty,
        Ok(year) => ParsedInput::Value(year),
        Err(_) => ParsedInput::Invalid,
    }
}

/// Raw text of every filter field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    values: [String; 6],
    invalid: [bool; 6],
}

fn slot(field: FilterField) -> usize {
    match field {
        FilterField::Brand => 0,
        FilterField::Model => 1,
        FilterField::MinPrice => 2,
        FilterField::MaxPrice => 3,
        FilterField::MinYear => 4,
        FilterField::MaxYear => 5,
    }
}

impl FilterInputs {
    /// Prefill the form from existing criteria.
    pub fn from_criteria(criteria: &FilterCriteria, currency: &CurrencyFormat) -> Self {
        let price = |value: Option<f64>| value.map(|p| currency.input_text(p)).unwrap_or_default();
        let mut inputs = Self::default();
        for field in FilterField::ALL {
            let text = match field {
                FilterField::Brand => criteria.brand.clone().unwrap_or_default(),
                FilterField::Model => criteria.model.clone().unwrap_or_default(),
                FilterField::MinPrice => price(criteria.min_price),
                FilterField::MaxPrice => price(criteria.max_price),
                FilterField::MinYear => criteria.min_year.map(|y| y.to_string()).unwrap_or_default(),
                FilterField::MaxYear => criteria.max_year.map(|y| y.to_string()).unwrap_or_default(),
            };
            inputs.values[slot(field)] = text;
        }
        inputs
    }

    pub fn text(&self, field: FilterField) -> &str {
        &self.values[slot(field)]
    }

    /// Whether the field's current text was rejected.
    pub fn is_invalid(&self, field: FilterField) -> bool {
        self.invalid[slot(field)]
    }

    /// Append a character. Numeric fields accept digits and separators only.
    ///
    /// # Returns
    /// * `bool` - True if the text changed
    pub fn push(&mut self, field: FilterField, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        if field.is_numeric() && !(ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-')) {
            return false;
        }
        self.values[slot(field)].push(ch);
        true
    }

    /// Remove the last character. Returns true if the text changed.
    pub fn pop(&mut self, field: FilterField) -> bool {
        self.values[slot(field)].pop().is_some()
    }

    /// Empty one field. Returns true if the text changed.
    pub fn clear(&mut self, field: FilterField) -> bool {
        let value = &mut self.values[slot(field)];
        let changed = !value.is_empty();
        value.clear();
        changed
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Write the field's parsed text into its criterion, and only that one.
    ///
    /// # Arguments
    /// * `field` - Field that was edited
    /// * `criteria` - Criteria to update
    /// * `zero_disables` - Treat a literal `0` bound as unset
    /// * `currency` - Separators used to read prices
    pub fn apply_to(
        &mut self,
        field: FilterField,
        criteria: &mut FilterCriteria,
        zero_disables: bool,
        currency: &CurrencyFormat,
    ) {
        let text = &self.values[slot(field)];
        let invalid = match field {
            FilterField::Brand | FilterField::Model => {
                criteria.set_text(field, text);
                false
            }
            FilterField::MinPrice | FilterField::MaxPrice => {
                let parsed = parse_price(text, zero_disables, currency);
                criteria.set_price(field, parsed.value());
                parsed.is_invalid()
            }
            FilterField::MinYear | FilterField::MaxYear => {
                let parsed = parse_year(text, zero_disables);
                criteria.set_year(field, parsed.value());
                parsed.is_invalid()
            }
        };

        if invalid {
            tracing::debug!(%field, text = %text, "Ignoring invalid filter input");
        }
        self.invalid[slot(field)] = invalid;
    }
}
