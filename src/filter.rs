//! Filter core for the vehicle listing.
//!
//! Narrows a vehicle list by independent, optional criteria. Everything
//! here is pure: no I/O, no shared state, safe to call from any thread.

use crate::vehicles::VehicleRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single filterable attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// Brand substring
    Brand,
    /// Model substring
    Model,
    /// Lower price bound
    MinPrice,
    /// Upper price bound
    MaxPrice,
    /// Lower year bound
    MinYear,
    /// Upper year bound
    MaxYear,
}

impl FilterField {
    /// Every field, in form order.
    pub const ALL: [FilterField; 6] = [
        FilterField::Brand,
        FilterField::Model,
        FilterField::MinPrice,
        FilterField::MaxPrice,
        FilterField::MinYear,
        FilterField::MaxYear,
    ];

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Brand => "Marca",
            FilterField::Model => "Modelo",
            FilterField::MinPrice => "Preço Mínimo",
            FilterField::MaxPrice => "Preço Máximo",
            FilterField::MinYear => "Ano Mínimo",
            FilterField::MaxYear => "Ano Máximo",
        }
    }

    /// Hint shown while the input is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            FilterField::Brand => "Pesquisar por marca",
            FilterField::Model => "Pesquisar por modelo",
            FilterField::MinPrice => "Preço mínimo",
            FilterField::MaxPrice => "Preço máximo",
            FilterField::MinYear => "Ano mínimo",
            FilterField::MaxYear => "Ano máximo",
        }
    }

    /// Whether the field takes a number rather than free text.
    pub fn is_numeric(self) -> bool {
        !matches!(self, FilterField::Brand | FilterField::Model)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterField::Brand => "brand",
            FilterField::Model => "model",
            FilterField::MinPrice => "min_price",
            FilterField::MaxPrice => "max_price",
            FilterField::MinYear => "min_year",
            FilterField::MaxYear => "max_year",
        };
        f.write_str(name)
    }
}

/// The declared list of fields a storefront offers.
///
/// Criteria on fields outside the set are ignored by [`Filter::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FilterField>", into = "Vec<FilterField>")]
pub struct FieldSet(Vec<FilterField>);

impl FieldSet {
    /// Build a set from fields in declaration order; repeats are dropped.
    pub fn new(fields: impl IntoIterator<Item = FilterField>) -> Self {
        let mut unique = Vec::new();
        for field in fields {
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self(unique)
    }

    /// Brand, model, price range and year range.
    pub fn full() -> Self {
        Self::new(FilterField::ALL)
    }

    /// Model and price range, as offered by the remote listing.
    pub fn reduced() -> Self {
        Self::new([
            FilterField::Model,
            FilterField::MinPrice,
            FilterField::MaxPrice,
        ])
    }

    /// Whether `field` is enabled.
    pub fn contains(&self, field: FilterField) -> bool {
        self.0.contains(&field)
    }

    /// Enabled fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = FilterField> + '_ {
        self.0.iter().copied()
    }

    /// Field at a form position.
    pub fn get(&self, index: usize) -> Option<FilterField> {
        self.0.get(index).copied()
    }

    /// Number of enabled fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field is enabled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any year bound is offered.
    pub fn has_year(&self) -> bool {
        self.contains(FilterField::MinYear) || self.contains(FilterField::MaxYear)
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::full()
    }
}

impl From<Vec<FilterField>> for FieldSet {
    fn from(fields: Vec<FilterField>) -> Self {
        Self::new(fields)
    }
}

impl From<FieldSet> for Vec<FilterField> {
    fn from(set: FieldSet) -> Self {
        set.0
    }
}

/// Case-insensitive substring test.
///
/// # Arguments
/// * `haystack` - Text to search in
/// * `needle` - Text to look for
///
/// # Returns
/// * `bool` - True if `needle` occurs in `haystack` ignoring case
///
/// # Details
/// Uses Unicode lowercase mapping on both sides. An empty needle matches.
pub fn contains_case_insensitive(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// User-specified narrowing constraints.
///
/// Every criterion is optional; `None` means the constraint is inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Brand must contain this text (case-insensitive)
    pub brand: Option<String>,
    /// Model must contain this text (case-insensitive)
    pub model: Option<String>,
    /// Price must be at least this amount
    pub min_price: Option<f64>,
    /// Price must be at most this amount
    pub max_price: Option<f64>,
    /// Year must be at least this value
    pub min_year: Option<i32>,
    /// Year must be at most this value
    pub max_year: Option<i32>,
}

impl FilterCriteria {
    /// Build criteria from sentinel-encoded values.
    ///
    /// # Details
    /// An empty string or a zero bound means "no constraint", matching
    /// the form state the storefront historically kept.
    pub fn from_sentinels(
        brand: &str,
        model: &str,
        min_price: f64,
        max_price: f64,
        min_year: i32,
        max_year: i32,
    ) -> Self {
        let price = |value: f64| (value != 0.0).then_some(value);
        let year = |value: i32| (value != 0).then_some(value);
        Self {
            brand: non_empty(brand),
            model: non_empty(model),
            min_price: price(min_price),
            max_price: price(max_price),
            min_year: year(min_year),
            max_year: year(max_year),
        }
    }

    /// Require the brand to contain `brand`, ignoring case.
    pub fn with_brand(mut self, brand: &str) -> Self {
        self.set_text(FilterField::Brand, brand);
        self
    }

    /// Require the model to contain `model`, ignoring case.
    pub fn with_model(mut self, model: &str) -> Self {
        self.set_text(FilterField::Model, model);
        self
    }

    /// Inclusive lower price bound.
    pub fn with_min_price(mut self, price: f64) -> Self {
        self.min_price = Some(price);
        self
    }

    /// Inclusive upper price bound.
    pub fn with_max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Inclusive lower year bound.
    pub fn with_min_year(mut self, year: i32) -> Self {
        self.min_year = Some(year);
        self
    }

    /// Inclusive upper year bound.
    pub fn with_max_year(mut self, year: i32) -> Self {
        self.max_year = Some(year);
        self
    }

    /// Set a text criterion. Empty text clears it; numeric fields are left untouched.
    pub fn set_text(&mut self, field: FilterField, value: &str) {
        match field {
            FilterField::Brand => self.brand = non_empty(value),
            FilterField::Model => self.model = non_empty(value),
            _ => {}
        }
    }

    /// Set a price bound. Other fields are left untouched.
    pub fn set_price(&mut self, field: FilterField, value: Option<f64>) {
        match field {
            FilterField::MinPrice => self.min_price = value,
            FilterField::MaxPrice => self.max_price = value,
            _ => {}
        }
    }

    /// Set a year bound. Other fields are left untouched.
    pub fn set_year(&mut self, field: FilterField, value: Option<i32>) {
        match field {
            FilterField::MinYear => self.min_year = value,
            FilterField::MaxYear => self.max_year = value,
            _ => {}
        }
    }

    /// Deactivate one criterion.
    pub fn clear(&mut self, field: FilterField) {
        match field {
            FilterField::Brand => self.brand = None,
            FilterField::Model => self.model = None,
            FilterField::MinPrice => self.min_price = None,
            FilterField::MaxPrice => self.max_price = None,
            FilterField::MinYear => self.min_year = None,
            FilterField::MaxYear => self.max_year = None,
        }
    }

    /// Deactivate every criterion.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Whether the criterion for `field` is active.
    pub fn is_set(&self, field: FilterField) -> bool {
        match field {
            FilterField::Brand => self.brand.is_some(),
            FilterField::Model => self.model.is_some(),
            FilterField::MinPrice => self.min_price.is_some(),
            FilterField::MaxPrice => self.max_price.is_some(),
            FilterField::MinYear => self.min_year.is_some(),
            FilterField::MaxYear => self.max_year.is_some(),
        }
    }

    /// True when no criterion is active.
    pub fn is_unconstrained(&self) -> bool {
        FilterField::ALL.iter().all(|field| !self.is_set(*field))
    }

    /// Number of active criteria among the enabled fields.
    pub fn active_count(&self, fields: &FieldSet) -> usize {
        fields.iter().filter(|field| self.is_set(*field)).count()
    }

    /// Check one record against every active, enabled criterion.
    pub fn matches(&self, record: &VehicleRecord, fields: &FieldSet) -> bool {
        let text = |field: FilterField, needle: &Option<String>, value: &str| {
            !fields.contains(field)
                || needle
                    .as_deref()
                    .is_none_or(|needle| contains_case_insensitive(value, needle))
        };

        text(FilterField::Brand, &self.brand, &record.brand)
            && text(FilterField::Model, &self.model, &record.model)
            && at_least(fields.contains(FilterField::MinPrice), self.min_price, record.price)
            && at_most(fields.contains(FilterField::MaxPrice), self.max_price, record.price)
            && at_least(fields.contains(FilterField::MinYear), self.min_year, record.year)
            && at_most(fields.contains(FilterField::MaxYear), self.max_year, record.year)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn at_least<T: PartialOrd>(enabled: bool, bound: Option<T>, value: T) -> bool {
    !enabled || bound.is_none_or(|min| value >= min)
}

fn at_most<T: PartialOrd>(enabled: bool, bound: Option<T>, value: T) -> bool {
    !enabled || bound.is_none_or(|max| value <= max)
}

/// A filter configured with the set of fields it honours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    fields: FieldSet,
}

impl Filter {
    pub fn new(fields: FieldSet) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Narrow `records` to those satisfying every active criterion.
    ///
    /// # Returns
    /// * `Vec<VehicleRecord>` - Matching records in input order
    ///
    /// # Details
    /// Stable linear scan; no sorting, no errors. Calling it again on its
    /// own output with the same criteria returns the same list.
    pub fn apply(&self, records: &[VehicleRecord], criteria: &FilterCriteria) -> Vec<VehicleRecord> {
        records
            .iter()
            .filter(|record| criteria.matches(record, &self.fields))
            .cloned()
            .collect()
    }
}

/// Filter with every field enabled.
pub fn apply(records: &[VehicleRecord], criteria: &FilterCriteria) -> Vec<VehicleRecord> {
    Filter::default().apply(records, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles::catalog::sample_vehicles;

    fn models(records: &[VehicleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.model.as_str()).collect()
    }

    fn is_subset(smaller: &[VehicleRecord], larger: &[VehicleRecord]) -> bool {
        smaller.iter().all(|record| larger.contains(record))
    }

    #[test]
    fn test_contains_case_insensitive() {
        assert!(contains_case_insensitive("Toyota", "toy"));
        assert!(contains_case_insensitive("Toyota", "OTA"));
        assert!(contains_case_insensitive("Volkswagen", ""));
        assert!(contains_case_insensitive("CITROËN", "citroën"));
        assert!(!contains_case_insensitive("Honda", "toy"));
        assert!(!contains_case_insensitive("", "a"));
    }

    #[test]
    fn test_unconstrained_is_identity() {
        let vehicles = sample_vehicles();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert_eq!(apply(&vehicles, &criteria), vehicles);
        assert!(apply(&[], &criteria).is_empty());
    }

    #[test]
    fn test_brand_substring_match() {
        let records = vec![
            VehicleRecord::new(1, "Toyota", "Corolla", 2020, 35000.0),
            VehicleRecord::new(2, "Honda", "Civic", 2018, 45000.0),
        ];
        let criteria = FilterCriteria::default().with_brand("toy");
        let result = apply(&records, &criteria);
        assert_eq!(result, vec![records[0].clone()]);
    }

    #[test]
    fn test_min_price_keeps_order() {
        let criteria = FilterCriteria::from_sentinels("", "", 40000.0, 0.0, 0, 0);
        let result = apply(&sample_vehicles(), &criteria);
        assert_eq!(models(&result), vec!["Civic", "Mustang"]);
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let criteria = FilterCriteria::default()
            .with_min_year(2019)
            .with_max_year(2021);
        let result = apply(&sample_vehicles(), &criteria);
        assert_eq!(models(&result), vec!["Corolla", "Golf"]);

        let strict = FilterCriteria::default()
            .with_min_year(2020)
            .with_max_year(2021);
        assert_eq!(models(&apply(&sample_vehicles(), &strict)), vec!["Corolla"]);
    }

    #[test]
    fn test_sentinel_defaults_return_everything() {
        let criteria = FilterCriteria::from_sentinels("", "", 0.0, 0.0, 0, 0);
        assert_eq!(criteria, FilterCriteria::default());
        let vehicles = sample_vehicles();
        let result = apply(&vehicles, &criteria);
        assert_eq!(result.len(), vehicles.len());
        assert_eq!(result, vehicles);
    }

    #[test]
    fn test_combined_criteria_are_anded() {
        let criteria = FilterCriteria::default()
            .with_model("o")
            .with_max_price(40000.0);
        let result = apply(&sample_vehicles(), &criteria);
        assert_eq!(models(&result), vec!["Corolla", "Golf"]);
    }

    #[test]
    fn test_explicit_zero_bound_is_literal() {
        let records = vec![
            VehicleRecord::new(1, "Doação", "Fusca", 1970, 0.0),
            VehicleRecord::new(2, "Ford", "Ka", 2015, 20000.0),
        ];
        let criteria = FilterCriteria::default().with_max_price(0.0);
        assert_eq!(models(&apply(&records, &criteria)), vec!["Fusca"]);
    }

    #[test]
    fn test_disabled_fields_are_ignored() {
        let vehicles = sample_vehicles();
        let criteria = FilterCriteria::default()
            .with_brand("honda")
            .with_min_year(2030)
            .with_min_price(40000.0);

        let reduced = Filter::new(FieldSet::reduced());
        assert_eq!(models(&reduced.apply(&vehicles, &criteria)), vec!["Civic", "Mustang"]);

        let full = Filter::new(FieldSet::full());
        assert!(full.apply(&vehicles, &criteria).is_empty());
        assert_eq!(criteria.active_count(reduced.fields()), 1);
        assert_eq!(criteria.active_count(full.fields()), 3);
    }

    #[test]
    fn test_brand_results_contain_needle() {
        let vehicles = sample_vehicles();
        for needle in ["o", "DA", "wag", "x", "Ford"] {
            let criteria = FilterCriteria::default().with_brand(needle);
            for record in apply(&vehicles, &criteria) {
                assert!(record.brand.to_lowercase().contains(&needle.to_lowercase()));
            }
        }
    }

    #[test]
    fn test_tightening_bounds_never_grows_result() {
        let vehicles = sample_vehicles();
        let prices = [0.0, 30000.0, 35000.0, 45000.0, 50000.0, 65000.0, 70000.0];
        for pair in prices.windows(2) {
            let looser = apply(&vehicles, &FilterCriteria::default().with_min_price(pair[0]));
            let tighter = apply(&vehicles, &FilterCriteria::default().with_min_price(pair[1]));
            assert!(is_subset(&tighter, &looser));

            let looser = apply(&vehicles, &FilterCriteria::default().with_max_price(pair[1]));
            let tighter = apply(&vehicles, &FilterCriteria::default().with_max_price(pair[0]));
            assert!(is_subset(&tighter, &looser));
        }

        let years = [2017, 2018, 2019, 2020, 2021, 2022, 2023];
        for pair in years.windows(2) {
            let looser = apply(&vehicles, &FilterCriteria::default().with_min_year(pair[0]));
            let tighter = apply(&vehicles, &FilterCriteria::default().with_min_year(pair[1]));
            assert!(is_subset(&tighter, &looser));

            let looser = apply(&vehicles, &FilterCriteria::default().with_max_year(pair[1]));
            let tighter = apply(&vehicles, &FilterCriteria::default().with_max_year(pair[0]));
            assert!(is_subset(&tighter, &looser));
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let vehicles = sample_vehicles();
        let criteria = FilterCriteria::default()
            .with_model("c")
            .with_min_price(30000.0)
            .with_max_year(2021);
        let once = apply(&vehicles, &criteria);
        let twice = apply(&once, &criteria);
        assert_eq!(once, twice);
        assert_eq!(apply(&vehicles, &criteria), once);
    }

    #[test]
    fn test_setters_touch_one_field() {
        let mut criteria = FilterCriteria::default().with_brand("ford");
        criteria.set_price(FilterField::MinPrice, Some(1000.0));
        criteria.set_text(FilterField::MinPrice, "ignored");
        criteria.set_year(FilterField::Brand, Some(2000));
        assert_eq!(criteria.brand.as_deref(), Some("ford"));
        assert_eq!(criteria.min_price, Some(1000.0));
        assert_eq!(criteria.min_year, None);

        criteria.set_text(FilterField::Brand, "   ");
        assert_eq!(criteria.brand.as_deref(), Some("   "));
        criteria.set_text(FilterField::Brand, "");
        assert_eq!(criteria.brand, None);

        criteria.clear(FilterField::MinPrice);
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn test_space_is_a_real_constraint() {
        let records = vec![
            VehicleRecord::new(1, "Land Rover", "Defender", 2021, 300000.0),
            VehicleRecord::new(2, "Toyota", "Corolla", 2020, 35000.0),
        ];
        let criteria = FilterCriteria::default().with_brand(" ");
        let result = apply(&records, &criteria);
        assert_eq!(models(&result), vec!["Defender"]);

        let legacy = FilterCriteria::from_sentinels(" ", "", 0.0, 0.0, 0, 0);
        assert_eq!(legacy.brand.as_deref(), Some(" "));
        assert_eq!(FilterCriteria::from_sentinels("", "", 0.0, 0.0, 0, 0), FilterCriteria::default());
    }

    #[test]
    fn test_field_set_dedupes_and_deserializes() {
        let set = FieldSet::new([FilterField::Model, FilterField::Model, FilterField::MaxPrice]);
        assert_eq!(set.len(), 2);
        assert!(!set.has_year());

        let parsed: FieldSet = serde_json::from_str(r#"["brand", "min_year"]"#).unwrap();
        assert!(parsed.contains(FilterField::Brand));
        assert!(parsed.has_year());
        assert_eq!(parsed.get(1), Some(FilterField::MinYear));
    }

    #[test]
    fn test_filter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filter>();
        assert_send_sync::<FilterCriteria>();
    }
}
