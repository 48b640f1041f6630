//! Monthly temperature records and the dataset they belong to.
//!
//! A [`Dataset`] is the sole input of the heat map: a base temperature plus an
//! ordered list of monthly variances from it. It is read from the JSON shape
//!
//! ```json
//! { "baseTemperature": 8.66, "monthlyVariance": [{ "year": 1753, "month": 1, "variance": -1.366 }] }
//! ```
//!
//! and validated eagerly, so a malformed record rejects the whole dataset
//! instead of leaking `NaN` into the layout.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Calendar months in index order, `MONTHS[0]` is January.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// One month of one year, as an offset from the dataset's base temperature.
///
/// # Examples
///
/// ```rust
/// use heatmap::TemperatureRecord;
///
/// let record = TemperatureRecord::new(1753, 3, -0.5);
/// assert_eq!(record.month_index(), 2);
/// assert_eq!(record.month_name(), "March");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1 = January
    pub month: u32,
    /// Deviation from the base temperature in degrees Celsius
    pub variance: f64,
}

impl TemperatureRecord {
    pub const fn new(year: i32, month: u32, variance: f64) -> TemperatureRecord {
        TemperatureRecord {
            year,
            month,
            variance,
        }
    }

    /// Zero-based month index, `month - 1`.
    ///
    /// Only meaningful for records that passed [`Dataset::validate`].
    pub fn month_index(&self) -> usize {
        self.month.saturating_sub(1) as usize
    }

    /// Full English month name, e.g. `"January"`.
    pub fn month_name(&self) -> &'static str {
        month_name(self.month_index())
    }
}

/// Full English name for a zero-based month index; indices past December clamp to it.
pub fn month_name(month_index: usize) -> &'static str {
    MONTHS[month_index.min(MONTHS.len() - 1)].name()
}

/// A base temperature and the monthly variances recorded against it.
///
/// # Examples
///
/// ```rust
/// use heatmap::Dataset;
///
/// let dataset = Dataset::from_json_str(
///     r#"{"baseTemperature": 8.0, "monthlyVariance": [
///         {"year": 1753, "month": 1, "variance": -6.1},
///         {"year": 1753, "month": 2, "variance": -5.8}
///     ]}"#,
/// ).unwrap();
///
/// assert_eq!(dataset.len(), 2);
/// let (min, max) = dataset.extent().unwrap();
/// assert!((min - 1.9).abs() < 1e-9);
/// assert!((max - 2.2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Temperature every variance is measured against
    pub base_temperature: f64,
    /// Records, usually in chronological order
    pub monthly_variance: Vec<TemperatureRecord>,
}

impl Dataset {
    /// Builds a dataset and validates it.
    ///
    /// # Returns
    ///
    /// * `Ok(Dataset)` - If there is at least one record and every record is well formed
    /// * `Err(Error)` - [`Error::EmptyDataset`], [`Error::InvalidMonth`],
    ///   [`Error::NonFiniteVariance`] or [`Error::NonFiniteBaseTemperature`]
    pub fn new(base_temperature: f64, monthly_variance: Vec<TemperatureRecord>) -> Result<Dataset> {
        let dataset = Dataset {
            base_temperature,
            monthly_variance,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parses and validates a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Dataset> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parses and validates a dataset from any reader yielding JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset> {
        let dataset: Dataset = serde_json::from_reader(reader)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Loads a dataset from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        let dataset = Dataset::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded {} records from {}",
            dataset.len(),
            path.as_ref().display()
        );
        Ok(dataset)
    }

    /// Checks the whole dataset, failing on the first malformed record.
    pub fn validate(&self) -> Result<()> {
        validate_records(&self.monthly_variance, self.base_temperature)
    }

    pub fn len(&self) -> usize {
        self.monthly_variance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_variance.is_empty()
    }

    /// Absolute temperature of a record, `base_temperature + variance`.
    pub fn absolute_temperature(&self, record: &TemperatureRecord) -> f64 {
        self.base_temperature + record.variance
    }

    /// Absolute temperatures in record order.
    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.monthly_variance
            .iter()
            .map(move |r| self.absolute_temperature(r))
    }

    /// Minimum and maximum absolute temperature.
    ///
    /// # Returns
    ///
    /// * `Ok((min, max))` - For a non-empty, well formed dataset
    /// * `Err(Error)` - As for [`validate_records`]
    pub fn extent(&self) -> Result<(f64, f64)> {
        temperature_extent(&self.monthly_variance, self.base_temperature)
    }

    /// Distinct years in the order they first appear.
    pub fn distinct_years(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        self.monthly_variance
            .iter()
            .map(|r| r.year)
            .filter(|year| seen.insert(*year))
            .collect()
    }

    /// Year of the first and of the last record.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let first = self.monthly_variance.first()?;
        let last = self.monthly_variance.last()?;
        Some((first.year, last.year))
    }
}

/// Checks a base temperature and its records, failing on the first malformed record.
///
/// # Returns
///
/// * `Ok(())` - If there is at least one record and every record is well formed
/// * `Err(Error)` - [`Error::NonFiniteBaseTemperature`], [`Error::EmptyDataset`],
///   [`Error::InvalidMonth`] or [`Error::NonFiniteVariance`]
pub fn validate_records(records: &[TemperatureRecord], base_temperature: f64) -> Result<()> {
    if !base_temperature.is_finite() {
        return Err(Error::NonFiniteBaseTemperature);
    }
    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }
    for (index, record) in records.iter().enumerate() {
        if !(1..=12).contains(&record.month) {
            return Err(Error::InvalidMonth {
                index,
                month: record.month,
            });
        }
        if !record.variance.is_finite() {
            return Err(Error::NonFiniteVariance { index });
        }
    }
    Ok(())
}

/// Linear scan for the absolute temperature extent of a set of validated records.
pub fn temperature_extent(records: &[TemperatureRecord], base_temperature: f64) -> Result<(f64, f64)> {
    validate_records(records, base_temperature)?;

    let mut temps = records.iter().map(|r| base_temperature + r.variance);
    let first = temps.next().ok_or(Error::EmptyDataset)?;

    Ok(temps.fold((first, first), |(min, max), t| (min.min(t), max.max(t))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "baseTemperature": 8.66,
        "monthlyVariance": [
            {"year": 1753, "month": 1, "variance": -1.366},
            {"year": 1753, "month": 2, "variance": -2.223},
            {"year": 1754, "month": 1, "variance": 0.5},
            {"year": 1753, "month": 12, "variance": 1.2}
        ]
    }"#;

    #[test]
    fn parses_camel_case_json() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();

        assert_eq!(dataset.base_temperature, 8.66);
        assert_eq!(dataset.len(), 4);
        assert_eq!(
            dataset.monthly_variance[1],
            TemperatureRecord::new(1753, 2, -2.223)
        );
    }

    #[test]
    fn extent_covers_absolute_temperatures() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let (min, max) = dataset.extent().unwrap();

        assert!((min - (8.66 - 2.223)).abs() < 1e-12);
        assert!((max - (8.66 + 1.2)).abs() < 1e-12);
    }

    #[test]
    fn distinct_years_keep_first_occurrence_order() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.distinct_years(), vec![1753, 1754]);
        assert_eq!(dataset.year_span(), Some((1753, 1753)));
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let result = Dataset::from_json_str(r#"{"baseTemperature": 8.0, "monthlyVariance": []}"#);
        assert!(matches!(result, Err(Error::EmptyDataset)));

        assert!(matches!(temperature_extent(&[], 8.0), Err(Error::EmptyDataset)));
    }

    #[test]
    fn month_out_of_range_rejects_dataset() {
        let result = Dataset::new(
            8.0,
            vec![
                TemperatureRecord::new(1753, 1, 0.0),
                TemperatureRecord::new(1753, 13, 0.0),
            ],
        );
        assert!(matches!(
            result,
            Err(Error::InvalidMonth { index: 1, month: 13 })
        ));

        let result = Dataset::new(8.0, vec![TemperatureRecord::new(1753, 0, 0.0)]);
        assert!(matches!(result, Err(Error::InvalidMonth { index: 0, month: 0 })));
    }

    #[test]
    fn non_finite_values_reject_dataset() {
        let result = Dataset::new(8.0, vec![TemperatureRecord::new(1753, 1, f64::NAN)]);
        assert!(matches!(result, Err(Error::NonFiniteVariance { index: 0 })));

        let result = Dataset::new(f64::INFINITY, vec![TemperatureRecord::new(1753, 1, 0.0)]);
        assert!(matches!(result, Err(Error::NonFiniteBaseTemperature)));
    }

    #[test]
    fn extent_rejects_malformed_records() {
        let nan_variance = [
            TemperatureRecord::new(1900, 1, f64::NAN),
            TemperatureRecord::new(1900, 2, 0.0),
        ];
        assert!(matches!(
            temperature_extent(&nan_variance, 8.0),
            Err(Error::NonFiniteVariance { index: 0 })
        ));

        let bad_month = [
            TemperatureRecord::new(1900, 2, 0.0),
            TemperatureRecord::new(1900, 13, 1.0),
        ];
        assert!(matches!(
            temperature_extent(&bad_month, 8.0),
            Err(Error::InvalidMonth { index: 1, month: 13 })
        ));

        let good = [TemperatureRecord::new(1900, 2, 0.0)];
        assert!(matches!(
            temperature_extent(&good, f64::NAN),
            Err(Error::NonFiniteBaseTemperature)
        ));
        assert_eq!(temperature_extent(&good, 8.0).unwrap(), (8.0, 8.0));
    }

    #[test]
    fn missing_or_non_numeric_fields_are_rejected() {
        let missing = r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 1753, "month": 1}]}"#;
        assert!(matches!(
            Dataset::from_json_str(missing),
            Err(Error::Deserialization(_))
        ));

        let wrong_type =
            r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 1753, "month": "Jan", "variance": 0.1}]}"#;
        assert!(matches!(
            Dataset::from_json_str(wrong_type),
            Err(Error::Deserialization(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global-temperature.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = Dataset::from_path(&path).unwrap();
        assert_eq!(dataset.len(), 4);

        let missing = Dataset::from_path(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn month_names_are_zero_indexed() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(11), "December");
        assert_eq!(TemperatureRecord::new(1900, 12, 0.0).month_index(), 11);
    }
}
