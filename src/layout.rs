//! Heat map layout: positions, colors, axes and legend for a whole dataset.
//!
//! [`HeatMap::compute`] is the single entry point. It is a pure function of
//! the dataset and the [`HeatMapConfig`]; running it twice on the same input
//! yields identical geometry and colors.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{check_bucket_count, ColorScale, LegendBucket, Rgb, DEFAULT_BUCKETS};
use crate::dataset::{month_name, Dataset};
use crate::error::{Error, Result};
use crate::scale::{compute_month_band, compute_year_band, LinearScale, MONTH_SLOTS};

pub const TITLE: &str = "Monthly Global Land-Surface Temperature";

/// Space kept free around the cell grid, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 20.0,
            right: 20.0,
            bottom: 120.0,
            left: 90.0,
        }
    }
}

/// Canvas size, margins, bucket count and legend size.
///
/// Every field has a default, so a JSON config only needs the fields it changes.
///
/// # Examples
///
/// ```rust
/// use heatmap::HeatMapConfig;
///
/// let config = HeatMapConfig::from_json_str(r#"{"width": 800, "margin": {"left": 60}}"#).unwrap();
/// assert_eq!(config.width, 800.0);
/// assert_eq!(config.height, 560.0);
/// assert_eq!(config.margin.left, 60.0);
/// assert_eq!(config.margin.bottom, 120.0);
/// assert_eq!(config.bucket_count, 11);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatMapConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Threshold boundaries in the color scale; buckets are one more
    pub bucket_count: usize,
    pub legend_width: f64,
    pub legend_height: f64,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        HeatMapConfig {
            width: 1600.0,
            height: 560.0,
            margin: Margin::default(),
            bucket_count: DEFAULT_BUCKETS,
            legend_width: 400.0,
            legend_height: 24.0,
        }
    }
}

impl HeatMapConfig {
    pub fn from_json_str(json: &str) -> Result<HeatMapConfig> {
        let config: HeatMapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<HeatMapConfig> {
        let json = fs::read_to_string(path)?;
        HeatMapConfig::from_json_str(&json)
    }

    /// Checks every geometry setting and the bucket count.
    ///
    /// Sizes must be finite, margins non-negative, and the plot area and
    /// legend must keep room to draw in.
    pub fn validate(&self) -> Result<()> {
        check_bucket_count(self.bucket_count)?;

        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(Error::InvalidDimensions(format!(
                "canvas {}x{}",
                self.width, self.height
            )));
        }

        let margin = &self.margin;
        for (side, value) in [
            ("top", margin.top),
            ("right", margin.right),
            ("bottom", margin.bottom),
            ("left", margin.left),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidDimensions(format!("{side} margin {value}")));
            }
        }

        let plot_width = self.width - margin.left - margin.right;
        let plot_height = self.height - margin.top - margin.bottom;
        if plot_width <= 0.0 {
            return Err(Error::InvalidDimensions(format!(
                "plot width {plot_width} after margins"
            )));
        }
        if plot_height <= 0.0 {
            return Err(Error::InvalidDimensions(format!(
                "plot height {plot_height} after margins"
            )));
        }

        let legend_ok = |v: f64| v.is_finite() && v > 0.0;
        if !(legend_ok(self.legend_width) && legend_ok(self.legend_height)) {
            return Err(Error::InvalidDimensions(format!(
                "legend {}x{}",
                self.legend_width, self.legend_height
            )));
        }
        Ok(())
    }

    /// Horizontal pixel range of the cell grid.
    pub fn x_range(&self) -> std::ops::Range<f64> {
        self.margin.left..self.width - self.margin.right
    }

    /// Vertical pixel range of the cell grid.
    pub fn y_range(&self) -> std::ops::Range<f64> {
        self.margin.top..self.height - self.margin.bottom
    }
}

/// One record placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub year: i32,
    /// Zero-based, January = 0
    pub month_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Rgb,
    /// Absolute temperature, base plus variance
    pub temperature: f64,
    pub variance: f64,
}

impl Cell {
    pub fn tooltip(&self) -> Tooltip {
        Tooltip {
            date: format!("{} - {}", self.year, month_name(self.month_index)),
            temperature: format!("{:.1}\u{2103}", self.temperature),
            variance: format!("{:+.1}\u{2103}", self.variance),
        }
    }
}

/// Text shown when hovering a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    /// e.g. `1753 - January`
    pub date: String,
    /// e.g. `7.3℃`
    pub temperature: String,
    /// e.g. `-1.4℃`, always signed
    pub variance: String,
}

impl Tooltip {
    pub fn lines(&self) -> [&str; 3] {
        [&self.date, &self.temperature, &self.variance]
    }
}

/// A labelled position along an axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub label: String,
    pub position: f64,
}

/// A legend swatch placed along the legend's linear scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendSwatch {
    pub bucket: LegendBucket,
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub swatches: Vec<LegendSwatch>,
    /// One tick per threshold boundary, labelled with one decimal
    pub ticks: Vec<AxisTick>,
    pub width: f64,
    pub height: f64,
}

/// Everything a renderer needs to draw the heat map.
#[derive(Debug, Clone)]
pub struct HeatMap {
    pub config: HeatMapConfig,
    pub title: String,
    pub description: String,
    pub base_temperature: f64,
    /// One cell per record, in record order
    pub cells: Vec<Cell>,
    /// Distinct years divisible by ten
    pub x_ticks: Vec<AxisTick>,
    /// The twelve months, January first
    pub y_ticks: Vec<AxisTick>,
    pub legend: Legend,
    pub color_scale: ColorScale,
}

impl HeatMap {
    /// Lays out every record of `dataset` on the grid described by `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(HeatMap)` - Cells, axes and legend
    /// * `Err(Error)` - If the dataset or config is invalid
    ///
    /// # Examples
    ///
    /// ```rust
    /// use heatmap::{Dataset, HeatMap, HeatMapConfig, TemperatureRecord};
    ///
    /// let dataset = Dataset::new(8.0, vec![
    ///     TemperatureRecord::new(1760, 1, -1.0),
    ///     TemperatureRecord::new(1760, 2, 0.5),
    ///     TemperatureRecord::new(1761, 1, 1.0),
    /// ]).unwrap();
    /// let heat_map = HeatMap::compute(&dataset, &HeatMapConfig::default()).unwrap();
    ///
    /// assert_eq!(heat_map.cells.len(), 3);
    /// assert_eq!(heat_map.y_ticks.len(), 12);
    /// assert_eq!(heat_map.x_ticks[0].label, "1760");
    /// assert_eq!(heat_map.legend.swatches.len(), 12);
    /// ```
    pub fn compute(dataset: &Dataset, config: &HeatMapConfig) -> Result<HeatMap> {
        dataset.validate()?;
        config.validate()?;

        let color_scale = ColorScale::from_dataset(dataset, config.bucket_count)?;
        let years: Vec<i32> = dataset.monthly_variance.iter().map(|r| r.year).collect();
        let x = compute_year_band(&years, config.x_range());
        let y = compute_month_band(config.y_range());

        let cells: Vec<Cell> = dataset
            .monthly_variance
            .iter()
            .map(|record| {
                let month = y[record.month_index().min(MONTH_SLOTS - 1)];
                let x_start = x.band(&record.year).map_or(config.margin.left, |b| b.start);
                let temperature = dataset.absolute_temperature(record);
                Cell {
                    year: record.year,
                    month_index: record.month_index(),
                    x: x_start,
                    y: month.start,
                    width: x.bandwidth(),
                    height: month.width,
                    color: color_scale.color(temperature),
                    temperature,
                    variance: record.variance,
                }
            })
            .collect();

        let x_ticks = x
            .bands()
            .filter(|(year, _)| year.rem_euclid(10) == 0)
            .map(|(year, band)| AxisTick {
                label: year.to_string(),
                position: band.center(),
            })
            .collect();

        let y_ticks = y
            .iter()
            .enumerate()
            .map(|(month_index, band)| AxisTick {
                label: month_name(month_index).to_string(),
                position: band.center(),
            })
            .collect();

        let legend = legend_layout(&color_scale, config.legend_width, config.legend_height);

        let description = match dataset.year_span() {
            Some((first, last)) => format!(
                "{first} - {last}: base temperature {}\u{2103}",
                dataset.base_temperature
            ),
            None => String::new(),
        };

        log::info!(
            "laid out {} cells over {} years, {} color buckets",
            cells.len(),
            x.len(),
            color_scale.palette().len()
        );

        Ok(HeatMap {
            config: config.clone(),
            title: TITLE.to_string(),
            description,
            base_temperature: dataset.base_temperature,
            cells,
            x_ticks,
            y_ticks,
            legend,
            color_scale,
        })
    }
}

fn legend_layout(color_scale: &ColorScale, width: f64, height: f64) -> Legend {
    let scale = LinearScale::new(color_scale.extent(), (0.0, width));

    let swatches = color_scale
        .legend_buckets()
        .into_iter()
        .map(|bucket| {
            let x = scale.apply(bucket.lower);
            LegendSwatch {
                bucket,
                x,
                width: scale.apply(bucket.upper) - x,
            }
        })
        .collect();

    let ticks = color_scale
        .domain()
        .iter()
        .map(|boundary| AxisTick {
            label: format!("{boundary:.1}"),
            position: scale.apply(*boundary),
        })
        .collect();

    Legend {
        swatches,
        ticks,
        width,
        height,
    }
}
