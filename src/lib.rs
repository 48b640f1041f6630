#![deny(unsafe_code)]

//! Heat map layout for monthly global land-surface temperature anomalies.
//!
//! This library turns a dataset of `(year, month, variance)` records and a base
//! temperature into a positioned, colored grid: one horizontal band per year,
//! one vertical band per month, and a threshold color bucket per absolute
//! temperature, together with axis ticks, a color legend and tooltip text.
//!
//! # Features
//!
//! - **Pure layout**: [`HeatMap::compute`] is deterministic and free of hidden state
//! - **Threshold coloring**: equal-step boundaries over the temperature extent, one
//!   reversed red-yellow-blue color per bucket
//! - **Band scales**: unrounded year bands and whole-pixel month bands
//! - **Eager validation**: empty datasets and malformed records are rejected up front
//! - **SVG output**: one renderer with tooltip, legend and label switches
//!
//! # Example
//!
//! ```rust
//! use heatmap::{render_svg, Dataset, HeatMap, HeatMapConfig, RenderOptions};
//!
//! let dataset = Dataset::from_json_str(r#"{
//!     "baseTemperature": 8.66,
//!     "monthlyVariance": [
//!         {"year": 1753, "month": 1, "variance": -1.366},
//!         {"year": 1753, "month": 2, "variance": -2.223},
//!         {"year": 1753, "month": 3, "variance": 0.211}
//!     ]
//! }"#).unwrap();
//!
//! let heat_map = HeatMap::compute(&dataset, &HeatMapConfig::default()).unwrap();
//! assert_eq!(heat_map.cells.len(), 3);
//! assert_eq!(heat_map.cells[1].color, heat_map.color_scale.palette()[0]);
//!
//! let svg = render_svg(&heat_map, &RenderOptions::default()).unwrap();
//! assert!(svg.contains("<title>1753 - February"));
//! ```

pub mod color;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod render;
pub mod scale;

pub use crate::color::{
    assign_color, bucket_index, check_bucket_count, compute_color_domain, diverging_palette,
    legend_bucket_ranges, ColorScale, LegendBucket, Rgb, DEFAULT_BUCKETS, MAX_BUCKETS,
};
pub use crate::dataset::{Dataset, TemperatureRecord};
pub use crate::error::{Error, Result};
pub use crate::layout::{AxisTick, Cell, HeatMap, HeatMapConfig, Legend, LegendSwatch, Margin, Tooltip};
pub use crate::render::{render_svg, RenderOptions};
pub use crate::scale::{compute_month_band, compute_year_band, Band, BandScale, LinearScale};
