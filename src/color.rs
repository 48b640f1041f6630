//! Threshold color scale for absolute temperatures.
//!
//! The temperature extent is cut into `bucket_count` equal steps. The upper
//! edge of each step is a threshold boundary, giving `bucket_count + 1`
//! buckets, and each bucket takes one color of a reversed red-yellow-blue
//! diverging palette so cold months are blue and warm months red.

use std::fmt;

use heapless::Vec as FixedVec;
use serde::{Deserialize, Serialize};

use crate::dataset::{temperature_extent, Dataset, TemperatureRecord};
use crate::error::{Error, Result};

/// Number of threshold boundaries used when nothing else is configured.
pub const DEFAULT_BUCKETS: usize = 11;

/// Largest supported number of threshold boundaries.
pub const MAX_BUCKETS: usize = 32;

/// Threshold boundaries of a color scale, non-decreasing.
pub type Domain = FixedVec<f64, MAX_BUCKETS>;

/// One color per bucket, coldest first.
pub type Palette = FixedVec<Rgb, { MAX_BUCKETS + 1 }>;

/// An opaque sRGB color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    const fn hex(value: u32) -> Rgb {
        Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// ColorBrewer RdYlBu, 11 classes, red end first.
pub const RD_YL_BU: [Rgb; 11] = [
    Rgb::hex(0xa50026),
    Rgb::hex(0xd73027),
    Rgb::hex(0xf46d43),
    Rgb::hex(0xfdae61),
    Rgb::hex(0xfee090),
    Rgb::hex(0xffffbf),
    Rgb::hex(0xe0f3f8),
    Rgb::hex(0xabd9e9),
    Rgb::hex(0x74add1),
    Rgb::hex(0x4575b4),
    Rgb::hex(0x313695),
];

/// Samples the reversed RdYlBu scheme at `colors` evenly spaced points, blue first.
///
/// Eleven colors reproduce the scheme exactly; other counts interpolate
/// linearly between neighbouring scheme colors.
///
/// # Examples
///
/// ```rust
/// use heatmap::color::{diverging_palette, RD_YL_BU};
///
/// let palette = diverging_palette(12).unwrap();
/// assert_eq!(palette.len(), 12);
/// assert_eq!(palette[0], RD_YL_BU[10]);
/// assert_eq!(palette[11], RD_YL_BU[0]);
/// ```
pub fn diverging_palette(colors: usize) -> Result<Palette> {
    if colors == 0 || colors > MAX_BUCKETS + 1 {
        return Err(Error::InvalidBucketCount(colors.saturating_sub(1)));
    }

    let last = RD_YL_BU.len() - 1;
    let mut palette = Palette::new();
    for i in 0..colors {
        let t = if colors == 1 {
            0.5
        } else {
            i as f64 / (colors - 1) as f64
        };
        let pos = t * last as f64;
        let lower = pos.floor() as usize;
        let color = if lower >= last {
            RD_YL_BU[0]
        } else {
            RD_YL_BU[last - lower].lerp(RD_YL_BU[last - lower - 1], pos - lower as f64)
        };
        let _ = palette.push(color);
    }
    Ok(palette)
}

/// Threshold boundaries splitting the absolute temperature extent into equal steps.
///
/// Boundary `i` is `min + (i + 1) * step` with `step = (max - min) / bucket_count`.
/// When every record has the same temperature the step is zero and every
/// boundary equals the minimum.
///
/// # Returns
///
/// * `Ok(Domain)` - `bucket_count` non-decreasing boundaries within `[min, max]`
/// * `Err(Error::EmptyDataset)` - If `records` is empty
/// * `Err(Error::InvalidMonth)`, `Err(Error::NonFiniteVariance)` or
///   `Err(Error::NonFiniteBaseTemperature)` - If a record or the base temperature is malformed
/// * `Err(Error::InvalidBucketCount)` - If `bucket_count` is zero or above [`MAX_BUCKETS`]
///
/// # Examples
///
/// ```rust
/// use heatmap::{compute_color_domain, TemperatureRecord};
///
/// let records = [
///     TemperatureRecord::new(1753, 1, -6.1),
///     TemperatureRecord::new(1753, 2, -5.8),
/// ];
/// let domain = compute_color_domain(&records, 8.0, 11).unwrap();
///
/// assert_eq!(domain.len(), 11);
/// assert!(domain.iter().all(|b| *b > 1.9 && *b < 2.2 + 1e-9));
/// ```
pub fn compute_color_domain(
    records: &[TemperatureRecord],
    base_temperature: f64,
    bucket_count: usize,
) -> Result<Domain> {
    check_bucket_count(bucket_count)?;
    let (min, max) = temperature_extent(records, base_temperature)?;
    Ok(domain_from_extent(min, max, bucket_count))
}

/// Rejects a bucket count of zero or above [`MAX_BUCKETS`].
pub fn check_bucket_count(bucket_count: usize) -> Result<()> {
    if bucket_count == 0 || bucket_count > MAX_BUCKETS {
        return Err(Error::InvalidBucketCount(bucket_count));
    }
    Ok(())
}

fn domain_from_extent(min: f64, max: f64, bucket_count: usize) -> Domain {
    let step = (max - min) / bucket_count as f64;
    let mut domain = Domain::new();
    for i in 0..bucket_count {
        let _ = domain.push(min + (i + 1) as f64 * step);
    }
    domain
}

/// Bucket a temperature falls into: the number of boundaries strictly below it.
pub fn bucket_index(temperature: f64, domain: &[f64]) -> usize {
    domain.partition_point(|boundary| *boundary < temperature)
}

/// Color of the bucket a temperature falls into.
///
/// # Returns
///
/// * `Ok(Rgb)` - `palette[bucket_index(temperature, domain)]`
/// * `Err(Error::PaletteLength)` - If the palette does not hold exactly `domain.len() + 1` colors
pub fn assign_color(temperature: f64, domain: &[f64], palette: &[Rgb]) -> Result<Rgb> {
    check_palette(domain, palette)?;
    Ok(palette[bucket_index(temperature, domain)])
}

fn check_palette(domain: &[f64], palette: &[Rgb]) -> Result<()> {
    if palette.len() != domain.len() + 1 {
        return Err(Error::PaletteLength {
            expected: domain.len() + 1,
            actual: palette.len(),
        });
    }
    Ok(())
}

/// One legend swatch: a temperature sub-range and its color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendBucket {
    pub lower: f64,
    pub upper: f64,
    pub color: Rgb,
}

/// Temperature range covered by every bucket, in bucket order.
///
/// The first bucket starts at `min`, the last ends at `max`, and each bucket
/// in between spans two consecutive boundaries, so the ranges tile `[min, max]`.
pub fn legend_bucket_ranges(
    domain: &[f64],
    min: f64,
    max: f64,
    palette: &[Rgb],
) -> Result<Vec<LegendBucket>> {
    check_palette(domain, palette)?;
    Ok(legend_ranges(domain, min, max, palette))
}

fn legend_ranges(domain: &[f64], min: f64, max: f64, palette: &[Rgb]) -> Vec<LegendBucket> {
    palette
        .iter()
        .enumerate()
        .map(|(k, color)| LegendBucket {
            lower: if k == 0 { min } else { domain[k - 1] },
            upper: domain.get(k).copied().unwrap_or(max),
            color: *color,
        })
        .collect()
}

/// Boundaries, palette and extent for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Domain,
    palette: Palette,
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Builds a scale with `bucket_count` boundaries and the default diverging palette.
    pub fn new(records: &[TemperatureRecord], base_temperature: f64, bucket_count: usize) -> Result<ColorScale> {
        check_bucket_count(bucket_count)?;
        let palette = diverging_palette(bucket_count + 1)?;
        ColorScale::with_palette(records, base_temperature, &palette)
    }

    /// Builds a scale whose bucket count follows the palette, one boundary fewer than colors.
    pub fn with_palette(
        records: &[TemperatureRecord],
        base_temperature: f64,
        palette: &[Rgb],
    ) -> Result<ColorScale> {
        let bucket_count = palette.len().saturating_sub(1);
        let domain = compute_color_domain(records, base_temperature, bucket_count)?;
        let (min, max) = temperature_extent(records, base_temperature)?;
        let palette = Palette::from_slice(palette).map_err(|_| Error::PaletteLength {
            expected: bucket_count + 1,
            actual: palette.len(),
        })?;

        if min == max {
            log::warn!("all temperatures equal {min}, every cell falls in the coldest bucket");
        }
        log::debug!("color domain over [{min}, {max}]: {:?}", domain.as_slice());

        Ok(ColorScale {
            domain,
            palette,
            min,
            max,
        })
    }

    pub fn from_dataset(dataset: &Dataset, bucket_count: usize) -> Result<ColorScale> {
        ColorScale::new(&dataset.monthly_variance, dataset.base_temperature, bucket_count)
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Lowest and highest absolute temperature the scale was built from.
    pub fn extent(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn bucket_count(&self) -> usize {
        self.domain.len()
    }

    pub fn bucket_index(&self, temperature: f64) -> usize {
        bucket_index(temperature, &self.domain)
    }

    pub fn color(&self, temperature: f64) -> Rgb {
        self.palette[self.bucket_index(temperature)]
    }

    pub fn legend_buckets(&self) -> Vec<LegendBucket> {
        legend_ranges(&self.domain, self.min, self.max, &self.palette)
    }
}
