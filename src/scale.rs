//! Position scales: discrete bands for years and months, a linear scale for the legend.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

use heapless::Vec as FixedVec;
use serde::Serialize;

/// Number of month slots on the vertical axis.
pub const MONTH_SLOTS: usize = 12;

/// A contiguous pixel interval along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    /// Leading edge in pixels
    pub start: f64,
    /// Extent in pixels
    pub width: f64,
}

impl Band {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    pub fn center(&self) -> f64 {
        self.start + self.width / 2.0
    }
}

/// Maps a discrete domain onto equal, contiguous pixel bands.
///
/// Keys keep the order they were first seen in; repeated keys share the
/// slot of their first occurrence. There is no padding between bands.
///
/// # Examples
///
/// ```rust
/// use heatmap::scale::BandScale;
///
/// let scale = BandScale::new([1753, 1753, 1754, 1755], 0.0..300.0);
/// assert_eq!(scale.len(), 3);
/// assert_eq!(scale.bandwidth(), 100.0);
/// assert_eq!(scale.band(&1754).unwrap().start, 100.0);
/// assert!(scale.band(&1900).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct BandScale<K> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl<K: Copy + Eq + Hash> BandScale<K> {
    /// Splits `range` evenly from `range.start`, keeping fractional pixel positions.
    pub fn new(keys: impl IntoIterator<Item = K>, range: Range<f64>) -> BandScale<K> {
        BandScale::build(keys, range, false)
    }

    /// Splits `range` into whole-pixel bands.
    ///
    /// The step is floored to an integer and the leftover pixels are shared
    /// before the first and after the last band, with the first band starting
    /// on a whole pixel.
    pub fn rounded(keys: impl IntoIterator<Item = K>, range: Range<f64>) -> BandScale<K> {
        BandScale::build(keys, range, true)
    }

    fn build(keys: impl IntoIterator<Item = K>, range: Range<f64>, round: bool) -> BandScale<K> {
        let mut domain = Vec::new();
        let mut index = HashMap::new();
        for key in keys {
            if !index.contains_key(&key) {
                index.insert(key, domain.len());
                domain.push(key);
            }
        }

        let span = range.end - range.start;
        let slots = domain.len().max(1) as f64;
        let mut step = span / slots;
        if round {
            step = step.floor();
        }
        let mut start = range.start;
        let mut bandwidth = step;
        if round {
            start = (start + (span - step * domain.len() as f64) * 0.5).round();
            bandwidth = bandwidth.round();
        }

        BandScale {
            domain,
            index,
            start,
            step,
            bandwidth,
        }
    }

    /// Band for `key`, or `None` if the key is not in the domain.
    pub fn band(&self, key: &K) -> Option<Band> {
        self.index.get(key).map(|i| self.band_at(*i))
    }

    fn band_at(&self, i: usize) -> Band {
        Band {
            start: self.start + self.step * i as f64,
            width: self.bandwidth,
        }
    }

    /// Distinct keys in slot order.
    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// Every key with its band, in slot order.
    pub fn bands(&self) -> impl Iterator<Item = (K, Band)> + '_ {
        self.domain
            .iter()
            .enumerate()
            .map(|(i, key)| (*key, self.band_at(i)))
    }
}

/// Horizontal bands, one per distinct year in first-occurrence order.
///
/// Bands are left-aligned at `range.start` and cover the range exactly.
pub fn compute_year_band(years: &[i32], range: Range<f64>) -> BandScale<i32> {
    let scale = BandScale::new(years.iter().copied(), range);
    log::debug!(
        "{} year bands, {:.3}px wide",
        scale.len(),
        scale.bandwidth()
    );
    scale
}

/// Vertical bands for the twelve month indices, on whole pixels.
///
/// # Examples
///
/// ```rust
/// use heatmap::compute_month_band;
///
/// let bands = compute_month_band(20.0..440.0);
/// assert_eq!(bands.len(), 12);
/// assert_eq!(bands[0].start, 20.0);
/// assert_eq!(bands[11].end(), 440.0);
/// ```
pub fn compute_month_band(range: Range<f64>) -> FixedVec<Band, MONTH_SLOTS> {
    let scale = BandScale::rounded(0..MONTH_SLOTS, range);
    let mut bands = FixedVec::new();
    for (_, band) in scale.bands() {
        let _ = bands.push(band);
    }
    bands
}

/// Continuous mapping from a value interval onto a pixel interval.
///
/// A zero-width domain maps every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 - d0 == 0.0 {
            0.5
        } else {
            (value - d0) / (d1 - d0)
        };
        r0 + t * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bands_tile_the_range() {
        let years: Vec<i32> = (1753..=2015).collect();
        let scale = compute_year_band(&years, 90.0..1580.0);
        let bands: Vec<Band> = scale.bands().map(|(_, b)| b).collect();

        assert_eq!(bands.len(), years.len());
        assert_eq!(bands[0].start, 90.0);
        assert!((bands[bands.len() - 1].end() - 1580.0).abs() < 1e-9);
        for pair in bands.windows(2) {
            assert!((pair[0].end() - pair[1].start).abs() < 1e-9);
            assert_eq!(pair[0].width, pair[1].width);
        }

        let total: f64 = bands.iter().map(|b| b.width).sum();
        assert!((total - 1490.0).abs() < 1e-6);
    }

    #[test]
    fn year_bands_follow_first_occurrence() {
        let years = [1900, 1899, 1900, 1901, 1899];
        let scale = compute_year_band(&years, 0.0..30.0);

        assert_eq!(scale.domain(), &[1900, 1899, 1901]);
        assert_eq!(scale.band(&1900), Some(Band { start: 0.0, width: 10.0 }));
        assert_eq!(scale.band(&1899), Some(Band { start: 10.0, width: 10.0 }));
        assert_eq!(scale.band(&1901), Some(Band { start: 20.0, width: 10.0 }));
    }

    #[test]
    fn month_bands_are_always_twelve() {
        for range in [0.0..12.0, 20.0..440.0, 5.0..1000.0, 0.0..7.0] {
            assert_eq!(compute_month_band(range).len(), MONTH_SLOTS);
        }
    }

    #[test]
    fn month_bands_sit_on_whole_pixels() {
        let bands = compute_month_band(20.0..450.0);

        // 430px over 12 slots floors to 35px, 10px left over split 5/5
        assert_eq!(bands[0].start, 25.0);
        assert_eq!(bands[0].width, 35.0);
        assert_eq!(bands[11].end(), 445.0);
        for (i, band) in bands.iter().enumerate() {
            assert_eq!(band.start.fract(), 0.0);
            assert_eq!(band.width.fract(), 0.0);
            if i > 0 {
                assert_eq!(bands[i - 1].end(), band.start);
            }
        }
    }

    #[test]
    fn linear_scale_maps_endpoints() {
        let scale = LinearScale::new((1.5, 13.5), (0.0, 400.0));

        assert_eq!(scale.apply(1.5), 0.0);
        assert_eq!(scale.apply(13.5), 400.0);
        assert_eq!(scale.apply(7.5), 200.0);
    }

    #[test]
    fn degenerate_linear_scale_maps_to_midpoint() {
        let scale = LinearScale::new((8.4, 8.4), (0.0, 400.0));
        assert_eq!(scale.apply(8.4), 200.0);
        assert_eq!(scale.apply(-3.0), 200.0);
    }

    #[test]
    fn band_center_is_halfway() {
        let band = Band { start: 10.0, width: 4.0 };
        assert_eq!(band.center(), 12.0);
        assert_eq!(band.end(), 14.0);
    }
}
