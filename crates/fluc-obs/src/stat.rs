use serde::{Deserialize, Serialize};

/// Fixed-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges (inclusive of the left edge, exclusive of the right edge except the last bin).
    pub edges: Vec<f64>,
    /// Counts recorded per bin.
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Uniform binning of `[start, end)` into `bins` bins.
    pub fn uniform(start: f64, end: f64, bins: usize) -> Self {
        let step = if bins == 0 {
            1.0
        } else {
            (end - start) / bins as f64
        };
        let edges = (0..=bins).map(|idx| start + idx as f64 * step).collect();
        Self {
            edges,
            counts: vec![0; bins],
        }
    }

    /// Records one value. Out-of-range values land in the edge bins.
    pub fn fill(&mut self, value: f64) {
        if let Some(bin) = self.bin(value) {
            self.counts[bin] += 1;
        }
    }

    fn bin(&self, value: f64) -> Option<usize> {
        let bins = self.counts.len();
        if bins == 0 || value.is_nan() {
            return None;
        }
        let start = self.edges[0];
        let step = (self.edges[bins] - start) / bins as f64;
        let bin = ((value - start) / step).floor();
        Some(bin.clamp(0.0, (bins - 1) as f64) as usize)
    }

    /// Total number of recorded values.
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds the counts of a histogram with identical edges.
    pub fn merge(&mut self, other: &Histogram) -> bool {
        if self.edges != other.edges {
            return false;
        }
        for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
            *count += extra;
        }
        true
    }
}

/// Two-dimensional fixed-width histogram stored row-major over `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram2 {
    /// Axis of the first coordinate; its counts are unused.
    pub x: Histogram,
    /// Axis of the second coordinate; its counts are unused.
    pub y: Histogram,
    /// Counts indexed by `x_bin * y_bins + y_bin`.
    pub counts: Vec<u64>,
}

impl Histogram2 {
    /// Uniform binning over both axes.
    pub fn uniform(x: (f64, f64, usize), y: (f64, f64, usize)) -> Self {
        Self {
            x: Histogram::uniform(x.0, x.1, x.2),
            y: Histogram::uniform(y.0, y.1, y.2),
            counts: vec![0; x.2 * y.2],
        }
    }

    /// Records one point.
    pub fn fill(&mut self, x: f64, y: f64) {
        if let (Some(ix), Some(iy)) = (self.x.bin(x), self.y.bin(y)) {
            self.counts[ix * self.y.counts.len() + iy] += 1;
        }
    }

    /// Total number of recorded points.
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds the counts of a histogram with identical axes.
    pub fn merge(&mut self, other: &Histogram2) -> bool {
        if self.x.edges != other.x.edges || self.y.edges != other.y.edges {
            return false;
        }
        for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
            *count += extra;
        }
        true
    }
}

/// Three-dimensional fixed-width histogram, row-major over `(x, y, z)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram3 {
    /// Axis of the first coordinate; its counts are unused.
    pub x: Histogram,
    /// Axis of the second coordinate; its counts are unused.
    pub y: Histogram,
    /// Axis of the third coordinate; its counts are unused.
    pub z: Histogram,
    /// Counts indexed by `(x_bin * y_bins + y_bin) * z_bins + z_bin`.
    pub counts: Vec<u64>,
}

impl Histogram3 {
    /// Uniform binning over all three axes.
    pub fn uniform(x: (f64, f64, usize), y: (f64, f64, usize), z: (f64, f64, usize)) -> Self {
        Self {
            x: Histogram::uniform(x.0, x.1, x.2),
            y: Histogram::uniform(y.0, y.1, y.2),
            z: Histogram::uniform(z.0, z.1, z.2),
            counts: vec![0; x.2 * y.2 * z.2],
        }
    }

    /// Flat index of the bin containing a point.
    pub fn bin(&self, x: f64, y: f64, z: f64) -> Option<usize> {
        let (ix, iy, iz) = (self.x.bin(x)?, self.y.bin(y)?, self.z.bin(z)?);
        Some((ix * self.y.counts.len() + iy) * self.z.counts.len() + iz)
    }

    /// Records one point.
    pub fn fill(&mut self, x: f64, y: f64, z: f64) {
        if let Some(bin) = self.bin(x, y, z) {
            self.counts[bin] += 1;
        }
    }

    /// Total number of recorded points.
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds the counts of a histogram with identical axes.
    pub fn merge(&mut self, other: &Histogram3) -> bool {
        if self.x.edges != other.x.edges
            || self.y.edges != other.y.edges
            || self.z.edges != other.z.edges
        {
            return false;
        }
        for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
            *count += extra;
        }
        true
    }
}

/// Weighted running moments of one observable in one bin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Number of fills.
    pub entries: u64,
    /// `sum w`.
    pub sum_w: f64,
    /// `sum w^2`.
    pub sum_w2: f64,
    /// `sum w x`.
    pub sum_wx: f64,
    /// `sum w x^2`.
    pub sum_wx2: f64,
}

impl Profile {
    /// Records one weighted value.
    pub fn fill(&mut self, value: f64, weight: f64) {
        self.entries += 1;
        self.sum_w += weight;
        self.sum_w2 += weight * weight;
        self.sum_wx += weight * value;
        self.sum_wx2 += weight * value * value;
    }

    /// Adds another profile's moments.
    pub fn merge(&mut self, other: &Profile) {
        self.entries += other.entries;
        self.sum_w += other.sum_w;
        self.sum_w2 += other.sum_w2;
        self.sum_wx += other.sum_wx;
        self.sum_wx2 += other.sum_wx2;
    }

    /// Weighted mean, `None` without weight.
    pub fn mean(&self) -> Option<f64> {
        (self.sum_w > 0.0).then(|| self.sum_wx / self.sum_w)
    }

    /// Standard error of the weighted mean using the effective entry count
    /// `(sum w)^2 / sum w^2`.
    pub fn std_error(&self) -> Option<f64> {
        let mean = self.mean()?;
        if self.sum_w2 <= 0.0 {
            return None;
        }
        let variance = (self.sum_wx2 / self.sum_w - mean * mean).max(0.0);
        let effective = self.sum_w * self.sum_w / self.sum_w2;
        Some((variance / effective).sqrt())
    }
}
