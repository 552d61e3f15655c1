/// Running sums over a grown region: pixel moments for the PCA fit plus the
/// aligned-pixel count for the significance test.
pub(super) struct RegionAccumulator {
    pub indices: Vec<usize>,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_xx: f64,
    pub sum_yy: f64,
    pub sum_xy: f64,
    pub aligned: usize,
}

impl RegionAccumulator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indices: Vec::with_capacity(capacity),
            sum_x: 0.0,
            sum_y: 0.0,
            sum_xx: 0.0,
            sum_yy: 0.0,
            sum_xy: 0.0,
            aligned: 0,
        }
    }

    pub fn reset(&mut self) {
        self.indices.clear();
        self.sum_x = 0.0;
        self.sum_y = 0.0;
        self.sum_xx = 0.0;
        self.sum_yy = 0.0;
        self.sum_xy = 0.0;
        self.aligned = 0;
    }

    pub fn push(&mut self, idx: usize, x: usize, y: usize, aligned: bool) {
        self.indices.push(idx);
        let (xf, yf) = (x as f64, y as f64);
        self.sum_x += xf;
        self.sum_y += yf;
        self.sum_xx += xf * xf;
        self.sum_yy += yf * yf;
        self.sum_xy += xf * yf;
        if aligned {
            self.aligned += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn aligned_fraction(&self) -> f32 {
        if self.indices.is_empty() {
            0.0
        } else {
            self.aligned as f32 / self.indices.len() as f32
        }
    }

    /// Centroid and covariance `(cxx, cxy, cyy)`.
    pub fn moments(&self) -> Option<((f64, f64), (f64, f64, f64))> {
        if self.indices.is_empty() {
            return None;
        }
        let n = self.indices.len() as f64;
        let (cx, cy) = (self.sum_x / n, self.sum_y / n);
        let cxx = self.sum_xx / n - cx * cx;
        let cyy = self.sum_yy / n - cy * cy;
        let cxy = self.sum_xy / n - cx * cy;
        Some(((cx, cy), (cxx, cxy, cyy)))
    }

    /// Let rejected pixels seed or join later regions.
    pub fn release(&self, used: &mut [bool]) {
        for &idx in &self.indices {
            used[idx] = false;
        }
    }
}
