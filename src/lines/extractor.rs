use super::region::RegionAccumulator;
use super::LineDetectOptions;
use crate::angle::{angular_difference, normalize_half_pi};
use crate::edges::{sobel_gradients, Grad};
use crate::geometry::{Point2D, Segment};
use crate::image::ImageF32;
use nalgebra::{Matrix2, SymmetricEigen};

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub(super) struct Extractor<'o> {
    grad: Grad,
    width: usize,
    height: usize,
    options: &'o LineDetectOptions,
    angle_tol: f32,
    used: Vec<bool>,
    angle_cache: Vec<f32>,
    stack: Vec<usize>,
    region: RegionAccumulator,
    segments: Vec<Segment>,
}

impl<'o> Extractor<'o> {
    pub(super) fn new(img: &ImageF32, options: &'o LineDetectOptions) -> Self {
        let n = img.w * img.h;
        Self {
            grad: sobel_gradients(img),
            width: img.w,
            height: img.h,
            options,
            angle_tol: options.angle_tolerance_deg.to_radians(),
            used: vec![false; n],
            angle_cache: vec![f32::NAN; n],
            stack: Vec::with_capacity(64),
            region: RegionAccumulator::with_capacity(128),
            segments: Vec::new(),
        }
    }

    pub(super) fn extract(mut self) -> Vec<Segment> {
        for idx in 0..(self.width * self.height) {
            self.process_seed(idx);
        }
        self.segments
    }

    fn process_seed(&mut self, idx: usize) {
        if self.used[idx] {
            return;
        }
        let (x, y) = (idx % self.width, idx / self.width);
        if self.grad.mag.get(x, y) < self.options.magnitude_threshold {
            return;
        }

        self.region.reset();
        self.stack.clear();
        let seed_angle = self.angle_at(idx);
        self.used[idx] = true;
        self.stack.push(idx);
        self.grow_region(seed_angle);

        match self.fit_segment() {
            Some(segment) => self.segments.push(segment),
            None => self.region.release(&mut self.used),
        }
    }

    fn grow_region(&mut self, seed_angle: f32) {
        let half_tol = self.angle_tol * 0.5;
        while let Some(idx) = self.stack.pop() {
            let (x, y) = (idx % self.width, idx / self.width);
            let aligned = angular_difference(self.angle_at(idx), seed_angle) <= half_tol;
            self.region.push(idx, x, y, aligned);

            for (dx, dy) in NEIGH_OFFSETS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0 || yn < 0 || xn >= self.width as isize || yn >= self.height as isize {
                    continue;
                }
                let (nx, ny) = (xn as usize, yn as usize);
                let n_idx = ny * self.width + nx;
                if self.used[n_idx] || self.grad.mag.get(nx, ny) < self.options.magnitude_threshold
                {
                    continue;
                }
                if angular_difference(self.angle_at(n_idx), seed_angle) <= self.angle_tol {
                    self.used[n_idx] = true;
                    self.stack.push(n_idx);
                }
            }
        }
    }

    fn fit_segment(&self) -> Option<Segment> {
        if self.region.len() < self.options.min_region_px.max(2) {
            return None;
        }
        if self.region.aligned_fraction() < self.options.min_aligned_fraction {
            return None;
        }
        let ((cx, cy), (cxx, cxy, cyy)) = self.region.moments()?;

        let eig = SymmetricEigen::new(Matrix2::new(cxx, cxy, cxy, cyy));
        let major = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
            0
        } else {
            1
        };
        if !eig.eigenvalues[major].is_finite() || eig.eigenvalues[major] <= 0.0 {
            return None;
        }
        let dir = eig.eigenvectors.column(major);
        let norm = dir[0].hypot(dir[1]);
        if !norm.is_finite() || norm < 1e-9 {
            return None;
        }
        let (tx, ty) = (dir[0] / norm, dir[1] / norm);

        let (mut smin, mut smax) = (f64::INFINITY, f64::NEG_INFINITY);
        for &idx in &self.region.indices {
            let dx = (idx % self.width) as f64 - cx;
            let dy = (idx / self.width) as f64 - cy;
            let s = dx * tx + dy * ty;
            smin = smin.min(s);
            smax = smax.max(s);
        }
        let len = smax - smin;
        if !len.is_finite() || len < self.options.min_length_px as f64 {
            return None;
        }

        Some(Segment::from_endpoints(
            Point2D::new(cx + smin * tx, cy + smin * ty),
            Point2D::new(cx + smax * tx, cy + smax * ty),
        ))
    }

    fn angle_at(&mut self, idx: usize) -> f32 {
        let cached = self.angle_cache[idx];
        if !cached.is_nan() {
            return cached;
        }
        let angle = normalize_half_pi(self.grad.orientation(idx % self.width, idx / self.width));
        self.angle_cache[idx] = angle;
        angle
    }
}
