//! Ray intersection tests for triangles, planar quads and spheres.
//!
//! Each primitive answers a single question through the
//! [`Intersect`](object::Intersect) trait: does this ray hit me? A ray is an
//! origin plus a travel vector ([`Ray`](ray::Ray)); hits count for any `t >= 0`
//! unless [`Options`](config::Options) bound it.
//!
//! ```
//! use rtgeom::object::{Intersect, Triangle};
//! use rtgeom::ray::Ray;
//! use rtgeom::vec3::Vec3;
//!
//! let tri = Triangle::new(Vec3(-1., -1., 0.), Vec3(1., -1., 0.), Vec3(0., 1., 0.));
//! let ray = Ray::through(Vec3(0., 0., -1.), Vec3(0., 0., 1.));
//! assert!(tri.intersect(&ray));
//! ```
//!
//! The rest of this module sweeps a camera's worth of rays over one primitive
//! to produce a [`HitMask`], which is handy for eyeballing what a primitive
//! actually covers.

#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod error;
pub mod object;
pub mod ray;
pub mod vec3;

use std::io::{self, Write};

use rayon::prelude::*;
use tracing::debug;

use crate::camera::Camera;
use crate::config::Options;
use crate::object::Intersect;

/// A grid of hit/miss results, stored top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct HitMask(Vec<Vec<bool>>);

impl HitMask {
    pub fn par_compute(nx: usize, ny: usize, f: impl Fn(usize, usize) -> bool + Sync) -> HitMask {
        HitMask(
            (0..ny)
                .into_par_iter()
                .rev()
                .map(|y| (0..nx).map(|x| f(x, y)).collect())
                .collect(),
        )
    }

    pub fn compute(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> bool) -> HitMask {
        HitMask(
            (0..ny)
                .rev()
                .map(|y| (0..nx).map(|x| f(x, y)).collect())
                .collect(),
        )
    }

    pub fn width(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.0.len()
    }

    /// Number of cells that hit.
    pub fn count(&self) -> usize {
        self.0.iter().flatten().filter(|&&hit| hit).count()
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.0.iter().map(Vec::as_slice)
    }
}

/// Writes `mask` as a plain (ASCII) PBM image, hits in black.
pub fn write_pbm(mask: &HitMask, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "P1\n{} {}", mask.width(), mask.height())?;
    for scanline in mask.rows() {
        let line: Vec<&str> = scanline
            .iter()
            .map(|&hit| if hit { "1" } else { "0" })
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Image-plane coordinate of the center of cell `i` out of `n`.
#[inline]
fn cell_center(i: usize, n: usize) -> f64 {
    (i as f64 + 0.5) / n as f64
}

/// Shoots one ray through the center of each cell of an `nx` by `ny` grid and
/// records which ones hit `object`.
pub fn cast(nx: usize, ny: usize, camera: &Camera, object: impl Intersect, opts: &Options) -> HitMask {
    let mask = HitMask::compute(nx, ny, |x, y| {
        let r = camera.get_ray(cell_center(x, nx), cell_center(y, ny));
        object.intersect_with(&r, opts)
    });
    debug!(nx, ny, hits = mask.count(), "cast hit mask");
    mask
}

/// Parallel version of [`cast`]; gives the same mask.
pub fn par_cast(nx: usize, ny: usize, camera: &Camera, object: impl Intersect, opts: &Options) -> HitMask {
    let mask = HitMask::par_compute(nx, ny, |x, y| {
        let r = camera.get_ray(cell_center(x, nx), cell_center(y, ny));
        object.intersect_with(&r, opts)
    });
    debug!(nx, ny, hits = mask.count(), "par_cast hit mask");
    mask
}
