//! Renders a hit mask of one primitive as a PBM image on stdout.
//!
//! Usage:
//!   rtgeom [PRIMITIVE_JSON] [OPTIONS_JSON]
//!
//! With no arguments, draws the bow-tie quad `(-1,-1) (-1,1) (1,-1) (1,1)` to
//! show which part of the square the A-C split leaves out. Logs go to stderr;
//! set `RUST_LOG=debug` for more.

use std::env;
use std::io::{self, BufWriter, Write};

use tracing::{info, warn};

use rtgeom::camera::Camera;
use rtgeom::config::Options;
use rtgeom::object::{Primitive, Quad};
use rtgeom::vec3::Vec3;
use rtgeom::*;

fn invalid_input(e: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    const NX: usize = 64;
    const NY: usize = 64;

    let mut args = env::args().skip(1);
    let primitive: Primitive = match args.next() {
        Some(json) => serde_json::from_str(&json).map_err(invalid_input)?,
        None => Quad::new(
            Vec3(-1., -1., 0.),
            Vec3(-1., 1., 0.),
            Vec3(1., -1., 0.),
            Vec3(1., 1., 0.),
        )
        .into(),
    };
    let opts = match args.next() {
        Some(json) => Options::from_json_str(&json).map_err(invalid_input)?,
        None => Options::default(),
    };

    if let Err(e) = primitive.validate() {
        warn!(%e, "rendering anyway");
    }

    let camera = Camera::look(
        Vec3(0., 0., -4.),
        Vec3(0., 0., 0.),
        Vec3(0., 1., 0.),
        40.,
        NX as f64 / NY as f64,
    );

    let mask = par_cast(NX, NY, &camera, &primitive, &opts);
    info!(hits = mask.count(), total = NX * NY, ?primitive, "rendered");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_pbm(&mask, &mut out)?;
    out.flush()
}
