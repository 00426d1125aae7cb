//! JSON line-delimited run records.
//!
//! The engine never opens files itself; hosts pass any [`Write`] sink (a log
//! file, stdout, an in-memory buffer) and get one JSON object per line.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::field::SimulationRun;
use crate::palette::MoodCategory;
use crate::pipeline::RenderOutcome;
use crate::projection::RiemannStats;

pub fn append_json_line<W: Write, T: Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    writer.write_all(b"\n")
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
pub struct SimulationLogEntry {
    pub timestamp_ms: u128,
    pub width: usize,
    pub height: usize,
    pub duration: usize,
    pub total_knots: usize,
    pub peak_cell: u32,
    pub stats: RiemannStats,
}

pub fn log_simulation<W: Write>(
    writer: &mut W,
    config: &SimulationConfig,
    run: &SimulationRun,
    stats: &RiemannStats,
) -> io::Result<()> {
    let entry = SimulationLogEntry {
        timestamp_ms: timestamp_ms(),
        width: config.width,
        height: config.height,
        duration: config.duration,
        total_knots: run.total_knots,
        peak_cell: run.knot_map.max(),
        stats: *stats,
    };
    append_json_line(writer, &entry)
}

#[derive(Debug, Serialize)]
pub struct RenderLogEntry {
    pub timestamp_ms: u128,
    pub output_width: usize,
    pub output_height: usize,
    pub harmony: f64,
    pub total_knots: usize,
    pub main_colors: Vec<[u8; 3]>,
    pub activations: BTreeMap<&'static str, f64>,
    pub effect: String,
}

pub fn log_render<W: Write>(writer: &mut W, outcome: &RenderOutcome) -> io::Result<()> {
    let entry = RenderLogEntry {
        timestamp_ms: timestamp_ms(),
        output_width: outcome.image.width(),
        output_height: outcome.image.height(),
        harmony: outcome.stats.harmony,
        total_knots: outcome.total_knots,
        main_colors: outcome.main_colors.iter().map(|color| color.rgb()).collect(),
        activations: MoodCategory::all()
            .into_iter()
            .map(|category| (category.label(), outcome.activations[category.index()]))
            .collect(),
        effect: format!("{:?}", outcome.effect),
    };
    append_json_line(writer, &entry)
}
