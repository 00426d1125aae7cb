use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use resonance_field_core::config::ConfigError;
use resonance_field_core::logging;
use resonance_field_core::{EngineConfig, ResonancePipeline};
use resonance_shared::{thread_source, PixelBuffer};

fn main() -> Result<()> {
    let config = load_config()?;
    println!(
        "Loaded config: grid={}x{} duration={} threshold={}",
        config.simulation.width,
        config.simulation.height,
        config.simulation.duration,
        config.simulation.threshold
    );

    let input = PixelBuffer::from_fn(256, 192, |x, y| {
        [
            (60 + x * 160 / 256) as u8,
            (80 + y * 120 / 192) as u8,
            (200 - (x + y) * 120 / 448) as u8,
            255,
        ]
    });

    let pipeline = ResonancePipeline::new(config)?;
    let outcome = pipeline.render(&input, &mut thread_source())?;
    println!("{}", outcome.stats);
    println!(
        "knots={} effect={:?} main_colors={:?}",
        outcome.total_knots,
        outcome.effect,
        outcome.main_colors.iter().map(|c| c.rgb()).collect::<Vec<_>>()
    );

    write_png(&outcome.image, "out/resonance.png").context("writing PNG")?;

    fs::create_dir_all("logs")?;
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open("logs/renders.jsonl")?;
    logging::log_render(&mut log, &outcome)?;

    println!("Demo complete. Harmony {:.3}", outcome.stats.harmony);
    Ok(())
}

fn load_config() -> Result<EngineConfig, ConfigError> {
    EngineConfig::load_from_file("config/engine.toml").or_else(|err| {
        eprintln!("Falling back to default config: {err}");
        Ok(EngineConfig::default())
    })
}

fn write_png<P: AsRef<Path>>(image: &PixelBuffer, path: P) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let backend = BitMapBackend::new(path, (image.width() as u32, image.height() as u32));
    let drawing_area = backend.into_drawing_area();
    for y in 0..image.height() {
        for x in 0..image.width() {
            let [r, g, b, _] = image.pixel(x, y);
            drawing_area
                .draw_pixel((x as i32, y as i32), &RGBColor(r, g, b))
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        }
    }

    drawing_area
        .present()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}
