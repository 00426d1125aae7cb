use resonance_field_core::logging;
use resonance_field_core::{EngineConfig, MoodCategory, PostEffect, ResonancePipeline};
use resonance_shared::{PixelBuffer, RngSource};

fn sunset(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let t = y as f32 / height as f32;
        [
            (220.0 - 80.0 * t) as u8,
            (90.0 + 60.0 * (x as f32 / width as f32)) as u8,
            (60.0 + 150.0 * t) as u8,
            255,
        ]
    })
}

#[test]
fn renders_from_toml_config() {
    let toml = r#"
[simulation]
width = 24
height = 24
duration = 12
noise = 0.05
threshold = 0.2
precision = 2

[transform]
brightness = 0.05
contrast = 1.1

[post]
output_width = 48
output_height = 32
"#;
    let config = EngineConfig::from_str(toml).unwrap();
    let pipeline = ResonancePipeline::new(config).unwrap();
    let outcome = pipeline
        .render(&sunset(64, 40), &mut RngSource::seeded(17))
        .unwrap();

    assert_eq!((outcome.image.width(), outcome.image.height()), (48, 32));
    assert!(outcome.image.pixels().all(|px| px[3] == 255));
    assert_eq!(outcome.main_colors.len(), MoodCategory::COUNT);
    assert!(outcome
        .activations
        .iter()
        .all(|level| (0.0..=1.0).contains(level)));
    assert!((0.0..=1.0).contains(&outcome.stats.harmony));
    assert_eq!(outcome.stats.total, outcome.total_knots);

    let expected_effect = PostEffect::select(outcome.stats.harmony, &config.post);
    assert_eq!(outcome.effect, expected_effect);
}

#[test]
fn render_records_are_json_lines() {
    let mut config = EngineConfig::default();
    config.simulation.width = 16;
    config.simulation.height = 16;
    config.simulation.duration = 5;
    let pipeline = ResonancePipeline::new(config).unwrap();
    let outcome = pipeline
        .render(&sunset(20, 20), &mut RngSource::seeded(2))
        .unwrap();

    let mut sink = Vec::new();
    logging::log_render(&mut sink, &outcome).unwrap();
    let line = String::from_utf8(sink).unwrap();
    assert!(line.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["output_width"], 20);
    assert_eq!(value["main_colors"].as_array().map(Vec::len), Some(5));
    assert_eq!(value["activations"]["serenity"], outcome.activations[0]);
    assert_eq!(value["activations"].as_object().map(|map| map.len()), Some(5));
}
