//! Replay a recorded landmark stream.

use std::path::PathBuf;

use image::RgbImage;
use suitme_body_model::recording::parse_recording;
use suitme_body_model::result::FrameResult;
use suitme_common::clock::{ns_to_secs, ManualClock};
use suitme_common::config::MeasurementConfig;
use suitme_measure_core::{CalibrationRequest, MeasurementSession, ReplayProvider};

pub fn run(
    path: PathBuf,
    config: MeasurementConfig,
    shoulder_width: f64,
    distance: Option<f64>,
    height: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let frames = parse_recording(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse recording: {e}"))?;

    tracing::info!(frames = frames.len(), path = %path.display(), "Replaying recording");

    let clock = ManualClock::new();
    let mut session = MeasurementSession::with_clock(
        Box::new(ReplayProvider::from_recording(&frames)),
        clock.clone(),
        config,
    )?;

    let mut request = CalibrationRequest::new(shoulder_width);
    request.camera_distance_m = distance;
    request.user_height_cm = height;
    let calibration = session.calibrate(request)?;

    if !json {
        println!("Replaying: {}", path.display());
        println!(
            "  Calibration: {} cm shoulders at {} m (scale {:.4} cm/px)",
            calibration.known_shoulder_width_cm,
            calibration.camera_distance_m,
            calibration.scale_factor
        );
        println!();
    }

    let mut captured = 0usize;
    for frame in &frames {
        clock.set_ns(frame.timestamp_ns);
        let image = RgbImage::new(frame.width, frame.height);

        let result = match session.process_frame(&image) {
            Ok(result) => result,
            Err(e) if e.is_per_frame() => {
                tracing::warn!(timestamp_ns = frame.timestamp_ns, error = %e, "Frame skipped");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if result.finalized {
            captured += 1;
        }
        if !json {
            print_frame(&result);
        }
    }

    match session.latest() {
        Some(latest) if json => {
            println!("{}", serde_json::to_string_pretty(latest)?);
        }
        Some(latest) => {
            let m = &latest.measurements;
            println!();
            println!("Capture ({captured} frame(s) finalized):");
            println!("  Shoulder width: {:.1} cm", m.shoulder_width);
            println!("  Torso length:   {:.1} cm", m.torso_length);
            println!("  Hip width:      {:.1} cm", m.hip_width);
            println!("  Leg length:     {:.1} cm", m.leg_length());
            if let Some(height) = m.estimated_height() {
                println!("  Est. height:    {height:.1} cm");
            }
            let sizes = &latest.size_categories;
            println!(
                "  Sizes: shoulders {}, torso {}, legs {}, overall {}",
                sizes.shoulders, sizes.torso, sizes.legs, sizes.overall
            );
            if !sizes.overall.is_known() {
                println!("  No chart matched; check the calibration shoulder width.");
            }
        }
        None => {
            anyhow::bail!("Subject never held still long enough for a capture");
        }
    }

    Ok(())
}

fn print_frame(result: &FrameResult) {
    let secs = ns_to_secs(result.timestamp_ns);
    match &result.measurements {
        Some(m) => println!(
            "{secs:8.3}s  {:<16} shoulders {:6.1}  torso {:6.1}  legs {:6.1} {}  {}",
            result.status.as_str(),
            m.shoulder_width,
            m.torso_length,
            m.leg_length(),
            m.unit.symbol(),
            result.message
        ),
        None => println!(
            "{secs:8.3}s  {:<16} {}",
            result.status.as_str(),
            result.message
        ),
    }
}
