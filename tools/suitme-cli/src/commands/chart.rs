//! Print the size charts.

use suitme_measure_core::sizing::{SizeChart, SizeWeights};

pub fn run() -> anyhow::Result<()> {
    let weights = SizeWeights::default();
    for (name, chart, weight) in [
        ("Shoulder width", SizeChart::shoulders(), weights.shoulders),
        ("Torso length", SizeChart::torso(), weights.torso),
        ("Leg length", SizeChart::legs(), weights.legs),
    ] {
        println!("{name} (weight {weight}):");
        for range in chart.ranges() {
            match range.max {
                Some(max) => println!("  {:<5} {:>5.1} - {:>5.1} cm", range.label, range.min, max),
                None => println!("  {:<5} {:>5.1} cm and up", range.label, range.min),
            }
        }
        println!();
    }
    Ok(())
}
