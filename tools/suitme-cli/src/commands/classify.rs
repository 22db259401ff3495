//! Size a set of measurements.

use suitme_body_model::measurement::Measurements;
use suitme_measure_core::SizeClassifier;

pub fn run(shoulders: f64, torso: f64, legs: f64) -> anyhow::Result<()> {
    for (name, value) in [("shoulders", shoulders), ("torso", torso), ("legs", legs)] {
        if !value.is_finite() {
            anyhow::bail!("{name} must be a finite number of centimeters");
        }
    }

    let sizes = SizeClassifier::default().classify(&Measurements::cm(shoulders, torso, legs));

    println!("Shoulders ({shoulders:.1} cm): {}", sizes.shoulders);
    println!("Torso     ({torso:.1} cm): {}", sizes.torso);
    println!("Legs      ({legs:.1} cm): {}", sizes.legs);
    println!("Overall: {}", sizes.overall);

    Ok(())
}
