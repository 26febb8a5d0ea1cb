//! Seed spacing and fertilizer calculators.

use crate::error::{GardenError, Result};

/// Message shown when the spacing inputs are not usable.
pub const SPACING_INPUT_HINT: &str = "Enter positive numbers 🌾";
/// Spoken alongside [`SPACING_INPUT_HINT`].
pub const SPACING_INPUT_QUIP: &str =
    "Oops! I think you forgot to tell me how wide your bed or spacing is!";

#[derive(Debug, Clone, PartialEq)]
pub struct SpacingResult {
    pub per_row: u32,
    /// Leftover width in cm, rounded to one decimal.
    pub leftover_cm: f64,
}

impl SpacingResult {
    /// "≈ 4 plants per row (about 2.0 cm left over)."
    pub fn message(&self) -> String {
        format!(
            "≈ {} plants per row (about {:.1} cm left over).",
            self.per_row, self.leftover_cm
        )
    }

    pub fn quip(&self) -> &'static str {
        match self.per_row {
            0 => "Whoa! That’s too narrow for any plant — even a micro spinach would say ‘nope!’",
            1..=2 => "Nice and roomy — your plants can stretch their roots like yoga masters!",
            3..=5 => "Perfect balance — not too crowded, not too lonely. A happy veggie community!",
            6..=9 => "That’s a strong planting zone! Your veggies might start a union!",
            _ => "Whoa! That’s a whole plant party! Even the worms will need a VIP pass!",
        }
    }
}

/// How many plants fit across a bed of `bed_width_cm` at `spacing_cm`.
pub fn seed_spacing(bed_width_cm: f64, spacing_cm: f64) -> Result<SpacingResult> {
    if !(bed_width_cm > 0.0 && spacing_cm > 0.0) || !bed_width_cm.is_finite() || !spacing_cm.is_finite() {
        return Err(GardenError::InvalidInput(SPACING_INPUT_HINT.to_string()));
    }
    let per_row = (bed_width_cm / spacing_cm).floor() as u32;
    let leftover = bed_width_cm % spacing_cm;
    Ok(SpacingResult {
        per_row,
        leftover_cm: (leftover * 10.0).round() / 10.0,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerResult {
    pub grams: f64,
}

impl FertilizerResult {
    pub fn message(&self, area_m2: f64, rate_g_per_m2: f64) -> String {
        let amount = if self.grams >= 1000.0 {
            format!("{:.2} kg", self.grams / 1000.0)
        } else {
            format!("{:.0} g", self.grams)
        };
        format!(
            "Spread about {} of fertilizer over {} m² at {} g/m².",
            amount, area_m2, rate_g_per_m2
        )
    }
}

/// Fertilizer needed for `area_m2` at `rate_g_per_m2`.
pub fn fertilizer(area_m2: f64, rate_g_per_m2: f64) -> Result<FertilizerResult> {
    if !(area_m2 > 0.0 && rate_g_per_m2 > 0.0) || !area_m2.is_finite() || !rate_g_per_m2.is_finite() {
        return Err(GardenError::InvalidInput(
            "Enter a positive bed area and application rate 🌾".to_string(),
        ));
    }
    Ok(FertilizerResult {
        grams: area_m2 * rate_g_per_m2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_counts_whole_plants() {
        let r = seed_spacing(120.0, 30.0).unwrap();
        assert_eq!(r.per_row, 4);
        assert_eq!(r.leftover_cm, 0.0);
        assert_eq!(r.message(), "≈ 4 plants per row (about 0.0 cm left over).");

        let r = seed_spacing(100.0, 15.0).unwrap();
        assert_eq!(r.per_row, 6);
        assert_eq!(r.leftover_cm, 10.0);
    }

    #[test]
    fn leftover_rounds_to_one_decimal() {
        let r = seed_spacing(50.0, 7.3).unwrap();
        assert_eq!(r.per_row, 6);
        assert_eq!(r.message(), "≈ 6 plants per row (about 6.2 cm left over).");
    }

    #[test]
    fn quips_follow_brackets() {
        assert!(seed_spacing(10.0, 20.0).unwrap().quip().contains("too narrow"));
        assert!(seed_spacing(40.0, 20.0).unwrap().quip().contains("yoga"));
        assert!(seed_spacing(100.0, 20.0).unwrap().quip().contains("Perfect balance"));
        assert!(seed_spacing(180.0, 20.0).unwrap().quip().contains("union"));
        assert!(seed_spacing(200.0, 20.0).unwrap().quip().contains("plant party"));
    }

    #[test]
    fn rejects_non_positive_input() {
        for (w, s) in [(0.0, 10.0), (10.0, 0.0), (-5.0, 2.0), (f64::NAN, 1.0)] {
            let err = seed_spacing(w, s).unwrap_err();
            assert_eq!(err.to_string(), SPACING_INPUT_HINT);
        }
    }

    #[test]
    fn fertilizer_scales_with_area() {
        let r = fertilizer(2.5, 60.0).unwrap();
        assert_eq!(r.grams, 150.0);
        assert_eq!(r.message(2.5, 60.0), "Spread about 150 g of fertilizer over 2.5 m² at 60 g/m².");
        assert_eq!(fertilizer(20.0, 100.0).unwrap().message(20.0, 100.0),
            "Spread about 2.00 kg of fertilizer over 20 m² at 100 g/m².");
        assert!(fertilizer(0.0, 10.0).is_err());
    }
}
