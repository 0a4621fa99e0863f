use std::f32::consts;

/// Small numeric conversions shared across the region, envelope, LFO, and
/// filter code. Grouped as associated functions on a zero-sized type so
/// call sites read as `SoundFontMath::timecents_to_seconds(x)`.
pub struct SoundFontMath;

impl SoundFontMath {
    pub const HALF_PI: f32 = consts::PI / 2.0;
    pub const NON_AUDIBLE: f32 = 1.0e-3;
    pub const LOG_NON_AUDIBLE: f32 = -6.907_755_4;

    pub fn timecents_to_seconds(x: f32) -> f32 {
        2_f32.powf((1.0 / 1200.0) * x)
    }

    pub fn cents_to_hertz(x: f32) -> f32 {
        8.176 * 2_f32.powf((1.0 / 1200.0) * x)
    }

    pub fn cents_to_multiplying_factor(x: f32) -> f32 {
        2_f32.powf((1.0 / 1200.0) * x)
    }

    pub fn decibels_to_linear(x: f32) -> f32 {
        10_f32.powf(0.05 * x)
    }

    pub fn linear_to_decibels(x: f32) -> f32 {
        20.0 * x.log10()
    }

    pub fn key_number_to_multiplying_factor(cents: i32, key: i32) -> f32 {
        Self::timecents_to_seconds((cents * (60 - key)) as f32)
    }

    /// `exp(x)`, but floored to 0 below the non-audible threshold so decay
    /// and release curves settle at exactly 0 instead of an ever-shrinking
    /// tail of `f64` noise.
    pub fn exp_cutoff(x: f64) -> f64 {
        if x < Self::LOG_NON_AUDIBLE as f64 {
            0_f64
        } else {
            x.exp()
        }
    }

    pub fn max(a: f32, b: f32) -> f32 {
        if a > b {
            a
        } else {
            b
        }
    }

    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timecents_to_seconds_zero_is_one_second() {
        assert!((SoundFontMath::timecents_to_seconds(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cents_to_hertz_zero_is_reference_pitch() {
        assert!((SoundFontMath::cents_to_hertz(0.0) - 8.176).abs() < 1e-3);
    }

    #[test]
    fn decibels_round_trip_through_linear() {
        let db = -6.0_f32;
        let linear = SoundFontMath::decibels_to_linear(db);
        let back = SoundFontMath::linear_to_decibels(linear);
        assert!((back - db).abs() < 1e-3);
    }

    #[test]
    fn exp_cutoff_floors_far_negative_input() {
        assert_eq!(SoundFontMath::exp_cutoff(-100.0), 0.0);
    }
}
