use crate::envelope_stage::EnvelopeStage;

/// The DAHDSR envelope driving pitch and filter modulation. Unlike
/// [`crate::volume_envelope::VolumeEnvelope`] its decay and release ramps
/// are linear, not exponential, and it carries no voice-stealing priority.
#[derive(Debug, Default)]
pub(crate) struct ModulationEnvelope {
    sample_rate: f64,

    attack_slope: f64,
    decay_slope: f64,
    release_slope: f64,

    attack_start_time: f64,
    hold_start_time: f64,
    decay_start_time: f64,

    decay_end_time: f64,
    release_end_time: f64,

    sustain_level: f32,
    release_level: f32,

    processed_sample_count: i64,
    stage: EnvelopeStage,
    value: f32,
}

impl ModulationEnvelope {
    pub(crate) fn new(sample_rate: i32) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            stage: EnvelopeStage::Delay,
            ..Default::default()
        }
    }

    pub(crate) fn start(
        &mut self,
        delay: f32,
        attack: f32,
        hold: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) {
        self.attack_slope = 1.0 / attack as f64;
        self.decay_slope = 1.0 / decay as f64;
        self.release_slope = 1.0 / release as f64;

        self.attack_start_time = delay as f64;
        self.hold_start_time = self.attack_start_time + attack as f64;
        self.decay_start_time = self.hold_start_time + hold as f64;

        self.decay_end_time = self.decay_start_time + decay as f64;
        self.release_end_time = release as f64;

        self.sustain_level = crate::soundfont_math::SoundFontMath::clamp(sustain, 0.0, 1.0);
        self.release_level = 0.0;

        self.processed_sample_count = 0;
        self.stage = EnvelopeStage::Delay;
        self.value = 0.0;

        self.process(0);
    }

    pub(crate) fn release(&mut self) {
        self.stage = EnvelopeStage::Release;
        self.release_end_time += self.processed_sample_count as f64 / self.sample_rate;
        self.release_level = self.value;
    }

    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    pub(crate) fn process(&mut self, sample_count: i32) -> f32 {
        self.processed_sample_count += sample_count as i64;
        let current_time = self.processed_sample_count as f64 / self.sample_rate;

        while self.stage <= EnvelopeStage::Hold {
            let end_time = match self.stage {
                EnvelopeStage::Delay => self.attack_start_time,
                EnvelopeStage::Attack => self.hold_start_time,
                EnvelopeStage::Hold => self.decay_start_time,
                _ => unreachable!("modulation envelope stage loop never reaches decay/release here"),
            };

            if current_time < end_time {
                break;
            } else {
                self.stage = self.stage.next();
            }
        }

        self.value = match self.stage {
            EnvelopeStage::Delay => 0.0,
            EnvelopeStage::Attack => {
                (self.attack_slope * (current_time - self.attack_start_time)) as f32
            }
            EnvelopeStage::Hold => 1.0,
            EnvelopeStage::Decay => {
                ((self.decay_slope * (self.decay_end_time - current_time)) as f32)
                    .max(self.sustain_level)
            }
            EnvelopeStage::Release => ((self.release_level as f64
                * self.release_slope
                * (self.release_end_time - current_time)) as f32)
                .max(0.0),
        };
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_floors_at_sustain_level_not_one() {
        let mut env = ModulationEnvelope::new(44100);
        env.start(0.0, 0.0, 0.0, 0.01, 0.3, 0.5);
        for _ in 0..50 {
            env.process(4410);
        }
        assert!((env.value() - 0.3).abs() < 1e-3);
    }

    #[test]
    fn release_ramps_linearly_to_zero() {
        let mut env = ModulationEnvelope::new(44100);
        env.start(0.0, 0.0, 0.0, 0.01, 0.5, 0.1);
        env.process(441 * 20);
        env.release();
        for _ in 0..50 {
            env.process(4410);
        }
        assert_eq!(env.value(), 0.0);
    }

    #[test]
    fn stage_advances_past_delay() {
        let mut env = ModulationEnvelope::new(44100);
        env.start(0.01, 0.01, 0.0, 0.1, 0.5, 0.1);
        env.process(441 * 2); // 20ms, well past a 10ms delay
        assert!(env.value() > 0.0);
    }
}
