use crate::envelope_stage::EnvelopeStage;
use crate::soundfont_math::SoundFontMath;

/// The DAHDSR envelope driving a voice's amplitude. Decay and release
/// follow an exponential curve (so the ear perceives a linear loudness
/// change); `priority` tracks a monotonically decreasing figure-of-merit
/// the voice pool uses to pick a steal candidate when polyphony is full.
#[derive(Debug, Default)]
pub(crate) struct VolumeEnvelope {
    sample_rate: f64,

    attack_slope: f64,
    decay_slope: f64,
    release_slope: f64,

    attack_start_time: f64,
    hold_start_time: f64,
    decay_start_time: f64,
    release_start_time: f64,

    sustain_level: f32,
    release_level: f32,

    processed_sample_count: i64,
    stage: EnvelopeStage,
    value: f32,
    priority: f32,
}

impl VolumeEnvelope {
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
        self.decay_slope = -9.226 / decay as f64;
        self.release_slope = -9.226 / release as f64;

        self.attack_start_time = delay as f64;
        self.hold_start_time = self.attack_start_time + attack as f64;
        self.decay_start_time = self.hold_start_time + hold as f64;
        self.release_start_time = 0.0;

        self.sustain_level = SoundFontMath::clamp(sustain, 0.0, 1.0);
        self.release_level = 0.0;

        self.processed_sample_count = 0;
        self.stage = EnvelopeStage::Delay;
        self.value = 0.0;

        self.process(0);
    }

    pub(crate) fn release(&mut self) {
        self.stage = EnvelopeStage::Release;
        self.release_start_time = self.processed_sample_count as f64 / self.sample_rate;
        self.release_level = self.value;
    }

    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    pub(crate) fn priority(&self) -> f32 {
        self.priority
    }

    /// Advances the envelope by `sample_count` frames and returns whether
    /// it is still audible.
    pub(crate) fn process(&mut self, sample_count: i32) -> bool {
        self.processed_sample_count += sample_count as i64;
        let current_time = self.processed_sample_count as f64 / self.sample_rate;

        while self.stage <= EnvelopeStage::Hold {
            let end_time = match self.stage {
                EnvelopeStage::Delay => self.attack_start_time,
                EnvelopeStage::Attack => self.hold_start_time,
                EnvelopeStage::Hold => self.decay_start_time,
                _ => unreachable!("volume envelope stage loop never reaches decay/release here"),
            };

            if current_time < end_time {
                break;
            } else {
                self.stage = self.stage.next();
            }
        }

        match self.stage {
            EnvelopeStage::Delay => {
                self.value = 0.0;
                self.priority = 4.0 + self.value;
                true
            }
            EnvelopeStage::Attack => {
                self.value = (self.attack_slope * (current_time - self.attack_start_time)) as f32;
                self.priority = 3.0 + self.value;
                true
            }
            EnvelopeStage::Hold => {
                self.value = 1.0;
                self.priority = 2.0 + self.value;
                true
            }
            EnvelopeStage::Decay => {
                self.value = (SoundFontMath::exp_cutoff(
                    self.decay_slope * (current_time - self.decay_start_time),
                ) as f32)
                    .max(self.sustain_level);
                self.priority = 1.0 + self.value;
                self.value > SoundFontMath::NON_AUDIBLE
            }
            EnvelopeStage::Release => {
                self.value = self.release_level
                    * SoundFontMath::exp_cutoff(
                        self.release_slope * (current_time - self.release_start_time),
                    ) as f32;
                self.priority = self.value;
                self.value > SoundFontMath::NON_AUDIBLE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_delay_with_zero_value() {
        let mut env = VolumeEnvelope::new(44100);
        env.start(0.1, 0.2, 0.05, 0.3, 0.7, 0.5);
        assert_eq!(env.value(), 0.0);
    }

    #[test]
    fn attack_ramps_toward_one() {
        let mut env = VolumeEnvelope::new(44100);
        env.start(0.0, 0.1, 0.0, 0.3, 0.7, 0.5);
        env.process(2205); // 50ms in
        assert!(env.value() > 0.0 && env.value() < 1.0);
    }

    #[test]
    fn decay_settles_at_sustain_level() {
        let mut env = VolumeEnvelope::new(44100);
        env.start(0.0, 0.0, 0.0, 0.01, 0.25, 0.5);
        for _ in 0..50 {
            env.process(4410); // 1 second total
        }
        assert!((env.value() - 0.25).abs() < 1e-3);
    }

    #[test]
    fn release_decays_to_silence() {
        let mut env = VolumeEnvelope::new(44100);
        env.start(0.0, 0.0, 0.0, 0.01, 0.5, 0.05);
        env.process(441 * 20); // reach sustain
        env.release();
        let mut audible = true;
        for _ in 0..50 {
            audible = env.process(4410);
        }
        assert!(!audible);
    }
}
