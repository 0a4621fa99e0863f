/// A delayed, free-running triangle-wave low-frequency oscillator used for
/// vibrato and tremolo modulation. Inactive (and silently zero) whenever its
/// frequency is too low to matter.
#[derive(Debug, Default)]
pub(crate) struct Lfo {
    sample_rate: f64,

    active: bool,

    delay: f64,
    period: f64,

    processed_sample_count: i64,
    value: f32,
}

impl Lfo {
    pub(crate) fn new(sample_rate: i32) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            ..Default::default()
        }
    }

    pub(crate) fn start(&mut self, delay: f32, frequency: f32) {
        if frequency > 1.0e-3 {
            self.active = true;

            self.delay = delay as f64;
            self.period = 1.0 / frequency as f64;

            self.processed_sample_count = 0;
            self.value = 0.0;
        } else {
            self.active = false;
            self.value = 0.0;
        }
    }

    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    /// Advances the oscillator by `sample_count` frames and returns its new
    /// value.
    pub(crate) fn process(&mut self, sample_count: i32) -> f32 {
        if !self.active {
            return self.value;
        }

        self.processed_sample_count += sample_count as i64;
        let current_time = self.processed_sample_count as f64 / self.sample_rate;

        self.value = if current_time < self.delay {
            0.0
        } else {
            let phase = ((current_time - self.delay) % self.period) / self.period;
            if phase < 0.25 {
                (4.0 * phase) as f32
            } else if phase < 0.75 {
                (4.0 * (0.5 - phase)) as f32
            } else {
                (4.0 * (phase - 1.0)) as f32
            }
        };
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_below_frequency_threshold_stays_zero() {
        let mut lfo = Lfo::new(44100);
        lfo.start(0.0, 0.0);
        assert_eq!(lfo.process(4410), 0.0);
    }

    #[test]
    fn silent_during_delay() {
        let mut lfo = Lfo::new(44100);
        lfo.start(1.0, 5.0);
        assert_eq!(lfo.process(4410), 0.0); // 0.1s in, still inside a 1s delay
    }

    #[test]
    fn rises_from_zero_after_delay() {
        let mut lfo = Lfo::new(44100);
        lfo.start(0.0, 1.0); // 1Hz triangle, no delay
        let v1 = lfo.process(4410); // 0.1s -> rising edge
        assert!(v1 > 0.0);
    }
}
