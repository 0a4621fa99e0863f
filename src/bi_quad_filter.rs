use std::f32::consts;

/// A resonant low-pass filter. While bypassed it still tracks the last two
/// samples it saw so that switching it on mid-stream doesn't introduce a
/// discontinuity.
#[derive(Debug, Default)]
pub(crate) struct BiQuadFilter {
    sample_rate: f32,

    active: bool,

    a0: f32,
    a1: f32,
    a2: f32,
    a3: f32,
    a4: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiQuadFilter {
    const RESONANCE_PEAK_OFFSET: f32 = 1.0 - 1.0 / core::f32::consts::SQRT_2;

    pub(crate) fn new(sample_rate: i32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            ..Default::default()
        }
    }

    pub(crate) fn clear_buffer(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    pub(crate) fn set_low_pass_filter(&mut self, cutoff_frequency: f32, resonance: f32) {
        if cutoff_frequency < 0.499 * self.sample_rate {
            self.active = true;

            // Gives the Q value that produces the desired resonance peak;
            // resultant peak height is off by less than 3%.
            let q =
                resonance - BiQuadFilter::RESONANCE_PEAK_OFFSET / (1.0 + 6.0 * (resonance - 1.0));

            let w = 2.0 * consts::PI * cutoff_frequency / self.sample_rate;
            let cosw = w.cos();
            let alpha = w.sin() / (2.0 * q);

            let b0 = (1.0 - cosw) / 2.0;
            let b1 = 1.0 - cosw;
            let b2 = (1.0 - cosw) / 2.0;
            let a0 = 1.0 + alpha;
            let a1 = -2.0 * cosw;
            let a2 = 1.0 - alpha;

            self.set_coefficients(a0, a1, a2, b0, b1, b2);
        } else {
            self.active = false;
        }
    }

    /// Filters `block` in place. When bypassed, the block passes through
    /// unchanged but the filter's history is refreshed from its tail so a
    /// later `set_low_pass_filter` call doesn't click.
    pub(crate) fn process(&mut self, block: &mut [f32]) {
        if self.active {
            for sample in block.iter_mut() {
                let input = *sample;
                let output = self.a0 * input + self.a1 * self.x1 + self.a2 * self.x2
                    - self.a3 * self.y1
                    - self.a4 * self.y2;

                self.x2 = self.x1;
                self.x1 = input;
                self.y2 = self.y1;
                self.y1 = output;

                *sample = output;
            }
        } else if let Some(&last) = block.last() {
            self.x1 = last;
            self.x2 = if block.len() >= 2 {
                block[block.len() - 2]
            } else {
                last
            };
            self.y1 = self.x1;
            self.y2 = self.x2;
        }
    }

    fn set_coefficients(&mut self, a0: f32, a1: f32, a2: f32, b0: f32, b1: f32, b2: f32) {
        self.a0 = b0 / a0;
        self.a1 = b1 / a0;
        self.a2 = b2 / a0;
        self.a3 = a1 / a0;
        self.a4 = a2 / a0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypassed_filter_passes_block_unchanged() {
        let mut filter = BiQuadFilter::new(44100);
        let mut block = [1.0_f32, 2.0, 3.0];
        filter.process(&mut block);
        assert_eq!(block, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn cutoff_above_nyquist_half_stays_bypassed() {
        let mut filter = BiQuadFilter::new(44100);
        filter.set_low_pass_filter(30000.0, 0.7);
        let mut block = [1.0_f32, -1.0, 1.0];
        let before = block;
        filter.process(&mut block);
        assert_eq!(block, before);
    }

    #[test]
    fn low_pass_smooths_an_impulse() {
        let mut filter = BiQuadFilter::new(44100);
        filter.set_low_pass_filter(500.0, 0.7);
        let mut block = [1.0_f32, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        filter.process(&mut block);
        assert!(block[0].abs() < 1.0);
    }
}
