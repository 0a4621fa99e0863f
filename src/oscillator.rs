use crate::loop_mode::LoopMode;

/// Reads one voice's sample stream at a pitch-dependent rate, linearly
/// interpolating between neighboring frames. The wave data itself is never
/// owned here: every call passes the sample slice in, so many voices can
/// share one SoundFont's sample pool without cloning it.
#[derive(Debug, Default)]
pub(crate) struct Oscillator {
    output_sample_rate: f32,
    loop_mode: LoopMode,
    sample_rate: i32,
    start: i32,
    end: i32,
    start_loop: i32,
    end_loop: i32,
    root_key: i32,

    tune: f32,
    pitch_change_scale: f32,
    sample_rate_ratio: f32,

    looping: bool,
    position: f64,
}

impl Oscillator {
    pub(crate) fn new(output_sample_rate: i32) -> Self {
        Self {
            output_sample_rate: output_sample_rate as f32,
            loop_mode: LoopMode::NoLoop,
            ..Default::default()
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn start(
        &mut self,
        loop_mode: LoopMode,
        sample_rate: i32,
        start: i32,
        end: i32,
        start_loop: i32,
        end_loop: i32,
        root_key: i32,
        coarse_tune: i32,
        fine_tune: i32,
        scale_tuning: i32,
    ) {
        self.loop_mode = loop_mode;
        self.sample_rate = sample_rate;
        self.start = start;
        self.end = end;
        self.start_loop = start_loop;
        self.end_loop = end_loop;
        self.root_key = root_key;

        self.tune = coarse_tune as f32 + 0.01 * fine_tune as f32;
        self.pitch_change_scale = 0.01 * scale_tuning as f32;
        self.sample_rate_ratio = sample_rate as f32 / self.output_sample_rate;
        self.looping = loop_mode != LoopMode::NoLoop;
        self.position = start as f64;
    }

    pub(crate) fn release(&mut self) {
        if self.loop_mode == LoopMode::LoopUntilNoteOff {
            self.looping = false;
        }
    }

    /// Renders one block at `pitch` (a MIDI key number, possibly
    /// fractional). Returns `false` once playback of a non-looping sample
    /// has run past its end and the block is entirely silence.
    pub(crate) fn process(&mut self, block: &mut [f32], data: &[f32], pitch: f32) -> bool {
        let pitch_change = self.pitch_change_scale * (pitch - self.root_key as f32) + self.tune;
        let pitch_ratio = (self.sample_rate_ratio * 2_f32.powf(pitch_change / 12.0)) as f64;
        if self.looping {
            self.fill_block_continuous(block, data, pitch_ratio)
        } else {
            self.fill_block_no_loop(block, data, pitch_ratio)
        }
    }

    fn fill_block_no_loop(&mut self, block: &mut [f32], data: &[f32], pitch_ratio: f64) -> bool {
        for t in 0..block.len() {
            let index = self.position as i32;

            if index >= self.end {
                if t > 0 {
                    for s in block[t..].iter_mut() {
                        *s = 0.0;
                    }
                    return true;
                } else {
                    return false;
                }
            }

            let x1 = data[index as usize];
            let x2 = data[index as usize + 1];
            let a = (self.position - index as f64) as f32;
            block[t] = x1 + a * (x2 - x1);

            self.position += pitch_ratio;
        }

        true
    }

    fn fill_block_continuous(&mut self, block: &mut [f32], data: &[f32], pitch_ratio: f64) -> bool {
        let end_loop_position = self.end_loop as f64;
        let loop_length = (self.end_loop - self.start_loop) as f64;

        for sample in block.iter_mut() {
            if self.position >= end_loop_position {
                self.position -= loop_length;
            }

            let index1 = self.position as i32;
            let mut index2 = index1 + 1;
            if index2 >= self.end_loop {
                index2 -= loop_length as i32;
            }

            let x1 = data[index1 as usize];
            let x2 = data[index2 as usize];
            let a = (self.position - index1 as f64) as f32;
            *sample = x1 + a * (x2 - x1);

            self.position += pitch_ratio;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_loop_playback_ends_when_position_passes_end() {
        let data = vec![0.0_f32, 1.0, 0.0, -1.0, 0.0, 0.0];
        let mut osc = Oscillator::new(44100);
        osc.start(LoopMode::NoLoop, 44100, 0, 4, 0, 0, 60, 0, 0, 100);
        let mut block = [0.0_f32; 8];
        let still_playing = osc.process(&mut block, &data, 60.0);
        assert!(!still_playing || block.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn continuous_loop_wraps_position() {
        let data = vec![0.0_f32, 1.0, 2.0, 3.0, 0.0];
        let mut osc = Oscillator::new(44100);
        osc.start(LoopMode::Continuous, 44100, 0, 4, 0, 4, 60, 0, 0, 100);
        let mut block = [0.0_f32; 16];
        let result = osc.process(&mut block, &data, 60.0);
        assert!(result);
    }

    #[test]
    fn higher_pitch_advances_position_faster() {
        let data = vec![0.0_f32; 100];
        let mut low = Oscillator::new(44100);
        low.start(LoopMode::NoLoop, 44100, 0, 99, 0, 0, 60, 0, 0, 100);
        let mut high = Oscillator::new(44100);
        high.start(LoopMode::NoLoop, 44100, 0, 99, 0, 0, 60, 0, 0, 100);

        let mut block = [0.0_f32; 4];
        low.process(&mut block, &data, 60.0);
        high.process(&mut block, &data, 72.0);

        assert!(high.position > low.position);
    }
}
