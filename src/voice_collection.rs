use crate::channel::Channel;
use crate::region_pair::RegionPair;
use crate::voice::Voice;

/// A fixed-capacity pool of voices implementing exclusive-class reuse and
/// priority-based stealing once the pool is full.
#[derive(Debug)]
pub(crate) struct VoiceCollection {
    voices: Vec<Voice>,
    active_voice_count: usize,
}

impl VoiceCollection {
    pub(crate) fn new(sample_rate: i32, block_size: usize, maximum_polyphony: usize) -> Self {
        let voices = (0..maximum_polyphony)
            .map(|_| Voice::new(sample_rate, block_size))
            .collect();

        Self {
            voices,
            active_voice_count: 0,
        }
    }

    /// Picks the voice a new note-on should start in: a matching
    /// exclusive-class voice on the same channel if one exists, otherwise a
    /// free slot, otherwise the lowest-priority active voice is stolen.
    pub(crate) fn request_new(&mut self, region: &RegionPair, channel: i32) -> &mut Voice {
        let exclusive_class = region.exclusive_class();
        if exclusive_class != 0 {
            for i in 0..self.active_voice_count {
                if self.voices[i].exclusive_class == exclusive_class
                    && self.voices[i].channel == channel
                {
                    return &mut self.voices[i];
                }
            }
        }

        if self.active_voice_count < self.voices.len() {
            let i = self.active_voice_count;
            self.active_voice_count += 1;
            return &mut self.voices[i];
        }

        // Too many active voices: steal the one with the lowest priority,
        // breaking ties in favor of the older voice.
        let mut candidate: usize = 0;
        let mut lowest_priority = f32::MAX;
        for i in 0..self.active_voice_count {
            let voice = &self.voices[i];
            let priority = voice.priority();
            if priority < lowest_priority {
                lowest_priority = priority;
                candidate = i;
            } else if priority == lowest_priority
                && voice.voice_length > self.voices[candidate].voice_length
            {
                candidate = i;
            }
        }
        &mut self.voices[candidate]
    }

    pub(crate) fn process(&mut self, data: &[f32], channels: &[Channel]) {
        let mut i: usize = 0;

        while i < self.active_voice_count {
            let voice = &mut self.voices[i];
            let channel_info = &channels[voice.channel as usize];
            if voice.process(data, channel_info) {
                i += 1;
            } else {
                self.active_voice_count -= 1;
                self.voices.swap(i, self.active_voice_count);
            }
        }
    }

    pub(crate) fn active_voices(&mut self) -> &mut [Voice] {
        &mut self.voices[0..self.active_voice_count]
    }

    pub(crate) fn active_voice_count(&self) -> usize {
        self.active_voice_count
    }

    pub(crate) fn clear(&mut self) {
        self.active_voice_count = 0;
    }
}
