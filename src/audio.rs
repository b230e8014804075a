use rodio::{OutputStream, OutputStreamHandle, Sink, Source, source::SineWave};
use std::time::Duration;

/// Audio manager for playing synthesized sound effects
pub struct AudioManager {
    /// Keeps the output device alive; `None` means run silent
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl AudioManager {
    /// Create a new audio manager on the default output device
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        Ok(Self {
            output: Some((stream, stream_handle)),
        })
    }

    /// Bright two-tone blip for a popped bubble
    pub fn play_pop(&self) {
        self.play_tones(&[(880.0, 40), (1320.0, 60)], 0.10);
    }

    /// Descending tones for the end of a round
    pub fn play_game_over(&self) {
        self.play_tones(&[(440.0, 200), (330.0, 200), (220.0, 350)], 0.12);
    }

    /// Queues a sequence of (frequency, milliseconds) tones on a detached sink
    fn play_tones(&self, tones: &[(f32, u64)], volume: f32) {
        let Some((_, stream_handle)) = &self.output else {
            return;
        };

        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(stream_handle) {
            sink.set_volume(volume);
            for &(frequency, millis) in tones {
                let mut tone = SineWave::new(frequency).take_duration(Duration::from_millis(millis));
                tone.set_filter_fadeout();
                sink.append(tone);
            }
            sink.detach();
        }
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|err| {
            // Headless terminals and CI have no output device; run silent
            tracing::warn!("failed to initialize audio, continuing without: {err}");
            Self { output: None }
        })
    }
}
