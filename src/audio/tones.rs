use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, StreamError};
use tracing::{info, warn};

use super::{Sound, SoundPlayer};

/// Synthesizes the shell's feedback sounds on the default output device.
/// Tones are generated on the fly, so there are no assets to load.
pub struct ToneSynth {
    // Only keep the handle, which is Send + Sync (internally Arc)
    stream_handle: OutputStreamHandle,
}

impl ToneSynth {
    /// Returns (ToneSynth, OutputStream).
    /// The caller must keep the OutputStream alive for as long as sounds
    /// should play; it cannot be moved across threads.
    pub fn try_new() -> Result<(Self, OutputStream), StreamError> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        info!("audio output initialized");
        Ok((Self { stream_handle }, stream))
    }
}

impl SoundPlayer for ToneSynth {
    fn play(&self, sound: Sound) {
        for tone in sound.tones() {
            let mut wave = SineWave::new(tone.frequency).take_duration(tone.duration);
            // Ramp to silence instead of clicking off
            wave.set_filter_fadeout();
            let source = wave.amplify(tone.volume).delay(tone.delay);

            if let Err(e) = self.stream_handle.play_raw(source) {
                warn!(?sound, "failed to play tone: {}", e);
            }
        }
    }
}
