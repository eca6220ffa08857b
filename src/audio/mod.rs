#[cfg(feature = "audio")]
pub mod tones;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

#[cfg(feature = "audio")]
pub use self::tones::ToneSynth;

/// Feedback sounds fired by the shell alongside user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    /// Chime after a successful login
    Startup,
    Click,
    Open,
    Close,
}

/// One sine tone in a sound's schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
    pub volume: f32,
    /// Offset from the moment the sound is triggered
    pub delay: Duration,
}

impl Tone {
    const fn new(frequency: f32, duration_ms: u64, volume: f32, delay_ms: u64) -> Self {
        Self {
            frequency,
            duration: Duration::from_millis(duration_ms),
            volume,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

// C5, E5, G5, C6
const STARTUP_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];
/// The chime waits for the desktop to appear before it starts
const STARTUP_LEAD_MS: u64 = 300;
const CLICK_FREQ: f32 = 800.0;
const OPEN_FREQ: f32 = 600.0;
const CLOSE_FREQ: f32 = 500.0;

impl Sound {
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            Sound::Startup => STARTUP_NOTES
                .iter()
                .enumerate()
                .map(|(i, freq)| Tone::new(*freq, 400, 0.08, STARTUP_LEAD_MS + i as u64 * 200))
                .collect(),
            Sound::Click => vec![Tone::new(CLICK_FREQ, 50, 0.03, 0)],
            Sound::Open => vec![
                Tone::new(OPEN_FREQ, 100, 0.05, 0),
                Tone::new(OPEN_FREQ * 1.2, 100, 0.04, 50),
            ],
            Sound::Close => vec![Tone::new(CLOSE_FREQ, 80, 0.04, 0)],
        }
    }
}

/// Fire-and-forget sound output. Implementations must not block.
pub trait SoundPlayer: Send {
    fn play(&self, sound: Sound);
}

/// Used when no audio device is wanted or available
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl SoundPlayer for SilentPlayer {
    fn play(&self, sound: Sound) {
        trace!(?sound, "sound dropped (no audio output)");
    }
}

/// Keeps the output device open. Sound stops once this is dropped.
#[derive(Default)]
pub struct OutputGuard {
    #[cfg(feature = "audio")]
    _stream: Option<rodio::OutputStream>,
}

/// Best available player: the tone synth when built with audio and a device
/// opens, silence otherwise.
#[cfg(feature = "audio")]
pub fn default_player() -> (Box<dyn SoundPlayer>, OutputGuard) {
    match ToneSynth::try_new() {
        Ok((synth, stream)) => (
            Box::new(synth),
            OutputGuard {
                _stream: Some(stream),
            },
        ),
        Err(e) => {
            tracing::warn!("audio unavailable, continuing silently: {}", e);
            (Box::new(SilentPlayer), OutputGuard::default())
        }
    }
}

#[cfg(not(feature = "audio"))]
pub fn default_player() -> (Box<dyn SoundPlayer>, OutputGuard) {
    (Box::new(SilentPlayer), OutputGuard::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_chime_is_four_staggered_notes() {
        let tones = Sound::Startup.tones();
        assert_eq!(tones.len(), 4);
        assert_eq!(tones[0].frequency, 523.25);
        assert_eq!(tones[3].frequency, 1046.50);
        assert_eq!(tones[0].delay, Duration::from_millis(300));
        assert_eq!(tones[3].delay, Duration::from_millis(900));
        assert!(tones.iter().all(|t| t.duration == Duration::from_millis(400)));
    }

    #[test]
    fn test_open_sound_steps_up_after_50ms() {
        let tones = Sound::Open.tones();
        assert_eq!(tones.len(), 2);
        assert!((tones[1].frequency - 720.0).abs() < 1e-3);
        assert_eq!(tones[1].delay, Duration::from_millis(50));
    }
}
