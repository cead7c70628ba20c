use anyhow::Result;

use crate::models::Preferences;

/// Default vibration length, in milliseconds.
pub const DEFAULT_VIBRATION_MS: u64 = 200;

/// Platform-specific output for stage completion.
///
/// The terminal front end rings the bell; other front ends can drive real
/// audio or haptics. Errors are reported but never interrupt a brew.
pub trait FeedbackSink {
    fn play_sound(&self) -> Result<()>;
    fn vibrate(&self, pattern_ms: u64) -> Result<()>;
}

/// Completion feedback gated by the user's sound and vibration preferences.
pub struct Feedback<S: FeedbackSink> {
    sink: S,
    sound_enabled: bool,
    vibration_enabled: bool,
}

impl<S: FeedbackSink> Feedback<S> {
    pub fn new(sink: S, prefs: &Preferences) -> Self {
        Feedback {
            sink,
            sound_enabled: prefs.sound_enabled,
            vibration_enabled: prefs.vibration_enabled,
        }
    }

    pub fn play_sound(&self) {
        if !self.sound_enabled {
            tracing::debug!("sound is disabled by user settings");
            return;
        }
        if let Err(e) = self.sink.play_sound() {
            tracing::warn!("error playing sound: {e:#}");
        }
    }

    pub fn vibrate(&self, pattern_ms: u64) {
        if !self.vibration_enabled {
            tracing::debug!("vibration is disabled by user settings");
            return;
        }
        if let Err(e) = self.sink.vibrate(pattern_ms) {
            tracing::warn!("vibration unavailable: {e:#}");
        }
    }

    /// Sound plus the default vibration. Called once per completed stage.
    pub fn signal(&self) {
        self.play_sound();
        self.vibrate(DEFAULT_VIBRATION_MS);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
