use pet_engine::{AudioSink, FeedbackHooks, HapticIntensity, HapticsSink, SoundEvent};
use tracing::info;

/// Headless stand-in for the device speaker.
struct LoggingAudioSink;

/// Headless stand-in for the vibration motor.
struct LoggingHapticsSink;

impl AudioSink for LoggingAudioSink {
    fn play(&mut self, event: SoundEvent) {
        info!(sound = %event, asset = event.asset_path(), "sound_played");
    }
}

impl HapticsSink for LoggingHapticsSink {
    fn trigger(&mut self, intensity: HapticIntensity) {
        info!(%intensity, "haptic_triggered");
    }
}

pub(crate) fn logging_hooks() -> FeedbackHooks {
    FeedbackHooks::new(Box::new(LoggingAudioSink), Box::new(LoggingHapticsSink))
}
