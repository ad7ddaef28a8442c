use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    /// Body-part touch.
    Meow1,
    /// Any action button.
    Meow2,
    /// Lights out.
    Meow3,
}

impl SoundEvent {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Meow1 => "meow1",
            Self::Meow2 => "meow2",
            Self::Meow3 => "meow3",
        }
    }

    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Meow1 => "/audio/cats/meow1.mp3",
            Self::Meow2 => "/audio/cats/meow2.mp3",
            Self::Meow3 => "/audio/cats/meow3.mp3",
        }
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticIntensity {
    Light,
    Medium,
}

impl HapticIntensity {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
        }
    }
}

impl fmt::Display for HapticIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Fire-and-forget playback. Implementations swallow their own failures.
pub trait AudioSink {
    fn play(&mut self, event: SoundEvent);
}

/// Fire-and-forget vibration. Implementations swallow their own failures.
pub trait HapticsSink {
    fn trigger(&mut self, intensity: HapticIntensity);
}

struct NoOpAudioSink;
struct NoOpHapticsSink;

impl AudioSink for NoOpAudioSink {
    fn play(&mut self, _event: SoundEvent) {}
}

impl HapticsSink for NoOpHapticsSink {
    fn trigger(&mut self, _intensity: HapticIntensity) {}
}

pub struct FeedbackHooks {
    audio: Box<dyn AudioSink>,
    haptics: Box<dyn HapticsSink>,
}

impl FeedbackHooks {
    pub fn new(audio: Box<dyn AudioSink>, haptics: Box<dyn HapticsSink>) -> Self {
        Self { audio, haptics }
    }

    pub fn no_op() -> Self {
        Self::new(Box::new(NoOpAudioSink), Box::new(NoOpHapticsSink))
    }

    pub(crate) fn play(&mut self, event: SoundEvent) {
        self.audio.play(event);
    }

    pub(crate) fn trigger(&mut self, intensity: HapticIntensity) {
        self.haptics.trigger(intensity);
    }
}

impl Default for FeedbackHooks {
    fn default() -> Self {
        Self::no_op()
    }
}

impl fmt::Debug for FeedbackHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackHooks").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum FeedbackEvent {
        Sound(SoundEvent),
        Haptic(HapticIntensity),
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct FeedbackRecorder {
        events: Rc<RefCell<Vec<FeedbackEvent>>>,
    }

    impl FeedbackRecorder {
        pub(crate) fn hooks(&self) -> FeedbackHooks {
            FeedbackHooks::new(Box::new(self.clone()), Box::new(self.clone()))
        }

        pub(crate) fn take(&self) -> Vec<FeedbackEvent> {
            std::mem::take(&mut *self.events.borrow_mut())
        }
    }

    impl AudioSink for FeedbackRecorder {
        fn play(&mut self, event: SoundEvent) {
            self.events.borrow_mut().push(FeedbackEvent::Sound(event));
        }
    }

    impl HapticsSink for FeedbackRecorder {
        fn trigger(&mut self, intensity: HapticIntensity) {
            self.events
                .borrow_mut()
                .push(FeedbackEvent::Haptic(intensity));
        }
    }
}
