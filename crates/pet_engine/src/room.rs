use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::feedback::{HapticIntensity, SoundEvent};
use crate::scene::CatScene;
use crate::timers::{Continuation, RoomTimer, TimerSlot};

pub const LIGHTS_OUT_DURATION_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    City,
}

impl Weather {
    pub fn next(self) -> Self {
        match self {
            Self::Clear => Self::Rain,
            Self::Rain => Self::Snow,
            Self::Snow => Self::City,
            Self::City => Self::Clear,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::City => "city",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomState {
    pub weather: Weather,
    pub curtains_open: bool,
    pub lamp_on: bool,
    pub lights_out: bool,
    pub muted: bool,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            curtains_open: true,
            lamp_on: true,
            lights_out: false,
            muted: false,
        }
    }
}

impl CatScene {
    pub fn room(&self) -> &RoomState {
        &self.room
    }

    pub fn cycle_weather(&mut self) -> Weather {
        if self.accepts_commands("cycle_weather") {
            self.room.weather = self.room.weather.next();
            self.feedback.trigger(HapticIntensity::Light);
            info!(weather = %self.room.weather, "weather_changed");
        }
        self.room.weather
    }

    pub fn toggle_curtains(&mut self) -> bool {
        if self.accepts_commands("toggle_curtains") {
            self.room.curtains_open = !self.room.curtains_open;
            self.feedback.trigger(HapticIntensity::Light);
            info!(curtains_open = self.room.curtains_open, "curtains_toggled");
        }
        self.room.curtains_open
    }

    pub fn toggle_lamp(&mut self) -> bool {
        if self.accepts_commands("toggle_lamp") {
            self.room.lamp_on = !self.room.lamp_on;
            self.feedback.trigger(HapticIntensity::Light);
            info!(lamp_on = self.room.lamp_on, "lamp_toggled");
        }
        self.room.lamp_on
    }

    pub fn toggle_mute(&mut self) -> bool {
        if self.accepts_commands("toggle_mute") {
            self.room.muted = !self.room.muted;
            self.feedback.trigger(HapticIntensity::Light);
            info!(muted = self.room.muted, "mute_toggled");
        }
        self.room.muted
    }

    pub(crate) fn play_sound(&mut self, event: SoundEvent) {
        if !self.room.muted {
            self.feedback.play(event);
        }
    }

    pub(crate) fn begin_lights_out(&mut self) {
        self.room.lights_out = true;
        self.room.lamp_on = false;
        self.play_sound(SoundEvent::Meow3);
        let (_, restarted) = self.timers.schedule(
            TimerSlot::Room(RoomTimer::LightsOut),
            self.now_ms.saturating_add(LIGHTS_OUT_DURATION_MS),
            Continuation::RestoreLights,
        );
        info!(restarted, "lights_out");
    }

    pub(crate) fn restore_lights(&mut self) {
        self.room.lights_out = false;
        self.room.lamp_on = true;
        info!("lights_restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_cycles_through_all_modes() {
        let mut weather = Weather::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(weather);
            weather = weather.next();
        }
        assert_eq!(
            seen,
            vec![
                Weather::Clear,
                Weather::Rain,
                Weather::Snow,
                Weather::City,
                Weather::Clear
            ]
        );
    }

    #[test]
    fn default_room_is_lit_and_open() {
        let room = RoomState::default();
        assert!(room.curtains_open);
        assert!(room.lamp_on);
        assert!(!room.lights_out);
        assert!(!room.muted);
    }
}
