use std::fmt;

use serde::Serialize;

use crate::animation::{AnimationTag, Mood};
use crate::geometry::Position;
use crate::movement::Movement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorState {
    pub position: Position,
    pub animation: AnimationTag,
    pub is_moving: bool,
    pub target_position: Option<Position>,
    pub mood: Mood,
}

impl ActorState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            animation: AnimationTag::SitIdle,
            is_moving: false,
            target_position: None,
            mood: Mood::Neutral,
        }
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            position: self.position,
            animation: self.animation,
            mood: self.mood,
            is_moving: self.is_moving,
            target_position: self.target_position,
        }
    }
}

/// Copy of an actor's visible state; cheap enough to take every render tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorSnapshot {
    pub position: Position,
    pub animation: AnimationTag,
    pub mood: Mood,
    pub is_moving: bool,
    pub target_position: Option<Position>,
}

#[derive(Debug, Clone)]
pub(crate) struct ActorRecord {
    pub(crate) name: String,
    pub(crate) state: ActorState,
    pub(crate) movement: Option<Movement>,
    pub(crate) moves_started: u64,
}

impl ActorRecord {
    pub(crate) fn new(name: String, start: Position) -> Self {
        Self {
            name,
            state: ActorState::new(start),
            movement: None,
            moves_started: 0,
        }
    }

    /// Drops any in-flight walk, leaving the actor where it currently stands.
    pub(crate) fn halt(&mut self) -> bool {
        let was_moving = self.movement.take().is_some();
        self.state.is_moving = false;
        self.state.target_position = None;
        was_moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_actor_sits_neutral_and_still() {
        let state = ActorState::new(Position::new(150.0, 550.0));
        assert_eq!(state.animation, AnimationTag::SitIdle);
        assert_eq!(state.mood, Mood::Neutral);
        assert!(!state.is_moving);
        assert_eq!(state.target_position, None);
    }

    #[test]
    fn halt_clears_motion_fields() {
        let mut record = ActorRecord::new("prabh".to_string(), Position::new(0.0, 0.0));
        record.state.is_moving = true;
        record.state.target_position = Some(Position::new(10.0, 0.0));
        assert!(!record.halt());
        assert!(!record.state.is_moving);
        assert_eq!(record.state.target_position, None);
    }
}
