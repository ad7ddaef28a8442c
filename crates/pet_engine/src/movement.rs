use tracing::debug;

use crate::actor::ActorId;
use crate::animation::AnimationTag;
use crate::geometry::{clamp_to_floor, direction_to, walk_duration_ms, Position};
use crate::random::RandomSource;
use crate::scene::CatScene;
use crate::timers::TimerSlot;

pub const LAY_IDLE_CHANCE: f64 = 0.2;

/// Extra state applied after the arrival idle pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrivalEffect {
    #[default]
    None,
    Animate(AnimationTag),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub start: Position,
    pub target: Position,
    pub started_at_ms: u64,
    pub duration_ms: f32,
    pub on_arrive: ArrivalEffect,
}

impl Movement {
    pub fn begin(start: Position, target: Position, now_ms: u64, on_arrive: ArrivalEffect) -> Self {
        Self {
            start,
            target,
            started_at_ms: now_ms,
            duration_ms: walk_duration_ms(start, target),
            on_arrive,
        }
    }

    pub fn progress_at(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f32;
        (elapsed / self.duration_ms).min(1.0)
    }

    /// First whole millisecond at which progress reaches 1.
    pub fn arrives_at_ms(&self) -> u64 {
        self.started_at_ms.saturating_add(self.duration_ms.ceil() as u64)
    }
}

/// Pure sample of a walk at `now_ms`; clamps to the target once the duration has elapsed.
pub fn position_at(movement: &Movement, now_ms: u64) -> Position {
    movement
        .start
        .lerp(movement.target, movement.progress_at(now_ms))
}

pub fn pick_idle_animation(rng: &mut dyn RandomSource) -> AnimationTag {
    if rng.next_unit() < LAY_IDLE_CHANCE {
        AnimationTag::LayIdle
    } else {
        AnimationTag::SitIdle
    }
}

impl CatScene {
    /// Manual walk. Takes the actor out of roaming and drops any pending return to
    /// idle so the walk ends in a plain idle pick.
    pub fn move_actor(&mut self, actor_id: ActorId, target: Position) -> bool {
        if !self.accepts_commands("move_actor") {
            return false;
        }
        if !self.actors.contains_key(&actor_id) {
            debug!(actor = %actor_id, "move_ignored_missing_actor");
            return false;
        }
        self.stop_roaming(actor_id);
        if self.timers.cancel(TimerSlot::reaction(actor_id)) {
            debug!(actor = %actor_id, "reaction_cancelled_by_move");
        }
        self.move_actor_with(actor_id, target, ArrivalEffect::None)
    }

    /// Starts a walk toward the clamped `target`, replacing any walk already in flight.
    pub(crate) fn move_actor_with(
        &mut self,
        actor_id: ActorId,
        target: Position,
        on_arrive: ArrivalEffect,
    ) -> bool {
        if !self.accepts_commands("move_actor") {
            return false;
        }
        let clamped = clamp_to_floor(target, &self.bounds, self.actor_size);
        let now_ms = self.now_ms;
        let Some(record) = self.actors.get_mut(&actor_id) else {
            debug!(actor = %actor_id, "move_ignored_missing_actor");
            return false;
        };
        let start = record.state.position;
        let movement = Movement::begin(start, clamped, now_ms, on_arrive);
        let superseded = record.movement.replace(movement).is_some();
        record.moves_started = record.moves_started.saturating_add(1);
        record.state.is_moving = true;
        record.state.target_position = Some(clamped);
        record.state.animation = direction_to(start, clamped).animation();
        debug!(
            actor = %actor_id,
            from_x = start.x,
            from_y = start.y,
            to_x = clamped.x,
            to_y = clamped.y,
            duration_ms = movement.duration_ms,
            animation = %record.state.animation,
            superseded,
            "movement_started"
        );
        true
    }

    pub(crate) fn next_arrival(&self) -> Option<(ActorId, u64)> {
        self.actors
            .iter()
            .filter_map(|(id, record)| record.movement.map(|m| (*id, m.arrives_at_ms())))
            .min_by_key(|(id, at)| (*at, *id))
    }

    pub(crate) fn sample_movements(&mut self, now_ms: u64) {
        for record in self.actors.values_mut() {
            if let Some(movement) = record.movement.as_ref() {
                record.state.position = position_at(movement, now_ms);
            }
        }
    }

    pub(crate) fn complete_arrival(&mut self, actor_id: ActorId) {
        let idle = pick_idle_animation(self.rng.as_mut());
        let Some(record) = self.actors.get_mut(&actor_id) else {
            return;
        };
        let Some(movement) = record.movement.take() else {
            return;
        };
        record.state.position = movement.target;
        record.state.is_moving = false;
        record.state.target_position = None;
        record.state.animation = match movement.on_arrive {
            ArrivalEffect::None => idle,
            ArrivalEffect::Animate(tag) => tag,
        };
        debug!(
            actor = %actor_id,
            x = movement.target.x,
            y = movement.target.y,
            animation = %record.state.animation,
            "movement_arrived"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    #[test]
    fn position_is_driven_by_elapsed_time() {
        let movement = Movement::begin(
            Position::new(0.0, 0.0),
            Position::new(500.0, 0.0),
            1_000,
            ArrivalEffect::None,
        );
        assert_eq!(movement.duration_ms, 1500.0);
        assert_eq!(position_at(&movement, 1_000), Position::new(0.0, 0.0));
        assert_eq!(position_at(&movement, 1_750), Position::new(250.0, 0.0));
        assert_eq!(position_at(&movement, 2_500), Position::new(500.0, 0.0));
        assert_eq!(position_at(&movement, 90_000), Position::new(500.0, 0.0));
    }

    #[test]
    fn samples_before_start_stay_at_origin() {
        let movement = Movement::begin(
            Position::new(10.0, 10.0),
            Position::new(20.0, 10.0),
            5_000,
            ArrivalEffect::None,
        );
        assert_eq!(position_at(&movement, 0), Position::new(10.0, 10.0));
    }

    #[test]
    fn arrival_time_rounds_duration_up() {
        let movement = Movement::begin(
            Position::new(150.0, 550.0),
            Position::new(600.0, 500.0),
            0,
            ArrivalEffect::None,
        );
        let arrives = movement.arrives_at_ms();
        assert!(movement.progress_at(arrives) >= 1.0);
        assert!(movement.progress_at(arrives - 1) < 1.0);
    }

    #[test]
    fn arrival_time_saturates_at_clock_end() {
        let movement = Movement::begin(
            Position::new(0.0, 0.0),
            Position::new(500.0, 0.0),
            u64::MAX - 100,
            ArrivalEffect::None,
        );
        assert_eq!(movement.arrives_at_ms(), u64::MAX);
    }

    #[test]
    fn idle_pick_favours_sitting() {
        let mut rng = SequenceRandom::new(vec![0.0, 0.19, 0.2, 0.95]);
        assert_eq!(pick_idle_animation(&mut rng), AnimationTag::LayIdle);
        assert_eq!(pick_idle_animation(&mut rng), AnimationTag::LayIdle);
        assert_eq!(pick_idle_animation(&mut rng), AnimationTag::SitIdle);
        assert_eq!(pick_idle_animation(&mut rng), AnimationTag::SitIdle);
    }
}
