use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::actor::ActorId;
use crate::animation::{AnimationTag, Mood};
use crate::feedback::{HapticIntensity, SoundEvent};
use crate::geometry::{clamp_to_floor, Position};
use crate::movement::ArrivalEffect;
use crate::scene::CatScene;
use crate::timers::{Continuation, TimerSlot};

pub const CUDDLE_SETTLE_MS: u64 = 4_000;
pub const CUDDLE_FLANK_OFFSET: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    Wake,
    Sleep,
    Feed,
    Nudge,
    Kick,
    HogBlanket,
    Gaming,
    Pet,
    Drama,
    Cuddle,
    LightsOut,
}

impl ActionName {
    pub const ALL: [ActionName; 11] = [
        Self::Wake,
        Self::Sleep,
        Self::Feed,
        Self::Nudge,
        Self::Kick,
        Self::HogBlanket,
        Self::Gaming,
        Self::Pet,
        Self::Drama,
        Self::Cuddle,
        Self::LightsOut,
    ];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Wake => "wake",
            Self::Sleep => "sleep",
            Self::Feed => "feed",
            Self::Nudge => "nudge",
            Self::Kick => "kick",
            Self::HogBlanket => "hogBlanket",
            Self::Gaming => "gaming",
            Self::Pet => "pet",
            Self::Drama => "drama",
            Self::Cuddle => "cuddle",
            Self::LightsOut => "lightsOut",
        }
    }

    /// Per-actor effect of a simple action. `None` for the composite and scene-level ones.
    pub fn reaction(self) -> Option<Reaction> {
        let reaction = match self {
            Self::Wake => Reaction::transient(AnimationTag::Wake, Some(Mood::Neutral), 1_500),
            Self::Sleep => Reaction {
                animation: AnimationTag::Sleep,
                mood: Some(Mood::Sleeping),
                revert: None,
            },
            Self::Feed => Reaction::transient(AnimationTag::Feed, Some(Mood::Happy), 2_000),
            Self::Nudge => Reaction::transient(AnimationTag::Nudge, None, 1_500),
            Self::Kick => Reaction::transient(AnimationTag::Kick, Some(Mood::Annoyed), 1_500),
            Self::HogBlanket => Reaction {
                animation: AnimationTag::HogBlanket,
                mood: None,
                revert: Some(Revert {
                    idle: AnimationTag::LayIdle,
                    after_ms: 2_000,
                }),
            },
            Self::Gaming => Reaction::transient(AnimationTag::Gaming, Some(Mood::Happy), 3_000),
            Self::Pet => Reaction::transient(AnimationTag::Happy, Some(Mood::Happy), 2_000),
            Self::Drama => Reaction::transient(AnimationTag::Annoyed, Some(Mood::Annoyed), 2_000),
            Self::Cuddle | Self::LightsOut => return None,
        };
        Some(reaction)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{name}'")]
pub struct ActionParseError {
    pub name: String,
}

impl FromStr for ActionName {
    type Err = ActionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let alias = match token.to_ascii_lowercase().as_str() {
            "hog_blanket" => Some(Self::HogBlanket),
            "lights_out" | "lights" => Some(Self::LightsOut),
            _ => None,
        };
        alias
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|action| action.as_token().eq_ignore_ascii_case(token))
            })
            .ok_or_else(|| ActionParseError {
                name: token.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revert {
    pub idle: AnimationTag,
    pub after_ms: u64,
}

/// Immediate animation and mood change, plus an optional timed return to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    pub animation: AnimationTag,
    pub mood: Option<Mood>,
    pub revert: Option<Revert>,
}

impl Reaction {
    pub fn transient(animation: AnimationTag, mood: Option<Mood>, after_ms: u64) -> Self {
        Self {
            animation,
            mood,
            revert: Some(Revert {
                idle: AnimationTag::SitIdle,
                after_ms,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTargets {
    One(ActorId),
    Many(Vec<ActorId>),
    All,
}

impl ActionTargets {
    /// Live actors in first-mention order; unknown and repeated ids are dropped.
    pub(crate) fn resolve(&self, scene: &CatScene) -> Vec<ActorId> {
        let requested = match self {
            Self::One(id) => vec![*id],
            Self::Many(ids) => ids.clone(),
            Self::All => scene.actor_ids(),
        };
        let mut resolved = Vec::with_capacity(requested.len());
        for id in requested {
            if scene.contains_actor(id) && !resolved.contains(&id) {
                resolved.push(id);
            }
        }
        resolved
    }
}

impl From<ActorId> for ActionTargets {
    fn from(id: ActorId) -> Self {
        Self::One(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
    #[error("target must not be empty")]
    Empty,
    #[error("unknown actor '{name}'")]
    UnknownActor { name: String },
}

/// Offsets that put each cat on its own side of the meeting point, along the
/// axis the two cats are mostly separated on.
pub fn flank_offsets(first: Position, second: Position) -> ((f32, f32), (f32, f32)) {
    let dx = second.x - first.x;
    let dy = second.y - first.y;
    if dx.abs() > dy.abs() {
        let sign = if dx >= 0.0 { 1.0 } else { -1.0 };
        (
            (-CUDDLE_FLANK_OFFSET * sign, 0.0),
            (CUDDLE_FLANK_OFFSET * sign, 0.0),
        )
    } else {
        let sign = if dy >= 0.0 { 1.0 } else { -1.0 };
        (
            (0.0, -CUDDLE_FLANK_OFFSET * sign),
            (0.0, CUDDLE_FLANK_OFFSET * sign),
        )
    }
}

impl CatScene {
    /// Parses an actor name, `both` or `all`.
    pub fn parse_targets(&self, raw: &str) -> Result<ActionTargets, TargetParseError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(TargetParseError::Empty);
        }
        if token.eq_ignore_ascii_case("both") || token.eq_ignore_ascii_case("all") {
            return Ok(ActionTargets::All);
        }
        self.actor_id_by_name(token)
            .map(ActionTargets::One)
            .ok_or_else(|| TargetParseError::UnknownActor {
                name: token.to_string(),
            })
    }

    /// Applies `action` to the resolved targets. Returns how many actors it touched;
    /// `lightsOut` reports zero since it only changes the room.
    pub fn dispatch_action(&mut self, action: ActionName, targets: &ActionTargets) -> usize {
        if !self.accepts_commands("dispatch_action") {
            return 0;
        }
        self.button_feedback();
        let actors = targets.resolve(self);
        info!(%action, actor_count = actors.len(), "action_dispatched");

        match action {
            ActionName::LightsOut => {
                self.begin_lights_out();
                0
            }
            ActionName::Cuddle => self.start_cuddle(&actors),
            simple => {
                let Some(reaction) = simple.reaction() else {
                    return 0;
                };
                actors
                    .into_iter()
                    .filter(|id| self.apply_reaction(*id, reaction))
                    .count()
            }
        }
    }

    /// String entry point for adapters. Unknown names still give button feedback but
    /// change nothing, roaming included.
    pub fn dispatch_named_action(&mut self, name: &str, targets: &ActionTargets) -> usize {
        match name.parse::<ActionName>() {
            Ok(action) => self.dispatch_action(action, targets),
            Err(err) => {
                if self.accepts_commands("dispatch_action") {
                    self.button_feedback();
                    warn!(error = %err, "unknown_action_ignored");
                }
                0
            }
        }
    }

    fn button_feedback(&mut self) {
        self.feedback.trigger(HapticIntensity::Medium);
        self.play_sound(SoundEvent::Meow2);
    }

    /// Takes manual control of one actor: roaming and any pending reaction are
    /// cancelled and an in-flight walk stops where it is.
    pub(crate) fn apply_reaction(&mut self, actor_id: ActorId, reaction: Reaction) -> bool {
        if !self.actors.contains_key(&actor_id) {
            debug!(actor = %actor_id, "reaction_ignored_missing_actor");
            return false;
        }
        self.stop_roaming(actor_id);
        self.timers.cancel(TimerSlot::reaction(actor_id));
        let Some(record) = self.actors.get_mut(&actor_id) else {
            return false;
        };
        record.halt();
        record.state.animation = reaction.animation;
        if let Some(mood) = reaction.mood {
            record.state.mood = mood;
        }
        if let Some(revert) = reaction.revert {
            self.timers.schedule(
                TimerSlot::reaction(actor_id),
                self.now_ms.saturating_add(revert.after_ms),
                Continuation::ReturnToIdle {
                    idle: revert.idle,
                    resume_roaming: true,
                },
            );
        }
        debug!(
            actor = %actor_id,
            animation = %reaction.animation,
            revert_ms = reaction.revert.map(|revert| revert.after_ms),
            "reaction_applied"
        );
        true
    }

    fn start_cuddle(&mut self, actors: &[ActorId]) -> usize {
        let &[first, second] = actors else {
            warn!(actor_count = actors.len(), "cuddle_needs_two_actors");
            return 0;
        };
        let (Some(first_pos), Some(second_pos)) = (
            self.actors.get(&first).map(|record| record.state.position),
            self.actors.get(&second).map(|record| record.state.position),
        ) else {
            return 0;
        };

        let meeting = self
            .meeting_point
            .unwrap_or_else(|| first_pos.midpoint(second_pos));
        let meeting = clamp_to_floor(meeting, &self.bounds, self.actor_size);
        let (first_offset, second_offset) = flank_offsets(first_pos, second_pos);

        for (actor_id, (dx, dy)) in [(first, first_offset), (second, second_offset)] {
            self.stop_roaming(actor_id);
            self.timers.cancel(TimerSlot::reaction(actor_id));
            if let Some(record) = self.actors.get_mut(&actor_id) {
                record.state.mood = Mood::Happy;
            }
            self.move_actor_with(
                actor_id,
                meeting.offset(dx, dy),
                ArrivalEffect::Animate(AnimationTag::Happy),
            );
            self.timers.schedule(
                TimerSlot::reaction(actor_id),
                self.now_ms.saturating_add(CUDDLE_SETTLE_MS),
                Continuation::ResumeRoaming,
            );
        }
        info!(
            first = %first,
            second = %second,
            meeting_x = meeting.x,
            meeting_y = meeting.y,
            "cuddle_started"
        );
        2
    }
}
