mod actions;
mod actor;
mod animation;
mod config;
mod feedback;
mod geometry;
mod movement;
mod random;
mod roaming;
mod room;
mod scene;
mod timers;
mod touch;

pub use actions::{
    flank_offsets, ActionName, ActionParseError, ActionTargets, Reaction, Revert,
    TargetParseError, CUDDLE_FLANK_OFFSET, CUDDLE_SETTLE_MS,
};
pub use actor::{ActorId, ActorSnapshot, ActorState};
pub use animation::{AnimationTag, Mood};
pub use config::{
    load_scene_config, parse_scene_config, ActorSpawn, SceneConfig, SceneConfigError,
    DEFAULT_ACTOR_SIZE, DEFAULT_TICK_MS,
};
pub use feedback::{AudioSink, FeedbackHooks, HapticIntensity, HapticsSink, SoundEvent};
pub use geometry::{
    clamp_to_floor, direction_to, random_anchor, walk_duration_ms, Bounds, Position,
    WalkDirection, MAX_WALK_DURATION_MS, MIN_WALK_DURATION_MS, WALK_MS_PER_UNIT,
};
pub use movement::{pick_idle_animation, position_at, ArrivalEffect, Movement, LAY_IDLE_CHANCE};
pub use random::{random_source_for, RandomSource, SequenceRandom, StdRandom};
pub use roaming::{
    FIRST_ROAM_DELAY_MAX_MS, FIRST_ROAM_DELAY_MIN_MS, NEXT_ROAM_DELAY_MAX_MS,
    NEXT_ROAM_DELAY_MIN_MS,
};
pub use room::{RoomState, Weather, LIGHTS_OUT_DURATION_MS};
pub use scene::CatScene;
pub use timers::{RoomTimer, TimerHandle, TimerPurpose, TimerSlot};
pub use touch::{BodyPart, BodyPartParseError, TOUCH_REVERT_MS};
