use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::actor::{ActorId, ActorRecord, ActorSnapshot};
use crate::animation::AnimationTag;
use crate::config::{SceneConfig, SceneConfigError};
use crate::feedback::FeedbackHooks;
use crate::geometry::{clamp_to_floor, Bounds, Position};
use crate::random::{random_source_for, RandomSource};
use crate::room::RoomState;
use crate::timers::{Continuation, TimerHandle, TimerSlot, TimerTable};

/// The cat room simulation: actors, their walks, every pending continuation and
/// the room flags. Time only moves through [`CatScene::advance_to`].
#[derive(Debug)]
pub struct CatScene {
    pub(crate) bounds: Bounds,
    pub(crate) actor_size: f32,
    pub(crate) anchors: Vec<Position>,
    pub(crate) meeting_point: Option<Position>,
    pub(crate) actors: BTreeMap<ActorId, ActorRecord>,
    pub(crate) timers: TimerTable,
    pub(crate) room: RoomState,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) feedback: FeedbackHooks,
    pub(crate) now_ms: u64,
    torn_down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneEvent {
    Arrival(ActorId),
    Timer(TimerSlot),
}

impl CatScene {
    pub fn new(
        config: &SceneConfig,
        rng: Box<dyn RandomSource>,
        feedback: FeedbackHooks,
    ) -> Result<Self, SceneConfigError> {
        config.validate()?;
        let actors = config
            .actors
            .iter()
            .enumerate()
            .map(|(index, spawn)| {
                let start = clamp_to_floor(spawn.start, &config.bounds, config.actor_size);
                (
                    ActorId(index as u64),
                    ActorRecord::new(spawn.name.trim().to_string(), start),
                )
            })
            .collect::<BTreeMap<_, _>>();
        info!(
            actor_count = actors.len(),
            anchor_count = config.anchors.len(),
            "scene_created"
        );
        Ok(Self {
            bounds: config.bounds,
            actor_size: config.actor_size,
            anchors: config.anchors.clone(),
            meeting_point: config.meeting_point,
            actors,
            timers: TimerTable::default(),
            room: RoomState::default(),
            rng,
            feedback,
            now_ms: 0,
            torn_down: false,
        })
    }

    /// Randomness seeded from `config.seed` when present; feedback discarded.
    pub fn from_config(config: &SceneConfig) -> Result<Self, SceneConfigError> {
        Self::new(config, random_source_for(config.seed), FeedbackHooks::no_op())
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn contains_actor(&self, actor_id: ActorId) -> bool {
        self.actors.contains_key(&actor_id)
    }

    pub fn actor_id_by_name(&self, name: &str) -> Option<ActorId> {
        let wanted = name.trim();
        self.actors
            .iter()
            .find(|(_, record)| record.name.eq_ignore_ascii_case(wanted))
            .map(|(id, _)| *id)
    }

    pub fn actor_name(&self, actor_id: ActorId) -> Option<&str> {
        self.actors
            .get(&actor_id)
            .map(|record| record.name.as_str())
    }

    pub fn snapshot(&self, actor_id: ActorId) -> Option<ActorSnapshot> {
        self.actors
            .get(&actor_id)
            .map(|record| record.state.snapshot())
    }

    pub fn snapshots(&self) -> Vec<(ActorId, ActorSnapshot)> {
        self.actors
            .iter()
            .map(|(id, record)| (*id, record.state.snapshot()))
            .collect()
    }

    /// How many walks have been started for this actor since the scene was built.
    pub fn movements_started(&self, actor_id: ActorId) -> u64 {
        self.actors
            .get(&actor_id)
            .map(|record| record.moves_started)
            .unwrap_or(0)
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn timer_due_ms(&self, slot: TimerSlot) -> Option<u64> {
        self.timers.due_ms(slot)
    }

    pub fn is_timer_live(&self, handle: TimerHandle) -> bool {
        self.timers.is_live(handle)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Detaches one actor. Its pending continuations stay queued and no-op when they fire.
    pub fn remove_actor(&mut self, actor_id: ActorId) -> bool {
        match self.actors.remove(&actor_id) {
            Some(record) => {
                info!(actor = %actor_id, name = %record.name, "actor_removed");
                true
            }
            None => false,
        }
    }

    /// Cancels every outstanding continuation and freezes the scene.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled = self.timers.clear();
        for record in self.actors.values_mut() {
            record.halt();
        }
        self.torn_down = true;
        info!(cancelled_timers = cancelled, "scene_torn_down");
    }

    pub fn advance_by(&mut self, delta_ms: u64) {
        self.advance_to(self.now_ms.saturating_add(delta_ms));
    }

    /// Runs every arrival and timer due up to `now_ms` in time order, then samples
    /// in-flight walks at `now_ms`. Arrivals win ties against timers.
    pub fn advance_to(&mut self, now_ms: u64) {
        if !self.accepts_commands("advance") {
            return;
        }
        if now_ms < self.now_ms {
            warn!(now_ms, scene_ms = self.now_ms, "advance_ignored_clock_regressed");
            return;
        }

        while let Some((event, at_ms)) = self.next_event() {
            if at_ms > now_ms {
                break;
            }
            self.now_ms = at_ms;
            self.sample_movements(at_ms);
            match event {
                SceneEvent::Arrival(actor_id) => self.complete_arrival(actor_id),
                SceneEvent::Timer(slot) => self.fire_timer(slot),
            }
        }

        self.now_ms = now_ms;
        self.sample_movements(now_ms);
    }

    pub(crate) fn accepts_commands(&self, operation: &'static str) -> bool {
        if self.torn_down {
            debug!(operation, "ignored_after_teardown");
            return false;
        }
        true
    }

    fn next_event(&self) -> Option<(SceneEvent, u64)> {
        let arrival = self
            .next_arrival()
            .map(|(id, at)| (SceneEvent::Arrival(id), at));
        let timer = self
            .timers
            .next_due()
            .map(|(slot, at)| (SceneEvent::Timer(slot), at));
        match (arrival, timer) {
            (Some(arrival), Some(timer)) => {
                if timer.1 < arrival.1 {
                    Some(timer)
                } else {
                    Some(arrival)
                }
            }
            (arrival, timer) => arrival.or(timer),
        }
    }

    fn fire_timer(&mut self, slot: TimerSlot) {
        let Some(continuation) = self.timers.take(slot) else {
            return;
        };
        if let Some(actor_id) = slot.actor() {
            if !self.actors.contains_key(&actor_id) {
                debug!(actor = %actor_id, ?continuation, "stale_timer_ignored");
                return;
            }
        }

        match (slot, continuation) {
            (TimerSlot::Actor { actor, .. }, Continuation::RoamCycle) => {
                self.run_roam_cycle(actor);
            }
            (
                TimerSlot::Actor { actor, .. },
                Continuation::ReturnToIdle {
                    idle,
                    resume_roaming,
                },
            ) => {
                self.return_to_idle(actor, idle);
                if resume_roaming {
                    self.start_roaming(actor);
                }
            }
            (TimerSlot::Actor { actor, .. }, Continuation::ResumeRoaming) => {
                self.start_roaming(actor);
            }
            (TimerSlot::Room(_), Continuation::RestoreLights) => self.restore_lights(),
            (slot, continuation) => {
                warn!(?slot, ?continuation, "timer_continuation_mismatch");
            }
        }
    }

    fn return_to_idle(&mut self, actor_id: ActorId, idle: AnimationTag) {
        if let Some(record) = self.actors.get_mut(&actor_id) {
            record.state.animation = idle;
            debug!(actor = %actor_id, animation = %idle, "reaction_finished");
        }
    }
}
