use tracing::{debug, info, warn};

use crate::actor::ActorId;
use crate::geometry::random_anchor;
use crate::movement::ArrivalEffect;
use crate::scene::CatScene;
use crate::timers::{Continuation, TimerHandle, TimerSlot};

pub const FIRST_ROAM_DELAY_MIN_MS: u64 = 3_000;
pub const FIRST_ROAM_DELAY_MAX_MS: u64 = 6_000;
pub const NEXT_ROAM_DELAY_MIN_MS: u64 = 5_000;
pub const NEXT_ROAM_DELAY_MAX_MS: u64 = 10_000;

impl CatScene {
    /// Schedules the first roam cycle. Any roam already pending for the actor is
    /// replaced, so an actor never has more than one.
    pub fn start_roaming(&mut self, actor_id: ActorId) -> Option<TimerHandle> {
        if !self.accepts_commands("start_roaming") {
            return None;
        }
        if !self.actors.contains_key(&actor_id) {
            debug!(actor = %actor_id, "roaming_ignored_missing_actor");
            return None;
        }
        let delay_ms = self
            .rng
            .range_ms(FIRST_ROAM_DELAY_MIN_MS, FIRST_ROAM_DELAY_MAX_MS);
        let (handle, replaced) = self.timers.schedule(
            TimerSlot::roam(actor_id),
            self.now_ms.saturating_add(delay_ms),
            Continuation::RoamCycle,
        );
        if replaced {
            debug!(actor = %actor_id, "roaming_restarted");
        }
        info!(actor = %actor_id, delay_ms, "roaming_started");
        Some(handle)
    }

    pub fn start_all_roaming(&mut self) {
        for actor_id in self.actor_ids() {
            self.start_roaming(actor_id);
        }
    }

    /// Cancels the pending roam, if any. A walk already under way keeps going.
    pub fn stop_roaming(&mut self, actor_id: ActorId) -> bool {
        let cancelled = self.timers.cancel(TimerSlot::roam(actor_id));
        if cancelled {
            debug!(actor = %actor_id, "roaming_stopped");
        }
        cancelled
    }

    pub fn is_roaming(&self, actor_id: ActorId) -> bool {
        self.timers.is_pending(TimerSlot::roam(actor_id))
    }

    pub(crate) fn run_roam_cycle(&mut self, actor_id: ActorId) {
        let Some(anchor) = random_anchor(&self.anchors, self.rng.as_mut()) else {
            warn!(actor = %actor_id, "roam_skipped_no_anchors");
            return;
        };
        if !self.move_actor_with(actor_id, anchor, ArrivalEffect::None) {
            return;
        }
        let delay_ms = self
            .rng
            .range_ms(NEXT_ROAM_DELAY_MIN_MS, NEXT_ROAM_DELAY_MAX_MS);
        self.timers.schedule(
            TimerSlot::roam(actor_id),
            self.now_ms.saturating_add(delay_ms),
            Continuation::RoamCycle,
        );
        debug!(
            actor = %actor_id,
            anchor_x = anchor.x,
            anchor_y = anchor.y,
            next_delay_ms = delay_ms,
            "roam_cycle"
        );
    }
}
