use std::collections::HashMap;

use crate::actor::ActorId;
use crate::animation::AnimationTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerPurpose {
    /// Next autonomous roam cycle.
    Roam,
    /// Return from an action or touch reaction, or the cuddle settle.
    Reaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomTimer {
    LightsOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerSlot {
    Actor {
        actor: ActorId,
        purpose: TimerPurpose,
    },
    Room(RoomTimer),
}

impl TimerSlot {
    pub fn roam(actor: ActorId) -> Self {
        Self::Actor {
            actor,
            purpose: TimerPurpose::Roam,
        }
    }

    pub fn reaction(actor: ActorId) -> Self {
        Self::Actor {
            actor,
            purpose: TimerPurpose::Reaction,
        }
    }

    pub fn actor(self) -> Option<ActorId> {
        match self {
            Self::Actor { actor, .. } => Some(actor),
            Self::Room(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    RoamCycle,
    ReturnToIdle {
        idle: AnimationTag,
        resume_roaming: bool,
    },
    ResumeRoaming,
    RestoreLights,
}

/// Opaque handle to one scheduled continuation. Goes stale once the slot is
/// cancelled, fired or rescheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    slot: TimerSlot,
    seq: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due_ms: u64,
    seq: u64,
    continuation: Continuation,
}

/// One pending continuation per slot; scheduling into an occupied slot replaces it.
#[derive(Debug, Default)]
pub(crate) struct TimerTable {
    next_seq: u64,
    pending: HashMap<TimerSlot, PendingTimer>,
}

impl TimerTable {
    pub(crate) fn schedule(
        &mut self,
        slot: TimerSlot,
        due_ms: u64,
        continuation: Continuation,
    ) -> (TimerHandle, bool) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.saturating_add(1);
        let replaced = self
            .pending
            .insert(
                slot,
                PendingTimer {
                    due_ms,
                    seq,
                    continuation,
                },
            )
            .is_some();
        (TimerHandle { slot, seq }, replaced)
    }

    pub(crate) fn cancel(&mut self, slot: TimerSlot) -> bool {
        self.pending.remove(&slot).is_some()
    }

    pub(crate) fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub(crate) fn is_pending(&self, slot: TimerSlot) -> bool {
        self.pending.contains_key(&slot)
    }

    pub(crate) fn is_live(&self, handle: TimerHandle) -> bool {
        self.pending
            .get(&handle.slot)
            .is_some_and(|timer| timer.seq == handle.seq)
    }

    pub(crate) fn due_ms(&self, slot: TimerSlot) -> Option<u64> {
        self.pending.get(&slot).map(|timer| timer.due_ms)
    }

    /// Earliest pending timer, ties broken by scheduling order.
    pub(crate) fn next_due(&self) -> Option<(TimerSlot, u64)> {
        self.pending
            .iter()
            .min_by_key(|(_, timer)| (timer.due_ms, timer.seq))
            .map(|(slot, timer)| (*slot, timer.due_ms))
    }

    pub(crate) fn take(&mut self, slot: TimerSlot) -> Option<Continuation> {
        self.pending.remove(&slot).map(|timer| timer.continuation)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
