use serde::{Deserialize, Serialize};

use crate::animation::AnimationTag;
use crate::random::RandomSource;

pub const WALK_MS_PER_UNIT: f32 = 3.0;
pub const MIN_WALK_DURATION_MS: f32 = 1200.0;
pub const MAX_WALK_DURATION_MS: f32 = 2500.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(self, to: Position, t: f32) -> Position {
        Position {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn midpoint(self, other: Position) -> Position {
        self.lerp(other, 0.5)
    }

    pub fn offset(self, dx: f32, dy: f32) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned floor region. `x`/`y` are the origin, `width`/`height` the extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    pub fn contains_point(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x <= self.x + self.width
            && pos.y <= self.y + self.height
    }

    /// True when an `actor_size` square anchored at `pos` lies fully inside the bounds.
    pub fn contains_footprint(&self, pos: Position, actor_size: f32) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && pos.x + actor_size <= self.x + self.width
            && pos.y + actor_size <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkDirection {
    Up,
    Down,
    Left,
    Right,
}

impl WalkDirection {
    pub fn animation(self) -> AnimationTag {
        match self {
            Self::Up => AnimationTag::WalkUp,
            Self::Down => AnimationTag::WalkDown,
            Self::Left => AnimationTag::WalkLeft,
            Self::Right => AnimationTag::WalkRight,
        }
    }
}

pub fn clamp_to_floor(pos: Position, bounds: &Bounds, actor_size: f32) -> Position {
    Position {
        x: clamp_axis(pos.x, bounds.x, bounds.x + bounds.width - actor_size),
        y: clamp_axis(pos.y, bounds.y, bounds.y + bounds.height - actor_size),
    }
}

// `f32::clamp` panics on min > max; this collapses to `min` instead and maps NaN to `max`.
fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

pub fn random_anchor(anchors: &[Position], rng: &mut dyn RandomSource) -> Option<Position> {
    if anchors.is_empty() {
        return None;
    }
    anchors.get(rng.index(anchors.len())).copied()
}

/// Dominant-axis walk direction. Exact diagonals resolve to the vertical branch.
pub fn direction_to(from: Position, to: Position) -> WalkDirection {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            WalkDirection::Right
        } else {
            WalkDirection::Left
        }
    } else if dy > 0.0 {
        WalkDirection::Down
    } else {
        WalkDirection::Up
    }
}

pub fn walk_duration_ms(from: Position, to: Position) -> f32 {
    (from.distance_to(to) * WALK_MS_PER_UNIT).clamp(MIN_WALK_DURATION_MS, MAX_WALK_DURATION_MS)
}
