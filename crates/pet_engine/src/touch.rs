use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::actions::Reaction;
use crate::actor::ActorId;
use crate::animation::AnimationTag;
use crate::feedback::{HapticIntensity, SoundEvent};
use crate::scene::CatScene;

pub const TOUCH_REVERT_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Head,
    Nose,
    Belly,
    Tail,
}

impl BodyPart {
    pub const ALL: [BodyPart; 4] = [Self::Head, Self::Nose, Self::Belly, Self::Tail];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Nose => "nose",
            Self::Belly => "belly",
            Self::Tail => "tail",
        }
    }

    pub fn reaction_animation(self) -> AnimationTag {
        match self {
            Self::Head | Self::Belly => AnimationTag::Happy,
            Self::Nose => AnimationTag::Surprised,
            Self::Tail => AnimationTag::Annoyed,
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown body part '{part}' (expected head, nose, belly or tail)")]
pub struct BodyPartParseError {
    pub part: String,
}

impl FromStr for BodyPart {
    type Err = BodyPartParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        Self::ALL
            .into_iter()
            .find(|part| part.as_token().eq_ignore_ascii_case(token))
            .ok_or_else(|| BodyPartParseError {
                part: token.to_string(),
            })
    }
}

impl CatScene {
    /// Reacts to a tap on one body part. A second tap before the revert restarts the window.
    pub fn handle_part_touch(&mut self, actor_id: ActorId, part: BodyPart) -> bool {
        if !self.accepts_commands("handle_part_touch") {
            return false;
        }
        if !self.contains_actor(actor_id) {
            debug!(actor = %actor_id, %part, "touch_ignored_missing_actor");
            return false;
        }
        self.feedback.trigger(HapticIntensity::Light);
        self.play_sound(SoundEvent::Meow1);
        let reaction = Reaction::transient(part.reaction_animation(), None, TOUCH_REVERT_MS);
        let applied = self.apply_reaction(actor_id, reaction);
        info!(actor = %actor_id, %part, "part_touched");
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_parts_map_to_reactions() {
        assert_eq!(BodyPart::Head.reaction_animation(), AnimationTag::Happy);
        assert_eq!(BodyPart::Belly.reaction_animation(), AnimationTag::Happy);
        assert_eq!(BodyPart::Nose.reaction_animation(), AnimationTag::Surprised);
        assert_eq!(BodyPart::Tail.reaction_animation(), AnimationTag::Annoyed);
    }

    #[test]
    fn body_part_parse_is_case_insensitive() {
        assert_eq!("HEAD".parse(), Ok(BodyPart::Head));
        assert_eq!(" tail".parse(), Ok(BodyPart::Tail));
        let err = "paw".parse::<BodyPart>().expect_err("unknown part");
        assert_eq!(err.part, "paw");
    }
}
