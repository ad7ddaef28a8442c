use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of animations a cat can play. The presentation layer owns the
/// tag -> frame range mapping; the simulation only ever picks a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationTag {
    SitIdle,
    LayIdle,
    WalkUp,
    WalkDown,
    WalkLeft,
    WalkRight,
    Sleep,
    Wake,
    Happy,
    Annoyed,
    Feed,
    Gaming,
    Nudge,
    Kick,
    HogBlanket,
    Surprised,
}

impl AnimationTag {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::SitIdle => "sitIdle",
            Self::LayIdle => "layIdle",
            Self::WalkUp => "walkUp",
            Self::WalkDown => "walkDown",
            Self::WalkLeft => "walkLeft",
            Self::WalkRight => "walkRight",
            Self::Sleep => "sleep",
            Self::Wake => "wake",
            Self::Happy => "happy",
            Self::Annoyed => "annoyed",
            Self::Feed => "feed",
            Self::Gaming => "gaming",
            Self::Nudge => "nudge",
            Self::Kick => "kick",
            Self::HogBlanket => "hogBlanket",
            Self::Surprised => "surprised",
        }
    }
}

impl fmt::Display for AnimationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Annoyed,
    Sleeping,
}

impl Mood {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Annoyed => "annoyed",
            Self::Sleeping => "sleeping",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TAGS: [AnimationTag; 16] = [
        AnimationTag::SitIdle,
        AnimationTag::LayIdle,
        AnimationTag::WalkUp,
        AnimationTag::WalkDown,
        AnimationTag::WalkLeft,
        AnimationTag::WalkRight,
        AnimationTag::Sleep,
        AnimationTag::Wake,
        AnimationTag::Happy,
        AnimationTag::Annoyed,
        AnimationTag::Feed,
        AnimationTag::Gaming,
        AnimationTag::Nudge,
        AnimationTag::Kick,
        AnimationTag::HogBlanket,
        AnimationTag::Surprised,
    ];

    #[test]
    fn display_tokens_match_serde_names() {
        for tag in ALL_TAGS {
            let json = serde_json::to_string(&tag).expect("encode");
            assert_eq!(json, format!("\"{tag}\""));
        }
    }

    #[test]
    fn serde_uses_camel_case_tokens() {
        let json = serde_json::to_string(&AnimationTag::WalkRight).expect("encode");
        assert_eq!(json, "\"walkRight\"");
        let mood: Mood = serde_json::from_str("\"sleeping\"").expect("decode");
        assert_eq!(mood, Mood::Sleeping);
    }
}
