use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Bounds, Position};

pub const DEFAULT_ACTOR_SIZE: f32 = 64.0;
pub const DEFAULT_TICK_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSpawn {
    pub name: String,
    pub start: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub bounds: Bounds,
    #[serde(default = "default_actor_size")]
    pub actor_size: f32,
    pub anchors: Vec<Position>,
    pub actors: Vec<ActorSpawn>,
    /// Fixed cuddle meeting point; the midpoint between the two cats when absent.
    #[serde(default)]
    pub meeting_point: Option<Position>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_actor_size() -> f32 {
    DEFAULT_ACTOR_SIZE
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(50.0, 450.0, 700.0, 300.0),
            actor_size: DEFAULT_ACTOR_SIZE,
            anchors: vec![
                Position::new(100.0, 500.0),
                Position::new(200.0, 550.0),
                Position::new(300.0, 500.0),
                Position::new(400.0, 600.0),
                Position::new(500.0, 550.0),
                Position::new(600.0, 500.0),
                Position::new(150.0, 650.0),
                Position::new(300.0, 700.0),
                Position::new(500.0, 680.0),
                Position::new(650.0, 600.0),
                Position::new(250.0, 600.0),
                Position::new(450.0, 650.0),
            ],
            actors: vec![
                ActorSpawn {
                    name: "prabh".to_string(),
                    start: Position::new(150.0, 550.0),
                },
                ActorSpawn {
                    name: "sehaj".to_string(),
                    start: Position::new(500.0, 550.0),
                },
            ],
            meeting_point: Some(Position::new(350.0, 600.0)),
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum SceneConfigError {
    #[error("floor bounds must have positive width and height (got {width}x{height})")]
    ZeroAreaBounds { width: f32, height: f32 },
    #[error("floor bounds must be finite")]
    NonFiniteBounds,
    #[error("actor size {actor_size} must be positive and fit inside {width}x{height} floor")]
    ActorDoesNotFit {
        actor_size: f32,
        width: f32,
        height: f32,
    },
    #[error("roam anchor list is empty")]
    EmptyAnchors,
    #[error("roam anchor {index} at ({x},{y}) lies outside the floor")]
    AnchorOutsideBounds { index: usize, x: f32, y: f32 },
    #[error("scene has no actors")]
    NoActors,
    #[error("actor name must not be empty (actor {index})")]
    EmptyActorName { index: usize },
    #[error("duplicate actor name '{name}'")]
    DuplicateActorName { name: String },
    #[error("{field} must be finite")]
    NonFinitePosition { field: String },
    #[error("tick_ms must be greater than zero")]
    ZeroTick,
    #[error("failed to read scene config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse scene config{}: {source}", format_json_path(.json_path))]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn format_json_path(json_path: &str) -> String {
    if json_path.is_empty() || json_path == "." {
        String::new()
    } else {
        format!(" at {json_path}")
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), SceneConfigError> {
        let bounds = &self.bounds;
        if !bounds.is_finite() {
            return Err(SceneConfigError::NonFiniteBounds);
        }
        if !bounds.has_area() {
            return Err(SceneConfigError::ZeroAreaBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }
        if !(self.actor_size > 0.0
            && self.actor_size <= bounds.width
            && self.actor_size <= bounds.height)
        {
            return Err(SceneConfigError::ActorDoesNotFit {
                actor_size: self.actor_size,
                width: bounds.width,
                height: bounds.height,
            });
        }
        if self.tick_ms == 0 {
            return Err(SceneConfigError::ZeroTick);
        }

        if self.anchors.is_empty() {
            return Err(SceneConfigError::EmptyAnchors);
        }
        for (index, anchor) in self.anchors.iter().enumerate() {
            if !anchor.is_finite() {
                return Err(SceneConfigError::NonFinitePosition {
                    field: format!("anchors[{index}]"),
                });
            }
            if !bounds.contains_point(*anchor) {
                return Err(SceneConfigError::AnchorOutsideBounds {
                    index,
                    x: anchor.x,
                    y: anchor.y,
                });
            }
        }

        if self.actors.is_empty() {
            return Err(SceneConfigError::NoActors);
        }
        let mut seen_names = HashSet::new();
        for (index, spawn) in self.actors.iter().enumerate() {
            let name = spawn.name.trim();
            if name.is_empty() {
                return Err(SceneConfigError::EmptyActorName { index });
            }
            if !seen_names.insert(name.to_ascii_lowercase()) {
                return Err(SceneConfigError::DuplicateActorName {
                    name: name.to_string(),
                });
            }
            if !spawn.start.is_finite() {
                return Err(SceneConfigError::NonFinitePosition {
                    field: format!("actors[{index}].start"),
                });
            }
        }

        if let Some(point) = self.meeting_point {
            if !point.is_finite() {
                return Err(SceneConfigError::NonFinitePosition {
                    field: "meeting_point".to_string(),
                });
            }
        }
        Ok(())
    }
}

pub fn parse_scene_config(raw: &str) -> Result<SceneConfig, SceneConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let config = serde_path_to_error::deserialize::<_, SceneConfig>(&mut deserializer).map_err(
        |error| {
            let json_path = error.path().to_string();
            SceneConfigError::Parse {
                json_path,
                source: error.into_inner(),
            }
        },
    )?;
    config.validate()?;
    Ok(config)
}

pub fn load_scene_config(path: &Path) -> Result<SceneConfig, SceneConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| SceneConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene_config(&raw)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        SceneConfig::default().validate().expect("default config");
    }

    #[test]
    fn zero_area_bounds_are_rejected() {
        let config = SceneConfig {
            bounds: Bounds::new(0.0, 0.0, 0.0, 300.0),
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SceneConfigError::ZeroAreaBounds { .. })
        ));
    }

    #[test]
    fn empty_anchor_list_is_rejected() {
        let config = SceneConfig {
            anchors: Vec::new(),
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SceneConfigError::EmptyAnchors)
        ));
    }

    #[test]
    fn anchor_outside_floor_is_rejected() {
        let mut config = SceneConfig::default();
        config.anchors.push(Position::new(800.0, 500.0));
        let error = config.validate().expect_err("anchor outside");
        assert!(matches!(
            error,
            SceneConfigError::AnchorOutsideBounds { index: 12, .. }
        ));
    }

    #[test]
    fn duplicate_names_are_case_insensitive() {
        let mut config = SceneConfig::default();
        config.actors[1].name = "PRABH".to_string();
        assert!(matches!(
            config.validate(),
            Err(SceneConfigError::DuplicateActorName { .. })
        ));
    }

    #[test]
    fn oversized_actor_is_rejected() {
        let config = SceneConfig {
            actor_size: 400.0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SceneConfigError::ActorDoesNotFit { .. })
        ));
    }

    #[test]
    fn parse_reports_json_path_of_bad_field() {
        let raw = r#"{
            "bounds": {"x": 0, "y": 0, "width": 100, "height": 100},
            "anchors": [{"x": 10, "y": "ten"}],
            "actors": [{"name": "solo", "start": {"x": 0, "y": 0}}]
        }"#;
        let error = parse_scene_config(raw).expect_err("bad anchor");
        let message = error.to_string();
        assert!(message.starts_with("parse scene config at anchors[0].y:"), "{message}");
    }

    #[test]
    fn parse_applies_defaults_and_validates() {
        let raw = r#"{
            "bounds": {"x": 0, "y": 0, "width": 200, "height": 200},
            "anchors": [{"x": 10, "y": 10}],
            "actors": [{"name": "solo", "start": {"x": 0, "y": 0}}]
        }"#;
        let config = parse_scene_config(raw).expect("valid config");
        assert_eq!(config.actor_size, DEFAULT_ACTOR_SIZE);
        assert_eq!(config.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(config.meeting_point, None);

        let invalid = raw.replace("\"width\": 200", "\"width\": 0");
        assert!(matches!(
            parse_scene_config(&invalid),
            Err(SceneConfigError::ZeroAreaBounds { .. })
        ));
    }

    #[test]
    fn load_reads_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let raw = serde_json::to_string_pretty(&SceneConfig::default()).expect("encode");
        file.write_all(raw.as_bytes()).expect("write");

        let loaded = load_scene_config(file.path()).expect("load");
        assert_eq!(loaded, SceneConfig::default());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load_scene_config(&missing),
            Err(SceneConfigError::Read { .. })
        ));
    }
}
