use pet_engine::{ActorId, ActorSnapshot, CatScene, Position, RoomState};
use serde::Serialize;
use tracing::{info, trace};

use super::console::{RoamMode, SceneCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionFlow {
    Continue,
    Quit,
}

/// Owns the scene for the lifetime of the console and polls it like a render loop would.
pub(crate) struct Session {
    scene: CatScene,
    tick_ms: u64,
    frames: u64,
}

#[derive(Serialize)]
struct SceneView<'a> {
    t_ms: u64,
    room: &'a RoomState,
    actors: Vec<ActorView<'a>>,
}

#[derive(Serialize)]
struct ActorView<'a> {
    name: &'a str,
    #[serde(flatten)]
    state: ActorSnapshot,
}

impl Session {
    pub(crate) fn new(scene: CatScene, tick_ms: u64) -> Self {
        Self {
            scene,
            tick_ms: tick_ms.max(1),
            frames: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn scene(&self) -> &CatScene {
        &self.scene
    }

    /// Every cat starts wandering as soon as the room is shown.
    pub(crate) fn mount(&mut self) {
        self.scene.start_all_roaming();
        info!(actors = self.scene.actor_count(), "scene_mounted");
    }

    pub(crate) fn shutdown(&mut self) {
        self.scene.teardown();
        info!(t_ms = self.scene.now_ms(), frames = self.frames, "shutdown");
    }

    pub(crate) fn apply(&mut self, command: SceneCommand, out: &mut Vec<String>) -> SessionFlow {
        match command {
            SceneCommand::Quit => return SessionFlow::Quit,
            SceneCommand::Advance { ms } => self.advance(ms),
            SceneCommand::Move { actor, x, y } => {
                if let Some(actor_id) = self.resolve_actor(&actor, out) {
                    self.scene.move_actor(actor_id, Position::new(x, y));
                }
            }
            SceneCommand::Roam { mode, actor } => {
                if let Some(actor_id) = self.resolve_actor(&actor, out) {
                    match mode {
                        RoamMode::Start => {
                            self.scene.stop_roaming(actor_id);
                            self.scene.start_roaming(actor_id);
                        }
                        RoamMode::Stop => {
                            self.scene.stop_roaming(actor_id);
                        }
                    }
                }
            }
            SceneCommand::Action { name, target } => match self.scene.parse_targets(&target) {
                Ok(targets) => {
                    self.scene.dispatch_named_action(&name, &targets);
                }
                Err(err) => out.push(format!("error: {err}. usage: action <name> <target>")),
            },
            SceneCommand::Touch { actor, part } => {
                if let Some(actor_id) = self.resolve_actor(&actor, out) {
                    self.scene.handle_part_touch(actor_id, part);
                }
            }
            SceneCommand::Weather => {
                self.scene.cycle_weather();
            }
            SceneCommand::Curtains => {
                self.scene.toggle_curtains();
            }
            SceneCommand::Lamp => {
                self.scene.toggle_lamp();
            }
            SceneCommand::Mute => {
                self.scene.toggle_mute();
            }
            SceneCommand::Dump => out.extend(self.dump_lines()),
            SceneCommand::Snapshot => match self.snapshot_json() {
                Ok(json) => out.push(json),
                Err(err) => out.push(format!("error: failed to encode snapshot: {err}")),
            },
            SceneCommand::Remove { actor } => {
                if let Some(actor_id) = self.resolve_actor(&actor, out) {
                    self.scene.remove_actor(actor_id);
                }
            }
        }
        SessionFlow::Continue
    }

    fn advance(&mut self, ms: u64) {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(self.tick_ms);
            self.scene.advance_by(step);
            remaining -= step;
            self.frames += 1;
            let moving = self
                .scene
                .snapshots()
                .iter()
                .filter(|(_, snapshot)| snapshot.is_moving)
                .count();
            trace!(t_ms = self.scene.now_ms(), moving, "frame");
        }
    }

    fn resolve_actor(&self, name: &str, out: &mut Vec<String>) -> Option<ActorId> {
        let actor_id = self.scene.actor_id_by_name(name);
        if actor_id.is_none() {
            out.push(format!("error: unknown actor '{name}'"));
        }
        actor_id
    }

    pub(crate) fn dump_lines(&self) -> Vec<String> {
        let mut lines = self
            .scene
            .snapshots()
            .into_iter()
            .map(|(actor_id, snapshot)| {
                format!(
                    "actor {} pos:({:.1},{:.1}) anim:{} mood:{} moving:{}",
                    self.scene.actor_name(actor_id).unwrap_or("?"),
                    snapshot.position.x,
                    snapshot.position.y,
                    snapshot.animation,
                    snapshot.mood,
                    snapshot.is_moving
                )
            })
            .collect::<Vec<_>>();
        let room = self.scene.room();
        lines.push(format!(
            "room weather:{} lamp:{} curtains:{} lights_out:{} muted:{} t:{}",
            room.weather,
            if room.lamp_on { "on" } else { "off" },
            if room.curtains_open { "open" } else { "closed" },
            room.lights_out,
            room.muted,
            self.scene.now_ms()
        ));
        lines
    }

    pub(crate) fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        let actors = self
            .scene
            .snapshots()
            .into_iter()
            .filter_map(|(actor_id, state)| {
                self.scene
                    .actor_name(actor_id)
                    .map(|name| ActorView { name, state })
            })
            .collect();
        serde_json::to_string(&SceneView {
            t_ms: self.scene.now_ms(),
            room: self.scene.room(),
            actors,
        })
    }
}

#[cfg(test)]
mod tests {
    use pet_engine::{AnimationTag, FeedbackHooks, SceneConfig, SequenceRandom};

    use super::*;
    use crate::app::console::ConsoleCommandProcessor;

    fn session() -> Session {
        let scene = CatScene::new(
            &SceneConfig::default(),
            Box::new(SequenceRandom::new(Vec::new())),
            FeedbackHooks::no_op(),
        )
        .expect("scene");
        Session::new(scene, 16)
    }

    fn run_lines(session: &mut Session, lines: &[&str]) -> Vec<String> {
        let processor = ConsoleCommandProcessor::new().expect("builtins");
        let mut out = Vec::new();
        for line in lines {
            if let Some(command) = processor.process_line(line, &mut out) {
                if session.apply(command, &mut out) == SessionFlow::Quit {
                    break;
                }
            }
        }
        out
    }

    #[test]
    fn dump_describes_actors_and_room() {
        let mut session = session();
        assert_eq!(
            run_lines(&mut session, &["dump"]),
            vec![
                "actor prabh pos:(150.0,550.0) anim:sitIdle mood:neutral moving:false",
                "actor sehaj pos:(500.0,550.0) anim:sitIdle mood:neutral moving:false",
                "room weather:clear lamp:on curtains:open lights_out:false muted:false t:0",
            ]
        );
    }

    #[test]
    fn advance_steps_in_ticks_to_the_exact_time() {
        let mut session = session();
        run_lines(&mut session, &["advance 100"]);
        assert_eq!(session.scene().now_ms(), 100);
        assert_eq!(session.frames, 7);
    }

    #[test]
    fn commands_drive_the_scene() {
        let mut session = session();
        let out = run_lines(
            &mut session,
            &[
                "move prabh 600 500",
                "advance 2000",
                "action kick sehaj",
                "weather",
                "lamp",
                "dump",
            ],
        );
        assert_eq!(
            out,
            vec![
                "actor prabh pos:(600.0,500.0) anim:sitIdle mood:neutral moving:false",
                "actor sehaj pos:(500.0,550.0) anim:kick mood:annoyed moving:false",
                "room weather:rain lamp:off curtains:open lights_out:false muted:false t:2000",
            ]
        );
    }

    #[test]
    fn unknown_names_report_errors_without_touching_state() {
        let mut session = session();
        let out = run_lines(
            &mut session,
            &["touch mochi head", "action nudge mochi", "action moonwalk all"],
        );
        assert_eq!(
            out,
            vec![
                "error: unknown actor 'mochi'",
                "error: unknown actor 'mochi'. usage: action <name> <target>",
            ]
        );
        let prabh = session.scene().snapshot(ActorId(0)).expect("prabh");
        assert_eq!(prabh.animation, AnimationTag::SitIdle);
    }

    #[test]
    fn roam_commands_toggle_the_schedule() {
        let mut session = session();
        session.mount();
        assert!(session.scene().is_roaming(ActorId(0)));
        run_lines(&mut session, &["roam stop prabh"]);
        assert!(!session.scene().is_roaming(ActorId(0)));
        assert!(session.scene().is_roaming(ActorId(1)));
        run_lines(&mut session, &["roam start PRABH", "roam start prabh"]);
        assert!(session.scene().is_roaming(ActorId(0)));
        assert_eq!(session.scene().pending_timer_count(), 2);
    }

    #[test]
    fn quit_stops_processing_remaining_lines() {
        let mut session = session();
        let out = run_lines(&mut session, &["quit", "echo after"]);
        assert!(out.is_empty());
    }

    #[test]
    fn removed_cat_disappears_from_dump() {
        let mut session = session();
        let out = run_lines(&mut session, &["remove sehaj", "dump"]);
        assert_eq!(out.len(), 2);
        assert!(out[0].starts_with("actor prabh "));
        assert!(out[1].starts_with("room "));
    }

    #[test]
    fn snapshot_is_json() {
        let mut session = session();
        let out = run_lines(&mut session, &["action sleep prabh", "snapshot"]);
        let value: serde_json::Value = serde_json::from_str(&out[0]).expect("json");
        assert_eq!(value["t_ms"], 0);
        assert_eq!(value["room"]["lamp_on"], true);
        assert_eq!(value["actors"][0]["name"], "prabh");
        assert_eq!(value["actors"][0]["animation"], "sleep");
        assert_eq!(value["actors"][0]["mood"], "sleeping");
        assert_eq!(value["actors"][1]["is_moving"], false);
    }

    #[test]
    fn shutdown_tears_down_the_scene() {
        let mut session = session();
        session.mount();
        session.shutdown();
        assert!(session.scene().is_torn_down());
        assert_eq!(session.scene().pending_timer_count(), 0);
    }
}
