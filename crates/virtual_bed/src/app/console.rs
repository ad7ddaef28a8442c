use std::collections::HashMap;

use pet_engine::BodyPart;
use thiserror::Error;

/// Longest single `advance`. The session steps every tick of it.
pub(crate) const MAX_ADVANCE_MS: u64 = 3_600_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoamMode {
    Start,
    Stop,
}

/// Commands that touch the scene. Actor names stay unresolved until they reach the session.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SceneCommand {
    Advance { ms: u64 },
    Move { actor: String, x: f32, y: f32 },
    Roam { mode: RoamMode, actor: String },
    Action { name: String, target: String },
    Touch { actor: String, part: BodyPart },
    Weather,
    Curtains,
    Lamp,
    Mute,
    Dump,
    Snapshot,
    Remove { actor: String },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LocalAction {
    Help,
    Echo { text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParsedCommand {
    Local(LocalAction),
    Scene(SceneCommand),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CommandParseError {
    reason: String,
    usage: String,
}

impl CommandParseError {
    fn new(reason: impl Into<String>, usage: &str) -> Self {
        Self {
            reason: reason.into(),
            usage: usage.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum RegistryError {
    #[error("command name cannot be empty")]
    EmptyName,
    #[error("duplicate command registration: {name}")]
    Duplicate { name: String },
}

type ParseFn = dyn Fn(&[String]) -> Result<ParsedCommand, CommandParseError>;

struct CommandSpec {
    name: String,
    help: String,
    arg_schema: String,
    parse: Box<ParseFn>,
}

pub(crate) struct ConsoleCommandRegistry {
    specs: Vec<CommandSpec>,
    lookup_by_lower_name: HashMap<String, usize>,
}

type Builtin = (
    &'static str,
    &'static str,
    &'static str,
    fn(&[String]) -> Result<ParsedCommand, CommandParseError>,
);

const BUILTINS: [Builtin; 15] = [
    ("help", "List commands", "", parse_help_command),
    ("echo", "Print text to console", "<text...>", parse_echo_command),
    ("quit", "Tear down the scene and exit", "", parse_quit_command),
    (
        "advance",
        "Advance simulated time",
        "<ms:u64>",
        parse_advance_command,
    ),
    (
        "move",
        "Walk a cat to a point",
        "<actor> <x:f32> <y:f32>",
        parse_move_command,
    ),
    (
        "roam",
        "Start or stop autonomous roaming",
        "<start|stop> <actor>",
        parse_roam_command,
    ),
    (
        "action",
        "Dispatch a named action",
        "<name> <target:actor|both|all>",
        parse_action_command,
    ),
    (
        "touch",
        "Touch a body part",
        "<actor> <part:head|nose|belly|tail>",
        parse_touch_command,
    ),
    ("weather", "Cycle the weather", "", parse_weather_command),
    ("curtains", "Toggle the curtains", "", parse_curtains_command),
    ("lamp", "Toggle the lamp", "", parse_lamp_command),
    ("mute", "Toggle sound", "", parse_mute_command),
    ("dump", "Print actor and room state", "", parse_dump_command),
    (
        "snapshot",
        "Print actor and room state as JSON",
        "",
        parse_snapshot_command,
    ),
    (
        "remove",
        "Remove a cat from the scene",
        "<actor>",
        parse_remove_command,
    ),
];

impl ConsoleCommandRegistry {
    pub(crate) fn new() -> Self {
        Self {
            specs: Vec::new(),
            lookup_by_lower_name: HashMap::new(),
        }
    }

    pub(crate) fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for (name, help, arg_schema, parse) in BUILTINS {
            registry.register(name, help, arg_schema, parse)?;
        }
        Ok(registry)
    }

    pub(crate) fn register<F>(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        arg_schema: impl Into<String>,
        parse: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&[String]) -> Result<ParsedCommand, CommandParseError> + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let lower = name.to_ascii_lowercase();
        if self.lookup_by_lower_name.contains_key(&lower) {
            return Err(RegistryError::Duplicate { name });
        }

        self.specs.push(CommandSpec {
            name,
            help: help.into(),
            arg_schema: arg_schema.into(),
            parse: Box::new(parse),
        });
        self.lookup_by_lower_name
            .insert(lower, self.specs.len() - 1);
        Ok(())
    }

    fn lookup(&self, input_name: &str) -> Option<&CommandSpec> {
        let lower = input_name.to_ascii_lowercase();
        let index = self.lookup_by_lower_name.get(&lower)?;
        self.specs.get(*index)
    }

    pub(crate) fn iter_specs_in_order(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.specs.iter().map(|spec| {
            (
                spec.name.as_str(),
                spec.help.as_str(),
                spec.arg_schema.as_str(),
            )
        })
    }
}

pub(crate) struct ConsoleCommandProcessor {
    registry: ConsoleCommandRegistry,
}

impl ConsoleCommandProcessor {
    pub(crate) fn new() -> Result<Self, RegistryError> {
        Ok(Self {
            registry: ConsoleCommandRegistry::with_builtins()?,
        })
    }

    /// Parses one input line. Local commands and errors write to `out` directly;
    /// scene commands are handed back to the caller.
    pub(crate) fn process_line(
        &self,
        raw_line: &str,
        out: &mut Vec<String>,
    ) -> Option<SceneCommand> {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let tokens = match tokenize_line(trimmed) {
            Ok(tokens) => tokens,
            Err(reason) => {
                out.push(format!("error: {reason}. usage: help"));
                return None;
            }
        };
        let (command_name, args) = tokens.split_first()?;
        let Some(spec) = self.registry.lookup(command_name) else {
            out.push(format!(
                "error: unknown command '{}'. try: help",
                command_name
            ));
            return None;
        };

        match (spec.parse)(args) {
            Ok(ParsedCommand::Local(action)) => {
                self.apply_local_action(out, action);
                None
            }
            Ok(ParsedCommand::Scene(command)) => Some(command),
            Err(error) => {
                out.push(format!("error: {}. usage: {}", error.reason, error.usage));
                None
            }
        }
    }

    fn apply_local_action(&self, out: &mut Vec<String>, action: LocalAction) {
        match action {
            LocalAction::Help => {
                for (name, help, arg_schema) in self.registry.iter_specs_in_order() {
                    let line = if arg_schema.is_empty() {
                        format!("{name} - {help}")
                    } else {
                        format!("{name} {arg_schema} - {help}")
                    };
                    out.push(line);
                }
            }
            LocalAction::Echo { text } => out.push(text),
        }
    }
}

fn tokenize_line(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut seen_token_content = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                seen_token_content = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if seen_token_content {
                    tokens.push(std::mem::take(&mut current));
                    seen_token_content = false;
                }
            }
            _ => {
                current.push(ch);
                seen_token_content = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted string".to_string());
    }
    if seen_token_content {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_help_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "help")?;
    Ok(ParsedCommand::Local(LocalAction::Help))
}

fn parse_echo_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    if args.is_empty() {
        return Err(CommandParseError::new(
            "missing required argument <text...>",
            "echo <text...>",
        ));
    }
    Ok(ParsedCommand::Local(LocalAction::Echo {
        text: args.join(" "),
    }))
}

fn parse_quit_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "quit")?;
    Ok(ParsedCommand::Scene(SceneCommand::Quit))
}

fn parse_advance_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    const USAGE: &str = "advance <ms>";
    let [raw] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <ms>",
            USAGE,
        ));
    };
    let ms = raw.parse::<u64>().map_err(|_| {
        CommandParseError::new(format!("invalid duration '{raw}' (expected u64)"), USAGE)
    })?;
    if ms > MAX_ADVANCE_MS {
        return Err(CommandParseError::new(
            format!("duration {ms}ms exceeds limit of {MAX_ADVANCE_MS}ms"),
            USAGE,
        ));
    }
    Ok(ParsedCommand::Scene(SceneCommand::Advance { ms }))
}

fn parse_move_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    const USAGE: &str = "move <actor> <x> <y>";
    let [actor, raw_x, raw_y] = args else {
        return Err(CommandParseError::new("expected <actor> <x> <y>", USAGE));
    };
    let x = parse_coordinate(raw_x, "x", USAGE)?;
    let y = parse_coordinate(raw_y, "y", USAGE)?;
    Ok(ParsedCommand::Scene(SceneCommand::Move {
        actor: actor.clone(),
        x,
        y,
    }))
}

fn parse_coordinate(raw: &str, axis: &str, usage: &str) -> Result<f32, CommandParseError> {
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandParseError::new(
            format!("invalid {axis} coordinate '{raw}' (expected finite f32)"),
            usage,
        )),
    }
}

fn parse_roam_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    const USAGE: &str = "roam <start|stop> <actor>";
    let [raw_mode, actor] = args else {
        return Err(CommandParseError::new("expected <start|stop> <actor>", USAGE));
    };
    let mode = match raw_mode.to_ascii_lowercase().as_str() {
        "start" => RoamMode::Start,
        "stop" => RoamMode::Stop,
        _ => {
            return Err(CommandParseError::new(
                format!("unknown roam mode '{raw_mode}' (expected start|stop)"),
                USAGE,
            ));
        }
    };
    Ok(ParsedCommand::Scene(SceneCommand::Roam {
        mode,
        actor: actor.clone(),
    }))
}

// The action name is passed through unchecked so unknown names reach the scene's
// ignore-and-warn path.
fn parse_action_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    let [name, target] = args else {
        return Err(CommandParseError::new(
            "expected <name> <target>",
            "action <name> <target>",
        ));
    };
    Ok(ParsedCommand::Scene(SceneCommand::Action {
        name: name.clone(),
        target: target.clone(),
    }))
}

fn parse_touch_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    const USAGE: &str = "touch <actor> <part>";
    let [actor, raw_part] = args else {
        return Err(CommandParseError::new("expected <actor> <part>", USAGE));
    };
    let part = raw_part
        .parse::<BodyPart>()
        .map_err(|err| CommandParseError::new(err.to_string(), USAGE))?;
    Ok(ParsedCommand::Scene(SceneCommand::Touch {
        actor: actor.clone(),
        part,
    }))
}

fn parse_weather_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "weather")?;
    Ok(ParsedCommand::Scene(SceneCommand::Weather))
}

fn parse_curtains_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "curtains")?;
    Ok(ParsedCommand::Scene(SceneCommand::Curtains))
}

fn parse_lamp_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "lamp")?;
    Ok(ParsedCommand::Scene(SceneCommand::Lamp))
}

fn parse_mute_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "mute")?;
    Ok(ParsedCommand::Scene(SceneCommand::Mute))
}

fn parse_dump_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "dump")?;
    Ok(ParsedCommand::Scene(SceneCommand::Dump))
}

fn parse_snapshot_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    require_no_args(args, "snapshot")?;
    Ok(ParsedCommand::Scene(SceneCommand::Snapshot))
}

fn parse_remove_command(args: &[String]) -> Result<ParsedCommand, CommandParseError> {
    let [actor] = args else {
        return Err(CommandParseError::new(
            "expected exactly one argument <actor>",
            "remove <actor>",
        ));
    };
    Ok(ParsedCommand::Scene(SceneCommand::Remove {
        actor: actor.clone(),
    }))
}

fn require_no_args(args: &[String], usage: &str) -> Result<(), CommandParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandParseError::new("unexpected extra arguments", usage))
    }
}
