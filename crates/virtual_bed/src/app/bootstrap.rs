use std::env;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use pet_engine::{load_scene_config, random_source_for, CatScene, SceneConfig, SceneConfigError};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::console::RegistryError;
use super::feedback;

const SCENE_CONFIG_ENV_VAR: &str = "VIRTUAL_BED_SCENE_CONFIG";
const SEED_ENV_VAR: &str = "VIRTUAL_BED_SEED";

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    SceneConfig(#[from] SceneConfigError),
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("VIRTUAL_BED_SEED must be an unsigned integer (got '{raw}'): {source}")]
    InvalidSeed {
        raw: String,
        #[source]
        source: ParseIntError,
    },
    #[error("failed to open command script '{}': {source}", .path.display())]
    OpenScript {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read console input: {0}")]
    ReadInput(#[source] io::Error),
    #[error("failed to write console output: {0}")]
    WriteOutput(#[source] io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputSource {
    Stdin,
    Script(PathBuf),
}

pub(crate) struct AppWiring {
    pub(crate) scene: CatScene,
    pub(crate) tick_ms: u64,
    pub(crate) input: InputSource,
}

pub(crate) fn build_app() -> Result<AppWiring, AppError> {
    init_tracing();
    info!("=== Virtual Bed Startup ===");

    let mut config = match read_env(SCENE_CONFIG_ENV_VAR)? {
        Some(raw_path) => {
            let path = PathBuf::from(raw_path);
            info!(path = %path.display(), "scene_config_loading");
            load_scene_config(&path)?
        }
        None => SceneConfig::default(),
    };
    if let Some(raw) = read_env(SEED_ENV_VAR)? {
        config.seed = Some(parse_seed(&raw)?);
    }

    let scene = CatScene::new(
        &config,
        random_source_for(config.seed),
        feedback::logging_hooks(),
    )?;
    let input = input_source_from_args(env::args_os().skip(1).map(PathBuf::from));
    info!(
        actors = scene.actor_count(),
        seed = ?config.seed,
        tick_ms = config.tick_ms,
        input = ?input,
        "scene_ready"
    );

    Ok(AppWiring {
        scene,
        tick_ms: config.tick_ms,
        input,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn read_env(var: &'static str) -> Result<Option<String>, AppError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(AppError::EnvVar { var, source }),
    }
}

fn parse_seed(raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|source| AppError::InvalidSeed {
            raw: raw.to_string(),
            source,
        })
}

fn input_source_from_args(mut args: impl Iterator<Item = PathBuf>) -> InputSource {
    match args.next() {
        Some(path) if path.as_os_str() != "-" => InputSource::Script(path),
        _ => InputSource::Stdin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parses_with_surrounding_whitespace() {
        assert_eq!(parse_seed(" 42 \n").expect("seed"), 42);
    }

    #[test]
    fn bad_seed_reports_raw_value() {
        let err = parse_seed("-3").expect_err("negative seed");
        assert!(matches!(err, AppError::InvalidSeed { ref raw, .. } if raw == "-3"));
        assert!(err.to_string().starts_with("VIRTUAL_BED_SEED must be an unsigned integer"));
    }

    #[test]
    fn first_argument_selects_script_input() {
        assert_eq!(
            input_source_from_args(std::iter::empty()),
            InputSource::Stdin
        );
        assert_eq!(
            input_source_from_args([PathBuf::from("-")].into_iter()),
            InputSource::Stdin
        );
        assert_eq!(
            input_source_from_args([PathBuf::from("night.txt")].into_iter()),
            InputSource::Script(PathBuf::from("night.txt"))
        );
    }
}
