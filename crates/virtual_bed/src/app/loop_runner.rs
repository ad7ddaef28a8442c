use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

use tracing::{error, info};

use super::bootstrap::{AppError, AppWiring, InputSource};
use super::console::ConsoleCommandProcessor;
use super::session::{Session, SessionFlow};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_console(app) {
        error!(error = %err, "console_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run_console(app: AppWiring) -> Result<(), AppError> {
    let processor = ConsoleCommandProcessor::new()?;
    let input = open_input(&app.input)?;
    let mut session = Session::new(app.scene, app.tick_ms);
    session.mount();

    let stdout = io::stdout();
    let mut output = stdout.lock();
    drive(&processor, &mut session, input, &mut output)
}

fn open_input(source: &InputSource) -> Result<Box<dyn BufRead>, AppError> {
    match source {
        InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
        InputSource::Script(path) => {
            let file = File::open(path).map_err(|source| AppError::OpenScript {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "script_opened");
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Feeds every input line through the console until `quit` or end of input.
/// The scene is torn down on the way out whether or not the loop failed.
fn drive<R: BufRead, W: Write>(
    processor: &ConsoleCommandProcessor,
    session: &mut Session,
    input: R,
    output: &mut W,
) -> Result<(), AppError> {
    let result = pump_lines(processor, session, input, output);
    session.shutdown();
    result
}

fn pump_lines<R: BufRead, W: Write>(
    processor: &ConsoleCommandProcessor,
    session: &mut Session,
    input: R,
    output: &mut W,
) -> Result<(), AppError> {
    let mut pending_output = Vec::new();
    for line in input.lines() {
        let line = line.map_err(AppError::ReadInput)?;
        let flow = match processor.process_line(&line, &mut pending_output) {
            Some(command) => session.apply(command, &mut pending_output),
            None => SessionFlow::Continue,
        };
        for text in pending_output.drain(..) {
            writeln!(output, "{text}").map_err(AppError::WriteOutput)?;
        }
        if flow == SessionFlow::Quit {
            break;
        }
    }
    output.flush().map_err(AppError::WriteOutput)
}
