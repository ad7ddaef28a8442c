mod bootstrap;
mod console;
mod feedback;
mod loop_runner;
mod session;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
