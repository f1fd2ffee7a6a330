//! Command-line frontend
//!
//! Builds the window manager on the main thread, hands the shared context to
//! a stand-in core thread and presents until the window is closed. Any fatal
//! construction error is logged with the step that failed and exits with
//! status 1.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use emu_frontend::backend::{GlfwWindowSystem, HeadlessWindowSystem};
use emu_frontend::config::{BackendKind, Config, FrontendConfig};
use emu_frontend::foundation::logging;
use emu_frontend::present::FrameMailbox;
use emu_frontend::window::{WindowManager, WindowSystem};
use emu_frontend::{BuildInfo, FrontendError};

mod cli;
mod core_thread;

use cli::CliOptions;
use core_thread::CoreThread;

fn main() {
    let matches = cli::command().get_matches();
    if let Err(err) = run(&matches) {
        report_fatal(&err);
        std::process::exit(1);
    }
}

/// Log the fatal diagnostic, bringing up a logger first if startup failed before one existed
fn report_fatal(err: &anyhow::Error) -> String {
    logging::init("info");

    let message = match err.downcast_ref::<FrontendError>() {
        Some(fatal) => format!("Fatal error during {}: {:#}", fatal.step(), err),
        None => format!("Fatal error: {:#}", err),
    };
    log::error!("{}", message);
    message
}

fn run(matches: &ArgMatches) -> Result<()> {
    let options = CliOptions::from_matches(matches)?;

    // Logging comes up before the config error is reported, so the failure is visible
    let loaded = load_config(&options);
    let level = options
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|config| config.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    logging::init(&level);

    let mut config = loaded?;
    options.apply(&mut config);

    match config.renderer.backend {
        BackendKind::Glfw => run_with(GlfwWindowSystem::new()?, &config),
        BackendKind::Headless => {
            run_with(HeadlessWindowSystem::new(config.headless.clone()), &config)
        }
    }
}

fn load_config(options: &CliOptions) -> Result<FrontendConfig> {
    match &options.config {
        Some(path) => FrontendConfig::load_from_file(path)
            .map_err(FrontendError::from)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(FrontendConfig::default()),
    }
}

fn run_with<W: WindowSystem>(system: W, config: &FrontendConfig) -> Result<()> {
    let build = BuildInfo::current();
    let mut manager = WindowManager::new(system, config, &build)?;

    let core_context = manager
        .take_core_context()
        .ok_or_else(|| anyhow!("core context missing after construction"))?;
    let mailbox = Arc::new(FrameMailbox::new());
    let core = CoreThread::spawn(core_context, Arc::clone(&mailbox))
        .context("Failed to spawn core thread")?;

    let presented = manager.present(&*mailbox);

    // The core's context must be gone before the primary context is destroyed
    let published = core.stop();
    let stats = presented?;
    drop(manager);

    let traffic = mailbox.stats();
    log::info!(
        "Core published {} frames: {} presented in {} iterations, {} replaced",
        published,
        traffic.presented,
        stats.iterations,
        traffic.dropped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> Result<()> {
        let matches = cli::command().try_get_matches_from(args)?;
        run(&matches)
    }

    #[test]
    fn test_bad_backend_is_reported() {
        let err = run_args(&["frontend_cmd", "--backend", "vulkan"]).unwrap_err();
        let message = report_fatal(&err);
        assert!(message.starts_with("Fatal error"));
        assert!(message.contains("vulkan"));
    }

    #[test]
    fn test_bad_frame_count_is_reported() {
        let err = run_args(&["frontend_cmd", "--frames", "many"]).unwrap_err();
        assert!(report_fatal(&err).contains("Invalid frame count"));
    }

    #[test]
    fn test_config_failure_names_step_and_path() {
        let err = run_args(&["frontend_cmd", "--config", "/nonexistent/frontend.toml"]).unwrap_err();
        let message = report_fatal(&err);
        assert!(message.starts_with("Fatal error during configuration:"));
        assert!(message.contains("/nonexistent/frontend.toml"));
    }

    #[test]
    fn test_headless_run_exits_cleanly() {
        let result = run_args(&[
            "frontend_cmd",
            "--backend",
            "headless",
            "--vsync",
            "off",
            "--frames",
            "5",
        ]);
        assert!(result.is_ok());
    }
}
