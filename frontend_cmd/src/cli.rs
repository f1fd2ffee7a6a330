//! Command line parsing
//!
//! Flags override the matching config file values; anything not given on the
//! command line keeps the file's (or the default) value.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use emu_frontend::config::{BackendKind, FrontendConfig};

/// Build the argument parser
pub fn command() -> Command {
    Command::new("frontend_cmd")
        .about("Opens the emulator window, creates its GL contexts and presents frames")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file (.toml or .ron)"),
        )
        .arg(
            Arg::new("backend")
                .short('b')
                .long("backend")
                .value_name("BACKEND")
                .help("Window system backend: glfw or headless"),
        )
        .arg(
            Arg::new("fullscreen")
                .short('f')
                .long("fullscreen")
                .action(ArgAction::SetTrue)
                .help("Start in fullscreen"),
        )
        .arg(
            Arg::new("debug-context")
                .long("debug-context")
                .action(ArgAction::SetTrue)
                .help("Request debug GL contexts"),
        )
        .arg(
            Arg::new("vsync")
                .long("vsync")
                .value_name("on|off")
                .value_parser(["on", "off"])
                .help("Sync buffer swaps to the display refresh"),
        )
        .arg(
            Arg::new("frames")
                .long("frames")
                .value_name("COUNT")
                .help("Close the headless window after this many swaps"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("FILTER")
                .help("Default log filter when RUST_LOG is unset (e.g. debug, emu_frontend=trace)"),
        )
}

/// Parsed command line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub backend: Option<BackendKind>,
    pub fullscreen: bool,
    pub debug_context: bool,
    pub vsync: Option<bool>,
    pub frames: Option<u64>,
    pub log_level: Option<String>,
}

impl CliOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let backend = matches
            .get_one::<String>("backend")
            .map(|name| name.parse::<BackendKind>().map_err(|e| anyhow!(e)))
            .transpose()?;

        let frames = matches
            .get_one::<String>("frames")
            .map(|count| count.parse::<u64>().context("Invalid frame count"))
            .transpose()?;

        Ok(Self {
            config: matches.get_one::<String>("config").map(PathBuf::from),
            backend,
            fullscreen: matches.get_flag("fullscreen"),
            debug_context: matches.get_flag("debug-context"),
            vsync: matches.get_one::<String>("vsync").map(|value| value == "on"),
            frames,
            log_level: matches.get_one::<String>("log-level").cloned(),
        })
    }

    /// Apply command line overrides on top of a loaded config
    pub fn apply(&self, config: &mut FrontendConfig) {
        if let Some(backend) = self.backend {
            config.renderer.backend = backend;
        }
        if self.fullscreen {
            config.window.fullscreen = true;
        }
        if self.debug_context {
            config.renderer.debug_context = true;
        }
        if let Some(vsync) = self.vsync {
            config.renderer.use_vsync = vsync;
        }
        if let Some(frames) = self.frames {
            config.headless.close_after_swaps = Some(frames);
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions> {
        let matches = command().try_get_matches_from(args)?;
        CliOptions::from_matches(&matches)
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let options = parse(&["frontend_cmd"]).unwrap();
        assert_eq!(options, CliOptions::default());

        let mut config = FrontendConfig::default();
        options.apply(&mut config);
        assert_eq!(config, FrontendConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let options = parse(&[
            "frontend_cmd",
            "--backend",
            "headless",
            "--fullscreen",
            "--vsync",
            "off",
            "--frames",
            "30",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let mut config = FrontendConfig::default();
        options.apply(&mut config);

        assert_eq!(config.renderer.backend, BackendKind::Headless);
        assert!(config.window.fullscreen);
        assert!(!config.renderer.use_vsync);
        assert!(!config.renderer.debug_context);
        assert_eq!(config.headless.close_after_swaps, Some(30));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(parse(&["frontend_cmd", "--backend", "vulkan"]).is_err());
        assert!(parse(&["frontend_cmd", "--frames", "many"]).is_err());
        assert!(parse(&["frontend_cmd", "--vsync", "maybe"]).is_err());
    }
}
