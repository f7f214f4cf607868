//! Settings shared between commands.

use super::Host;
use camino::Utf8Path;
use clap::ValueEnum;
use std::io::{IsTerminal, Write};

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    /// Whether to emit ANSI styling on a stream.
    pub fn use_colors(self, stream: &impl IsTerminal) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stream.is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize the logger based on log level. `RUST_LOG` takes precedence when set.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A logger may already be installed when commands run more than once in a process
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Load variables from a `.env` file into the process environment.
///
/// Without a path, `.env` is looked up in the current directory and its parents. A
/// missing file is fine; one that exists but cannot be read is reported as a warning.
pub fn load_env_file<H: Host>(host: &mut H, path: Option<&Utf8Path>) {
    let result = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };

    if let Err(e) = result {
        if !e.not_found() {
            let _ = writeln!(host.error(), "warning: ignoring unreadable .env file: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    fn test_missing_env_file_is_silent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let mut host = TestHost::new();

        load_env_file(&mut host, Some(&dir.join(".env")));
        assert!(host.error_str().is_empty());
    }

    #[test]
    fn test_unreadable_env_file_warns_through_host() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        let mut host = TestHost::new();

        // A directory exists but cannot be read as a file
        load_env_file(&mut host, Some(dir));
        assert!(host.error_str().contains("warning: ignoring unreadable .env file"), "got: {}", host.error_str());
        assert!(host.output_str().is_empty());
    }

    #[test]
    fn test_explicit_color_modes_ignore_terminal() {
        let sink = std::io::stdout();
        assert!(ColorMode::Always.use_colors(&sink));
        assert!(!ColorMode::Never.use_colors(&sink));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(LogLevel::Warn);
        init_logging(LogLevel::Debug);
        init_logging(LogLevel::None);
    }
}
