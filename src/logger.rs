//! Logging and verbosity control.
//!
//! Three levels: quiet (artifact paths only), normal (progress messages,
//! the default), verbose (elapsed-time prefixed, colored).

use std::sync::OnceLock;
use std::time::Instant;

/// Verbosity level for controlling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Only produced file paths.
    Quiet,
    /// Progress messages without prefixes (default).
    Normal,
    /// Timestamped colored logs with details.
    Verbose,
}

static LOGGER: OnceLock<Logger> = OnceLock::new();
static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Thread-safe logger controlling application output.
#[derive(Debug)]
pub struct Logger {
    level: VerbosityLevel,
    colors_enabled: bool,
}

impl Logger {
    /// Initialize the global logger.
    ///
    /// # Panics
    /// Panics if called more than once.
    pub fn init(level: VerbosityLevel, no_color: bool) {
        let colors_enabled = !no_color
            && std::env::var("NO_COLOR").is_err()
            && atty::is(atty::Stream::Stdout);

        START_TIME.set(Instant::now()).ok();
        LOGGER
            .set(Logger {
                level,
                colors_enabled,
            })
            .expect("Logger already initialized");
    }

    /// Get the global logger instance.
    ///
    /// # Panics
    /// Panics if the logger hasn't been initialized.
    pub fn instance() -> &'static Logger {
        LOGGER.get().expect("Logger not initialized")
    }

    fn elapsed(&self) -> f64 {
        START_TIME
            .get()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Returns true if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.level == VerbosityLevel::Quiet
    }

    fn prefixed(&self, level: &str, msg: &str) {
        let elapsed = self.elapsed();
        if self.colors_enabled {
            let color = match level {
                "ERROR" => "\x1b[31m",
                "INFO" => "\x1b[34m",
                "DEBUG" => "\x1b[90m",
                _ => "",
            };
            println!(
                "\x1b[90m[{:.2}s]\x1b[0m {}[{}]\x1b[0m {}",
                elapsed, color, level, msg
            );
        } else {
            println!("[{:.2}s] [{}] {}", elapsed, level, msg);
        }
    }

    /// Log an error message (always displayed, on stderr).
    pub fn error(&self, msg: &str) {
        if self.level == VerbosityLevel::Verbose {
            let elapsed = self.elapsed();
            if self.colors_enabled {
                eprintln!(
                    "\x1b[90m[{:.2}s]\x1b[0m \x1b[31m[ERROR]\x1b[0m {}",
                    elapsed, msg
                );
            } else {
                eprintln!("[{:.2}s] [ERROR] {}", elapsed, msg);
            }
        } else {
            eprintln!("Error: {}", msg);
        }
    }

    /// Log an info message (normal mode and above).
    pub fn info(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => println!("{}", msg),
            VerbosityLevel::Verbose => self.prefixed("INFO", msg),
        }
    }

    /// Log a debug message (verbose mode only).
    pub fn debug(&self, msg: &str) {
        if self.level == VerbosityLevel::Verbose {
            self.prefixed("DEBUG", msg);
        }
    }

    /// Announce a produced artifact path (quiet mode prints the bare path).
    pub fn output(&self, path: &str) {
        match self.level {
            VerbosityLevel::Quiet => println!("{}", path),
            VerbosityLevel::Normal => println!("Saved: {}", path),
            VerbosityLevel::Verbose => self.prefixed("INFO", &format!("Saved: {}", path)),
        }
    }
}

/// Log an error message (always displayed).
pub fn error(msg: &str) {
    Logger::instance().error(msg);
}

/// Log an info message (normal mode and above).
pub fn info(msg: &str) {
    Logger::instance().info(msg);
}

/// Log a debug message (verbose mode only).
pub fn debug(msg: &str) {
    Logger::instance().debug(msg);
}

/// Announce a produced artifact path.
pub fn output(path: &str) {
    Logger::instance().output(path);
}

/// Returns true if quiet mode is enabled.
pub fn is_quiet() -> bool {
    Logger::instance().is_quiet()
}
