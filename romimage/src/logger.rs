#[cfg(feature = "tui")]
use core::time::Duration;
use std::{
    borrow::Cow,
    fmt::Display,
};

use colored::Colorize;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};

#[cfg(feature = "tui")]
const ANIMATION: &[&str; 9] = &[".  ", ".. ", "...", " ..", "  .", " ..", "...", "..", ""];

#[cfg(not(feature = "tui"))]
const ANIMATION: &[&str; 2] = &["...", ""];

/// Where the log lines end up
enum Sink {
    /// Printed above a spinner so they don't tear its animation
    Spinner(ProgressBar),
    /// One line per message on stderr
    Stderr,
    /// Dropped
    Quiet,
}

/// Terminal output for the ROM builder and `makerom`.
///
/// Only [`Logger::set_title`] starts an animation (and with it indicatif's ticker thread),
/// the ROM builder itself never calls it.
/// When stderr is not a terminal the spinner is hidden and messages go to stderr as plain lines.
pub struct Logger {
    sink: Sink,
    running: bool,
    prefix: Option<String>,
}

impl Logger {
    /// A logger with a spinner that can be animated with [`Logger::set_title`]
    pub fn spinner() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{prefix:.green/yellow} {msg} {spinner}") {
            bar.set_style(style.tick_strings(ANIMATION));
        }
        bar.set_prefix("[rom]");
        Self::with_sink(Sink::Spinner(bar))
    }

    /// A logger that writes plain lines to stderr
    pub fn plain() -> Self {
        Self::with_sink(Sink::Stderr)
    }

    /// A logger that swallows every message
    pub fn quiet() -> Self {
        Self::with_sink(Sink::Quiet)
    }

    fn with_sink(sink: Sink) -> Self {
        Self {
            sink,
            running: false,
            prefix: None,
        }
    }

    pub fn set_prefix<S: Into<String>>(&mut self, prefix: S) {
        self.prefix = Some(prefix.into());
    }

    pub fn clear_prefix(&mut self) {
        self.prefix = None;
    }

    pub fn set_title(&mut self, title: impl Into<Cow<'static, str>>) {
        if let Sink::Spinner(bar) = &self.sink {
            #[cfg(feature = "tui")]
            if !self.running && !bar.is_hidden() {
                bar.enable_steady_tick(Duration::from_millis(100));
                self.running = true;
            }
            bar.set_message(title.into());
        }
    }

    /// Whether the spinner animation is running
    pub fn is_animated(&self) -> bool {
        self.running
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;

            if let Sink::Spinner(bar) = &self.sink {
                bar.finish_and_clear();
            }
        }
    }

    /// A hidden spinner would silently drop `println`, so those lines go to stderr directly
    fn prints_to_stderr(&self) -> bool {
        match &self.sink {
            Sink::Spinner(bar) => bar.is_hidden(),
            Sink::Stderr => true,
            Sink::Quiet => false,
        }
    }

    fn format<L: Display>(&self, level: L, msg: &str) -> String {
        if let Some(prefix) = &self.prefix {
            format!("{} {}{}{} {}", level, "(".bold(), prefix.bold(), ")".bold(), msg)
        } else {
            format!("{} {}", level, msg)
        }
    }

    fn emit<L: Display, S: AsRef<str>>(&self, level: L, msg: S) {
        match &self.sink {
            Sink::Quiet => {},
            Sink::Spinner(bar) if !self.prints_to_stderr() => bar.println(self.format(level, msg.as_ref())),
            _ => eprintln!("{}", self.format(level, msg.as_ref())),
        }
    }

    pub fn info<S: AsRef<str>>(&self, msg: S) {
        self.emit("[rom::INFO]".blue().bold(), msg);
    }

    pub fn warning<S: AsRef<str>>(&self, msg: S) {
        self.emit("[rom::WARN]".yellow().bold(), msg);
    }

    pub fn debug<S: AsRef<str>>(&self, _msg: S) {
        #[cfg(debug_assertions)]
        {
            self.emit("[rom::DEBUG]".black().on_white(), _msg);
        }
    }

    pub fn error<S: AsRef<str>>(&self, msg: S) {
        self.emit("[rom::ERROR]".red().bold(), msg);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}
