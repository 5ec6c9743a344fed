//! Minimal stderr sink for the `log` facade, with colored level prefixes.
use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

struct StderrLogger {
    level: LevelFilter,
}

fn level_color(level: Level) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match level {
        Level::Error => spec.set_fg(Some(Color::Red)).set_bold(true),
        Level::Warn => spec.set_fg(Some(Color::Yellow)).set_bold(true),
        Level::Info => spec.set_fg(Some(Color::Green)),
        Level::Debug => spec.set_fg(Some(Color::Cyan)),
        Level::Trace => spec.set_dimmed(true),
    };
    spec
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut stderr = StandardStream::stderr(ColorChoice::Auto);
        // Logging must never take the process down
        let _ = stderr.set_color(&level_color(record.level()));
        let _ = write!(stderr, "{:>5}", record.level());
        let _ = stderr.reset();
        let _ = writeln!(stderr, " [{}] {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Map the number of `-v` flags to a level filter.
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger; a second call is a no-op.
pub fn init(level: LevelFilter) {
    if log::set_boxed_logger(Box::new(StderrLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
