use core::fmt::{self, Write};
use kernel_sync::SpinLock;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A [`Log`] backend that formats records into any [`fmt::Write`] sink.
///
/// Lines look like `[INFO] kernel_alloc::subsystem: message`.
pub struct ConsoleLogger<W> {
    max_level: LevelFilter,
    sink: SpinLock<W>,
}

impl<W> ConsoleLogger<W> {
    #[must_use]
    pub const fn new(sink: W, max_level: LevelFilter) -> Self {
        Self {
            max_level,
            sink: SpinLock::new(sink),
        }
    }

    #[must_use]
    pub const fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Run `f` with exclusive access to the sink, e.g. to print unformatted
    /// banners between log lines.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        self.sink.with_lock(f)
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}

impl<W: Write + Send + 'static> ConsoleLogger<W> {
    /// Install as the global logger. Call this once during early init.
    ///
    /// # Errors
    /// Fails if a logger has already been installed.
    pub fn init(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(self.max_level);
        Ok(())
    }
}

impl<W: Write + Send> Log for ConsoleLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Best effort; a failing sink has nowhere to report to.
        let _ = self.sink.with_lock(|sink| write_record(sink, record));
    }

    fn flush(&self) {}
}

fn write_record(sink: &mut impl Write, record: &Record) -> fmt::Result {
    writeln!(sink, "[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn emit(logger: &ConsoleLogger<String>, level: Level, target: &str, msg: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{msg}"))
                .build(),
        );
    }

    #[test]
    fn formats_level_target_and_message() {
        let logger = ConsoleLogger::new(String::new(), LevelFilter::Trace);
        emit(&logger, Level::Info, "kernel_alloc::subsystem", "memory ready");
        emit(&logger, Level::Warn, "kernel_alloc::frame_alloc", "exhausted");
        assert_eq!(
            logger.into_inner(),
            "[INFO] kernel_alloc::subsystem: memory ready\n\
             [WARN] kernel_alloc::frame_alloc: exhausted\n"
        );
    }

    #[test]
    fn records_above_max_level_are_dropped() {
        let logger = ConsoleLogger::new(String::new(), LevelFilter::Info);
        emit(&logger, Level::Trace, "kernel_alloc::bump_heap", "reserved 16 bytes");
        emit(&logger, Level::Debug, "kernel", "noise");
        emit(&logger, Level::Error, "kernel", "boom");
        assert_eq!(logger.into_inner(), "[ERROR] kernel: boom\n");
    }

    #[test]
    fn off_filter_disables_everything() {
        let logger = ConsoleLogger::new(String::new(), LevelFilter::Off);
        assert!(!logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert_eq!(logger.max_level(), LevelFilter::Off);
    }

    #[test]
    fn with_sink_shares_the_guarded_writer() {
        let logger = ConsoleLogger::new(String::new(), LevelFilter::Info);
        logger.with_sink(|s| s.push_str("banner\n"));
        emit(&logger, Level::Info, "kernel", "after");
        assert_eq!(logger.into_inner(), "banner\n[INFO] kernel: after\n");
    }
}
