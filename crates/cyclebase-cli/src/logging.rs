//! A stdout logger that honours `RUST_LOG` directives but opens up while a
//! log burst has raised the global level.

use env_logger::{Builder, Env, Logger, Target};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

pub struct BurstLogger {
    // the RUST_LOG directives, in effect while no burst is active
    configured: Logger,
    // lets everything through, filtering is left to log::max_level()
    open: Logger,
    base: LevelFilter,
}

impl BurstLogger {
    pub fn from_env() -> Self {
        let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
        builder.target(Target::Stdout);
        Self::new(builder.build())
    }

    pub fn new(configured: Logger) -> Self {
        let open = Builder::new()
            .filter_level(LevelFilter::Trace)
            .target(Target::Stdout)
            .build();
        BurstLogger {
            base: configured.filter(),
            configured,
            open,
        }
    }

    /// The most verbose level any directive allows.
    pub fn base(&self) -> LevelFilter {
        self.base
    }

    /// Install as the global logger, with the max level set from the
    /// directives.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let base = self.base();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(base);
        Ok(())
    }

    // A burst that did not change the global level (because a directive
    // already allows debug) keeps the directives in place.
    fn select(&self, max: LevelFilter) -> &Logger {
        if max > self.base {
            &self.open
        } else {
            &self.configured
        }
    }
}

impl Log for BurstLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.select(log::max_level()).enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        self.select(log::max_level()).log(record)
    }

    fn flush(&self) {
        self.configured.flush();
        self.open.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn logger(filters: &str) -> BurstLogger {
        BurstLogger::new(Builder::new().parse_filters(filters).build())
    }

    fn meta(target: &'static str, level: Level) -> Metadata<'static> {
        Metadata::builder().target(target).level(level).build()
    }

    #[test]
    fn directives_are_kept_without_a_burst() {
        let l = logger("cyclebase=debug,warn");
        assert_eq!(l.base(), LevelFilter::Debug);

        let active = l.select(LevelFilter::Debug);
        assert!(active.enabled(&meta("cyclebase::burst", Level::Debug)));
        assert!(active.enabled(&meta("other", Level::Warn)));
        assert!(!active.enabled(&meta("other", Level::Info)));
    }

    #[test]
    fn raised_level_opens_every_target() {
        let l = logger("info");
        assert_eq!(l.base(), LevelFilter::Info);
        assert!(!l.select(LevelFilter::Info).enabled(&meta("other", Level::Debug)));
        assert!(l.select(LevelFilter::Debug).enabled(&meta("other", Level::Debug)));

        // back at the configured level, the directives apply again
        assert!(!l.select(LevelFilter::Info).enabled(&meta("other", Level::Debug)));
    }
}
