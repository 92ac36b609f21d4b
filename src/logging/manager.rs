//! Process-wide registry of named loggers plus one default logger.
//!
//! Deliberately decoupled from configuration loading: the registry itself
//! can be constructed and exercised in tests without touching the
//! filesystem. The default logger is built lazily, from `log_config.conf`,
//! the first time it's asked for.

use super::logger::{Logger, LoggerBuilder};
use ahash::AHashMap;
use arc_swap::ArcSwapOption;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;

pub struct Manager {
    loggers: Mutex<AHashMap<String, Arc<Logger>>>,
    default: ArcSwapOption<Logger>,
}

impl Manager {
    fn new() -> Self {
        Manager { loggers: Mutex::new(AHashMap::new()), default: ArcSwapOption::from(None) }
    }

    pub fn global() -> &'static Manager {
        static INSTANCE: OnceCell<Manager> = OnceCell::new();
        INSTANCE.get_or_init(Manager::new)
    }

    pub fn register(&self, name: impl Into<String>, logger: Logger) -> Arc<Logger> {
        let logger = Arc::new(logger);
        self.loggers.lock().insert(name.into(), Arc::clone(&logger));
        logger
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().get(name).cloned()
    }

    /// Returns the default logger, building a stdout-only one on first use
    /// if nothing was ever installed with [`Manager::set_default`]. Uses a
    /// compare-and-swap rather than a lock so readers never block on the
    /// (rare, one-time) construction.
    pub fn default_logger(&self) -> Arc<Logger> {
        if let Some(existing) = self.default.load_full() {
            return existing;
        }
        let built = Arc::new(LoggerBuilder::new("default").build());
        self.default.compare_and_swap(&None::<Arc<Logger>>, Some(built));
        self.default.load_full().expect("just installed")
    }

    /// Installs `logger` as the default iff one hasn't been installed yet.
    pub fn set_default(&self, logger: Logger) -> Result<(), ()> {
        let logger = Arc::new(logger);
        let prev = self.default.compare_and_swap(&None::<Arc<Logger>>, Some(logger));
        if prev.is_none() {
            Ok(())
        } else {
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup_round_trips() {
        let manager = Manager::new();
        let logger = LoggerBuilder::new("svc").build();
        manager.register("svc", logger);
        assert!(manager.get("svc").is_some());
        assert!(manager.get("missing").is_none());
    }

    #[test]
    fn default_logger_is_lazy_and_stable() {
        let manager = Manager::new();
        let a = manager.default_logger();
        let b = manager.default_logger();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
