//! Level hooks: observers fired synchronously before an entry is written
//!
//! Hooks for a level run in registration order. The first hook that fails
//! stops the chain for that event; the logger reports the error and still
//! writes the entry.
//!
//! Hooks run while the logger lock is held. A hook must not log through the
//! same logger, or it will deadlock.

use super::entry::Entry;
use super::error::{BoxError, LoggerError, Result};
use super::log_level::LogLevel;
use std::collections::HashMap;
use std::sync::Arc;

pub trait Hook: Send + Sync {
    /// Levels this hook wants to observe
    fn levels(&self) -> Vec<LogLevel>;

    /// Observe (and optionally enrich) an entry about to be written
    fn fire(&self, entry: &mut Entry) -> std::result::Result<(), BoxError>;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Hooks registered per level
#[derive(Clone, Default)]
pub struct LevelHooks {
    hooks: HashMap<LogLevel, Vec<Arc<dyn Hook>>>,
}

impl LevelHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under every level it declares
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        for level in hook.levels() {
            self.hooks.entry(level).or_default().push(Arc::clone(&hook));
        }
    }

    /// Run the hooks registered at `level`, stopping at the first error
    pub fn fire(&self, level: LogLevel, entry: &mut Entry) -> Result<()> {
        let Some(chain) = self.hooks.get(&level) else {
            return Ok(());
        };

        for hook in chain {
            hook.fire(entry)
                .map_err(|e| LoggerError::hook(hook.name(), e))?;
        }
        Ok(())
    }

    /// Number of hooks registered at `level`
    pub fn len_at(&self, level: LogLevel) -> usize {
        self.hooks.get(&level).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.values().all(Vec::is_empty)
    }
}

impl std::fmt::Debug for LevelHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for level in LogLevel::ALL {
            if let Some(chain) = self.hooks.get(&level) {
                let names: Vec<&str> = chain.iter().map(|h| h.name()).collect();
                map.entry(&level, &names);
            }
        }
        map.finish()
    }
}

type HookFn = dyn Fn(&mut Entry) -> std::result::Result<(), BoxError> + Send + Sync;

/// A hook built from a closure
pub struct FnHook {
    name: String,
    levels: Vec<LogLevel>,
    callback: Box<HookFn>,
}

impl FnHook {
    pub fn new<F>(name: impl Into<String>, levels: &[LogLevel], callback: F) -> Self
    where
        F: Fn(&mut Entry) -> std::result::Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            levels: levels.to_vec(),
            callback: Box::new(callback),
        }
    }
}

impl Hook for FnHook {
    fn levels(&self) -> Vec<LogLevel> {
        self.levels.clone()
    }

    fn fire(&self, entry: &mut Entry) -> std::result::Result<(), BoxError> {
        (self.callback)(entry)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::Logger;
    use parking_lot::Mutex;

    fn recording_hook(
        name: &'static str,
        levels: &[LogLevel],
        log: &Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    ) -> Arc<dyn Hook> {
        let log = Arc::clone(log);
        Arc::new(FnHook::new(name, levels, move |_entry| {
            log.lock().push(name);
            if fail {
                Err(format!("{} failed", name).into())
            } else {
                Ok(())
            }
        }))
    }

    #[test]
    fn test_add_registers_each_declared_level() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = LevelHooks::new();
        hooks.add(recording_hook(
            "errors",
            &[LogLevel::Error, LogLevel::Fatal],
            &calls,
            false,
        ));

        assert_eq!(hooks.len_at(LogLevel::Error), 1);
        assert_eq!(hooks.len_at(LogLevel::Fatal), 1);
        assert_eq!(hooks.len_at(LogLevel::Info), 0);
    }

    #[test]
    fn test_fire_in_registration_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = LevelHooks::new();
        hooks.add(recording_hook("first", &[LogLevel::Info], &calls, false));
        hooks.add(recording_hook("second", &[LogLevel::Info], &calls, false));
        hooks.add(recording_hook("third", &[LogLevel::Info], &calls, false));

        let mut entry = Entry::new(&Logger::new());
        hooks.fire(LogLevel::Info, &mut entry).unwrap();

        assert_eq!(*calls.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_first_error_short_circuits() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = LevelHooks::new();
        hooks.add(recording_hook("first", &[LogLevel::Warn], &calls, false));
        hooks.add(recording_hook("broken", &[LogLevel::Warn], &calls, true));
        hooks.add(recording_hook("skipped", &[LogLevel::Warn], &calls, false));

        let mut entry = Entry::new(&Logger::new());
        let err = hooks.fire(LogLevel::Warn, &mut entry).unwrap_err();

        assert!(matches!(err, LoggerError::HookFailed { ref hook, .. } if hook == "broken"));
        assert_eq!(*calls.lock(), vec!["first", "broken"]);
    }

    #[test]
    fn test_fire_without_hooks_is_ok() {
        let hooks = LevelHooks::new();
        let mut entry = Entry::new(&Logger::new());
        assert!(hooks.is_empty());
        assert!(hooks.fire(LogLevel::Debug, &mut entry).is_ok());
    }
}
