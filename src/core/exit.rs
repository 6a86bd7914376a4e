//! Shutdown handlers run before a Fatal event terminates the process

use parking_lot::Mutex;
use std::sync::Arc;

/// Called with the exit code; the default is `std::process::exit`
pub type ExitFunc = Arc<dyn Fn(i32) + Send + Sync>;

type Handler = Box<dyn Fn() + Send + Sync>;

pub(crate) fn default_exit_func() -> ExitFunc {
    Arc::new(|code| std::process::exit(code))
}

/// Handlers run in registration order, each isolated from the others' panics
#[derive(Default)]
pub(crate) struct ExitHandlers {
    handlers: Mutex<Vec<Handler>>,
}

impl ExitHandlers {
    pub(crate) fn register(&self, handler: Handler) {
        self.handlers.lock().push(handler);
    }

    pub(crate) fn run(&self) {
        let handlers = self.handlers.lock();
        for (idx, handler) in handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler()));
            if let Err(panic_info) = result {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER ERROR] Exit handler #{} panicked: {}. Remaining handlers still run.",
                    idx, panic_msg
                );
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_handlers_run_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let handlers = ExitHandlers::default();
        for i in 0..3 {
            let order = Arc::clone(&order);
            handlers.register(Box::new(move || order.lock().push(i)));
        }
        handlers.run();
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert_eq!(handlers.len(), 3);
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let ran = Arc::new(AtomicUsize::new(0));
        let handlers = ExitHandlers::default();
        handlers.register(Box::new(|| panic!("flush failed")));
        let ran_clone = Arc::clone(&ran);
        handlers.register(Box::new(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        }));

        handlers.run();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
