//! Test-only utilities for safely mutating process-global state in tests.

/// RAII guard over a set of environment variables.
///
/// Every variable touched through the guard is restored to its previous value
/// (or removed if it was unset) when the guard is dropped. Pair with
/// `#[serial(env)]` since the process environment is shared.
#[derive(Default)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    /// Create an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `val` for the lifetime of the guard.
    #[must_use]
    pub fn set(mut self, key: &'static str, val: &str) -> Self {
        self.remember(key);
        // SAFETY: callers serialize env-mutating tests with #[serial(env)]
        unsafe { std::env::set_var(key, val) };
        self
    }

    /// Remove `key` for the lifetime of the guard.
    #[must_use]
    pub fn remove(mut self, key: &'static str) -> Self {
        self.remember(key);
        // SAFETY: callers serialize env-mutating tests with #[serial(env)]
        unsafe { std::env::remove_var(key) };
        self
    }

    fn remember(&mut self, key: &'static str) {
        if !self.saved.iter().any(|(k, _)| *k == key) {
            self.saved.push((key, std::env::var(key).ok()));
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, prev) in self.saved.drain(..).rev() {
            match prev {
                // SAFETY: see `set`
                Some(v) => unsafe { std::env::set_var(key, v) },
                // SAFETY: see `remove`
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
