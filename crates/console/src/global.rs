//! Process-wide console.
//!
//! Nothing is created at load time: call [`init`] (or [`init_default`]) once
//! during startup, then reach the instance through [`with`].

use std::cell::Cell;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::console::Console;
use crate::error::ConsoleError;

static GLOBAL: OnceLock<Mutex<Console>> = OnceLock::new();

thread_local! {
    static IN_USE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the global as held by the current thread until dropped.
struct UseGuard;

impl UseGuard {
    fn acquire() -> Result<Self, ConsoleError> {
        if IN_USE.replace(true) {
            return Err(ConsoleError::ReentrantAccess);
        }
        Ok(UseGuard)
    }
}

impl Drop for UseGuard {
    fn drop(&mut self) {
        IN_USE.set(false);
    }
}

/// Installs `console` as the process-wide instance.
pub fn init(console: Console) -> Result<(), ConsoleError> {
    GLOBAL
        .set(Mutex::new(console))
        .map_err(|_| ConsoleError::AlreadyInitialized)?;
    tracing::debug!("global console initialized");
    Ok(())
}

/// Installs a console on the process's standard streams.
pub fn init_default() -> Result<(), ConsoleError> {
    init(Console::stdio())
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Runs `f` with exclusive access to the process-wide console.
///
/// Other threads block until `f` returns. Calling `with` again from inside
/// `f` fails with [`ConsoleError::ReentrantAccess`].
pub fn with<R>(f: impl FnOnce(&mut Console) -> R) -> Result<R, ConsoleError> {
    let console = GLOBAL.get().ok_or(ConsoleError::NotInitialized)?;
    let _in_use = UseGuard::acquire()?;
    let mut guard = console.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(f(&mut guard))
}
