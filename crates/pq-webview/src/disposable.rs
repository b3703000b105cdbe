//! Releasable resources owned by a panel.

use crate::error::HostError;
use log::warn;

/// One-shot release action, e.g. an event listener registration.
///
/// Releasing consumes the value, so each resource is released at most once.
pub struct Disposable {
    release: Box<dyn FnOnce() -> Result<(), HostError>>,
}

impl Disposable {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() -> Result<(), HostError> + 'static,
    {
        Self {
            release: Box::new(release),
        }
    }

    /// A disposable that releases nothing.
    pub fn noop() -> Self {
        Self::new(|| Ok(()))
    }

    pub fn dispose(self) -> Result<(), HostError> {
        (self.release)()
    }
}

impl std::fmt::Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Disposable")
    }
}

/// Ordered collection of disposables released together.
#[derive(Debug, Default)]
pub struct DisposableStore {
    items: Vec<Disposable>,
}

impl DisposableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, disposable: Disposable) {
        self.items.push(disposable);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Release everything, newest first. Returns the number of failed releases.
    ///
    /// A failure is logged and never stops the remaining releases.
    pub fn dispose_all(&mut self) -> usize {
        let mut failures = 0;
        while let Some(item) = self.items.pop() {
            if let Err(e) = item.dispose() {
                warn!("Failed to release resource: {}", e);
                failures += 1;
            }
        }
        failures
    }
}
