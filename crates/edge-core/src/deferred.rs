//! Two-phase values resolved by a later stage.

use crate::error::{CoreError, CoreResult};

/// A value that a later stage produces and an earlier-declared consumer reads.
///
/// The slot starts pending and is resolved exactly once. Reading a pending
/// slot is a dependency order violation rather than a silent default, so a
/// consumer can never observe a placeholder.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    label: &'static str,
    value: Option<T>,
}

impl<T> Deferred<T> {
    /// Create a pending slot. The label names the value in errors.
    pub fn pending(label: &'static str) -> Self {
        Self { label, value: None }
    }

    /// Resolve the slot with the produced value.
    pub fn resolve(&mut self, value: T) -> CoreResult<()> {
        if self.value.is_some() {
            return Err(CoreError::AlreadyResolved(self.label));
        }
        self.value = Some(value);
        Ok(())
    }

    /// Read the resolved value.
    pub fn get(&self) -> CoreResult<&T> {
        self.value.as_ref().ok_or(CoreError::Unresolved(self.label))
    }

    /// Whether the producing stage has completed.
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// Name of the deferred value.
    pub fn label(&self) -> &'static str {
        self.label
    }
}
