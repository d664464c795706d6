//! Invariant checking hooks for zones and their sub-structures.
//!
//! Surgery primitives leave the zone in a state that later primitives rely
//! on (range ordering, patch integrity). The orchestrator calls
//! [`debug_invariants!`](crate::debug_invariants) after each state transition;
//! the check compiles away in release builds unless one of the
//! `check-invariants` / `strict-invariants` features is enabled.

use crate::mesh_error::MeshSurgeryError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// Validate invariants and return the first error encountered.
    fn validate_invariants(&self) -> Result<(), MeshSurgeryError>;

    /// Validate and log which step broke the structure.
    fn validate_after(&self, step: &str) -> Result<(), MeshSurgeryError> {
        self.validate_invariants().inspect_err(|e| {
            log::error!("invariant violated after {step}: {e}");
        })
    }
}

/// Run a fallible check and panic on error when invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
