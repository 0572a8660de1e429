use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared liveness flag. Cloned into workers; cancelling any clone cancels all of them.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel this token and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether any clone has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Negation of [`CancellationToken::is_cancelled`].
    pub fn is_live(&self) -> bool {
        !self.is_cancelled()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/cancel.rs"]
mod tests;
