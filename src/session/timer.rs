use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingDelay {
    due: Instant,
    token: u64,
}

/// The single deferred turn callback a session can have outstanding.
///
/// Polled from the event loop tick. Firing hands back the token the delay was
/// scheduled with; the session decides whether that token is still current.
#[derive(Debug, Default)]
pub struct TurnTimer {
    pending: Option<PendingDelay>,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces anything already pending.
    pub fn schedule(&mut self, now: Instant, delay: Duration, token: u64) {
        self.pending = Some(PendingDelay {
            due: now + delay,
            token,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Token of the delay if it has come due. Fires at most once.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.token)
            }
            _ => None,
        }
    }
}
