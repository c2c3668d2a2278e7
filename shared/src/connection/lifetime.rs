use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Owned by whoever controls a connection. Dropping or cancelling it
/// invalidates every [`LifetimeToken`] handed out for that connection.
pub struct ConnectionLifetime {
    cancelled: Arc<AtomicBool>,
}

impl Default for ConnectionLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionLifetime {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn token(&self) -> LifetimeToken {
        LifetimeToken {
            cancelled: self.cancelled.clone(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for ConnectionLifetime {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Carried by a suspended continuation so it can tell whether the
/// connection it belongs to still exists
#[derive(Clone, Debug)]
pub struct LifetimeToken {
    cancelled: Arc<AtomicBool>,
}

impl LifetimeToken {
    pub fn is_live(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
    }
}
