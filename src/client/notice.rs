//! Transient, auto-dismissing error notice

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_millis(3000);

#[derive(Clone)]
pub struct Notice {
    slot: Arc<Mutex<Option<(u64, String)>>>,
    next_id: Arc<AtomicU64>,
    ttl: Duration,
}

impl Notice {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    /// Show `message` until the ttl elapses.
    ///
    /// A newer message replaces the current one and gets its own full ttl;
    /// the older timer then expires without touching it.
    pub fn show(&self, message: impl Into<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some((id, message.into()));

        let slot = self.slot.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut current = slot.lock().unwrap_or_else(|e| e.into_inner());
            if matches!(current.as_ref(), Some((shown, _)) if *shown == id) {
                *current = None;
            }
        });
    }

    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn current(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, message)| message.clone())
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
