//! Observer primitives for snapshot streams.
//!
//! A stream adapter wraps its callback in a [`DeliveryGate`] and hands the
//! caller a [`Subscription`]. Once [`Subscription::unsubscribe`] returns, the
//! gate is closed and no further callback runs, even if the underlying
//! listener is still delivering on another thread.
//!
//! 观察者原语：取消订阅返回后不会再有任何回调。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Serializes deliveries against closing.
#[derive(Debug)]
pub struct DeliveryGate {
    open: AtomicBool,
    lock: Mutex<()>,
}

impl DeliveryGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            open: AtomicBool::new(true),
            lock: Mutex::new(()),
        })
    }

    /// Run `f` if the gate is still open. Returns whether it ran.
    pub fn deliver<F: FnOnce()>(&self, f: F) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.open.load(Ordering::Acquire) {
            return false;
        }
        f();
        true
    }

    /// Close the gate, waiting for an in-flight delivery to finish.
    ///
    /// Must not be called from inside a delivery on the same gate.
    pub fn close(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.open.store(false, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

type Disposer = Box<dyn FnOnce() + Send>;

/// Disposer for a snapshot stream. Unsubscribes on drop.
pub struct Subscription {
    gate: Arc<DeliveryGate>,
    disposer: Mutex<Option<Disposer>>,
}

impl Subscription {
    pub fn new(gate: Arc<DeliveryGate>, disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            gate,
            disposer: Mutex::new(Some(Box::new(disposer))),
        }
    }

    /// A subscription that never delivers (used when registration failed).
    pub fn inert() -> Self {
        let gate = DeliveryGate::new();
        gate.close();
        Self {
            gate,
            disposer: Mutex::new(None),
        }
    }

    /// Stop delivery and release the underlying listener. Idempotent.
    pub fn unsubscribe(&self) {
        self.gate.close();
        let disposer = self
            .disposer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(dispose) = disposer {
            dispose();
        }
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_open()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
