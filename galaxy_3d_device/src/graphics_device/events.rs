/// Device lifecycle notifications
///
/// Listeners subscribe to one event kind and are called in subscription order.

use std::time::Duration;
use slotmap::{new_key_type, SlotMap};
use crate::graphics_device::{RenderTargetKey, ShaderKey};

new_key_type! {
    /// Handle returned by `subscribe`, used to unsubscribe
    pub struct ListenerKey;
}

/// Kind of a [`DeviceEvent`], used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceEventKind {
    Destroy,
    ShaderDestroyed,
    RenderTargetCreated,
    Resize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The device is being destroyed. Fired once, before resources are released.
    Destroy,
    ShaderDestroyed(ShaderKey),
    /// A render target got its backend framebuffer
    RenderTargetCreated {
        target: RenderTargetKey,
        /// Time the backend spent building it
        elapsed: Duration,
    },
    /// The back buffer resolution changed
    Resize { width: u32, height: u32 },
}

impl DeviceEvent {
    pub fn kind(&self) -> DeviceEventKind {
        match self {
            DeviceEvent::Destroy => DeviceEventKind::Destroy,
            DeviceEvent::ShaderDestroyed(_) => DeviceEventKind::ShaderDestroyed,
            DeviceEvent::RenderTargetCreated { .. } => DeviceEventKind::RenderTargetCreated,
            DeviceEvent::Resize { .. } => DeviceEventKind::Resize,
        }
    }
}

type Listener = Box<dyn FnMut(&DeviceEvent) + Send>;

#[derive(Default)]
pub struct EventDispatcher {
    listeners: SlotMap<ListenerKey, (DeviceEventKind, Listener)>,
    /// Subscription order
    order: Vec<ListenerKey>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: DeviceEventKind, listener: F) -> ListenerKey
    where
        F: FnMut(&DeviceEvent) + Send + 'static,
    {
        let key = self.listeners.insert((kind, Box::new(listener)));
        self.order.push(key);
        key
    }

    /// Returns false if the key was not subscribed
    pub fn unsubscribe(&mut self, key: ListenerKey) -> bool {
        if self.listeners.remove(key).is_none() {
            return false;
        }
        self.order.retain(|k| *k != key);
        true
    }

    /// Deliver `event` to every listener of its kind, in subscription order
    pub fn fire(&mut self, event: &DeviceEvent) {
        let kind = event.kind();
        for key in &self.order {
            if let Some((listener_kind, listener)) = self.listeners.get_mut(*key) {
                if *listener_kind == kind {
                    listener(event);
                }
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
