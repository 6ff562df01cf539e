//! Publish-once holder for the browser handle.

use std::sync::{Arc, OnceLock};

use crate::error::BridgeError;

/// Shared slot for the single browser instance
///
/// The main thread publishes the handle once after the browser is created;
/// the bridge thread only reads it. Clones share the same slot.
#[derive(Debug)]
pub struct BrowserSlot<T> {
    inner: Arc<OnceLock<T>>,
}

impl<T> BrowserSlot<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(OnceLock::new()),
        }
    }

    /// Publish the browser handle. Only one browser may ever be published.
    pub fn publish(&self, browser: T) -> Result<(), BridgeError> {
        self.inner
            .set(browser)
            .map_err(|_| BridgeError::AlreadyPublished)
    }

    pub fn get(&self) -> Option<&T> {
        self.inner.get()
    }

    pub fn is_published(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl<T> Clone for BrowserSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for BrowserSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_once() {
        let slot = BrowserSlot::new();
        assert!(!slot.is_published());

        slot.publish(7u32).unwrap();
        assert_eq!(slot.get(), Some(&7));

        let err = slot.publish(8).unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyPublished));
        assert_eq!(slot.get(), Some(&7));
    }

    #[test]
    fn test_clones_share_the_handle() {
        let slot = BrowserSlot::new();
        let reader = slot.clone();
        assert!(reader.get().is_none());

        slot.publish("browser").unwrap();
        assert_eq!(reader.get(), Some(&"browser"));
    }
}
