/// In-process content store with switchable failures.
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ContentStore, StoreError};
use crate::types::CardContent;

pub struct MemoryContentStore {
    content: Mutex<CardContent>,
    fail_fetch: AtomicBool,
    fail_replace: AtomicBool,
    fetch_calls: AtomicUsize,
    replace_calls: AtomicUsize,
}

impl MemoryContentStore {
    pub fn new(content: CardContent) -> Self {
        Self {
            content: Mutex::new(content),
            fail_fetch: AtomicBool::new(false),
            fail_replace: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            replace_calls: AtomicUsize::new(0),
        }
    }

    /// Make subsequent fetches answer 503.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent replaces answer 503.
    pub fn set_fail_replace(&self, fail: bool) {
        self.fail_replace.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls.load(Ordering::SeqCst)
    }

    /// Current stored document.
    pub fn content(&self) -> CardContent {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

fn unavailable() -> StoreError {
    StoreError::Status {
        status: 503,
        body: "store unavailable".to_string(),
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch(&self) -> Result<CardContent, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.content())
    }

    async fn replace(&self, content: &CardContent) -> Result<(), StoreError> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        *self.content.lock().unwrap_or_else(|e| e.into_inner()) = content.clone();
        Ok(())
    }
}
