/// Shared editor bound to a content store.
///
/// The editor lock is never held across a store call: each async operation
/// takes a ticket, releases the lock, awaits the store, and re-locks to finish.
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::Editor;
use crate::error::EditorError;
use crate::store::ContentStore;

pub struct EditorHandle<S: ContentStore + ?Sized> {
    editor: Arc<Mutex<Editor>>,
    store: Arc<S>,
}

impl<S: ContentStore + ?Sized> Clone for EditorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            editor: self.editor.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S: ContentStore + ?Sized> EditorHandle<S> {
    pub fn new(editor: Editor, store: Arc<S>) -> Self {
        Self {
            editor: Arc::new(Mutex::new(editor)),
            store,
        }
    }

    /// Exclusive access for synchronous edits.
    pub async fn lock(&self) -> MutexGuard<'_, Editor> {
        self.editor.lock().await
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Fetch the document; also used for user-initiated retry after an error.
    pub async fn load(&self) -> Result<(), EditorError> {
        let ticket = self.editor.lock().await.begin_load();
        let result = self.store.fetch().await;
        self.editor.lock().await.finish_load(ticket, result)
    }

    /// Write the working copy. Returns `Ok(false)` when nothing was sent
    /// (clean document or another apply in flight).
    pub async fn apply_changes(&self) -> Result<bool, EditorError> {
        let Some(ticket) = self.editor.lock().await.begin_apply() else {
            return Ok(false);
        };
        let result = self.store.replace(ticket.document()).await;
        self.editor.lock().await.finish_apply(ticket, result)?;
        Ok(true)
    }

    pub async fn discard_changes(&self) {
        self.editor.lock().await.discard_changes();
    }

    /// Tear down: results of requests still in flight are ignored.
    pub async fn close(&self) {
        self.editor.lock().await.close();
    }
}
