//! In-memory implementation of `ProjectStore`.
//!
//! `InMemoryProjectStore` publishes every mutation on a `tokio::sync::watch`
//! channel, so a UI (or a test) can re-render from the latest project
//! without polling.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use quill_contracts::project::{ChapterId, Project};

use crate::traits::ProjectStore;

/// A project held in memory, with change notification.
pub struct InMemoryProjectStore {
    project: watch::Sender<Project>,
    selected: Mutex<Option<ChapterId>>,
}

impl InMemoryProjectStore {
    pub fn new(project: Project) -> Self {
        let (project, _) = watch::channel(project);
        Self { project, selected: Mutex::new(None) }
    }

    /// Receive a notification after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Project> {
        self.project.subscribe()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn snapshot(&self) -> Project {
        self.project.borrow().clone()
    }

    fn apply(&self, update: &mut dyn FnMut(&mut Project)) {
        self.project.send_modify(|project| update(project));
    }

    fn selected_chapter(&self) -> Option<ChapterId> {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn select_chapter(&self, id: Option<ChapterId>) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = id;
    }
}
