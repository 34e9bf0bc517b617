//! Request Cancellation
//!
//! A `CancelScope` belongs to a component. Futures run through it are
//! abortable; when the component unmounts every outstanding one is
//! aborted and resolves to `AppError::Cancelled`.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{AbortHandle, Abortable};
use leptos::prelude::on_cleanup;

use crate::error::{AppError, AppResult};

#[derive(Default)]
struct ScopeState {
    next_id: u64,
    handles: Vec<(u64, AbortHandle)>,
    cancelled: bool,
}

#[derive(Clone, Default)]
pub struct CancelScope {
    state: Arc<Mutex<ScopeState>>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope cancelled when the current reactive owner is disposed
    pub fn for_component() -> Self {
        let scope = Self::new();
        scope.bind_to_owner();
        scope
    }

    pub fn bind_to_owner(&self) {
        let scope = self.clone();
        on_cleanup(move || scope.cancel_all());
    }

    fn lock(&self) -> MutexGuard<'_, ScopeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn run<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut state = self.lock();
            if state.cancelled {
                return Err(AppError::Cancelled);
            }
            state.next_id += 1;
            let id = state.next_id;
            state.handles.push((id, handle));
            id
        };

        let result = Abortable::new(fut, registration).await;
        self.lock().handles.retain(|(handle_id, _)| *handle_id != id);

        match result {
            Ok(inner) => inner,
            Err(_aborted) => Err(AppError::Cancelled),
        }
    }

    /// Abort everything in flight and refuse new work
    pub fn cancel_all(&self) {
        let handles = {
            let mut state = self.lock();
            state.cancelled = true;
            std::mem::take(&mut state.handles)
        };
        if !handles.is_empty() {
            tracing::debug!("[CANCEL] Aborting {} request(s)", handles.len());
        }
        for (_, handle) in handles {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    pub fn in_flight(&self) -> usize {
        self.lock().handles.len()
    }
}
