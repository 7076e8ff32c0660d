//! Fetch coordination for cached view state
//!
//! Each data flow (gem list, gem detail, usage windows) owns one
//! [`FetchSlot`]. Beginning a fetch aborts the previous in-flight one for
//! the same slot, and a superseded or cancelled fetch can never commit its
//! result, so stale responses never reach cached state.

use std::future::Future;

use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use parking_lot::Mutex;

/// Single-flow cancellation slot with latest-wins commit semantics
pub struct FetchSlot {
    inner: Mutex<SlotState>,
}

struct SlotState {
    generation: u64,
    in_flight: Option<AbortHandle>,
}

/// Permission to run one fetch, minted by [`FetchSlot::begin`]
pub struct FetchTicket {
    generation: u64,
    registration: AbortRegistration,
}

impl FetchSlot {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotState {
                generation: 0,
                in_flight: None,
            }),
        }
    }

    /// Abort any in-flight fetch and mint a ticket for a new one
    pub fn begin(&self) -> FetchTicket {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.in_flight.take() {
            handle.abort();
        }
        inner.generation += 1;
        let (handle, registration) = AbortHandle::new_pair();
        inner.in_flight = Some(handle);
        FetchTicket {
            generation: inner.generation,
            registration,
        }
    }

    /// Abort any in-flight fetch and invalidate outstanding tickets
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.in_flight.take() {
            handle.abort();
        }
        inner.generation += 1;
    }

    /// Drive `fut` to completion under `ticket`.
    ///
    /// Returns `None` when the fetch was aborted or superseded before its
    /// result could be committed; the caller must not touch cached state in
    /// that case.
    pub async fn run<F, T>(&self, ticket: FetchTicket, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let FetchTicket {
            generation,
            registration,
        } = ticket;

        let value = match Abortable::new(fut, registration).await {
            Ok(value) => value,
            Err(Aborted) => return None,
        };

        // Commit only when no newer fetch started while this one ran.
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            return None;
        }
        inner.in_flight = None;
        Some(value)
    }
}

impl Default for FetchSlot {
    fn default() -> Self {
        Self::new()
    }
}
