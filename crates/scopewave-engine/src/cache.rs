//! Memoized tone synthesis.
//!
//! Each distinct [`ToneSpec`] is synthesized at most once per cache and the
//! resulting buffer is shared through an `Arc`. Entries are never evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, trace};

use crate::buffer::WaveformBuffer;
use crate::error::EngineResult;
use crate::tone::{ToneRenderer, ToneSpec};

/// Lookup-or-synthesize access to tone buffers.
pub trait ToneCache: Send + Sync {
    /// Returns the buffer for `spec`, synthesizing it on first request.
    ///
    /// A failed synthesis is reported and not remembered, so a later call
    /// for the same spec tries again.
    ///
    /// # Errors
    /// [`InvalidToneSpec`](crate::EngineError::InvalidToneSpec) for an
    /// invalid spec, or whatever the renderer reports.
    fn get_or_create(&self, spec: &ToneSpec) -> EngineResult<Arc<WaveformBuffer>>;

    /// Number of stored buffers.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

type Slot = Arc<Mutex<Option<Arc<WaveformBuffer>>>>;

/// Unbounded in-memory cache in front of a [`ToneRenderer`].
///
/// The map lock is held only long enough to find or insert a key's slot;
/// synthesis runs under that slot's own lock. Concurrent first requests for
/// one key therefore synthesize once, while other keys proceed in parallel.
pub struct MemoryToneCache<R> {
    renderer: R,
    slots: Mutex<HashMap<ToneSpec, Slot>>,
    stored: AtomicUsize,
}

impl<R: ToneRenderer> MemoryToneCache<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            slots: Mutex::new(HashMap::new()),
            stored: AtomicUsize::new(0),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn slot(&self, spec: &ToneSpec) -> Slot {
        let mut slots = lock(&self.slots);
        Arc::clone(slots.entry(*spec).or_default())
    }

    /// Whether `slot` is still the map's slot for `spec`.
    fn is_current(&self, spec: &ToneSpec, slot: &Slot) -> bool {
        lock(&self.slots)
            .get(spec)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Drops the empty slot left behind by a failed synthesis.
    fn evict(&self, spec: &ToneSpec, slot: &Slot) {
        let mut slots = lock(&self.slots);
        if slots.get(spec).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(spec);
        }
    }
}

impl<R: ToneRenderer> ToneCache for MemoryToneCache<R> {
    fn get_or_create(&self, spec: &ToneSpec) -> EngineResult<Arc<WaveformBuffer>> {
        spec.validate()?;

        loop {
            let slot = self.slot(spec);
            let mut entry = lock(&slot);
            if let Some(buffer) = entry.as_ref() {
                trace!(tone = %spec, "tone cache hit");
                return Ok(Arc::clone(buffer));
            }
            // evicted by a failed attempt while this caller waited
            if !self.is_current(spec, &slot) {
                continue;
            }

            info!(tone = %spec, "synthesizing tone");
            let buffer = match self.renderer.render_tone(spec) {
                Ok(buffer) => Arc::new(buffer),
                Err(err) => {
                    self.evict(spec, &slot);
                    return Err(err);
                }
            };
            *entry = Some(Arc::clone(&buffer));
            self.stored.fetch_add(1, Ordering::Relaxed);
            return Ok(buffer);
        }
    }

    fn len(&self) -> usize {
        self.stored.load(Ordering::Relaxed)
    }
}

impl<R: ToneRenderer> std::fmt::Debug for MemoryToneCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryToneCache")
            .field("stored", &self.len())
            .finish_non_exhaustive()
    }
}

/// A panic while synthesizing leaves the slot empty, which is still valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
