//! Key events to tone playback.
//!
//! Producers (a keyboard hook, a MIDI bridge, a test) push [`KeyEvent`]s
//! through a [`KeySender`]. A single [`Dispatcher`] drains the matching
//! [`EventQueue`], resolves each pressed key to a tone via the
//! [`KeyLayout`], fetches the buffer from a [`ToneCache`] and hands it to a
//! [`PlaybackSink`].

use std::collections::HashSet;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, SendError, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::WaveformBuffer;
use crate::cache::ToneCache;
use crate::error::{EngineError, EngineResult};
use crate::tone::{PatternKind, ToneSpec};

/// Middle C, the note of the first key.
pub const DEFAULT_BASE_FREQUENCY: f64 = 261.63;

/// Key codes in QWERTY row order: digits, then the three letter rows.
pub const QWERTY_KEYS: [&str; 36] = [
    "Digit1", "Digit2", "Digit3", "Digit4", "Digit5", "Digit6", "Digit7", "Digit8", "Digit9",
    "Digit0", "KeyQ", "KeyW", "KeyE", "KeyR", "KeyT", "KeyY", "KeyU", "KeyI", "KeyO", "KeyP",
    "KeyA", "KeyS", "KeyD", "KeyF", "KeyG", "KeyH", "KeyJ", "KeyK", "KeyL", "KeyZ", "KeyX", "KeyC",
    "KeyV", "KeyB", "KeyN", "KeyM",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    Press,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub fn press(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyEventKind::Press,
        }
    }

    pub fn release(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: KeyEventKind::Release,
        }
    }
}

/// Assigns ascending equal-tempered notes to an ordered list of keys.
///
/// Key `i` plays `base_frequency * 2^(i / 12)`; every key shares the same
/// harmonic count, length and pattern kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayout {
    keys: Vec<String>,
    base_frequency: f64,
    harmonics: u32,
    duration: f64,
    kind: PatternKind,
}

impl KeyLayout {
    /// Assigns ascending equal-tempered notes to `keys` in order.
    ///
    /// # Arguments
    /// * `keys` - Key codes, lowest note first
    /// * `base_frequency` - Frequency of the first key in Hz
    /// * `harmonics` - Overtones per tone
    /// * `duration` - Tone length in seconds
    /// * `kind` - Pattern kind shared by every key
    ///
    /// # Errors
    /// [`EngineError::InvalidParameter`] for an empty or duplicated key list,
    /// and [`EngineError::InvalidToneSpec`] if any key's tone is invalid.
    pub fn new(
        keys: Vec<String>,
        base_frequency: f64,
        harmonics: u32,
        duration: f64,
        kind: PatternKind,
    ) -> EngineResult<Self> {
        if keys.is_empty() {
            return Err(EngineError::invalid_param("keys", "layout has no keys"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = keys.iter().find(|key| !seen.insert(key.as_str())) {
            return Err(EngineError::invalid_param(
                "keys",
                format!("key '{dup}' appears more than once"),
            ));
        }

        let layout = Self {
            keys,
            base_frequency,
            harmonics,
            duration,
            kind,
        };
        for (_, spec) in layout.tones() {
            spec.validate()?;
        }
        Ok(layout)
    }

    /// The 36-key QWERTY layout starting at `base_frequency`.
    pub fn qwerty(
        base_frequency: f64,
        harmonics: u32,
        duration: f64,
        kind: PatternKind,
    ) -> EngineResult<Self> {
        let keys = QWERTY_KEYS.iter().map(|k| k.to_string()).collect();
        Self::new(keys, base_frequency, harmonics, duration, kind)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    pub fn frequency_for(&self, key: &str) -> Option<f64> {
        let index = self.keys.iter().position(|k| k == key)?;
        Some(self.note_frequency(index))
    }

    pub fn tone_for(&self, key: &str) -> Option<ToneSpec> {
        self.frequency_for(key).map(|f| self.spec(f))
    }

    /// Every key with its tone, in layout order.
    pub fn tones(&self) -> impl Iterator<Item = (&str, ToneSpec)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), self.spec(self.note_frequency(i))))
    }

    fn note_frequency(&self, index: usize) -> f64 {
        self.base_frequency * 2f64.powf(index as f64 / 12.0)
    }

    fn spec(&self, frequency: f64) -> ToneSpec {
        ToneSpec::new(frequency, self.harmonics, self.duration, self.kind)
    }
}

/// Creates a bounded event queue holding at most `capacity` pending events.
///
/// # Arguments
/// * `capacity` - Pending events before `send` blocks and `try_send` drops;
///   `0` makes every send a rendezvous with the dispatcher
pub fn event_queue(capacity: usize) -> (KeySender, EventQueue) {
    let (tx, rx) = bounded(capacity);
    (KeySender { tx }, EventQueue { rx })
}

/// Producer handle; clone one per input source.
#[derive(Debug, Clone)]
pub struct KeySender {
    tx: Sender<KeyEvent>,
}

impl KeySender {
    /// Queues an event, waiting while the queue is full.
    ///
    /// # Errors
    /// Returns the event if the dispatcher has gone away.
    pub fn send(&self, event: KeyEvent) -> Result<(), SendError<KeyEvent>> {
        self.tx.send(event)
    }

    /// Queues an event if there is room. Returns `false` if it was dropped.
    pub fn try_send(&self, event: KeyEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                debug!(key = %event.key, "event queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                debug!(key = %event.key, "event queue closed, dropping event");
                false
            }
        }
    }
}

/// Consumer side of [`event_queue`].
#[derive(Debug)]
pub struct EventQueue {
    rx: Receiver<KeyEvent>,
}

impl EventQueue {
    /// Next event, or `None` once every sender is dropped and the queue is
    /// drained.
    pub fn recv(&self) -> Option<KeyEvent> {
        self.rx.recv().ok()
    }

    /// Next event if one is already waiting.
    pub fn try_recv(&self) -> Option<KeyEvent> {
        self.rx.try_recv().ok()
    }
}

/// Whatever actually makes sound.
pub trait PlaybackSink {
    /// Starts playing `buffer` for `key`.
    fn note_on(&mut self, key: &str, buffer: Arc<WaveformBuffer>);

    /// Stops whatever `key` is playing.
    fn note_off(&mut self, key: &str);
}

/// What [`Dispatcher::process`] did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Started,
    Stopped,
    /// Unmapped key, repeated press, or release of a key not held.
    Ignored,
}

/// Event counts from [`Dispatcher::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub started: usize,
    pub stopped: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Single consumer turning key events into sink calls.
///
/// A key is held from its first press until its release; presses while it
/// is held produce nothing, so each key has at most one note sounding.
pub struct Dispatcher<S> {
    layout: KeyLayout,
    cache: Arc<dyn ToneCache>,
    sink: S,
    held: HashSet<String>,
}

impl<S: PlaybackSink> Dispatcher<S> {
    pub fn new(layout: KeyLayout, cache: Arc<dyn ToneCache>, sink: S) -> Self {
        Self {
            layout,
            cache,
            sink,
            held: HashSet::new(),
        }
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Handles one event.
    ///
    /// # Errors
    /// Synthesis errors from the cache. The key is left released.
    pub fn process(&mut self, event: &KeyEvent) -> EngineResult<Dispatch> {
        match event.kind {
            KeyEventKind::Press => self.press(&event.key),
            KeyEventKind::Release => Ok(self.release(&event.key)),
        }
    }

    /// Drains `queue` until every sender is gone. Failed presses are logged
    /// and counted, and never stop the loop.
    pub fn run(&mut self, queue: &EventQueue) -> DispatchStats {
        let mut stats = DispatchStats::default();
        while let Some(event) = queue.recv() {
            match self.process(&event) {
                Ok(Dispatch::Started) => stats.started += 1,
                Ok(Dispatch::Stopped) => stats.stopped += 1,
                Ok(Dispatch::Ignored) => stats.ignored += 1,
                Err(err) => {
                    warn!(key = %event.key, error = %err, "failed to start note");
                    stats.failed += 1;
                }
            }
        }
        stats
    }

    fn press(&mut self, key: &str) -> EngineResult<Dispatch> {
        if self.held.contains(key) {
            return Ok(Dispatch::Ignored);
        }
        let Some(spec) = self.layout.tone_for(key) else {
            debug!(key, "no tone mapped to key");
            return Ok(Dispatch::Ignored);
        };

        let buffer = self.cache.get_or_create(&spec)?;
        self.held.insert(key.to_string());
        self.sink.note_on(key, buffer);
        Ok(Dispatch::Started)
    }

    fn release(&mut self, key: &str) -> Dispatch {
        if self.held.remove(key) {
            self.sink.note_off(key);
            Dispatch::Stopped
        } else {
            Dispatch::Ignored
        }
    }
}
