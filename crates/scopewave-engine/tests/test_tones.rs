//! Tone synthesis and caching integration tests.

use std::sync::Arc;

use scopewave_engine::keyboard::{event_queue, Dispatcher, KeyEvent, KeyLayout, PlaybackSink};
use scopewave_engine::{
    EngineConfig, HarmonicToneSynthesizer, MemoryToneCache, PatternKind, ToneCache, ToneSpec,
    WaveformBuffer,
};

#[test]
fn test_a440_xy_tone() {
    let synth = HarmonicToneSynthesizer::from_config(&EngineConfig::default());
    let buffer = synth
        .synthesize(&ToneSpec::new(440.0, 3, 1.0, PatternKind::Xy))
        .unwrap();

    assert_eq!(buffer.len(), 44100);
    assert!((buffer.peak() - 0.3).abs() < 1e-9);
    assert_ne!(buffer.x(), buffer.y());
}

#[test]
fn test_many_harmonics_stay_in_range() {
    let mut config = EngineConfig::default();
    config.tone.amplitude = 1.0;
    config.tone.dither_std = 0.01;

    let synth = HarmonicToneSynthesizer::from_config(&config);
    let buffer = synth
        .synthesize(&ToneSpec::new(55.0, 200, 0.25, PatternKind::Simple))
        .unwrap();
    assert!(buffer
        .x()
        .iter()
        .chain(buffer.y())
        .all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn test_cache_shares_buffers_between_threads() {
    let cache = Arc::new(MemoryToneCache::new(HarmonicToneSynthesizer::from_config(
        &EngineConfig::default(),
    )));
    let spec = ToneSpec::new(523.25, 2, 0.1, PatternKind::Xy);

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.get_or_create(&spec).unwrap())
        })
        .collect();
    let buffers: Vec<Arc<WaveformBuffer>> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    assert_eq!(cache.len(), 1);
    assert!(buffers.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[derive(Default)]
struct Held(Vec<String>);

impl PlaybackSink for Held {
    fn note_on(&mut self, key: &str, _buffer: Arc<WaveformBuffer>) {
        self.0.push(key.to_string());
    }

    fn note_off(&mut self, key: &str) {
        self.0.retain(|k| k != key);
    }
}

#[test]
fn test_dispatcher_plays_through_cache() {
    let cache = Arc::new(MemoryToneCache::new(HarmonicToneSynthesizer::from_config(
        &EngineConfig::default(),
    )));
    let layout = KeyLayout::qwerty(261.63, 3, 0.05, PatternKind::Xy).unwrap();
    let mut dispatcher = Dispatcher::new(layout, cache.clone(), Held::default());
    let (sender, queue) = event_queue(16);

    for event in [
        KeyEvent::press("KeyA"),
        KeyEvent::press("KeyS"),
        KeyEvent::release("KeyA"),
        KeyEvent::press("KeyA"),
    ] {
        sender.send(event).unwrap();
    }
    drop(sender);

    let stats = dispatcher.run(&queue);
    assert_eq!(stats.started, 3);
    assert_eq!(stats.stopped, 1);
    assert_eq!(dispatcher.sink().0, vec!["KeyS", "KeyA"]);
    // KeyA was synthesized once despite two presses
    assert_eq!(cache.len(), 2);
}
