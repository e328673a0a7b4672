/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{make_wav, synth};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_capture: Arc<Vec<u8>>,
        sfx_trap: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "no audio output, running silent");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_capture: Arc::new(make_wav(&synth::capture())),
                sfx_trap: Arc::new(make_wav(&synth::trap())),
                sfx_clear: Arc::new(make_wav(&synth::level_clear())),
                sfx_game_over: Arc::new(make_wav(&synth::game_over())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_capture(&self) { self.play(&self.sfx_capture); }
        pub fn play_trap(&self) { self.play(&self.sfx_trap); }
        pub fn play_level_clear(&self) { self.play(&self.sfx_clear); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod synth {
    use std::f32::consts::PI;

    use super::SAMPLE_RATE;

    /// Notes played back to back, each with its own envelope.
    fn notes(freqs: &[f32], note_dur: f32, volume: f32, harmonic: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in freqs {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * PI).sin() * (1.0 - harmonic)
                    + (t * freq * 2.0 * 2.0 * PI).sin() * harmonic;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Cat reaches the box: bright two-note "mew" upward, G5→C6
    pub fn capture() -> Vec<f32> {
        notes(&[784.0, 1047.0], 0.07, 0.3, 0.3)
    }

    /// Cat hits a trap: short noisy buzz with falling pitch
    pub fn trap() -> Vec<f32> {
        let duration = 0.18;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 2024;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 320.0 - t * 180.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = if (ti * freq).fract() < 0.5 { 1.0 } else { -1.0 };
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * 0.6 + noise * 0.4) * env * 0.22
            })
            .collect()
    }

    /// Level clear: ascending arpeggio C5→E5→G5→C6 with a held top note
    pub fn level_clear() -> Vec<f32> {
        let mut samples = notes(&[523.0, 659.0, 784.0], 0.1, 0.3, 0.3);
        samples.extend(notes(&[1047.0], 0.3, 0.3, 0.3));
        samples
    }

    /// Game over: sad descending tone A4→F#4→Eb4→C4 with a final fade
    pub fn game_over() -> Vec<f32> {
        let mut samples = notes(&[440.0, 370.0, 311.0, 261.0], 0.14, 0.3, 0.0);
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            samples[i] *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }
}

// ════════════════════════════════════════════════════════════
//  WAV encoder: wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());

    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_capture(&self) {}
    pub fn play_trap(&self) {}
    pub fn play_level_clear(&self) {}
    pub fn play_game_over(&self) {}
}

/// Play the effect for each event that has one.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::CatCaptured { .. } => sfx.play_capture(),
            GameEvent::CatTrapped { .. } => sfx.play_trap(),
            GameEvent::LevelCleared { .. } => sfx.play_level_clear(),
            GameEvent::GameOver { .. } => sfx.play_game_over(),
            _ => {}
        }
    }
}
