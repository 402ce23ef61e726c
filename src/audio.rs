//! Audio playback collaborator. Playback is fire-and-forget: a missing file
//! or a broken output device is logged and otherwise ignored.

use std::path::{Path, PathBuf};

use crate::catalog::Target;

/// Raw PCM assets are 24 kHz mono, signed 16-bit little-endian.
pub const PCM_SAMPLE_RATE: u32 = 24_000;

pub trait AudioPlayback {
    fn play_target(&mut self, target: &Target);

    /// Play a shared sound such as `win_listen`.
    fn play_common(&mut self, name: &str);
}

/// Resolves asset keys against the configured asset directory.
#[derive(Clone, Debug)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn common_sound(&self, name: &str) -> PathBuf {
        self.root.join("common").join(format!("{name}.pcm"))
    }
}

/// Backend used when sound is disabled or not compiled in.
#[derive(Clone, Debug)]
pub struct SilentPlayback {
    assets: AssetDir,
}

impl SilentPlayback {
    pub fn new(assets: AssetDir) -> Self {
        Self { assets }
    }
}

impl AudioPlayback for SilentPlayback {
    fn play_target(&mut self, target: &Target) {
        log::debug!(
            "(silent) would play {} for {}",
            self.assets.resolve(&target.audio).display(),
            target.id
        );
    }

    fn play_common(&mut self, name: &str) {
        log::debug!("(silent) would play {}", self.assets.common_sound(name).display());
    }
}

/// Decode little-endian i16 samples into the float range rodio mixes in.
/// A trailing odd byte is dropped.
pub fn decode_pcm(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

#[cfg(feature = "sound")]
pub use pcm::PcmPlayback;

#[cfg(feature = "sound")]
mod pcm {
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::thread;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStreamBuilder, Sink};

    use super::{AssetDir, AudioPlayback, PCM_SAMPLE_RATE, decode_pcm};
    use crate::catalog::Target;

    /// Plays PCM assets on a background thread that owns the output stream.
    /// A new sound cuts off whatever was still playing.
    pub struct PcmPlayback {
        assets: AssetDir,
        tx: mpsc::Sender<PathBuf>,
    }

    impl PcmPlayback {
        pub fn new(assets: AssetDir) -> Self {
            let (tx, rx) = mpsc::channel::<PathBuf>();

            thread::spawn(move || {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        log::warn!("no audio output available: {e}");
                        // Keep draining so senders never notice.
                        for _ in rx {}
                        return;
                    }
                };

                let mut current: Option<Sink> = None;
                for path in rx {
                    let bytes = match std::fs::read(&path) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            log::warn!("failed to read sound {}: {e}", path.display());
                            continue;
                        }
                    };
                    if let Some(sink) = current.take() {
                        sink.stop();
                    }
                    let sink = Sink::connect_new(stream.mixer());
                    sink.append(SamplesBuffer::new(1, PCM_SAMPLE_RATE, decode_pcm(&bytes)));
                    current = Some(sink);
                }
            });

            Self { assets, tx }
        }

        fn send(&self, path: PathBuf) {
            if self.tx.send(path).is_err() {
                log::warn!("audio thread has exited");
            }
        }
    }

    impl AudioPlayback for PcmPlayback {
        fn play_target(&mut self, target: &Target) {
            self.send(self.assets.resolve(&target.audio));
        }

        fn play_common(&mut self, name: &str) {
            self.send(self.assets.common_sound(name));
        }
    }
}
