use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use log::info;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

/// Background music. Playback stops when this is dropped.
pub struct AudioPlayer {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    _sink: Sink,
}

impl AudioPlayer {
    /// Decodes `track` and plays it on repeat on the default output device.
    pub fn play_loop(track: &Path) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("opening the audio output")?;
        let sink = Sink::try_new(&handle).context("creating an audio sink")?;

        let file = File::open(track).with_context(|| format!("opening {}", track.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("decoding {}", track.display()))?;

        sink.append(source.repeat_infinite());
        info!("looping {}", track.display());

        Ok(AudioPlayer { _stream: stream, _handle: handle, _sink: sink })
    }
}
