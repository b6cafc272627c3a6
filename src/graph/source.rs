use std::sync::Arc;

use crate::{
    error::{PlayerError, Result},
    graph::node::{GraphNode, RenderCtx},
    io::{decoder::DecodedAudio, media::MediaUrl},
};

/*
Media Source
============

The media element is the head of the playback chain: it reads frames from
a decoded clip and writes them into the output block.

Rate Conversion
---------------

Files rarely match the device rate (44.1 kHz music on a 48 kHz device).
The read head advances by a fractional step per output frame:

    step = file_rate / device_rate          44100 / 48000 = 0.91875

and each output sample is linearly interpolated between the two file
frames around the read head:

    frame  = floor(position)
    frac   = position - frame
    sample = a + (b - a) * frac

Channel Mapping
---------------

  mono file   → every output channel gets the same sample
  stereo file → L/R to output channels 0/1, repeating for wider layouts
  any file    → mono output gets the average of all file channels

End of Media
------------

When the read head passes the last frame, the element stops itself, marks
`ended`, and fills the remainder of the block with silence. The player
polls `has_ended` to advance the playlist.
*/

#[derive(Default)]
pub struct MediaElement {
    url: Option<MediaUrl>,
    media: Option<Arc<DecodedAudio>>,
    position: f64,
    playing: bool,
    ended: bool,
}

impl MediaElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current source. Rewinds and leaves the element paused.
    pub fn load(&mut self, url: MediaUrl, media: Arc<DecodedAudio>) {
        self.url = Some(url);
        self.media = Some(media);
        self.position = 0.0;
        self.playing = false;
        self.ended = false;
    }

    pub fn unload(&mut self) {
        self.url = None;
        self.media = None;
        self.position = 0.0;
        self.playing = false;
        self.ended = false;
    }

    /// Start output. Restarts from the top if the clip had ended.
    pub fn play(&mut self) -> Result<()> {
        if self.media.is_none() {
            return Err(PlayerError::NoSource);
        }
        if self.ended {
            self.position = 0.0;
            self.ended = false;
        }
        self.playing = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn url(&self) -> Option<&MediaUrl> {
        self.url.as_ref()
    }

    /// Playback position in seconds.
    pub fn current_time(&self) -> f64 {
        match &self.media {
            Some(media) => self.position / media.sample_rate() as f64,
            None => 0.0,
        }
    }

    pub fn duration(&self) -> f64 {
        self.media.as_ref().map_or(0.0, |media| media.duration())
    }

    /// Move the read head to `seconds`, clamped to `[0, duration]`.
    /// Non-finite input is ignored.
    pub fn seek(&mut self, seconds: f64) {
        let Some(media) = &self.media else {
            return;
        };
        if !seconds.is_finite() {
            return;
        }
        let target = seconds.clamp(0.0, media.duration());
        self.position = target * media.sample_rate() as f64;
        self.ended = false;
    }
}

impl GraphNode for MediaElement {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let media = match &self.media {
            Some(media) if self.playing => Arc::clone(media),
            _ => {
                out.fill(0.0);
                return;
            }
        };

        let channels = ctx.channels;
        let step = media.sample_rate() as f64 / ctx.sample_rate.max(1.0) as f64;
        let last_frame = media.frames();

        for frame in out.chunks_exact_mut(channels) {
            let index = self.position as usize;
            if index >= last_frame {
                self.playing = false;
                self.ended = true;
                frame.fill(0.0);
                continue;
            }

            let frac = (self.position - index as f64) as f32;
            let read = |ch: usize| {
                let a = media.sample(index, ch);
                let b = if index + 1 < last_frame {
                    media.sample(index + 1, ch)
                } else {
                    a
                };
                a + (b - a) * frac
            };

            if channels == 1 {
                let sum: f32 = (0..media.channels()).map(read).sum();
                frame[0] = sum / media.channels() as f32;
            } else {
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = read(ch);
                }
            }

            self.position += step;
        }
    }
}
