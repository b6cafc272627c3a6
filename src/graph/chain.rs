use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    graph::{
        analyser::AnalyserTap,
        gain::GainNode,
        node::{GraphNode, RenderCtx},
        source::MediaElement,
    },
    MAX_BLOCK_SIZE,
};

/*
Playback Chain
==============

    [MediaElement] ──→ [GainNode] ──→ [AnalyserTap] ──→ output stream
       decoded            fades         copy to UI
       file frames

The chain is rendered by the output callback in serial: the source writes
the block, each later stage transforms it in place. The chain also owns
the audio clock: every rendered frame advances it by 1 / sample_rate, and
the gain curve and all transition deadlines are measured against it.

The tap is optional. Without it the chain still plays (audio-only) but
nothing feeds the visualization.
*/

/// Shared handle between the output callback and the controller.
pub type SharedChain = Arc<Mutex<SignalChain>>;

/// Format the output stream renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

pub struct SignalChain {
    element: MediaElement,
    gain: GainNode,
    tap: Option<AnalyserTap>,
    format: OutputFormat,
    frames_rendered: u64,
    closed: bool,
}

impl SignalChain {
    pub fn new(format: OutputFormat, tap: Option<AnalyserTap>) -> Self {
        Self {
            element: MediaElement::new(),
            gain: GainNode::new(1.0),
            tap,
            format,
            frames_rendered: 0,
            closed: false,
        }
    }

    pub fn into_shared(self) -> SharedChain {
        Arc::new(Mutex::new(self))
    }

    /// Render one interleaved output buffer and advance the clock.
    pub fn render(&mut self, out: &mut [f32]) {
        if self.closed {
            out.fill(0.0);
            return;
        }

        let channels = self.format.channels.max(1) as usize;
        let sample_rate = self.format.sample_rate as f32;

        for block in out.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let ctx = RenderCtx::new(sample_rate, channels, self.current_time());

            self.element.render_block(block, &ctx);
            self.gain.render_block(block, &ctx);
            if let Some(tap) = self.tap.as_mut() {
                tap.render_block(block, &ctx);
            }

            self.frames_rendered += ctx.frames(block) as u64;
        }
    }

    /// Audio-clock time in seconds.
    pub fn current_time(&self) -> f64 {
        self.frames_rendered as f64 / self.format.sample_rate.max(1) as f64
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn element(&self) -> &MediaElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut MediaElement {
        &mut self.element
    }

    pub fn gain(&self) -> &GainNode {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut GainNode {
        &mut self.gain
    }

    pub fn has_analyser(&self) -> bool {
        self.tap.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Silence the chain for good.
    pub fn close(&mut self) {
        self.closed = true;
        self.element.pause();
        self.gain.gain_mut().reset(0.0);
    }
}

/// Lock the chain, recovering the data if a previous holder panicked.
pub fn lock_chain(chain: &SharedChain) -> MutexGuard<'_, SignalChain> {
    chain.lock().unwrap_or_else(PoisonError::into_inner)
}
