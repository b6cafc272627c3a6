/// Context passed to graph nodes during rendering
///
/// Contains information about the block being rendered:
/// - sample_rate: Output sample rate (e.g., 48000.0)
/// - channels: Interleaved channel count of the output block
/// - time: Audio-clock time of the first frame in the block, in seconds
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub channels: usize,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, channels: usize, time: f64) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            time,
        }
    }

    /// Number of frames in an interleaved block.
    #[inline]
    pub fn frames(&self, block: &[f32]) -> usize {
        block.len() / self.channels
    }

    /// Audio-clock time of `frame` within the block.
    #[inline]
    pub fn frame_time(&self, frame: usize) -> f64 {
        self.time + frame as f64 / self.sample_rate as f64
    }
}

/// Core trait for nodes in the playback chain
///
/// Sources overwrite `out`; processors transform it in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}
