use crate::{
    dsp::{automation::ParamTimeline, gain},
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Scales the chain by a scheduled gain curve, evaluated per frame on the
/// audio clock.
pub struct GainNode {
    gain: ParamTimeline,
    frame_gains: Vec<f32>,
}

impl GainNode {
    pub fn new(initial: f32) -> Self {
        Self {
            gain: ParamTimeline::new(initial),
            frame_gains: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn gain(&self) -> &ParamTimeline {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut ParamTimeline {
        &mut self.gain
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let channels = ctx.channels;
        let mut frame_offset = 0;

        // Chunked so oversized blocks never need the scratch buffer to grow.
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = chunk.len() / channels;
            let gains = &mut self.frame_gains[..frames];
            self.gain
                .render(gains, ctx.frame_time(frame_offset), ctx.sample_rate);
            gain::apply_frame_gains(chunk, channels, gains);
            frame_offset += frames;
        }
    }
}
