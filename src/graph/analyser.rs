use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::{
    config::AnalyserConfig,
    dsp::{analyser::FrequencyAnalyser, gain::downmix},
    error::Result,
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Analysis Node
=============

The analysis node is split across the two threads that touch it:

    audio thread                               UI thread
    ────────────                               ─────────
    ... → gain → AnalyserTap ──rtrb ring──→ AnalyserNode → bytes
                     │
                     └──→ output (unchanged)

AnalyserTap is a pass-through stage. It downmixes each block to mono and
pushes the samples into a lock-free single-producer/single-consumer ring.
If the UI falls behind and the ring fills up, the tap drops samples
instead of blocking the audio callback.

AnalyserNode lives with the render loop. On each read it drains the ring
into a circular history of the last `fft_size` samples, unrolls that
history oldest-first, and runs the FFT analysis on it. Reading is the only
thing that advances the temporal smoothing, so it must happen at most once
per render tick.
*/

/// Ring capacity in analysis windows. Covers several missed UI frames.
const RING_WINDOWS: usize = 4;

/// Create the two halves of an analysis node.
pub fn analyser_pair(config: AnalyserConfig) -> Result<(AnalyserTap, AnalyserNode)> {
    let analyser = FrequencyAnalyser::new(config)?;
    let size = config.fft_size;
    let (producer, consumer) = RingBuffer::<f32>::new(size * RING_WINDOWS);

    let tap = AnalyserTap {
        producer,
        mono: vec![0.0; MAX_BLOCK_SIZE],
    };
    let node = AnalyserNode {
        consumer,
        history: vec![0.0; size],
        write_pos: 0,
        window: vec![0.0; size],
        analyser,
    };
    Ok((tap, node))
}

/// Audio-thread half: forwards the signal untouched and copies it to the UI.
pub struct AnalyserTap {
    producer: Producer<f32>,
    mono: Vec<f32>,
}

impl GraphNode for AnalyserTap {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let channels = ctx.channels;

        for chunk in out.chunks(MAX_BLOCK_SIZE * channels) {
            let mono = &mut self.mono[..chunk.len() / channels];
            downmix(chunk, channels, mono);

            for &sample in mono.iter() {
                if let Err(PushError::Full(_)) = self.producer.push(sample) {
                    return; // drop remainder if full
                }
            }
        }
    }
}

/// UI-thread half: keeps the latest window and produces frequency data.
pub struct AnalyserNode {
    consumer: Consumer<f32>,
    history: Vec<f32>,
    write_pos: usize,
    window: Vec<f32>,
    analyser: FrequencyAnalyser,
}

impl AnalyserNode {
    pub fn frequency_bin_count(&self) -> usize {
        self.analyser.frequency_bin_count()
    }

    /// Pull pending samples, analyse the latest window, write bytes to `out`.
    pub fn get_byte_frequency_data(&mut self, out: &mut [u8]) {
        self.update();
        self.analyser.byte_frequency_data(out);
    }

    /// Same as `get_byte_frequency_data`, in decibels.
    pub fn get_float_frequency_data(&mut self, out: &mut [f32]) {
        self.update();
        self.analyser.float_frequency_data(out);
    }

    fn update(&mut self) {
        self.drain();

        let (newer, older) = self.history.split_at(self.write_pos);
        let split = older.len();
        self.window[..split].copy_from_slice(older);
        self.window[split..].copy_from_slice(newer);

        self.analyser.analyse(&self.window);
    }

    fn drain(&mut self) {
        let size = self.history.len();
        while let Ok(sample) = self.consumer.pop() {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % size;
        }
    }
}
