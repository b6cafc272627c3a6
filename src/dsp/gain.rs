//! Gain primitives for interleaved output blocks.

/*
Gain and Clicks
===============

Every fade in the player is a gain change: the decoded signal is multiplied
sample-by-sample by a factor between 0.0 (silence) and 1.0 (unity).

Vocabulary
----------

  frame         One sample per output channel. A stereo block of 512 frames
                holds 1024 interleaved samples: [L0, R0, L1, R1, ...].

  gain          Multiplier applied to every channel of a frame.
                  gain = 1.0  →  unchanged
                  gain = 0.0  →  silence

  click         An audible broadband "tick" produced when amplitude jumps
                between two consecutive samples. Starting or stopping a
                song mid-waveform causes exactly such a jump.


Why Ramps Remove Clicks
-----------------------

A hard stop looks like this:

    signal:  0.8  0.7  0.9 | 0.0  0.0
                           ^ discontinuity, heard as a click

Multiplying by a gain that moves linearly to zero over a few hundred
milliseconds spreads the change across thousands of samples:

    gain:    1.0  0.99  0.98 ... 0.01  0.0
    output:  0.8  0.69  0.88 ... 0.01  0.0

The waveform still ends at zero, but no two neighboring samples differ by
more than the signal itself already did.


Per-Frame Gain
--------------

The gain curve is evaluated once per frame (not per sample), so all
channels of a frame share the same factor and the stereo image stays
intact:

    out[frame * channels + ch] *= gains[frame]


Implementation Notes
--------------------

Both helpers are stateless and allocation-free; the automation curve that
produces `gains` lives in `dsp::automation`.
*/

/// Multiply every sample by a constant factor (in-place).
#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply each interleaved frame by its own gain value (in-place).
///
/// `gains.len()` must equal the number of frames in `block`.
#[inline]
pub fn apply_frame_gains(block: &mut [f32], channels: usize, gains: &[f32]) {
    let channels = channels.max(1);
    debug_assert_eq!(block.len() / channels, gains.len());

    for (frame, &gain) in block.chunks_exact_mut(channels).zip(gains.iter()) {
        for sample in frame.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Average the channels of each interleaved frame into `out`.
#[inline]
pub fn downmix(block: &[f32], channels: usize, out: &mut [f32]) {
    let channels = channels.max(1);
    debug_assert_eq!(block.len() / channels, out.len());

    let scale = 1.0 / channels as f32;
    for (frame, o) in block.chunks_exact(channels).zip(out.iter_mut()) {
        *o = frame.iter().sum::<f32>() * scale;
    }
}
