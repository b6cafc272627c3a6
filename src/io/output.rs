//! Output backends: where rendered chain audio goes.
//!
//! `CpalBackend` drives the chain from the device callback. `OfflineBackend`
//! renders only when its `OfflineDriver` is pumped, which makes the whole
//! player deterministic for headless runs and tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::{
    error::{PlayerError, Result},
    graph::chain::{lock_chain, OutputFormat, SharedChain},
    MAX_BLOCK_SIZE,
};

/// A running output stream. Dropping it stops output as well.
pub trait OutputStream {
    fn close(&mut self);
}

pub trait AudioBackend {
    /// Acquire the device and report the format the chain must render in.
    fn open(&mut self) -> Result<OutputFormat>;

    /// Start pulling audio from `chain`.
    fn start(&mut self, chain: SharedChain) -> Result<Box<dyn OutputStream>>;
}

// ---------------------------------------------------------------------------
// cpal
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CpalBackend {
    device: Option<cpal::Device>,
    config: Option<cpal::StreamConfig>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for CpalBackend {
    fn open(&mut self) -> Result<OutputFormat> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlayerError::NoOutputDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| PlayerError::Backend(format!("failed to fetch default output config: {e}")))?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(PlayerError::UnsupportedSampleFormat(
                supported.sample_format().to_string(),
            ));
        }

        let config: cpal::StreamConfig = supported.into();
        let format = OutputFormat {
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        };

        info!(
            device = %device.name().unwrap_or_else(|_| "<unnamed>".into()),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "opened output device"
        );

        self.device = Some(device);
        self.config = Some(config);
        Ok(format)
    }

    fn start(&mut self, chain: SharedChain) -> Result<Box<dyn OutputStream>> {
        let (Some(device), Some(config)) = (&self.device, &self.config) else {
            return Err(PlayerError::Backend("output device not opened".into()));
        };

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _| lock_chain(&chain).render(data),
                |err| error!(%err, "output stream error"),
                None,
            )
            .map_err(|e| PlayerError::Backend(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlayerError::Backend(e.to_string()))?;

        Ok(Box::new(CpalStream {
            stream: Some(stream),
        }))
    }
}

struct CpalStream {
    stream: Option<cpal::Stream>,
}

impl OutputStream for CpalStream {
    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                error!(%err, "failed to pause output stream");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Offline
// ---------------------------------------------------------------------------

type ChainSlot = Arc<Mutex<Option<SharedChain>>>;

/// Backend that renders only when pumped by its driver.
pub struct OfflineBackend {
    format: OutputFormat,
    available: Arc<AtomicBool>,
    slot: ChainSlot,
}

impl OfflineBackend {
    pub fn new(sample_rate: u32, channels: u16) -> (Self, OfflineDriver) {
        let format = OutputFormat {
            sample_rate,
            channels,
        };
        let available = Arc::new(AtomicBool::new(true));
        let slot: ChainSlot = Arc::new(Mutex::new(None));

        let driver = OfflineDriver {
            format,
            available: Arc::clone(&available),
            slot: Arc::clone(&slot),
            buffer: Vec::new(),
        };
        (
            Self {
                format,
                available,
                slot,
            },
            driver,
        )
    }
}

impl AudioBackend for OfflineBackend {
    fn open(&mut self) -> Result<OutputFormat> {
        if !self.available.load(Ordering::Acquire) {
            return Err(PlayerError::NoOutputDevice);
        }
        Ok(self.format)
    }

    fn start(&mut self, chain: SharedChain) -> Result<Box<dyn OutputStream>> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(chain);
        Ok(Box::new(OfflineStream {
            slot: Arc::clone(&self.slot),
        }))
    }
}

struct OfflineStream {
    slot: ChainSlot,
}

impl OutputStream for OfflineStream {
    fn close(&mut self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Drop for OfflineStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Pumps audio through the chain attached to an `OfflineBackend`.
pub struct OfflineDriver {
    format: OutputFormat,
    available: Arc<AtomicBool>,
    slot: ChainSlot,
    buffer: Vec<f32>,
}

impl OfflineDriver {
    /// Simulate the device appearing or disappearing.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    pub fn is_connected(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Render `seconds` of audio. Returns the peak absolute sample, or 0.0
    /// when no stream is running.
    pub fn advance(&mut self, seconds: f64) -> f32 {
        let frames = (seconds * self.format.sample_rate as f64).round() as usize;
        self.render_frames(frames)
    }

    pub fn render_frames(&mut self, frames: usize) -> f32 {
        let Some(chain) = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        else {
            return 0.0;
        };

        let channels = self.format.channels.max(1) as usize;
        let mut peak = 0.0f32;
        let mut remaining = frames;
        while remaining > 0 {
            let block_frames = remaining.min(MAX_BLOCK_SIZE);
            self.buffer.resize(block_frames * channels, 0.0);
            lock_chain(&chain).render(&mut self.buffer);
            peak = self.buffer.iter().fold(peak, |acc, &s| acc.max(s.abs()));
            remaining -= block_frames;
        }
        peak
    }

    /// Samples from the most recent render call (last block only).
    pub fn last_block(&self) -> &[f32] {
        &self.buffer
    }
}
