use tracing::trace;

use crate::playback::graph::PlaybackGraph;

/// One tick's worth of analyser output.
#[derive(Debug, Clone, Default)]
pub struct FrequencySnapshot {
    pub bins: Vec<u8>,
    pub sample_rate: f32,
}

impl FrequencySnapshot {
    pub fn is_silent(&self) -> bool {
        self.bins.iter().all(|&b| b == 0)
    }
}

/// Pulls frequency bytes from the graph's analysis node into a reused buffer.
#[derive(Debug, Default)]
pub struct FrequencySampler {
    snapshot: FrequencySnapshot,
}

impl FrequencySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the snapshot. Reading advances the analyser's temporal
    /// smoothing, so call this at most once per render tick.
    ///
    /// Without a live graph that has an analysis node the snapshot is zeroed.
    pub fn sample(&mut self, graph: Option<&mut PlaybackGraph>) -> &FrequencySnapshot {
        let snapshot = &mut self.snapshot;

        match graph {
            Some(graph) if graph.is_live() => {
                let sample_rate = graph.sample_rate();
                match graph.analyser_mut() {
                    Some(analyser) => {
                        snapshot.bins.resize(analyser.frequency_bin_count(), 0);
                        analyser.get_byte_frequency_data(&mut snapshot.bins);
                        snapshot.sample_rate = sample_rate;
                    }
                    None => {
                        trace!("no analysis node, zero snapshot");
                        snapshot.bins.fill(0);
                    }
                }
            }
            _ => {
                trace!("graph not live, zero snapshot");
                snapshot.bins.fill(0);
            }
        }

        &self.snapshot
    }

    pub fn snapshot(&self) -> &FrequencySnapshot {
        &self.snapshot
    }
}
