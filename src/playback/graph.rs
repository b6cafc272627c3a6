use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    config::AnalyserConfig,
    graph::{
        analyser::{analyser_pair, AnalyserNode},
        chain::{lock_chain, SharedChain, SignalChain},
    },
    io::output::{AudioBackend, OutputStream},
};

/// A live signal chain plus the output stream pulling from it.
pub struct PlaybackGraph {
    chain: SharedChain,
    stream: Box<dyn OutputStream>,
    analyser: Option<AnalyserNode>,
    sample_rate: f32,
    closed: bool,
}

impl PlaybackGraph {
    pub fn chain(&self) -> &SharedChain {
        &self.chain
    }

    pub fn analyser_mut(&mut self) -> Option<&mut AnalyserNode> {
        self.analyser.as_mut()
    }

    pub fn has_analyser(&self) -> bool {
        self.analyser.is_some()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Built, not closed.
    pub fn is_live(&self) -> bool {
        !self.closed
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        lock_chain(&self.chain).close();
        self.stream.close();
        debug!("playback graph closed");
    }
}

impl Drop for PlaybackGraph {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builds the playback graph on first use and keeps it for the session.
pub struct GraphManager {
    backend: Box<dyn AudioBackend>,
    analyser_config: AnalyserConfig,
    graph: Option<PlaybackGraph>,
    shut_down: bool,
}

impl GraphManager {
    pub fn new(backend: Box<dyn AudioBackend>, analyser_config: AnalyserConfig) -> Self {
        Self {
            backend,
            analyser_config,
            graph: None,
            shut_down: false,
        }
    }

    /// Return the live graph, building it if needed.
    ///
    /// Backend failures are logged and yield `None`; the next call tries
    /// again. A failing analyser leaves the graph audio-only.
    pub fn ensure_graph(&mut self) -> Option<&mut PlaybackGraph> {
        if self.shut_down {
            return None;
        }
        if self.graph.as_ref().is_some_and(PlaybackGraph::is_live) {
            return self.graph.as_mut();
        }

        match self.build() {
            Ok(graph) => self.graph = Some(graph),
            Err(err) => {
                warn!(%err, "could not build playback graph, will retry on next play");
                return None;
            }
        }
        self.graph.as_mut()
    }

    fn build(&mut self) -> crate::error::Result<PlaybackGraph> {
        let format = self.backend.open()?;

        let (tap, analyser) = match analyser_pair(self.analyser_config) {
            Ok((tap, node)) => (Some(tap), Some(node)),
            Err(err) => {
                warn!(%err, "analysis node unavailable, playing without visualization");
                (None, None)
            }
        };

        let chain = SignalChain::new(format, tap).into_shared();
        let stream = self.backend.start(Arc::clone(&chain))?;

        info!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            analyser = analyser.is_some(),
            "playback graph created"
        );

        Ok(PlaybackGraph {
            chain,
            stream,
            analyser,
            sample_rate: format.sample_rate as f32,
            closed: false,
        })
    }

    pub fn graph(&self) -> Option<&PlaybackGraph> {
        self.graph.as_ref()
    }

    /// Live graph only.
    pub fn live_graph_mut(&mut self) -> Option<&mut PlaybackGraph> {
        self.graph.as_mut().filter(|graph| graph.is_live())
    }

    /// Close the graph for good. Later `ensure_graph` calls return `None`.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        if let Some(graph) = self.graph.as_mut() {
            graph.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::output::OfflineBackend;

    #[test]
    fn graph_is_built_once() {
        let (backend, _driver) = OfflineBackend::new(48_000, 2);
        let mut manager = GraphManager::new(Box::new(backend), AnalyserConfig::default());

        let first = Arc::clone(manager.ensure_graph().unwrap().chain());
        let second = Arc::clone(manager.ensure_graph().unwrap().chain());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn backend_failure_is_retried() {
        let (backend, driver) = OfflineBackend::new(48_000, 2);
        let mut manager = GraphManager::new(Box::new(backend), AnalyserConfig::default());

        driver.set_available(false);
        assert!(manager.ensure_graph().is_none());
        assert!(manager.graph().is_none());

        driver.set_available(true);
        assert!(manager.ensure_graph().is_some());
        assert!(driver.is_connected());
    }

    #[test]
    fn bad_analyser_degrades_to_audio_only() {
        let (backend, _driver) = OfflineBackend::new(48_000, 2);
        let config = AnalyserConfig {
            fft_size: 1000,
            ..AnalyserConfig::default()
        };
        let mut manager = GraphManager::new(Box::new(backend), config);

        let graph = manager.ensure_graph().unwrap();
        assert!(!graph.has_analyser());
        assert!(!lock_chain(graph.chain()).has_analyser());
    }

    #[test]
    fn shutdown_closes_the_graph() {
        let (backend, driver) = OfflineBackend::new(48_000, 2);
        let mut manager = GraphManager::new(Box::new(backend), AnalyserConfig::default());
        manager.ensure_graph();

        manager.shutdown();
        assert!(!driver.is_connected());
        assert!(manager.live_graph_mut().is_none());
        assert!(manager.graph().is_some_and(|g| !g.is_live()));
        assert!(manager.ensure_graph().is_none(), "no rebuild after shutdown");
    }
}
