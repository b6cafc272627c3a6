use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::{
    config::PlayerConfig,
    error::{PlayerError, Result},
    graph::chain::{lock_chain, SignalChain},
    io::{decoder::DecodedAudio, media::MediaStore, output::AudioBackend},
    playback::{
        controls::{MediaAction, MediaControls, NoMediaControls, TrackMetadata},
        graph::{GraphManager, PlaybackGraph},
        playlist::{Playlist, Song, SongId},
        transition::{Transition, TransitionEvent, TransitionState},
    },
    visual::{RenderLoop, Visualizer},
};

/*
Player
======

The player ties the pieces together on the UI thread:

    play_song / play / pause / delete_song      (user requests)
          │
          ├─→ gain timeline on the chain         (fades, audio clock)
          ├─→ Transition                         (which fade, done when)
          └─→ RenderLoop                         (start / stop frames)

    poll()             once per UI tick: completes fades whose audio-clock
                       deadline has passed and advances on track end
    animation_frame()  once per display refresh: draws the pending frame

Fade Scheduling
---------------

Start (or song change):

    gain  1 ┤            ________
            │          ╱
            │        ╱
          0 ┼──────●            t
                  now   now + fade_in

Pause: the curve is frozen at its current value and ramps to 0 over
fade_out; when that deadline passes the source stops and the loop ends.
Resuming during the fade-out ramps back up from the frozen value rather
than dropping to 0 first, so there is no audible dip.

Deleting the active song stops everything at once, no fade.
*/

pub struct Player {
    config: PlayerConfig,
    media: MediaStore,
    playlist: Playlist,
    graph: GraphManager,
    transition: Transition,
    render_loop: RenderLoop,
    visualizer: Visualizer,
    controls: Box<dyn MediaControls>,
}

impl Player {
    pub fn new(config: PlayerConfig, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            graph: GraphManager::new(backend, config.analyser),
            visualizer: Visualizer::new(&config),
            config,
            media: MediaStore::new(),
            playlist: Playlist::new(),
            transition: Transition::new(),
            render_loop: RenderLoop::new(),
            controls: Box::new(NoMediaControls),
        }
    }

    pub fn with_media_controls(mut self, controls: impl MediaControls + 'static) -> Self {
        self.controls = Box::new(controls);
        self.publish();
        self
    }

    // -- ingestion --------------------------------------------------------

    /// Register files and append them to the playlist. Decoding is deferred
    /// until a song is first played.
    pub fn add_files<I, P>(&mut self, paths: I) -> Vec<Song>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let songs: Vec<Song> = paths
            .into_iter()
            .map(|path| {
                let path = path.into();
                let title = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let url = self.media.register_file(&path);
                self.playlist.push(title, url, Some(path)).clone()
            })
            .collect();

        debug!(count = songs.len(), "added files");
        self.publish();
        songs
    }

    pub fn add_decoded(&mut self, title: impl Into<String>, audio: DecodedAudio) -> Song {
        let url = self.media.register_decoded(audio);
        let song = self.playlist.push(title, url, None).clone();
        self.publish();
        song
    }

    // -- playlist ---------------------------------------------------------

    /// Load the song at `index` and fade it in.
    pub fn play_song(&mut self, index: usize) -> Result<()> {
        let Some(song) = self.playlist.get(index).cloned() else {
            return Err(PlayerError::SongIndexOutOfRange {
                index,
                len: self.playlist.len(),
            });
        };

        let result = self.start_song(index, &song);
        if let Err(err) = &result {
            warn!(%err, title = %song.title, "could not start playback");
            self.halt();
        }
        result
    }

    fn start_song(&mut self, index: usize, song: &Song) -> Result<()> {
        let fade_in = self.config.fade_in;
        let graph = self
            .graph
            .ensure_graph()
            .ok_or(PlayerError::GraphUnavailable)?;
        let media = self.media.resolve(&song.url)?;

        let has_analyser = graph.has_analyser();
        let deadline = {
            let mut chain = lock_chain(graph.chain());
            chain.element_mut().load(song.url.clone(), media);
            schedule_fade_in(&mut chain, fade_in, false)?
        };

        self.playlist.set_current(Some(index));
        self.transition.begin_fade_in(deadline);
        if has_analyser {
            self.render_loop.start();
        }

        info!(index, title = %song.title, "playing");
        self.publish();
        Ok(())
    }

    /// Next song, wrapping to the first. A single song replays itself.
    pub fn next_song(&mut self) -> Result<()> {
        let index = self.playlist.next_index().ok_or(PlayerError::NoSource)?;
        self.play_song(index)
    }

    pub fn previous_song(&mut self) -> Result<()> {
        let index = self.playlist.previous_index().ok_or(PlayerError::NoSource)?;
        self.play_song(index)
    }

    /// Remove a song and revoke its url. Deleting the active song stops
    /// playback immediately.
    pub fn delete_song(&mut self, id: SongId) -> Option<Song> {
        let removal = self.playlist.remove(id)?;
        self.media.revoke(&removal.song.url);

        if removal.was_current {
            info!(title = %removal.song.title, "active song deleted, stopping");
            self.halt();
        } else {
            debug!(title = %removal.song.title, index = removal.index, "song deleted");
            self.publish();
        }
        Some(removal.song)
    }

    /// Move the playback position by `delta` seconds.
    pub fn skip_time(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let target = self.current_time() + delta;
        self.seek(target);
    }

    // -- transport --------------------------------------------------------

    /// Resume the current song, or start the first one. A song that ran out
    /// while fading out is finished, so play moves on to the next one.
    pub fn play(&mut self) -> Result<()> {
        match self.transition.state() {
            TransitionState::FadingIn | TransitionState::Playing => Ok(()),
            TransitionState::Paused | TransitionState::FadingOut if self.source_ended() => {
                debug!("track ended during fade-out, advancing");
                self.next_song()
            }
            TransitionState::Paused | TransitionState::FadingOut if self.source_loaded() => {
                self.resume()
            }
            _ => {
                let index = self
                    .playlist
                    .current_index()
                    .or_else(|| self.playlist.next_index())
                    .ok_or(PlayerError::NoSource)?;
                self.play_song(index)
            }
        }
    }

    fn resume(&mut self) -> Result<()> {
        let hold = self.transition.state() == TransitionState::FadingOut;
        let fade_in = self.config.fade_in;

        let result = self
            .with_chain(|chain| schedule_fade_in(chain, fade_in, hold))
            .unwrap_or(Err(PlayerError::ContextClosed));

        match result {
            Ok(deadline) => {
                self.transition.begin_fade_in(deadline);
                if self.has_analyser() {
                    self.render_loop.start();
                }
                debug!(from_held = hold, "resumed");
                self.publish();
                Ok(())
            }
            Err(err) => {
                warn!(%err, "could not resume playback");
                self.halt();
                Err(err)
            }
        }
    }

    /// Fade out, then stop the source. The render loop keeps drawing the
    /// decaying signal until the fade completes.
    pub fn pause(&mut self) {
        if !self.transition.state().is_playing() {
            return;
        }

        let fade_out = self.config.fade_out;
        let deadline = self.with_chain(|chain| {
            let now = chain.current_time();
            let gain = chain.gain_mut().gain_mut();
            gain.cancel_and_hold_at_time(now);
            gain.linear_ramp_to_value_at_time(0.0, now + fade_out);
            now + fade_out
        });

        match deadline {
            Some(deadline) => {
                self.transition.begin_fade_out(deadline);
                debug!(deadline, "fading out");
                self.publish();
            }
            None => self.halt(),
        }
    }

    pub fn toggle_playback(&mut self) -> Result<()> {
        if self.transition.state().is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    pub fn handle_media_action(&mut self, action: MediaAction) -> Result<()> {
        debug!(?action, "media action");
        match action {
            MediaAction::Play => self.play(),
            MediaAction::Pause => {
                self.pause();
                Ok(())
            }
            MediaAction::TogglePlayback => self.toggle_playback(),
            MediaAction::Next => self.next_song(),
            MediaAction::Previous => self.previous_song(),
        }
    }

    // -- progress ---------------------------------------------------------

    /// Position in the current song, in seconds.
    pub fn current_time(&self) -> f64 {
        self.with_chain(|chain| chain.element().current_time())
            .unwrap_or(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.with_chain(|chain| chain.element().duration())
            .unwrap_or(0.0)
    }

    /// Jump to `seconds`, clamped to the song. Non-finite input is ignored.
    pub fn seek(&mut self, seconds: f64) {
        self.with_chain(|chain| chain.element_mut().seek(seconds));
    }

    // -- ticks ------------------------------------------------------------

    /// Complete fades whose deadline has passed and advance past a
    /// finished track. Call once per UI tick.
    pub fn poll(&mut self) -> Result<()> {
        let Some((now, ended)) =
            self.with_chain(|chain| (chain.current_time(), chain.element().has_ended()))
        else {
            return Ok(());
        };

        match self.transition.poll(now) {
            Some(TransitionEvent::FadeOutComplete) => {
                self.with_chain(|chain| chain.element_mut().pause());
                self.render_loop.stop();
                self.visualizer.clear();
                debug!("fade-out complete, paused");
            }
            Some(TransitionEvent::FadeInComplete) => debug!("fade-in complete"),
            None => {}
        }

        if ended && self.transition.state().is_playing() {
            debug!("track ended, advancing");
            return self.next_song();
        }
        Ok(())
    }

    /// Draw the pending animation frame, if one is due. Returns true when
    /// something was drawn.
    pub fn animation_frame(&mut self) -> bool {
        if self.render_loop.take_due().is_none() {
            return false;
        }

        let graph = self
            .graph
            .live_graph_mut()
            .filter(|graph| graph.has_analyser());
        let Some(graph) = graph else {
            self.render_loop.stop();
            return false;
        };

        let drawn = self.visualizer.draw_frame(Some(graph));
        self.render_loop.reschedule();
        drawn
    }

    /// Stop everything and close the output. Irreversible.
    pub fn shutdown(&mut self) {
        self.render_loop.stop();
        self.visualizer.clear();
        self.transition.stop();
        self.graph.shutdown();
        self.publish();
        info!("player shut down");
    }

    // -- queries ----------------------------------------------------------

    pub fn state(&self) -> TransitionState {
        self.transition.state()
    }

    pub fn is_playing(&self) -> bool {
        self.transition.state().is_playing()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.playlist.current_song()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn render_active(&self) -> bool {
        self.render_loop.is_active()
    }

    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    pub fn visualizer_mut(&mut self) -> &mut Visualizer {
        &mut self.visualizer
    }

    pub fn graph(&self) -> Option<&PlaybackGraph> {
        self.graph.graph()
    }

    /// Gain the fade curve has at the current audio-clock time.
    pub fn gain_value(&self) -> Option<f32> {
        self.with_chain(|chain| chain.gain().gain().value_at(chain.current_time()))
    }

    // -- internals --------------------------------------------------------

    fn with_chain<R>(&self, f: impl FnOnce(&mut SignalChain) -> R) -> Option<R> {
        self.graph
            .graph()
            .filter(|graph| graph.is_live())
            .map(|graph| f(&mut *lock_chain(graph.chain())))
    }

    fn has_analyser(&self) -> bool {
        self.graph
            .graph()
            .is_some_and(|graph| graph.is_live() && graph.has_analyser())
    }

    fn source_loaded(&self) -> bool {
        self.with_chain(|chain| chain.element().url().is_some())
            .unwrap_or(false)
    }

    fn source_ended(&self) -> bool {
        self.with_chain(|chain| chain.element().has_ended())
            .unwrap_or(false)
    }

    /// Immediate stop: no fade, nothing scheduled, nothing drawn.
    fn halt(&mut self) {
        self.with_chain(|chain| {
            chain.gain_mut().gain_mut().reset(0.0);
            chain.element_mut().unload();
        });
        self.transition.stop();
        self.render_loop.stop();
        self.visualizer.clear();
        self.publish();
    }

    fn publish(&mut self) {
        let metadata = self.playlist.current_index().and_then(|index| {
            self.playlist.get(index).map(|song| TrackMetadata {
                title: song.title.clone(),
                index,
                total: self.playlist.len(),
            })
        });
        self.controls.set_metadata(metadata.as_ref());
        self.controls
            .set_playback_state(self.transition.state().is_playing());
    }
}

/// Silence now, start the source, ramp to unity over `seconds`. With `hold`
/// the ramp starts from wherever the gain curve currently is. Returns the
/// audio-clock time the ramp completes.
fn schedule_fade_in(chain: &mut SignalChain, seconds: f64, hold: bool) -> Result<f64> {
    let now = chain.current_time();
    let gain = chain.gain_mut().gain_mut();
    if hold {
        gain.cancel_and_hold_at_time(now);
    } else {
        gain.reset(0.0);
        gain.set_value_at_time(0.0, now);
    }
    gain.linear_ramp_to_value_at_time(1.0, now + seconds);

    chain.element_mut().play()?;
    Ok(now + seconds)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::io::output::{OfflineBackend, OfflineDriver};

    const RATE: u32 = 8_000;

    fn tone(seconds: f64) -> DecodedAudio {
        let frames = (seconds * RATE as f64) as usize;
        let samples = (0..frames)
            .map(|i| 0.5 * (std::f32::consts::TAU * 440.0 * i as f32 / RATE as f32).sin())
            .collect();
        DecodedAudio::from_samples(samples, 1, RATE)
    }

    fn player() -> (Player, OfflineDriver) {
        let (backend, driver) = OfflineBackend::new(RATE, 1);
        let config = PlayerConfig::default().analyser(crate::config::AnalyserConfig {
            fft_size: 512,
            ..Default::default()
        });
        (Player::new(config, Box::new(backend)), driver)
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(Option<String>, bool)>>>);

    impl MediaControls for Recorder {
        fn set_metadata(&mut self, metadata: Option<&TrackMetadata>) {
            self.0
                .borrow_mut()
                .push((metadata.map(|m| m.title.clone()), false));
        }

        fn set_playback_state(&mut self, playing: bool) {
            if let Some(last) = self.0.borrow_mut().last_mut() {
                last.1 = playing;
            }
        }
    }

    #[test]
    fn play_fades_in_and_settles() {
        let (mut player, mut driver) = player();
        player.add_decoded("a", tone(5.0));

        player.play_song(0).unwrap();
        assert_eq!(player.state(), TransitionState::FadingIn);
        assert_eq!(player.gain_value(), Some(0.0));
        assert!(player.render_active());

        driver.advance(0.4);
        let mid = player.gain_value().unwrap();
        assert!((mid - 0.5).abs() < 0.01, "halfway up the ramp: {mid}");

        driver.advance(0.5);
        player.poll().unwrap();
        assert_eq!(player.state(), TransitionState::Playing);
        assert_eq!(player.gain_value(), Some(1.0));
    }

    #[test]
    fn pause_completes_after_fade_out() {
        let (mut player, mut driver) = player();
        player.add_decoded("a", tone(5.0));
        player.play_song(0).unwrap();
        driver.advance(1.0);
        player.poll().unwrap();

        player.pause();
        assert_eq!(player.state(), TransitionState::FadingOut);
        assert!(player.render_active(), "visuals decay during the fade");

        driver.advance(0.25);
        player.poll().unwrap();
        assert_eq!(player.state(), TransitionState::FadingOut);

        driver.advance(0.3);
        player.poll().unwrap();
        assert_eq!(player.state(), TransitionState::Paused);
        assert!(!player.render_active());
        assert_eq!(driver.advance(0.1), 0.0);
    }

    #[test]
    fn resume_during_fade_out_starts_from_held_gain() {
        let (mut player, mut driver) = player();
        player.add_decoded("a", tone(5.0));
        player.play_song(0).unwrap();
        driver.advance(1.0);
        player.poll().unwrap();

        player.pause();
        driver.advance(0.25);
        let held = player.gain_value().unwrap();
        assert!(held > 0.4 && held < 0.6, "half-way down: {held}");

        player.play().unwrap();
        assert_eq!(player.state(), TransitionState::FadingIn);
        let after = player.gain_value().unwrap();
        assert!((after - held).abs() < 1e-3, "no dip to zero");
    }

    #[test]
    fn play_without_songs_fails() {
        let (mut player, _driver) = player();
        assert!(matches!(player.play(), Err(PlayerError::NoSource)));
        assert_eq!(player.state(), TransitionState::Stopped);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let (mut player, _driver) = player();
        player.add_decoded("a", tone(1.0));
        assert!(matches!(
            player.play_song(3),
            Err(PlayerError::SongIndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn missing_file_resets_to_stopped() {
        let (mut player, _driver) = player();
        player.add_files(["/definitely/not/here.mp3"]);
        assert!(player.play_song(0).is_err());
        assert_eq!(player.state(), TransitionState::Stopped);
        assert!(!player.render_active());
    }

    #[test]
    fn seek_and_skip_clamp_to_the_song() {
        let (mut player, _driver) = player();
        player.add_decoded("a", tone(2.0));
        player.play_song(0).unwrap();

        player.seek(1.5);
        assert!((player.current_time() - 1.5).abs() < 1e-6);
        player.skip_time(10.0);
        assert!((player.current_time() - 2.0).abs() < 1e-6);
        player.skip_time(-10.0);
        assert_eq!(player.current_time(), 0.0);
        player.skip_time(f64::NAN);
        assert_eq!(player.current_time(), 0.0);
        assert!((player.duration() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn animation_frames_follow_the_render_loop() {
        let (mut player, mut driver) = player();
        player.visualizer_mut().attach_surface(90, 20);
        assert!(!player.animation_frame(), "nothing pending before play");

        player.add_decoded("a", tone(5.0));
        player.play_song(0).unwrap();
        driver.advance(0.5);
        assert!(player.animation_frame());
        assert!(player.animation_frame(), "each frame queues the next");

        player.shutdown();
        assert!(!player.animation_frame());
        assert!(!player.render_active());
    }

    fn write_wav(path: &std::path::Path, seconds: f64) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(seconds * RATE as f64) as usize {
            writer.write_sample(((i % 40) as i16 - 20) * 500).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn only_the_loaded_file_stays_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|name| {
                let path = dir.path().join(format!("{name}.wav"));
                write_wav(&path, 0.5);
                path
            })
            .collect();

        let (mut player, mut driver) = player();
        let songs = player.add_files(paths);
        for index in 0..songs.len() {
            player.play_song(index).unwrap();
            driver.advance(0.1);
        }

        assert!(!player.media.is_cached(&songs[0].url));
        assert!(!player.media.is_cached(&songs[1].url));
        assert!(player.media.is_cached(&songs[2].url));
        assert!(player.is_playing());
        assert!((player.duration() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn media_controls_follow_the_current_song() {
        let (player, mut driver) = player();
        let recorder = Recorder::default();
        let mut player = player.with_media_controls(recorder.clone());

        let song = player.add_decoded("first", tone(5.0));
        player.handle_media_action(MediaAction::Play).unwrap();
        assert_eq!(
            recorder.0.borrow().last().cloned(),
            Some((Some("first".to_string()), true))
        );

        driver.advance(1.0);
        player.handle_media_action(MediaAction::TogglePlayback).unwrap();
        assert_eq!(recorder.0.borrow().last().map(|e| e.1), Some(false));

        player.delete_song(song.id);
        assert_eq!(recorder.0.borrow().last().cloned(), Some((None, false)));
    }
}
