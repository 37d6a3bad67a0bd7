//! Scripted player runtime for driving the playback controller in tests.
//!
//! Every engine, the surface and the frame record what was asked of them in a
//! shared [`Probe`] and keep the [`EventSink`] they were handed so a test can
//! emit engine events on their behalf.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use channel_player::player::{
    AdaptiveEngine, AdaptiveEngineConfig, DashEngine, EngineEvent, EventSink, PlayerRuntime,
    VideoSurface,
};
use channel_player::streaming::classification::HLS_NATIVE_MIME;

#[derive(Debug, Default)]
pub struct Probe {
    pub adaptive_created: usize,
    pub adaptive_destroyed: usize,
    pub adaptive_config: Option<AdaptiveEngineConfig>,
    pub adaptive_loaded: Vec<String>,
    pub adaptive_attached: usize,
    /// Adaptive engine calls in the order they were made
    pub adaptive_calls: Vec<&'static str>,
    pub dash_created: usize,
    pub dash_reset: usize,
    pub dash_initialized: Vec<(String, bool)>,
    pub native_sources: Vec<String>,
    pub appended_sources: Vec<(String, String)>,
    pub loads: usize,
    pub surface_resets: usize,
    pub restores: usize,
    pub frame_urls: Vec<String>,
    pub embedded: bool,

    pub adaptive_sinks: Vec<EventSink>,
    pub dash_sinks: Vec<EventSink>,
    pub native_sinks: Vec<EventSink>,
    pub play_sinks: Vec<EventSink>,
    pub frame_sinks: Vec<EventSink>,
}

impl Probe {
    fn last(sinks: &[EventSink], what: &str) -> EventSink {
        sinks
            .last()
            .cloned()
            .unwrap_or_else(|| panic!("no {what} sink recorded"))
    }

    pub fn adaptive(&self) -> EventSink {
        Self::last(&self.adaptive_sinks, "adaptive engine")
    }

    pub fn dash(&self) -> EventSink {
        Self::last(&self.dash_sinks, "dash engine")
    }

    pub fn native(&self) -> EventSink {
        Self::last(&self.native_sinks, "native source")
    }

    pub fn play(&self) -> EventSink {
        Self::last(&self.play_sinks, "play()")
    }

    pub fn frame(&self) -> EventSink {
        Self::last(&self.frame_sinks, "fallback frame")
    }
}

pub type SharedProbe = Rc<RefCell<Probe>>;

pub struct MockSurface {
    probe: SharedProbe,
    native_hls: bool,
}

impl VideoSurface for MockSurface {
    fn can_play_type(&self, mime: &str) -> bool {
        self.native_hls && mime == HLS_NATIVE_MIME
    }

    fn set_source(&mut self, url: &str, events: EventSink) {
        let mut probe = self.probe.borrow_mut();
        probe.native_sources.push(url.to_string());
        probe.native_sinks.push(events);
    }

    fn append_source(&mut self, url: &str, mime: &str) {
        self.probe
            .borrow_mut()
            .appended_sources
            .push((url.to_string(), mime.to_string()));
    }

    fn load(&mut self) {
        self.probe.borrow_mut().loads += 1;
    }

    fn play(&mut self, completion: EventSink) {
        self.probe.borrow_mut().play_sinks.push(completion);
    }

    fn reset(&mut self) {
        self.probe.borrow_mut().surface_resets += 1;
    }

    fn embed_frame(&mut self, url: &str, events: EventSink) {
        let mut probe = self.probe.borrow_mut();
        probe.embedded = true;
        probe.frame_urls.push(url.to_string());
        probe.frame_sinks.push(events);
    }

    fn restore(&mut self) {
        let mut probe = self.probe.borrow_mut();
        if probe.embedded {
            probe.embedded = false;
            probe.restores += 1;
        }
    }

    fn is_embedded(&self) -> bool {
        self.probe.borrow().embedded
    }
}

struct MockAdaptive {
    probe: SharedProbe,
}

impl AdaptiveEngine for MockAdaptive {
    fn load_source(&mut self, url: &str) {
        let mut probe = self.probe.borrow_mut();
        probe.adaptive_loaded.push(url.to_string());
        probe.adaptive_calls.push("load_source");
    }

    fn attach_media(&mut self) {
        let mut probe = self.probe.borrow_mut();
        probe.adaptive_attached += 1;
        probe.adaptive_calls.push("attach_media");
    }

    fn destroy(&mut self) {
        self.probe.borrow_mut().adaptive_destroyed += 1;
    }
}

struct MockDash {
    probe: SharedProbe,
}

impl DashEngine for MockDash {
    fn initialize(&mut self, url: &str, autoplay: bool) {
        self.probe
            .borrow_mut()
            .dash_initialized
            .push((url.to_string(), autoplay));
    }

    fn reset(&mut self) {
        self.probe.borrow_mut().dash_reset += 1;
    }
}

pub struct MockRuntime {
    pub probe: SharedProbe,
    surface: MockSurface,
    adaptive: bool,
}

impl MockRuntime {
    pub fn new(adaptive: bool, native_hls: bool) -> Self {
        let probe = SharedProbe::default();
        Self {
            surface: MockSurface {
                probe: probe.clone(),
                native_hls,
            },
            probe,
            adaptive,
        }
    }

    /// Adaptive engine available; native HLS too.
    pub fn full() -> Self {
        Self::new(true, true)
    }

    pub fn native_only() -> Self {
        Self::new(false, true)
    }

    /// Neither the adaptive engine nor native HLS.
    pub fn bare() -> Self {
        Self::new(false, false)
    }
}

impl PlayerRuntime for MockRuntime {
    fn surface(&mut self) -> &mut dyn VideoSurface {
        &mut self.surface
    }

    fn adaptive_supported(&self) -> bool {
        self.adaptive
    }

    fn create_adaptive(
        &mut self,
        config: &AdaptiveEngineConfig,
        events: EventSink,
    ) -> Box<dyn AdaptiveEngine> {
        let mut probe = self.probe.borrow_mut();
        probe.adaptive_created += 1;
        probe.adaptive_config = Some(config.clone());
        probe.adaptive_sinks.push(events);
        Box::new(MockAdaptive {
            probe: self.probe.clone(),
        })
    }

    fn create_dash(&mut self, events: EventSink) -> Box<dyn DashEngine> {
        let mut probe = self.probe.borrow_mut();
        probe.dash_created += 1;
        probe.dash_sinks.push(events);
        Box::new(MockDash {
            probe: self.probe.clone(),
        })
    }
}

pub fn fatal(details: &str) -> EngineEvent {
    EngineEvent::EngineError {
        fatal: true,
        details: details.to_string(),
    }
}
