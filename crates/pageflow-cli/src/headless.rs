//! Headless collaborators
//!
//! Stand-ins for the browser side of the runtime: a curtain that takes a fixed
//! time to cover and reveal, wrappers with a settable content height, and
//! surfaces that only trace what they are told.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use pageflow_core::animation::{AnimatedElement, AnimationRegistry, AnimationUnit, DEFAULT_CATEGORIES};
use pageflow_core::collab::{
    Completion, DocumentStyle, NavigationUi, OverlayOptions, RenderSurface, TransitionOverlay,
};
use pageflow_core::event::{PointerEvent, Viewport};
use pageflow_core::page::{PageTheme, ScrollWrapper, Transform};
use pageflow_core::scroll::{NormalizedWheel, ScrollState};

/// Ordered record of collaborator calls, shared by every stand-in
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        let entry = entry.into();
        debug!(entry = %entry, "Journal");
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

/// Curtain that covers and reveals after a fixed delay
pub struct CurtainOverlay {
    duration: Duration,
    journal: Journal,
}

impl CurtainOverlay {
    pub fn new(duration: Duration, journal: Journal) -> Self {
        Self { duration, journal }
    }

    fn after_delay(&self) -> Completion {
        if self.duration.is_zero() {
            return Completion::ready();
        }

        let (completer, completion) = Completion::channel();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            completer.complete();
        });
        completion
    }
}

impl TransitionOverlay for CurtainOverlay {
    fn show(&mut self, options: OverlayOptions) -> Completion {
        let color = options.color.unwrap_or_else(|| "none".to_string());
        info!(color = %color, "Curtain covering");
        self.journal.record(format!("overlay:show:{color}"));
        self.after_delay()
    }

    fn hide(&mut self) -> Completion {
        info!("Curtain revealing");
        self.journal.record("overlay:hide");
        self.after_delay()
    }
}

/// Surface that traces lifecycle calls and counts frames
pub struct TraceSurface {
    journal: Journal,
    frames: Arc<AtomicU64>,
}

impl TraceSurface {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            frames: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared frame counter, readable after the surface moves into the app
    pub fn frames(&self) -> Arc<AtomicU64> {
        self.frames.clone()
    }
}

impl RenderSurface for TraceSurface {
    fn on_preloaded(&mut self) {
        self.journal.record("surface:preloaded");
    }

    fn on_change(&mut self, template: &str) {
        self.journal.record(format!("surface:change:{template}"));
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.journal
            .record(format!("surface:resize:{}x{}", viewport.width, viewport.height));
    }

    fn on_touch_down(&mut self, event: &PointerEvent) {
        debug!(y = event.client_y, "Surface touch down");
    }

    fn on_wheel(&mut self, wheel: &NormalizedWheel) {
        debug!(pixel_y = wheel.pixel_y, spin_y = wheel.spin_y, "Surface wheel");
    }

    fn update(&mut self, scroll: &ScrollState) {
        self.frames.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(current = scroll.current, "Surface frame");
    }
}

pub struct TraceNavigation {
    journal: Journal,
}

impl TraceNavigation {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl NavigationUi for TraceNavigation {
    fn on_change(&mut self, template: &str) {
        self.journal.record(format!("navigation:{template}"));
    }
}

pub struct TraceDocument {
    journal: Journal,
}

impl TraceDocument {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl DocumentStyle for TraceDocument {
    fn apply(&mut self, theme: &PageTheme) {
        self.journal.record(format!(
            "document:{}/{}",
            theme.background.as_deref().unwrap_or("-"),
            theme.color.as_deref().unwrap_or("-")
        ));
    }
}

/// Shared handle to a simulated wrapper's geometry
#[derive(Debug, Clone, Default)]
pub struct WrapperHandle {
    height: Arc<AtomicU64>,
    translation: Arc<AtomicI64>,
}

impl WrapperHandle {
    pub fn new(height: f64) -> Self {
        let handle = Self::default();
        handle.set_height(height);
        handle
    }

    pub fn set_height(&self, height: f64) {
        self.height.store(height.to_bits(), Ordering::Relaxed);
    }

    pub fn height(&self) -> f64 {
        f64::from_bits(self.height.load(Ordering::Relaxed))
    }

    /// Last applied translation in whole pixels
    pub fn translation(&self) -> i64 {
        self.translation.load(Ordering::Relaxed)
    }
}

pub struct SimulatedWrapper(WrapperHandle);

impl SimulatedWrapper {
    pub fn new(handle: WrapperHandle) -> Self {
        Self(handle)
    }
}

impl ScrollWrapper for SimulatedWrapper {
    fn client_height(&self) -> f64 {
        self.0.height()
    }

    fn apply_transform(&mut self, transform: Transform) {
        self.0.translation.store(transform.pixels(), Ordering::Relaxed);
    }
}

/// Moves its element at a fraction of the scroll speed
struct Parallax {
    id: String,
    speed: f64,
    offset: f64,
}

impl AnimationUnit for Parallax {
    fn update(&mut self, scroll: &ScrollState) {
        self.offset = scroll.current * self.speed;
        tracing::trace!(id = %self.id, offset = self.offset, "Parallax");
    }
}

/// Fires once when the page has scrolled past its threshold
struct Reveal {
    id: String,
    threshold: f64,
    revealed: bool,
    journal: Journal,
}

impl AnimationUnit for Reveal {
    fn on_resize(&mut self) {
        debug!(id = %self.id, "Reveal bounds recomputed");
    }

    fn update(&mut self, scroll: &ScrollState) {
        if !self.revealed && scroll.current >= self.threshold {
            self.revealed = true;
            self.journal.record(format!("reveal:{}", self.id));
        }
    }
}

/// Registry covering every default category with a sample behavior
///
/// `parallax` reads `data-speed`; every other category reveals once the page
/// scrolls past `data-threshold` (0 if absent).
pub fn sample_registry(journal: &Journal) -> AnimationRegistry {
    let mut registry = AnimationRegistry::new();

    for tag in DEFAULT_CATEGORIES {
        if tag == "parallax" {
            registry.register(tag, |element: &AnimatedElement| {
                Box::new(Parallax {
                    id: element.id.clone(),
                    speed: element.data_f64("speed").unwrap_or(0.5),
                    offset: 0.0,
                })
            });
        } else {
            let journal = journal.clone();
            registry.register(tag, move |element: &AnimatedElement| {
                Box::new(Reveal {
                    id: element.id.clone(),
                    threshold: element.data_f64("threshold").unwrap_or(0.0),
                    revealed: false,
                    journal: journal.clone(),
                })
            });
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_registry_covers_default_categories() {
        let registry = sample_registry(&Journal::default());
        assert_eq!(registry.tags().collect::<Vec<_>>(), DEFAULT_CATEGORIES);
    }

    #[test]
    fn test_reveal_fires_once() {
        let journal = Journal::default();
        let registry = sample_registry(&journal);
        let element = AnimatedElement::new("title", "paragraph").with_data("threshold", "100");
        let mut units = registry.instantiate(&[element]);

        let mut scroll = ScrollState::with_limit(0.07, 1000.0);
        for current in [50.0, 120.0, 300.0] {
            scroll.current = current;
            units[0].update(&scroll);
        }

        assert_eq!(journal.entries(), vec!["reveal:title"]);
    }

    #[test]
    fn test_wrapper_handle_tracks_geometry() {
        let handle = WrapperHandle::new(2400.0);
        let mut wrapper = SimulatedWrapper::new(handle.clone());
        assert_eq!(wrapper.client_height(), 2400.0);

        handle.set_height(3000.0);
        assert_eq!(wrapper.client_height(), 3000.0);

        wrapper.apply_transform(Transform::scroll(70.4));
        assert_eq!(handle.translation(), -70);
    }

    #[tokio::test(start_paused = true)]
    async fn test_curtain_resolves_after_delay() {
        let journal = Journal::default();
        let mut curtain = CurtainOverlay::new(Duration::from_millis(600), journal.clone());

        let mut covered = curtain.show(OverlayOptions {
            color: Some("#c97164".to_string()),
        });
        assert!(!covered.try_complete());

        tokio::time::sleep(Duration::from_millis(601)).await;
        assert!(covered.try_complete());
        assert_eq!(journal.entries(), vec!["overlay:show:#c97164"]);
    }

    #[test]
    fn test_instant_curtain() {
        let mut curtain = CurtainOverlay::new(Duration::ZERO, Journal::default());
        assert!(curtain.hide().is_complete());
    }
}
