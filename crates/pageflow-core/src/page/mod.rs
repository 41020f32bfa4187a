//! Virtual pages
//!
//! A page is built once at startup and then only ever shown or hidden. While
//! visible it owns the scroll input and integrates its [`ScrollState`] every
//! frame, driving its animation units with the result.

pub mod element;
pub mod theme;

pub use element::{PageRoot, ScrollWrapper, Transform};
pub use theme::PageTheme;

use crate::animation::{AnimationRegistry, AnimationUnit};
use crate::config::ScrollConfig;
use crate::detection::DeviceClass;
use crate::event::{PointerEvent, Viewport};
use crate::scroll::{NormalizedWheel, ScrollState};
use crate::{Error, Result};

/// Everything a page needs from the application at creation time
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub registry: &'a AnimationRegistry,
    pub scroll: ScrollConfig,
    pub device: DeviceClass,
    pub viewport: Viewport,
}

pub struct Page {
    root: PageRoot,
    wrapper: Option<Box<dyn ScrollWrapper>>,
    animations: Vec<Box<dyn AnimationUnit>>,
    scroll: ScrollState,
    settings: ScrollConfig,
    device: DeviceClass,
    is_visible: bool,
    listening: bool,
    /// Start Y of the active drag gesture
    drag_start: Option<f64>,
    bounds_pending: bool,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("template", &self.root.template)
            .field("scroll", &self.scroll)
            .field("animations", &self.animations.len())
            .field("is_visible", &self.is_visible)
            .finish()
    }
}

impl Page {
    /// Build a page and its animation units
    ///
    /// A scrollable page without a wrapper is a configuration error.
    pub fn create(
        root: PageRoot,
        wrapper: Option<Box<dyn ScrollWrapper>>,
        context: PageContext<'_>,
    ) -> Result<Self> {
        if root.scrollable && wrapper.is_none() {
            return Err(Error::MissingElement {
                template: root.template.clone(),
                element: "wrapper".to_string(),
            });
        }

        let mut scroll = ScrollState::new(context.scroll.ease);
        if let Some(wrapper) = wrapper.as_ref() {
            scroll.set_limit(wrapper.client_height(), context.viewport.height);
        }

        let animations = context.registry.instantiate(&root.elements);

        tracing::debug!(
            template = %root.template,
            animations = animations.len(),
            limit = scroll.limit,
            "Page created"
        );

        Ok(Self {
            root,
            wrapper,
            animations,
            scroll,
            settings: context.scroll,
            device: context.device,
            is_visible: false,
            listening: false,
            drag_start: None,
            bounds_pending: false,
        })
    }

    pub fn template(&self) -> &str {
        &self.root.template
    }

    pub fn root(&self) -> &PageRoot {
        &self.root
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Whether input handlers are attached
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn has_wrapper(&self) -> bool {
        self.wrapper.is_some()
    }

    pub fn theme(&self) -> PageTheme {
        PageTheme::from_root(&self.root)
    }

    /// Curtain color to use when navigating to this page
    pub fn transition_color(&self) -> Option<&str> {
        self.root.attribute("color")
    }

    /// Zero the scroll state
    pub fn reset(&mut self) {
        self.scroll = ScrollState::new(self.settings.ease);
        self.drag_start = None;
    }

    /// Jump to an offset without easing
    pub fn set(&mut self, value: f64) {
        self.scroll.jump(value);

        if let Some(wrapper) = self.wrapper.as_mut() {
            wrapper.apply_transform(Transform::scroll(self.scroll.current));
        }
    }

    /// Make the page active and return the theme the document should take
    pub fn show(&mut self, url: &str) -> PageTheme {
        self.reset();
        self.is_visible = true;
        self.add_event_listeners();
        // reset() dropped the limit; recompute it on the next frame
        self.request_bounds_recompute();

        tracing::debug!(template = %self.root.template, url, "Page shown");

        self.theme()
    }

    pub fn hide(&mut self, url: &str) {
        self.is_visible = false;
        self.remove_event_listeners();

        tracing::debug!(template = %self.root.template, url, "Page hidden");
    }

    fn add_event_listeners(&mut self) {
        self.listening = true;
    }

    fn remove_event_listeners(&mut self) {
        self.listening = false;
        self.drag_start = None;
    }

    /// Mark the scroll bounds stale; coalesces until the next frame
    pub fn request_bounds_recompute(&mut self) {
        self.bounds_pending = true;
    }

    pub fn bounds_pending(&self) -> bool {
        self.bounds_pending
    }

    /// Recompute the scroll limit from post-layout geometry and notify units
    ///
    /// Runs at most once per request. Returns whether anything ran.
    pub fn apply_bounds_recompute(&mut self, viewport: Viewport) -> bool {
        if !self.bounds_pending {
            return false;
        }
        self.bounds_pending = false;

        if let Some(wrapper) = self.wrapper.as_ref() {
            self.scroll.set_limit(wrapper.client_height(), viewport.height);
        }

        for animation in self.animations.iter_mut() {
            animation.on_resize();
        }

        tracing::trace!(template = %self.root.template, limit = self.scroll.limit, "Bounds recomputed");

        true
    }

    pub fn on_touch_down(&mut self, event: &PointerEvent) {
        if !self.device.is_phone() || !self.listening {
            return;
        }

        self.scroll.position = self.scroll.current;
        self.drag_start = Some(event.client_y);
    }

    pub fn on_touch_move(&mut self, event: &PointerEvent) {
        if !self.device.is_phone() || !self.listening {
            return;
        }
        let Some(start) = self.drag_start else {
            return;
        };

        let distance = (start - event.client_y) * self.settings.touch_multiplier;

        self.scroll.target = self.scroll.position + distance;
    }

    pub fn on_touch_up(&mut self, _event: &PointerEvent) {
        if !self.device.is_phone() {
            return;
        }

        self.drag_start = None;
    }

    /// Push the wheel delta into the target and return the applied delta
    pub fn on_wheel(&mut self, wheel: &NormalizedWheel) -> f64 {
        if !self.listening {
            return 0.0;
        }

        let speed = wheel.pixel_y;

        self.scroll.target += speed;

        speed
    }

    /// Advance one frame
    pub fn update(&mut self) {
        self.scroll.integrate(self.settings.snap_threshold);

        if let Some(wrapper) = self.wrapper.as_mut() {
            wrapper.apply_transform(Transform::scroll(self.scroll.current));
        }

        for animation in self.animations.iter_mut() {
            animation.update(&self.scroll);
        }

        self.scroll.commit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimatedElement;
    use crate::config::WheelConfig;
    use crate::scroll::{normalize_wheel, WheelEvent};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct WrapperState {
        height: f64,
        transforms: Vec<Transform>,
    }

    struct FakeWrapper(Arc<Mutex<WrapperState>>);

    impl ScrollWrapper for FakeWrapper {
        fn client_height(&self) -> f64 {
            self.0.lock().unwrap().height
        }

        fn apply_transform(&mut self, transform: Transform) {
            self.0.lock().unwrap().transforms.push(transform);
        }
    }

    #[derive(Default)]
    struct UnitLog {
        updates: Vec<ScrollState>,
        resizes: usize,
    }

    struct Recorder(Arc<Mutex<UnitLog>>);

    impl AnimationUnit for Recorder {
        fn on_resize(&mut self) {
            self.0.lock().unwrap().resizes += 1;
        }

        fn update(&mut self, scroll: &ScrollState) {
            self.0.lock().unwrap().updates.push(*scroll);
        }
    }

    fn registry(log: &Arc<Mutex<UnitLog>>) -> AnimationRegistry {
        let mut registry = AnimationRegistry::new();
        let log = log.clone();
        registry.register("parallax", move |_| Box::new(Recorder(log.clone())));
        registry
    }

    fn context(registry: &AnimationRegistry, device: DeviceClass) -> PageContext<'_> {
        PageContext {
            registry,
            scroll: ScrollConfig::default(),
            device,
            viewport: Viewport::new(1280.0, 800.0),
        }
    }

    fn scrollable_page(
        height: f64,
        device: DeviceClass,
    ) -> (Page, Arc<Mutex<WrapperState>>, Arc<Mutex<UnitLog>>) {
        let wrapper = Arc::new(Mutex::new(WrapperState {
            height,
            ..Default::default()
        }));
        let log = Arc::new(Mutex::new(UnitLog::default()));
        let registry = registry(&log);
        let root = PageRoot::new("/")
            .with_data("background", "#111111")
            .with_data("color", "#eeeeee")
            .with_element(AnimatedElement::new("hero", "parallax"));
        let page = Page::create(
            root,
            Some(Box::new(FakeWrapper(wrapper.clone()))),
            context(&registry, device),
        )
        .unwrap();
        (page, wrapper, log)
    }

    fn wheel(pixels: f64) -> NormalizedWheel {
        normalize_wheel(&WheelEvent::pixels(pixels), &WheelConfig::default())
    }

    #[test]
    fn test_create_computes_limit() {
        let (page, _, _) = scrollable_page(3000.0, DeviceClass::Desktop);
        assert_eq!(page.scroll().limit, 2200.0);
        assert_eq!(page.animation_count(), 1);
        assert!(!page.is_visible());
    }

    #[test]
    fn test_scrollable_page_requires_wrapper() {
        let registry = AnimationRegistry::new();
        let err = Page::create(PageRoot::new("/about"), None, context(&registry, DeviceClass::Desktop))
            .unwrap_err();
        assert!(matches!(err, Error::MissingElement { .. }));
    }

    #[test]
    fn test_static_page_still_drives_units() {
        let log = Arc::new(Mutex::new(UnitLog::default()));
        let registry = registry(&log);
        let root = PageRoot::new("/contact")
            .static_page()
            .with_element(AnimatedElement::new("title", "parallax"));
        let mut page = Page::create(root, None, context(&registry, DeviceClass::Desktop)).unwrap();

        page.show("/contact");
        page.on_wheel(&wheel(300.0));
        page.update();
        page.update();

        assert_eq!(page.scroll().current, 0.0);
        assert_eq!(log.lock().unwrap().updates.len(), 2);
    }

    #[test]
    fn test_show_returns_theme_and_resets() {
        let (mut page, _, _) = scrollable_page(3000.0, DeviceClass::Desktop);
        page.show("/");
        page.on_wheel(&wheel(400.0));
        page.apply_bounds_recompute(Viewport::new(1280.0, 800.0));
        page.update();
        assert!(page.scroll().current > 0.0);

        page.hide("/about");
        let theme = page.show("/");
        assert_eq!(theme.background.as_deref(), Some("#111111"));
        assert_eq!(theme.color.as_deref(), Some("#eeeeee"));
        assert_eq!(page.scroll().current, 0.0);
        assert_eq!(page.scroll().target, 0.0);
        assert!(page.bounds_pending());
    }

    #[test]
    fn test_wheel_scenario() {
        let (mut page, _, _) = scrollable_page(1300.0, DeviceClass::Desktop);
        page.show("/");
        page.apply_bounds_recompute(Viewport::new(1280.0, 800.0));
        assert_eq!(page.scroll().limit, 500.0);

        assert_eq!(page.on_wheel(&wheel(50.0)), 50.0);
        assert_eq!(page.on_wheel(&wheel(50.0)), 50.0);
        assert_eq!(page.scroll().target, 100.0);

        page.update();
        assert_eq!(page.scroll().target, 100.0);
    }

    #[test]
    fn test_hidden_page_ignores_input() {
        let (mut page, _, _) = scrollable_page(3000.0, DeviceClass::Phone);
        assert_eq!(page.on_wheel(&wheel(50.0)), 0.0);
        page.on_touch_down(&PointerEvent::touch(500.0));
        page.on_touch_move(&PointerEvent::touch(400.0));
        assert_eq!(page.scroll().target, 0.0);
    }

    #[test]
    fn test_gesture_is_relative_to_snapshot() {
        let (mut page, _, _) = scrollable_page(5000.0, DeviceClass::Phone);
        page.show("/");
        page.apply_bounds_recompute(Viewport::new(1280.0, 800.0));
        page.set(240.0);

        page.on_touch_down(&PointerEvent::touch(600.0));
        assert_eq!(page.scroll().position, 240.0);

        page.on_touch_move(&PointerEvent::touch(580.0));
        page.on_touch_move(&PointerEvent::touch(590.0));
        page.on_touch_move(&PointerEvent::touch(500.0));
        assert_eq!(page.scroll().target, 240.0 + (600.0 - 500.0) * 3.0);

        page.on_touch_up(&PointerEvent::touch(500.0));
        page.on_touch_move(&PointerEvent::touch(100.0));
        assert_eq!(page.scroll().target, 540.0);
    }

    #[test]
    fn test_touch_ignored_on_desktop() {
        let (mut page, _, _) = scrollable_page(5000.0, DeviceClass::Desktop);
        page.show("/");
        page.on_touch_down(&PointerEvent::mouse(0.0, 600.0));
        page.on_touch_move(&PointerEvent::mouse(0.0, 100.0));
        assert_eq!(page.scroll().target, 0.0);
    }

    #[test]
    fn test_update_applies_transform_and_forwards_state() {
        let (mut page, wrapper, log) = scrollable_page(3000.0, DeviceClass::Desktop);
        page.show("/");
        page.apply_bounds_recompute(Viewport::new(1280.0, 800.0));
        page.on_wheel(&wheel(1000.0));

        page.update();
        page.update();

        let wrapper = wrapper.lock().unwrap();
        assert_eq!(wrapper.transforms.len(), 2);
        assert_eq!(wrapper.transforms[0].to_string(), "translate3d(0, -70px, 0)");

        let log = log.lock().unwrap();
        assert_eq!(log.updates.len(), 2);
        // Units see the tick before `last` is committed
        assert_eq!(log.updates[1].last, 70.0);
        assert_eq!(log.updates[1].current, page.scroll().current);
        assert_eq!(page.scroll().last, page.scroll().current);
    }

    #[test]
    fn test_bounds_recompute_coalesces() {
        let (mut page, wrapper, log) = scrollable_page(3000.0, DeviceClass::Desktop);
        wrapper.lock().unwrap().height = 4000.0;

        page.request_bounds_recompute();
        page.request_bounds_recompute();
        assert_eq!(page.scroll().limit, 2200.0);

        assert!(page.apply_bounds_recompute(Viewport::new(1280.0, 1000.0)));
        assert!(!page.apply_bounds_recompute(Viewport::new(1280.0, 1000.0)));
        assert_eq!(page.scroll().limit, 3000.0);
        assert_eq!(log.lock().unwrap().resizes, 1);
    }

    #[test]
    fn test_show_hide_cycles_are_idempotent() {
        let (mut page, _, _) = scrollable_page(3000.0, DeviceClass::Desktop);
        for _ in 0..3 {
            page.show("/");
            page.show("/");
            assert!(page.is_visible() && page.is_listening());
            page.hide("/about");
            page.hide("/about");
            assert!(!page.is_visible() && !page.is_listening());
        }
        assert_eq!(page.animation_count(), 1);
    }
}
