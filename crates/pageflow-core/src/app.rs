//! Page orchestrator
//!
//! Owns every page, the transition curtain, the render surface and the
//! history, and sequences them:
//!
//! - bootstrap: preload signal → resize pass → surface preloaded → show page
//! - navigation: cover → push → hide old → notify → show new → resize → reveal
//! - frame: preload/transition polling → deferred resize → page → surface

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use url::Url;
use uuid::Uuid;

use crate::animation::AnimationRegistry;
use crate::collab::{
    Completion, DocumentStyle, NavigationUi, OverlayOptions, RenderSurface, TransitionOverlay,
};
use crate::config::AppConfig;
use crate::detection::DeviceClass;
use crate::event::{AppEvent, PointerEvent, Viewport};
use crate::navigation::{classify_link, template_for, History, LinkAction, MemoryHistory};
use crate::page::{Page, PageContext, PageRoot, PageTheme, ScrollWrapper};
use crate::scroll::{normalize_wheel, ScrollState, WheelEvent};
use crate::{Error, Result};

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// Curtain is covering; carries the transition id used in logs
    Started(Uuid),
    /// Dropped: another transition is running or preloading has not finished
    Ignored,
}

/// Observable navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPhase {
    Idle,
    /// Waiting for the curtain to cover the outgoing page
    Masking,
    /// Waiting for the curtain to reveal the incoming page
    Revealing,
}

enum Transition {
    Idle,
    Masking {
        id: Uuid,
        target: String,
        push: bool,
        signal: Completion,
    },
    Revealing {
        id: Uuid,
        signal: Completion,
    },
}

/// Builder collecting pages and collaborators
pub struct AppBuilder {
    config: Arc<AppConfig>,
    registry: AnimationRegistry,
    pages: Vec<(PageRoot, Option<Box<dyn ScrollWrapper>>)>,
    overlay: Option<Box<dyn TransitionOverlay>>,
    surface: Option<Box<dyn RenderSurface>>,
    navigation: Option<Box<dyn NavigationUi>>,
    document: Option<Box<dyn DocumentStyle>>,
    history: Option<Box<dyn History>>,
    preloader: Option<Completion>,
    viewport: Viewport,
    device: Option<DeviceClass>,
}

impl AppBuilder {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            registry: AnimationRegistry::new(),
            pages: Vec::new(),
            overlay: None,
            surface: None,
            navigation: None,
            document: None,
            history: None,
            preloader: None,
            viewport: Viewport::default(),
            device: None,
        }
    }

    pub fn registry(mut self, registry: AnimationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn page(mut self, root: PageRoot, wrapper: Option<Box<dyn ScrollWrapper>>) -> Self {
        self.pages.push((root, wrapper));
        self
    }

    pub fn overlay(mut self, overlay: impl TransitionOverlay + 'static) -> Self {
        self.overlay = Some(Box::new(overlay));
        self
    }

    pub fn surface(mut self, surface: impl RenderSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    pub fn navigation_ui(mut self, navigation: impl NavigationUi + 'static) -> Self {
        self.navigation = Some(Box::new(navigation));
        self
    }

    pub fn document(mut self, document: impl DocumentStyle + 'static) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    pub fn history(mut self, history: impl History + 'static) -> Self {
        self.history = Some(Box::new(history));
        self
    }

    /// One-shot signal fired when assets are loaded; defaults to resolved
    pub fn preloader(mut self, signal: Completion) -> Self {
        self.preloader = Some(signal);
        self
    }

    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Override the configured device class
    pub fn device(mut self, device: DeviceClass) -> Self {
        self.device = Some(device);
        self
    }

    pub fn build(self) -> Result<App> {
        self.config.validate()?;
        let origin = self.config.origin()?;
        let overlay = self.overlay.ok_or(Error::MissingCollaborator("transition overlay"))?;
        let history = self
            .history
            .unwrap_or_else(|| Box::new(MemoryHistory::new("/")));
        let device = self.device.unwrap_or_else(|| self.config.device.resolve());

        let context = PageContext {
            registry: &self.registry,
            scroll: self.config.scroll,
            device,
            viewport: self.viewport,
        };

        let mut pages = HashMap::with_capacity(self.pages.len());
        for (root, wrapper) in self.pages {
            let template = root.template.clone();
            if pages.contains_key(&template) {
                return Err(Error::DuplicateTemplate(template));
            }
            pages.insert(template, Page::create(root, wrapper, context)?);
        }

        let template = template_for(&history.pathname(), &origin)?;
        if !pages.contains_key(&template) {
            return Err(Error::UnknownTemplate(template));
        }

        tracing::info!(
            template = %template,
            pages = pages.len(),
            device = ?device,
            "Application created"
        );

        Ok(App {
            config: self.config,
            origin,
            page: template.clone(),
            template,
            pages,
            preloader: Some(self.preloader.unwrap_or_else(Completion::ready)),
            preloaded: false,
            transition: Transition::Idle,
            overlay,
            surface: self.surface,
            navigation: self.navigation,
            document: self.document,
            history,
            viewport: self.viewport,
            document_theme: PageTheme::default(),
            surface_resize_pending: false,
            pop_pending: false,
            frame: 0,
        })
    }
}

/// Application state
pub struct App {
    config: Arc<AppConfig>,
    origin: Url,
    /// Logical page identifier of the current location
    template: String,
    pages: HashMap<String, Page>,
    /// Key of the active page
    page: String,
    preloader: Option<Completion>,
    preloaded: bool,
    transition: Transition,
    overlay: Box<dyn TransitionOverlay>,
    surface: Option<Box<dyn RenderSurface>>,
    navigation: Option<Box<dyn NavigationUi>>,
    document: Option<Box<dyn DocumentStyle>>,
    history: Box<dyn History>,
    viewport: Viewport,
    document_theme: PageTheme,
    surface_resize_pending: bool,
    /// Host history moved while a transition was running
    pop_pending: bool,
    frame: u64,
}

impl App {
    pub fn builder(config: Arc<AppConfig>) -> AppBuilder {
        AppBuilder::new(config)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.pages.get(&self.page)
    }

    pub fn page(&self, template: &str) -> Option<&Page> {
        self.pages.get(template)
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Scroll state handed to the render surface each frame
    pub fn scroll(&self) -> Option<&ScrollState> {
        self.active_page().map(Page::scroll)
    }

    pub fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn document_theme(&self) -> &PageTheme {
        &self.document_theme
    }

    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.transition {
            Transition::Idle => TransitionPhase::Idle,
            Transition::Masking { .. } => TransitionPhase::Masking,
            Transition::Revealing { .. } => TransitionPhase::Revealing,
        }
    }

    /// Dispatch one host event
    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Wheel(wheel) => {
                self.on_wheel(&wheel);
            }
            AppEvent::PointerDown(pointer) => self.on_touch_down(&pointer),
            AppEvent::PointerMove(pointer) => self.on_touch_move(&pointer),
            AppEvent::PointerUp(pointer) => self.on_touch_up(&pointer),
            AppEvent::Resize(viewport) => self.set_viewport(viewport),
            AppEvent::ContentResize { template } => self.on_content_resize(&template)?,
            AppEvent::PopState => {
                self.on_pop_state()?;
            }
            AppEvent::HistoryBack => {
                self.history_back()?;
            }
            AppEvent::HistoryForward => {
                self.history_forward()?;
            }
            AppEvent::LinkClick { href } => {
                self.on_link_click(&href)?;
            }
            AppEvent::Navigate { url, push } => {
                self.request_navigation(&url, push)?;
            }
            AppEvent::Tick => self.tick(),
        }
        Ok(())
    }

    /*
     * Bootstrap.
     */

    fn poll_preloader(&mut self) {
        let done = self
            .preloader
            .as_mut()
            .map(Completion::try_complete)
            .unwrap_or(false);

        if done {
            self.preloader = None;
            self.on_preloaded();
        }
    }

    /// Wait for the preload signal and bootstrap the initial page
    pub async fn wait_preloaded(&mut self) {
        if let Some(signal) = self.preloader.as_mut() {
            signal.await;
        }
        self.poll_preloader();
    }

    fn on_preloaded(&mut self) {
        self.preloaded = true;

        self.on_resize();

        if let Some(surface) = self.surface.as_mut() {
            surface.on_preloaded();
        }

        let url = self.template.clone();
        if let Some(page) = self.pages.get_mut(&self.page) {
            let theme = page.show(&url);
            self.apply_theme(theme);
        }

        tracing::info!(template = %self.template, "Preload completed, page shown");
    }

    fn apply_theme(&mut self, theme: PageTheme) {
        self.document_theme = theme;

        if let Some(document) = self.document.as_mut() {
            document.apply(&self.document_theme);
        }
    }

    /*
     * Navigation.
     */

    /// Start a transition to `url`
    ///
    /// Unknown templates and foreign URLs are errors. While a transition is
    /// running, or before preloading finishes, requests are ignored.
    pub fn request_navigation(&mut self, url: &str, push: bool) -> Result<NavigateOutcome> {
        let template = template_for(url, &self.origin)?;
        let page = self
            .pages
            .get(&template)
            .ok_or_else(|| Error::UnknownTemplate(template.clone()))?;

        if !self.preloaded {
            tracing::debug!(url, "Navigation before preload completed, ignoring");
            return Ok(NavigateOutcome::Ignored);
        }

        if !matches!(self.transition, Transition::Idle) {
            tracing::debug!(url, phase = ?self.phase(), "Navigation already in progress, ignoring");
            return Ok(NavigateOutcome::Ignored);
        }

        let id = Uuid::new_v4();
        let options = OverlayOptions {
            color: page.transition_color().map(str::to_string),
        };

        tracing::info!(
            transition = %id,
            from = %self.template,
            to = %template,
            push,
            "Navigation started"
        );

        let signal = self.overlay.show(options);
        self.transition = Transition::Masking {
            id,
            target: template,
            push,
            signal,
        };

        // An overlay that is already covering lets the swap happen right away
        self.advance_transition();

        Ok(NavigateOutcome::Started(id))
    }

    /// Navigate and wait until the curtain has been revealed again
    pub async fn navigate(&mut self, url: &str, push: bool) -> Result<NavigateOutcome> {
        let outcome = self.request_navigation(url, push)?;
        if let NavigateOutcome::Started(_) = outcome {
            self.finish_transition().await;
        }
        Ok(outcome)
    }

    /// Wait for any running transition to complete
    pub async fn finish_transition(&mut self) {
        loop {
            match &mut self.transition {
                Transition::Idle => return,
                Transition::Masking { signal, .. } | Transition::Revealing { signal, .. } => {
                    signal.await
                }
            }
            self.advance_transition();
        }
    }

    /// Move the transition forward as far as its signals allow
    pub fn advance_transition(&mut self) {
        while self.step_transition() {}
    }

    fn step_transition(&mut self) -> bool {
        match std::mem::replace(&mut self.transition, Transition::Idle) {
            Transition::Idle => false,
            Transition::Masking {
                id,
                target,
                push,
                mut signal,
            } => {
                if !signal.try_complete() {
                    self.transition = Transition::Masking {
                        id,
                        target,
                        push,
                        signal,
                    };
                    return false;
                }

                self.swap_pages(id, &target, push);

                let signal = self.overlay.hide();
                self.transition = Transition::Revealing { id, signal };
                true
            }
            Transition::Revealing { id, mut signal } => {
                if !signal.try_complete() {
                    self.transition = Transition::Revealing { id, signal };
                    return false;
                }

                tracing::info!(transition = %id, template = %self.template, "Navigation finished");

                if std::mem::take(&mut self.pop_pending) {
                    self.replay_pop_state();
                }
                true
            }
        }
    }

    /// Runs with the old page fully covered
    fn swap_pages(&mut self, id: Uuid, target: &str, push: bool) {
        if push {
            self.history.push_state(target);
        }

        let pathname = self.history.pathname();
        if pathname != target {
            tracing::warn!(
                transition = %id,
                pathname = %pathname,
                target,
                "History location differs from navigation target"
            );
        }
        self.template = target.to_string();

        if let Some(page) = self.pages.get_mut(&self.page) {
            page.hide(target);
        }

        if let Some(navigation) = self.navigation.as_mut() {
            navigation.on_change(&self.template);
        }

        if let Some(surface) = self.surface.as_mut() {
            surface.on_change(&self.template);
        }

        self.page = target.to_string();
        if let Some(page) = self.pages.get_mut(&self.page) {
            let theme = page.show(target);
            self.apply_theme(theme);
        }

        self.on_resize();

        tracing::debug!(transition = %id, template = %self.template, "Pages swapped");
    }

    /// Handle a host history move; the location is already current
    ///
    /// A move that lands while a transition is running is replayed once the
    /// curtain has been revealed.
    pub fn on_pop_state(&mut self) -> Result<NavigateOutcome> {
        if self.preloaded && !matches!(self.transition, Transition::Idle) {
            tracing::debug!(phase = ?self.phase(), "History moved during transition, deferring");
            self.pop_pending = true;
            return Ok(NavigateOutcome::Ignored);
        }

        let url = self.history.pathname();
        self.request_navigation(&url, false)
    }

    fn replay_pop_state(&mut self) {
        let pathname = self.history.pathname();
        if template_for(&pathname, &self.origin).is_ok_and(|template| template == self.template) {
            return;
        }

        tracing::debug!(pathname = %pathname, "Replaying deferred history move");
        if let Err(err) = self.request_navigation(&pathname, false) {
            tracing::warn!(pathname = %pathname, error = %err, "Deferred history move failed");
        }
    }

    /// Step back through history and navigate there
    pub fn history_back(&mut self) -> Result<NavigateOutcome> {
        self.traverse_history(false)
    }

    /// Step forward through history and navigate there
    pub fn history_forward(&mut self) -> Result<NavigateOutcome> {
        self.traverse_history(true)
    }

    fn traverse_history(&mut self, forward: bool) -> Result<NavigateOutcome> {
        let direction = if forward { "forward" } else { "back" };
        if !self.preloaded || !matches!(self.transition, Transition::Idle) {
            tracing::debug!(direction, "History move while busy, ignoring");
            return Ok(NavigateOutcome::Ignored);
        }

        let url = if forward {
            self.history.go_forward()
        } else {
            self.history.go_back()
        };

        match url {
            Some(url) => self.request_navigation(&url, false),
            None => {
                tracing::debug!(direction, "No history entry to move to");
                Ok(NavigateOutcome::Ignored)
            }
        }
    }

    /// Route an anchor click; same-origin links start a navigation
    ///
    /// Every same-origin path is treated as a page. One without a registered
    /// page fails with [`Error::UnknownTemplate`], which also stops a
    /// [`FrameLoop`](crate::runtime::FrameLoop), so hosts should only forward
    /// anchors that point at pages (not downloads or other assets).
    pub fn on_link_click(&mut self, href: &str) -> Result<LinkAction> {
        let action = classify_link(href, &self.origin);
        if let LinkAction::Navigate(template) = &action {
            self.request_navigation(template, true)?;
        }
        Ok(action)
    }

    /*
     * Resize.
     */

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.on_resize();
    }

    /// Global resize pass, applied on the next frame
    pub fn on_resize(&mut self) {
        if let Some(page) = self.pages.get_mut(&self.page) {
            page.request_bounds_recompute();
        }

        self.surface_resize_pending = true;
    }

    /// A page's scroll wrapper changed size
    pub fn on_content_resize(&mut self, template: &str) -> Result<()> {
        let page = self
            .pages
            .get_mut(template)
            .ok_or_else(|| Error::UnknownTemplate(template.to_string()))?;
        page.request_bounds_recompute();
        Ok(())
    }

    fn flush_resize(&mut self) {
        for page in self.pages.values_mut() {
            page.apply_bounds_recompute(self.viewport);
        }

        if std::mem::take(&mut self.surface_resize_pending) {
            if let Some(surface) = self.surface.as_mut() {
                surface.on_resize(self.viewport);
            }
        }
    }

    /*
     * Input.
     */

    /// Forward a wheel event; returns the delta applied to the active page
    pub fn on_wheel(&mut self, event: &WheelEvent) -> f64 {
        let wheel = normalize_wheel(event, &self.config.wheel);

        if let Some(surface) = self.surface.as_mut() {
            surface.on_wheel(&wheel);
        }

        self.pages
            .get_mut(&self.page)
            .map(|page| page.on_wheel(&wheel))
            .unwrap_or(0.0)
    }

    pub fn on_touch_down(&mut self, event: &PointerEvent) {
        if let Some(surface) = self.surface.as_mut() {
            surface.on_touch_down(event);
        }

        if let Some(page) = self.pages.get_mut(&self.page) {
            page.on_touch_down(event);
        }
    }

    pub fn on_touch_move(&mut self, event: &PointerEvent) {
        if let Some(surface) = self.surface.as_mut() {
            surface.on_touch_move(event);
        }

        if let Some(page) = self.pages.get_mut(&self.page) {
            page.on_touch_move(event);
        }
    }

    pub fn on_touch_up(&mut self, event: &PointerEvent) {
        if let Some(surface) = self.surface.as_mut() {
            surface.on_touch_up(event);
        }

        if let Some(page) = self.pages.get_mut(&self.page) {
            page.on_touch_up(event);
        }
    }

    /*
     * Loop.
     */

    /// Render one frame
    pub fn tick(&mut self) {
        self.frame += 1;

        self.poll_preloader();
        self.advance_transition();
        self.flush_resize();

        if let Some(page) = self.pages.get_mut(&self.page) {
            if page.is_visible() {
                page.update();
            }

            if let Some(surface) = self.surface.as_mut() {
                surface.update(page.scroll());
            }
        }

        tracing::trace!(frame = self.frame, template = %self.template, "Frame rendered");
    }
}
