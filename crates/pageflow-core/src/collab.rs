//! Contracts for the collaborators the orchestrator drives but does not own
//!
//! Asynchronous work (curtain animations, asset preloading) signals back
//! through a single-resolution [`Completion`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::event::{PointerEvent, Viewport};
use crate::page::PageTheme;
use crate::scroll::{NormalizedWheel, ScrollState};

/// Resolving half of a [`Completion`]
#[derive(Debug)]
pub struct Completer {
    tx: oneshot::Sender<()>,
}

impl Completer {
    /// Resolve the paired completion
    pub fn complete(self) {
        // The waiting side may already be gone, which is fine
        let _ = self.tx.send(());
    }
}

/// A signal that resolves exactly once
///
/// Can be polled from a frame loop with [`Completion::try_complete`] or
/// awaited directly. A completer dropped without resolving counts as resolved
/// so a vanished collaborator cannot wedge navigation.
#[derive(Debug)]
pub struct Completion {
    rx: Option<oneshot::Receiver<()>>,
}

impl Completion {
    pub fn channel() -> (Completer, Completion) {
        let (tx, rx) = oneshot::channel();
        (Completer { tx }, Completion { rx: Some(rx) })
    }

    /// An already resolved completion
    pub fn ready() -> Self {
        Self { rx: None }
    }

    pub fn is_complete(&self) -> bool {
        self.rx.is_none()
    }

    /// Non-blocking check; returns true once resolved
    pub fn try_complete(&mut self) -> bool {
        let Some(rx) = self.rx.as_mut() else {
            return true;
        };

        match rx.try_recv() {
            Ok(()) => {
                self.rx = None;
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                tracing::warn!("Completion dropped without resolving, treating as resolved");
                self.rx = None;
                true
            }
        }
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(());
        };

        match Pin::new(rx).poll(cx) {
            Poll::Ready(result) => {
                if result.is_err() {
                    tracing::warn!("Completion dropped without resolving, treating as resolved");
                }
                this.rx = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Options passed to the curtain when it covers the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayOptions {
    pub color: Option<String>,
}

/// Animated curtain masking page swaps
pub trait TransitionOverlay: Send {
    /// Cover the viewport; resolves once fully covered
    fn show(&mut self, options: OverlayOptions) -> Completion;

    /// Reveal the viewport; resolves once fully revealed
    fn hide(&mut self) -> Completion;
}

/// Secondary renderer kept in sync with page and scroll state
pub trait RenderSurface: Send {
    fn on_preloaded(&mut self) {}

    fn on_change(&mut self, _template: &str) {}

    fn on_resize(&mut self, _viewport: Viewport) {}

    fn on_touch_down(&mut self, _event: &PointerEvent) {}

    fn on_touch_move(&mut self, _event: &PointerEvent) {}

    fn on_touch_up(&mut self, _event: &PointerEvent) {}

    fn on_wheel(&mut self, _wheel: &NormalizedWheel) {}

    /// Called once per frame after the active page has updated
    fn update(&mut self, _scroll: &ScrollState) {}
}

/// Site navigation chrome (menus, active-link markers)
pub trait NavigationUi: Send {
    fn on_change(&mut self, template: &str);
}

/// Document root styling owned by the visible page
pub trait DocumentStyle: Send {
    fn apply(&mut self, theme: &PageTheme);
}
