use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::Ordering;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use pageflow_core::event::{AppEvent, PointerEvent, Viewport};
use pageflow_core::page::PageTheme;
use pageflow_core::runtime::{FrameLoop, LoopStats};
use pageflow_core::scroll::{ScrollState, WheelEvent};
use pageflow_core::{AppConfig, TransitionPhase};

use crate::headless::WrapperHandle;
use crate::site::{Session, SiteManifest, Step};

#[derive(Debug, Serialize)]
struct Summary {
    template: String,
    phase: TransitionPhase,
    history_len: usize,
    scroll: Option<ScrollState>,
    translation: Option<i64>,
    document: PageTheme,
    #[serde(flatten)]
    stats: LoopStats,
    surface_frames: u64,
    journal: Vec<String>,
}

pub async fn run(config: &AppConfig, site: &Path, script: &Path, json: bool) -> Result<()> {
    let manifest = SiteManifest::load(site)?;
    let session = Session::load(script)?;
    let headless = manifest.build(config)?;
    let mut app = headless.app;

    info!(
        pages = manifest.pages.len(),
        steps = session.steps.len(),
        "Starting simulated session"
    );

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let preloader = headless.preloader;
    let preload_delay = headless.preload_delay;
    tokio::spawn(async move {
        tokio::time::sleep(preload_delay).await;
        preloader.complete();
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping session");
            let _ = shutdown_tx.send(true);
        }
    });

    let wrappers = headless.wrappers;
    let feeder = tokio::spawn(feed(session.steps, event_tx, wrappers.clone()));

    let stats = FrameLoop::new(event_rx)
        .with_shutdown(shutdown_rx)
        .run(&mut app)
        .await?;

    // Let a curtain still in flight finish so the summary shows a settled page
    app.finish_transition().await;
    feeder.await?;

    let template = app.template().to_string();
    let summary = Summary {
        translation: wrappers.get(&template).map(WrapperHandle::translation),
        template,
        phase: app.phase(),
        history_len: app.history().len(),
        scroll: app.scroll().copied(),
        document: app.document_theme().clone(),
        stats,
        surface_frames: headless.surface_frames.load(Ordering::Relaxed),
        journal: headless.journal.entries(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Replay session steps as host events
async fn feed(
    steps: Vec<Step>,
    events: mpsc::UnboundedSender<AppEvent>,
    wrappers: HashMap<String, WrapperHandle>,
) {
    for step in steps {
        let event = match step {
            Step::Wait { ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
                continue;
            }
            Step::Wheel { delta_y, delta_mode } => AppEvent::Wheel(WheelEvent {
                delta_x: 0.0,
                delta_y,
                delta_mode,
            }),
            Step::TouchDown { y } => AppEvent::PointerDown(PointerEvent::touch(y)),
            Step::TouchMove { y } => AppEvent::PointerMove(PointerEvent::touch(y)),
            Step::TouchUp { y } => AppEvent::PointerUp(PointerEvent::touch(y)),
            Step::Click { href } => AppEvent::LinkClick { href },
            Step::Navigate { url, push } => AppEvent::Navigate { url, push },
            Step::Back => AppEvent::HistoryBack,
            Step::Forward => AppEvent::HistoryForward,
            Step::Resize { width, height } => AppEvent::Resize(Viewport::new(width, height)),
            Step::ContentResize { template, height } => {
                match wrappers.get(&template) {
                    Some(handle) => handle.set_height(height),
                    None => warn!(template = %template, "No scroll wrapper for content resize"),
                }
                AppEvent::ContentResize { template }
            }
        };

        if events.send(event).is_err() {
            warn!("Frame loop stopped, dropping remaining steps");
            return;
        }
    }
}

fn print_summary(summary: &Summary) {
    println!("Session finished on {} ({:?})", summary.template, summary.phase);
    println!(
        "  Frames: {} ({} rendered by surface), events: {}",
        summary.stats.frames, summary.surface_frames, summary.stats.events
    );
    println!("  History entries: {}", summary.history_len);

    if let Some(scroll) = &summary.scroll {
        println!(
            "  Scroll: current {} / target {} / limit {}",
            scroll.current, scroll.target, scroll.limit
        );
    }
    if let Some(translation) = summary.translation {
        println!("  Wrapper: translate3d(0, {}px, 0)", translation);
    }

    if !summary.document.is_empty() {
        println!(
            "  Document: background {}, color {}",
            summary.document.background.as_deref().unwrap_or("-"),
            summary.document.color.as_deref().unwrap_or("-")
        );
    }

    if !summary.journal.is_empty() {
        println!("\nCollaborator calls:");
        for entry in &summary.journal {
            println!("  {}", entry);
        }
    }
}
