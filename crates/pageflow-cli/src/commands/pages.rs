use std::path::Path;

use anyhow::Result;

use pageflow_core::animation::DEFAULT_CATEGORIES;
use pageflow_core::AppConfig;

use crate::site::SiteManifest;

pub fn run(config: &AppConfig, site: &Path) -> Result<()> {
    let manifest = SiteManifest::load(site)?;
    let headless = manifest.build(config)?;
    let app = &headless.app;

    let mut pages: Vec<_> = app.pages().collect();
    pages.sort_by(|a, b| a.template().cmp(b.template()));

    println!(
        "Pages ({}) on {}, viewport {}x{}:\n",
        pages.len(),
        app.config().general.origin,
        app.viewport().width,
        app.viewport().height
    );

    for page in pages {
        let marker = if page.template() == app.template() { "*" } else { " " };
        println!("{} {}", marker, page.template());

        if page.has_wrapper() {
            println!("    Scroll limit: {}px", page.scroll().limit);
        } else {
            println!("    Static (no scroll wrapper)");
        }

        let theme = page.theme();
        for (label, value) in [("Background", &theme.background), ("Color", &theme.color)] {
            if let Some(value) = value {
                println!("    {}: {}", label, value);
            }
        }

        let root = page.root();
        let counts: Vec<String> = DEFAULT_CATEGORIES
            .iter()
            .filter_map(|tag| {
                let count = root.elements.iter().filter(|e| e.animation == *tag).count();
                (count > 0).then(|| format!("{} {}", count, tag))
            })
            .collect();
        let unknown = root
            .elements
            .iter()
            .filter(|e| !DEFAULT_CATEGORIES.contains(&e.animation.as_str()))
            .count();

        if counts.is_empty() {
            println!("    Animations: none");
        } else {
            println!("    Animations: {}", counts.join(", "));
        }
        if unknown > 0 {
            println!("    Unregistered animations ignored: {}", unknown);
        }
        println!();
    }

    Ok(())
}
