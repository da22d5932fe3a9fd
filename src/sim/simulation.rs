//! Scroll simulation
//!
//! Attaches every gallery tile to a loader backed by a [`ViewportDetector`],
//! then scrolls the viewport down the page in fixed steps, polling the
//! detector after each move and recording which images were committed.

use serde::Serialize;
use std::collections::HashMap;

use super::gallery::GalleryLayout;
use super::image::SimImage;
use crate::config::Config;
use crate::detector::ViewportDetector;
use crate::loader::{ElementId, ImageSurface, LoadState, Loader, LoaderError, LoaderStats};

/// Commits observed at one scroll offset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub offset: f64,
    pub committed: Vec<String>,
}

/// Full simulation outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollReport {
    pub eager: bool,
    pub margin: f64,
    pub total_images: usize,
    pub loaded: usize,
    pub steps: Vec<StepReport>,
}

/// Simulated page: a loader, its detector and the gallery images
pub struct Simulation {
    loader: Loader<ViewportDetector<SimImage>>,
    images: HashMap<ElementId, SimImage>,
    document_height: f64,
    viewport_height: f64,
    /// Commits that happened during attach (eager mode)
    attached_committed: Vec<String>,
}

impl Simulation {
    /// Build the page and attach every tile. With `eager` the detector is
    /// treated as unavailable.
    pub fn new(config: &Config, layout: &GalleryLayout, eager: bool) -> Self {
        let detector = if eager {
            Err(LoaderError::DetectorUnavailable(
                "disabled for this run".to_string(),
            ))
        } else {
            Ok(ViewportDetector::<SimImage>::new(
                config.viewport.width,
                config.viewport.height,
            ))
        };

        let mut loader = Loader::from_detector(&config.loader, detector);
        let mut images = HashMap::with_capacity(layout.len());
        let mut attached_committed = Vec::new();

        for item in &layout.items {
            let image = SimImage::new(item.url.clone(), item.bounds());
            if let Err(e) = loader.attach(image.clone(), &item.url) {
                tracing::warn!(url = %item.url, error = %e, "Attach failed");
                continue;
            }
            if loader.state(image.id()) == Some(LoadState::Loaded) {
                attached_committed.push(image.name());
            }
            images.insert(image.id(), image);
        }

        tracing::info!(images = images.len(), stats = %loader.stats(), "Gallery attached");

        Self {
            loader,
            images,
            document_height: layout.height(),
            viewport_height: config.viewport.height,
            attached_committed,
        }
    }

    /// Move the viewport, poll the detector and deliver its entries
    pub fn scroll_to(&mut self, offset: f64) -> StepReport {
        let entries = match self.loader.detector_mut() {
            Some(detector) => {
                detector.scroll_to(0.0, offset);
                detector.poll()
            }
            None => Vec::new(),
        };

        let mut committed: Vec<String> = self
            .loader
            .deliver(entries)
            .into_iter()
            .filter_map(|id| self.images.get(&id).map(SimImage::name))
            .collect();
        committed.sort();

        if !committed.is_empty() {
            tracing::debug!(offset, count = committed.len(), "Images committed");
        }

        StepReport { offset, committed }
    }

    /// Scroll from the top to the bottom of the document in `step` pixel
    /// increments. A non-positive step scrolls a full viewport at a time.
    pub fn run(&mut self, step: f64) -> ScrollReport {
        let step = if step > 0.0 { step } else { self.viewport_height };
        let max_offset = (self.document_height - self.viewport_height).max(0.0);

        let mut steps = Vec::new();
        let mut offset = 0.0;
        loop {
            let mut report = self.scroll_to(offset);
            if steps.is_empty() && !self.attached_committed.is_empty() {
                let mut initial = std::mem::take(&mut self.attached_committed);
                initial.append(&mut report.committed);
                initial.sort();
                report.committed = initial;
            }
            steps.push(report);

            if offset >= max_offset {
                break;
            }
            offset = (offset + step).min(max_offset);
        }

        let stats = self.loader.stats();
        tracing::info!(stats = %stats, "Simulation finished");

        ScrollReport {
            eager: stats.eager,
            margin: self.loader.margin().px(),
            total_images: stats.tracked,
            loaded: stats.loaded,
            steps,
        }
    }

    /// Remove an image from the page
    pub fn remove(&mut self, id: ElementId) -> bool {
        self.images.remove(&id);
        self.loader.destroy(id)
    }

    pub fn images(&self) -> impl Iterator<Item = &SimImage> {
        self.images.values()
    }

    pub fn stats(&self) -> LoaderStats {
        self.loader.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewportConfig;
    use crate::loader::PLACEHOLDER_IMAGE;

    fn config(height: f64) -> Config {
        Config {
            viewport: ViewportConfig {
                width: 800.0,
                height,
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_initial_view_commits_visible_rows() {
        // Rows at 0, 250, 500, 750; zone covers 0..650
        let layout = GalleryLayout::grid(2, 4, 200.0, 50.0);
        let mut sim = Simulation::new(&config(600.0), &layout, false);

        let step = sim.scroll_to(0.0);

        assert_eq!(step.committed.len(), 6);
        assert_eq!(sim.stats().pending, 2);
        assert_eq!(sim.stats().watched, 2);
    }

    #[test]
    fn test_full_scroll_commits_everything_once() {
        let layout = GalleryLayout::grid(3, 10, 200.0, 20.0);
        let mut sim = Simulation::new(&config(600.0), &layout, false);

        let report = sim.run(100.0);

        assert!(!report.eager);
        assert_eq!(report.total_images, 30);
        assert_eq!(report.loaded, 30);

        let mut all: Vec<&String> = report.steps.iter().flat_map(|s| &s.committed).collect();
        let committed = all.len();
        all.sort();
        all.dedup();
        assert_eq!(committed, 30);
        assert_eq!(all.len(), 30);

        for image in sim.images() {
            assert_eq!(image.src(), image.name());
            assert_eq!(image.source_changes(), 2);
            assert!(image.has_class("loaded"));
        }
        assert_eq!(sim.stats().watched, 0);
    }

    #[test]
    fn test_rows_commit_top_to_bottom() {
        let layout = GalleryLayout::grid(1, 6, 200.0, 100.0);
        let mut sim = Simulation::new(&config(300.0), &layout, false);

        let report = sim.run(300.0);
        let first_seen: Vec<String> = report
            .steps
            .iter()
            .flat_map(|s| s.committed.clone())
            .collect();

        let expected: Vec<String> = layout.items.iter().map(|i| i.url.clone()).collect();
        assert_eq!(first_seen, expected);
    }

    #[test]
    fn test_eager_mode_commits_on_attach() {
        let layout = GalleryLayout::grid(2, 20, 200.0, 10.0);
        let mut sim = Simulation::new(&config(600.0), &layout, true);

        let report = sim.run(600.0);

        assert!(report.eager);
        assert_eq!(report.loaded, 40);
        assert_eq!(report.steps[0].committed.len(), 40);
        assert!(report.steps[1..].iter().all(|s| s.committed.is_empty()));
    }

    #[test]
    fn test_removed_image_is_never_committed() {
        let layout = GalleryLayout::grid(1, 5, 200.0, 800.0);
        let mut sim = Simulation::new(&config(600.0), &layout, false);

        let last = sim
            .images()
            .find(|img| img.name() == "/api/media/moments/4-0.jpg")
            .cloned()
            .unwrap();
        assert!(sim.remove(last.id()));

        let report = sim.run(500.0);

        assert_eq!(report.total_images, 4);
        assert_eq!(report.loaded, 4);
        assert_eq!(last.src(), PLACEHOLDER_IMAGE);
    }
}
