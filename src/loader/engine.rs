//! Deferred asset loader
//!
//! Holds per-element pending state and commits each element's real resource
//! exactly once, when its detector reports it inside the proximity zone.
//!
//! ```text
//! UNATTACHED --attach--> PENDING --visibility(true)--> LOADED
//!                        PENDING --update--> PENDING
//!        PENDING | LOADED --destroy--> UNATTACHED
//! ```

use std::collections::HashMap;
use std::fmt;

use super::error::{LoaderError, LoaderResult};
use super::surface::ImageSurface;
use super::types::{ElementId, LoadState, ObservedElement, ProximityMargin, Visibility};
use crate::config::LoaderConfig;
use crate::detector::VisibilityDetector;

/// Result of feeding a visibility entry to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Real resource was set on the element
    Committed,
    /// Element reported outside the zone
    NotProximate,
    /// Element was committed earlier; nothing done
    AlreadyLoaded,
    /// Element has no resource to commit yet
    NoResource,
    /// Element is no longer tracked
    Stale,
}

/// Result of a bound value change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Pending target recorded
    Replaced,
    /// Value equal to the last bound one
    Unchanged,
    /// Element already committed; its resource is final
    Rejected,
    /// Element is not attached
    Untracked,
}

struct Entry<T> {
    target: T,
    state: ObservedElement,
}

/// Loader statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Elements currently attached
    pub tracked: usize,
    /// Attached elements still showing the placeholder
    pub pending: usize,
    /// Attached elements with their real resource
    pub loaded: usize,
    /// Registrations held by the detector
    pub watched: usize,
    /// True when no detector is available and attach commits immediately
    pub eager: bool,
}

impl fmt::Display for LoaderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tracked={}, pending={}, loaded={}, watched={}, mode={}",
            self.tracked,
            self.pending,
            self.loaded,
            self.watched,
            if self.eager { "eager" } else { "deferred" }
        )
    }
}

/// Viewport-triggered image loader
///
/// Owns the single detector instance it registers elements with. Without a
/// detector the loader runs in eager mode and commits on attach.
pub struct Loader<D: VisibilityDetector> {
    detector: Option<D>,
    entries: HashMap<ElementId, Entry<D::Target>>,
    margin: ProximityMargin,
    loaded_class: String,
    placeholder: String,
}

impl<D: VisibilityDetector> Loader<D> {
    /// Create a loader that defers commits to `detector`
    pub fn new(config: &LoaderConfig, detector: D) -> Self {
        let mut loader = Self::eager(config);
        loader.detector = Some(detector);
        loader
    }

    /// Create a loader with no detector; every attach commits immediately
    pub fn eager(config: &LoaderConfig) -> Self {
        let margin = config.margin().unwrap_or_else(|| {
            tracing::warn!(
                margin = config.proximity_margin,
                "Invalid proximity margin, using default"
            );
            ProximityMargin::default()
        });

        Self {
            detector: None,
            entries: HashMap::new(),
            margin,
            loaded_class: config.loaded_class.clone(),
            placeholder: config.placeholder.clone(),
        }
    }

    /// Create a loader from the outcome of detector construction, falling
    /// back to eager mode when the platform facility is unavailable
    pub fn from_detector(config: &LoaderConfig, detector: LoaderResult<D>) -> Self {
        match detector {
            Ok(detector) => Self::new(config, detector),
            Err(err) => {
                tracing::warn!(error = %err, "Falling back to eager image loading");
                Self::eager(config)
            }
        }
    }

    // ==================== Directive Hooks ====================

    /// Start tracking `target`, show the placeholder and register it with the
    /// detector.
    ///
    /// Attaching an element that is still pending refreshes its bound value
    /// and keeps its single registration. Attaching a loaded element fails
    /// with `AlreadyLoaded`; callers log and ignore it.
    pub fn attach(&mut self, target: D::Target, url: &str) -> LoaderResult<()> {
        let id = target.id();

        if let Some(entry) = self.entries.get(&id) {
            if entry.state.loaded {
                tracing::warn!(element = %id, "Attach on an already loaded element ignored");
                return Err(LoaderError::AlreadyLoaded(id));
            }

            tracing::debug!(element = %id, "Re-attach of pending element");
            self.update(id, url);
            self.register(id);
            return Ok(());
        }

        target.set_source(&self.placeholder);
        self.entries.insert(
            id,
            Entry {
                target,
                state: ObservedElement::new(url),
            },
        );
        tracing::debug!(element = %id, url = %url, "Attached");

        self.register(id);
        Ok(())
    }

    /// Record a new bound value for a pending element. The placeholder and
    /// the detector registration are left alone.
    pub fn update(&mut self, id: ElementId, url: &str) -> UpdateOutcome {
        let Some(entry) = self.entries.get_mut(&id) else {
            return UpdateOutcome::Untracked;
        };

        if entry.state.loaded {
            tracing::debug!(element = %id, url = %url, "Update after commit rejected");
            return UpdateOutcome::Rejected;
        }

        if !entry.state.rebind(url) {
            return UpdateOutcome::Unchanged;
        }

        tracing::debug!(element = %id, url = %url, "Pending resource replaced");

        // Detectors report transitions only, so an element already inside the
        // zone will not be reported again. Eager mode has no zone at all.
        if self.detector.is_none() || entry.state.proximate {
            self.commit_eagerly(id);
        }

        UpdateOutcome::Replaced
    }

    /// Element removed from the UI tree. Always unwatches, then forgets the
    /// element. Returns whether it was tracked.
    pub fn destroy(&mut self, id: ElementId) -> bool {
        if let Some(detector) = self.detector.as_mut() {
            detector.unwatch(id);
        }

        match self.entries.remove(&id) {
            Some(entry) => {
                tracing::debug!(element = %id, loaded = entry.state.loaded, "Destroyed");
                true
            }
            None => false,
        }
    }

    // ==================== Detector Callbacks ====================

    /// Handle one visibility report
    pub fn on_visibility(&mut self, visibility: Visibility) -> CommitOutcome {
        let id = visibility.element;

        let Some(entry) = self.entries.get_mut(&id) else {
            tracing::trace!(error = %LoaderError::StaleCallback(id), "Discarded");
            return CommitOutcome::Stale;
        };
        entry.state.proximate = visibility.proximate;

        if !visibility.proximate {
            return CommitOutcome::NotProximate;
        }

        match self.commit(id) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::trace!(error = %err, "Discarded");
                CommitOutcome::Stale
            }
        }
    }

    /// Handle a batch of reports, returning the elements committed
    pub fn deliver<I>(&mut self, entries: I) -> Vec<ElementId>
    where
        I: IntoIterator<Item = Visibility>,
    {
        entries
            .into_iter()
            .filter(|entry| self.on_visibility(*entry) == CommitOutcome::Committed)
            .map(|entry| entry.element)
            .collect()
    }

    // ==================== Introspection ====================

    pub fn state(&self, id: ElementId) -> Option<LoadState> {
        self.entries.get(&id).map(|entry| entry.state.state())
    }

    pub fn element(&self, id: ElementId) -> Option<&ObservedElement> {
        self.entries.get(&id).map(|entry| &entry.state)
    }

    pub fn target(&self, id: ElementId) -> Option<&D::Target> {
        self.entries.get(&id).map(|entry| &entry.target)
    }

    pub fn is_watching(&self, id: ElementId) -> bool {
        self.detector
            .as_ref()
            .map(|detector| detector.is_watching(id))
            .unwrap_or(false)
    }

    pub fn is_eager(&self) -> bool {
        self.detector.is_none()
    }

    pub fn margin(&self) -> ProximityMargin {
        self.margin
    }

    pub fn loaded_class(&self) -> &str {
        &self.loaded_class
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn detector(&self) -> Option<&D> {
        self.detector.as_ref()
    }

    pub fn detector_mut(&mut self) -> Option<&mut D> {
        self.detector.as_mut()
    }

    pub fn stats(&self) -> LoaderStats {
        let loaded = self.entries.values().filter(|e| e.state.loaded).count();

        LoaderStats {
            tracked: self.entries.len(),
            pending: self.entries.len() - loaded,
            loaded,
            watched: self
                .detector
                .as_ref()
                .map(|detector| detector.watched_count())
                .unwrap_or(0),
            eager: self.detector.is_none(),
        }
    }

    // ==================== Internals ====================

    /// Register with the detector, or commit right away when there is none
    fn register(&mut self, id: ElementId) {
        let watched = match (self.detector.as_mut(), self.entries.get(&id)) {
            (Some(detector), Some(entry)) => Some(detector.watch(&entry.target, self.margin)),
            (None, Some(_)) => None,
            (_, None) => return,
        };

        match watched {
            Some(Ok(())) => {}
            Some(Err(err)) => {
                tracing::warn!(error = %err, element = %id, "Falling back to eager image loading");
                self.detector = None;

                // Earlier registrations died with the detector
                let pending: Vec<ElementId> = self
                    .entries
                    .iter()
                    .filter(|(_, entry)| !entry.state.loaded)
                    .map(|(id, _)| *id)
                    .collect();
                for id in pending {
                    self.commit_eagerly(id);
                }
            }
            None => self.commit_eagerly(id),
        }
    }

    fn commit_eagerly(&mut self, id: ElementId) {
        if let Ok(CommitOutcome::Committed) = self.commit(id) {
            tracing::debug!(element = %id, "Committed eagerly");
        }
    }

    /// The single commit point. Guarded by the `loaded` flag so a late or
    /// duplicated report never commits twice.
    fn commit(&mut self, id: ElementId) -> LoaderResult<CommitOutcome> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(LoaderError::StaleCallback(id))?;

        if entry.state.loaded {
            return Ok(CommitOutcome::AlreadyLoaded);
        }

        let Some(url) = entry.state.pending_resource.clone() else {
            return Ok(CommitOutcome::NoResource);
        };

        entry.target.set_source(&url);
        entry.target.add_class(&self.loaded_class);
        entry.state.loaded = true;

        if let Some(detector) = self.detector.as_mut() {
            detector.unwatch(id);
        }

        tracing::debug!(element = %id, url = %url, "Committed");
        Ok(CommitOutcome::Committed)
    }
}
