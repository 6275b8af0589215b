//! Selection engine: click, ctrl-toggle, select-all and rubber-band
//! (marquee) selection.
//!
//! Marquee geometry works in content coordinates, i.e. screen position
//! minus the scrolled content origin, so a scroll during the drag does not
//! move the rectangle's anchor.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use egui::{Pos2, Rect};

use crate::gateway::DirectoryEntry;

/// Movement (in points, per axis) below which a press is still a click.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Selected paths, in the order they were selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    paths: Vec<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Plain click: the selection becomes exactly `path`.
    pub fn click(&mut self, path: &Path) {
        self.paths.clear();
        self.paths.push(path.to_path_buf());
    }

    /// Ctrl-click: flip membership of `path`, leaving the rest alone.
    pub fn toggle(&mut self, path: &Path) {
        if let Some(idx) = self.paths.iter().position(|p| p == path) {
            self.paths.remove(idx);
        } else {
            self.paths.push(path.to_path_buf());
        }
    }

    pub fn select_all(&mut self, listing: &[DirectoryEntry]) {
        self.paths = listing.iter().map(|e| e.path.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Replace the selection if `paths` is a different set. Returns whether
    /// anything changed.
    pub fn replace(&mut self, paths: Vec<PathBuf>) -> bool {
        let current: HashSet<&PathBuf> = self.paths.iter().collect();
        let next: HashSet<&PathBuf> = paths.iter().collect();
        if current == next {
            return false;
        }
        self.paths = paths;
        true
    }

    /// Drop paths that are no longer in `listing`.
    pub fn retain_listed(&mut self, listing: &[DirectoryEntry]) {
        let listed: HashSet<&Path> = listing.iter().map(|e| e.path.as_path()).collect();
        self.paths.retain(|p| listed.contains(p.as_path()));
    }
}

/// True if the rectangles overlap with positive area. Touching edges do not
/// count.
pub fn intersects_strict(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Marquee {
    #[default]
    Idle,
    Dragging { origin: Pos2, current: Pos2, did_drag: bool },
}

/// What a pointer update did to the marquee.
#[derive(Clone, Debug, PartialEq)]
pub enum MarqueeOutcome {
    /// No marquee in progress.
    Idle,
    /// Button held but still inside the jitter threshold.
    Pending,
    /// Rectangle tracked; these entries intersect it.
    Selecting(Vec<PathBuf>),
    /// The button is no longer held; the drag is over.
    Ended { did_drag: bool },
}

impl Marquee {
    /// Start tracking from a press on empty canvas.
    pub fn begin(&mut self, origin: Pos2) {
        *self = Marquee::Dragging { origin, current: origin, did_drag: false };
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Marquee::Dragging { .. })
    }

    /// Move the free corner to `point`. `items` are the rendered entries
    /// with their bounds, in the same coordinate space as `point`.
    pub fn update(&mut self, point: Pos2, button_held: bool, items: &[(PathBuf, Rect)]) -> MarqueeOutcome {
        let Marquee::Dragging { origin, current, did_drag } = &mut *self else {
            return MarqueeOutcome::Idle;
        };
        if !button_held {
            let did_drag = *did_drag;
            *self = Marquee::Idle;
            return MarqueeOutcome::Ended { did_drag };
        }

        *current = point;
        if !*did_drag {
            let delta = point - *origin;
            *did_drag = delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD;
        }
        if !*did_drag {
            return MarqueeOutcome::Pending;
        }

        let band = Rect::from_two_pos(*origin, point);
        MarqueeOutcome::Selecting(
            items
                .iter()
                .filter(|(_, bounds)| intersects_strict(band, *bounds))
                .map(|(path, _)| path.clone())
                .collect(),
        )
    }

    /// Stop tracking. Returns whether the pointer travelled past the
    /// jitter threshold.
    pub fn end(&mut self) -> bool {
        let did_drag = matches!(self, Marquee::Dragging { did_drag: true, .. });
        *self = Marquee::Idle;
        did_drag
    }

    /// The rectangle to draw, once the drag has started.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Marquee::Dragging { origin, current, did_drag: true } => Some(Rect::from_two_pos(*origin, *current)),
            _ => None,
        }
    }
}
