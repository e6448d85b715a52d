use std::collections::BTreeMap;

use crate::{foundation::core::Point, render::plan::OverlayPlacement};

/// Repositions host-owned overlay labels (typeset formulas and the like).
///
/// The engine never creates or destroys labels; it only moves and fades the
/// ones the host registered.
pub trait OverlayPositioner {
    fn place(&mut self, label: &str, position: Point, opacity: f64);
    fn hide(&mut self, label: &str);
}

/// Hide every known label, then apply this frame's placements in order.
pub fn apply_overlays(
    positioner: &mut dyn OverlayPositioner,
    known: &[&'static str],
    placements: &[OverlayPlacement],
) {
    for label in known {
        positioner.hide(label);
    }
    for p in placements {
        positioner.place(p.label, p.position, p.opacity);
    }
}

/// Last known state of a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelState {
    pub position: Point,
    pub opacity: f64,
}

/// Positioner that remembers the latest state of each label.
#[derive(Clone, Debug, Default)]
pub struct RecordingOverlay {
    labels: BTreeMap<String, LabelState>,
}

impl RecordingOverlay {
    pub fn get(&self, label: &str) -> Option<LabelState> {
        self.labels.get(label).copied()
    }

    pub fn visible(&self) -> impl Iterator<Item = (&str, LabelState)> {
        self.labels
            .iter()
            .filter(|(_, s)| s.opacity > 0.0)
            .map(|(k, s)| (k.as_str(), *s))
    }
}

impl OverlayPositioner for RecordingOverlay {
    fn place(&mut self, label: &str, position: Point, opacity: f64) {
        self.labels
            .insert(label.to_owned(), LabelState { position, opacity });
    }

    fn hide(&mut self, label: &str) {
        self.labels
            .entry(label.to_owned())
            .and_modify(|s| s.opacity = 0.0)
            .or_insert(LabelState {
                position: Point::ZERO,
                opacity: 0.0,
            });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
