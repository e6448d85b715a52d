use std::collections::BTreeMap;

use crate::foundation::{
    core::{Breakpoint, Point, Rect, Surface},
    error::{ChoreoError, ChoreoResult},
};

/// Key naming one visual element of a sequence.
pub trait AnchorKey: Copy + Ord + std::fmt::Debug + serde::Serialize {}

impl<T> AnchorKey for T where T: Copy + Ord + std::fmt::Debug + serde::Serialize {}

/// Breakpoint-resolved pixel-space placement of one element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Rect(Rect),
    Point(Point),
}

/// Named anchors for every element of one sequence at one surface size.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorSet<K: AnchorKey> {
    breakpoint: Breakpoint,
    surface: Surface,
    anchors: BTreeMap<K, Anchor>,
}

impl<K: AnchorKey> AnchorSet<K> {
    pub fn new(surface: Surface, breakpoint: Breakpoint) -> Self {
        Self {
            breakpoint,
            surface,
            anchors: BTreeMap::new(),
        }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Record an anchor; returns the rect so dependent anchors can chain off it.
    pub fn put_rect(&mut self, key: K, rect: Rect) -> Rect {
        self.anchors.insert(key, Anchor::Rect(rect));
        rect
    }

    pub fn put_point(&mut self, key: K, point: Point) -> Point {
        self.anchors.insert(key, Anchor::Point(point));
        point
    }

    pub fn get(&self, key: K) -> Option<Anchor> {
        self.anchors.get(&key).copied()
    }

    /// Rect anchor for `key`. A missing or point-shaped anchor means the
    /// renderer and layout disagree, which is reported as an error.
    pub fn rect(&self, key: K) -> ChoreoResult<Rect> {
        match self.anchors.get(&key) {
            Some(Anchor::Rect(r)) => Ok(*r),
            Some(Anchor::Point(_)) => Err(ChoreoError::layout(format!(
                "anchor {key:?} is a point, expected a rect"
            ))),
            None => Err(missing(key, self.breakpoint)),
        }
    }

    /// Point anchor for `key`; rect anchors resolve to their origin.
    pub fn point(&self, key: K) -> ChoreoResult<Point> {
        match self.anchors.get(&key) {
            Some(Anchor::Point(p)) => Ok(*p),
            Some(Anchor::Rect(r)) => Ok(r.origin()),
            None => Err(missing(key, self.breakpoint)),
        }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, Anchor)> + '_ {
        self.anchors.iter().map(|(k, v)| (*k, *v))
    }
}

impl<K: AnchorKey> serde::Serialize for AnchorSet<K> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Entry<K> {
            key: K,
            anchor: Anchor,
        }

        #[derive(serde::Serialize)]
        struct Repr<K> {
            breakpoint: Breakpoint,
            surface: Surface,
            anchors: Vec<Entry<K>>,
        }

        Repr {
            breakpoint: self.breakpoint,
            surface: self.surface,
            anchors: self
                .iter()
                .map(|(key, anchor)| Entry { key, anchor })
                .collect(),
        }
        .serialize(serializer)
    }
}

fn missing<K: std::fmt::Debug>(key: K, bp: Breakpoint) -> ChoreoError {
    ChoreoError::layout(format!("anchor {key:?} missing from {bp:?} layout"))
}

/// Pure `(surface, breakpoint) -> anchors` mapping for one sequence.
///
/// Implementations derive a primary anchor from constants, then each
/// dependent anchor only from anchors computed before it.
pub trait LayoutCalculator {
    type Key: AnchorKey;

    fn compute_anchors(&self, surface: Surface, breakpoint: Breakpoint) -> AnchorSet<Self::Key>;
}

#[cfg(test)]
#[path = "../../tests/unit/layout/anchors.rs"]
mod tests;
