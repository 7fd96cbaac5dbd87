//! Layout reconciliation.
//!
//! Merges the diagram shapes onto the elements they annotate and produces one
//! render record per element with known geometry. Coordinates are shifted by
//! a global offset so that nothing is drawn left of or above the margin.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Document, Flow, Shape};
use crate::vocabulary::ElementKind;

/// Smallest coordinate a rendered shape may have, by default.
pub const DEFAULT_MARGIN: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// Final geometry of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRecord {
    pub diagram_id: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl RenderRecord {
    /// Where outgoing edges leave the element.
    pub fn right_center(&self) -> Point {
        Point {
            x: self.x.saturating_add(self.width),
            y: self.y.saturating_add(self.height / 2),
        }
    }

    /// Where incoming edges enter the element.
    pub fn left_center(&self) -> Point {
        Point {
            x: self.x,
            y: self.y.saturating_add(self.height / 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Slot {
    kind: ElementKind,
    geometry: Option<RenderRecord>,
}

/// Element id to render record, in element declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub offset: Offset,
    slots: IndexMap<String, Slot>,
}

impl Layout {
    /// Reconciles the shapes of `doc` onto its elements.
    ///
    /// Shapes that reference an unknown element are ignored. When several
    /// shapes reference the same element, the last one wins.
    pub fn reconcile(doc: &Document, margin: i64) -> Self {
        let offset = compute_offset(&doc.shapes, margin);

        let mut slots: IndexMap<String, Slot> = IndexMap::new();
        for element in doc.elements() {
            slots.entry(element.id.clone()).or_insert(Slot {
                kind: element.kind,
                geometry: None,
            });
        }

        for shape in &doc.shapes {
            let Some(slot) = slots.get_mut(&shape.element_ref) else {
                tracing::debug!(element = %shape.element_ref, "shape for unknown element ignored");
                continue;
            };
            let size = slot.kind.default_size();
            slot.geometry = Some(RenderRecord {
                diagram_id: format!("{}_di", shape.element_ref),
                x: shape.x.unwrap_or(0).saturating_add(offset.x),
                y: shape.y.unwrap_or(0).saturating_add(offset.y),
                width: shape.width.filter(|w| *w > 0).unwrap_or(size.width),
                height: shape.height.filter(|h| *h > 0).unwrap_or(size.height),
            });
        }

        Self { offset, slots }
    }

    /// Geometry of an element, when its shape was found.
    pub fn geometry(&self, element_id: &str) -> Option<&RenderRecord> {
        self.slots.get(element_id)?.geometry.as_ref()
    }

    pub fn is_gateway(&self, element_id: &str) -> bool {
        self.slots
            .get(element_id)
            .is_some_and(|slot| slot.kind.is_gateway())
    }

    /// Elements with geometry, in declaration order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &RenderRecord)> {
        self.slots
            .iter()
            .filter_map(|(id, slot)| slot.geometry.as_ref().map(|g| (id.as_str(), g)))
    }

    /// Waypoints for a flow, when both endpoints have geometry.
    pub fn waypoints(&self, flow: &Flow) -> Option<(Point, Point)> {
        let source = self.geometry(&flow.source_ref)?;
        let target = self.geometry(&flow.target_ref)?;
        Some((source.right_center(), target.left_center()))
    }
}

/// Per axis: `max(0, margin - min(known))`, or 0 when no coordinate is known.
pub fn compute_offset(shapes: &[Shape], margin: i64) -> Offset {
    let axis = |coordinate: fn(&Shape) -> Option<i64>| {
        shapes
            .iter()
            .filter_map(coordinate)
            .min()
            .map_or(0, |min| (margin.saturating_sub(min)).max(0))
    };
    Offset {
        x: axis(|shape| shape.x),
        y: axis(|shape| shape.y),
    }
}
