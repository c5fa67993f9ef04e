//! Outline extraction for rectilinear area annotations.
//!
//! An area is given as the corner points of one or more axis-aligned loops.
//! Points sharing a y value are paired into horizontal edges and points
//! sharing an x value into vertical edges. Edges that cross each other are
//! rejected, and edges buried inside the shape (walls shared by adjoining
//! loops, nested loops) are dropped so that only the true outline remains.
//!
//! Only corner points are known, not which loop they came from. Two loops
//! that partly overlap have the same corners as two separate loops stacked
//! with a gap, and are outlined as the latter.

use std::collections::btree_map::Range;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::types::{Orientation, WorldCoordinate};

/// Fewest points that can describe a closed rectilinear loop.
pub const MIN_AREA_POINTS: usize = 4;

/// One straight, axis-aligned edge. `start` is always the lower end of the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundarySegment {
    pub start: WorldCoordinate,
    pub end: WorldCoordinate,
    pub orientation: Orientation,
}

impl BoundarySegment {
    fn new(orientation: Orientation, fixed: i32, from: i32, to: i32) -> Self {
        let (lo, hi) = (from.min(to), from.max(to));
        let (start, end) = match orientation {
            Orientation::Horizontal => (WorldCoordinate::new(lo, fixed), WorldCoordinate::new(hi, fixed)),
            Orientation::Vertical => (WorldCoordinate::new(fixed, lo), WorldCoordinate::new(fixed, hi)),
        };
        Self { start, end, orientation }
    }

    pub fn horizontal(y: i32, x1: i32, x2: i32) -> Self {
        Self::new(Orientation::Horizontal, y, x1, x2)
    }

    pub fn vertical(x: i32, y1: i32, y2: i32) -> Self {
        Self::new(Orientation::Vertical, x, y1, y2)
    }

    /// The coordinate shared by both endpoints.
    pub fn fixed(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.start.y,
            Orientation::Vertical => self.start.x,
        }
    }

    /// Inclusive range along the varying axis.
    pub fn span(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.start.x, self.end.x),
            Orientation::Vertical => (self.start.y, self.end.y),
        }
    }

    pub fn midpoint(&self) -> f64 {
        let (lo, hi) = self.span();
        (lo as f64 + hi as f64) / 2.0
    }

    /// True when `value` lies strictly between the span's endpoints.
    pub fn spans_strictly(&self, value: f64) -> bool {
        let (lo, hi) = self.span();
        (lo as f64) < value && value < (hi as f64)
    }

    /// True when `point` lies on the segment, endpoints included.
    pub fn contains(&self, point: WorldCoordinate) -> bool {
        let (lo, hi) = self.span();
        match self.orientation {
            Orientation::Horizontal => point.y == self.start.y && lo <= point.x && point.x <= hi,
            Orientation::Vertical => point.x == self.start.x && lo <= point.y && point.y <= hi,
        }
    }

    /// Proper crossing: each segment's fixed coordinate is strictly inside the other's span.
    pub fn crosses(&self, other: &BoundarySegment) -> bool {
        self.orientation != other.orientation
            && self.spans_strictly(other.fixed() as f64)
            && other.spans_strictly(self.fixed() as f64)
    }
}

/// The minimal set of edges outlining an area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOutline {
    pub horizontal: Vec<BoundarySegment>,
    pub vertical: Vec<BoundarySegment>,
}

impl AreaOutline {
    pub fn segments(&self) -> impl Iterator<Item = &BoundarySegment> {
        self.horizontal.iter().chain(self.vertical.iter())
    }

    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }
}

/// Compute the outline of the area `name` from its loop corner points.
pub fn optimize(name: &str, vertices: &[WorldCoordinate]) -> Result<AreaOutline, GeometryError> {
    if vertices.len() < MIN_AREA_POINTS {
        return Err(GeometryError::NotEnoughPoints {
            name: name.to_string(),
            required: MIN_AREA_POINTS,
            actual: vertices.len(),
        });
    }

    let horizontal = extract_segments(name, vertices, Orientation::Horizontal)?;
    let vertical = extract_segments(name, vertices, Orientation::Vertical)?;

    check_crossings(name, &horizontal, &vertical)?;

    let outline = AreaOutline {
        horizontal: drop_interior_segments(&horizontal, &horizontal, &vertical),
        vertical: drop_interior_segments(&vertical, &horizontal, &vertical),
    };
    check_closed(name, &outline)?;
    log::debug!(
        "{}: outline has {} horizontal and {} vertical segments",
        name,
        outline.horizontal.len(),
        outline.vertical.len()
    );
    Ok(outline)
}

/// Group points on each line and pair them off in sorted order.
fn extract_segments(
    name: &str,
    vertices: &[WorldCoordinate],
    orientation: Orientation,
) -> Result<Vec<BoundarySegment>, GeometryError> {
    let mut lines: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for v in vertices {
        let (fixed, varying) = match orientation {
            Orientation::Horizontal => (v.y, v.x),
            Orientation::Vertical => (v.x, v.y),
        };
        lines.entry(fixed).or_default().push(varying);
    }

    let mut segments = Vec::new();
    for (fixed, mut points) in lines {
        if points.len() % 2 != 0 {
            return Err(GeometryError::OddVertexCount {
                name: name.to_string(),
                axis: orientation,
                value: fixed,
            });
        }
        points.sort_unstable();
        for pair in points.chunks_exact(2) {
            // coincident corners of touching loops contribute no edge
            if pair[0] != pair[1] {
                segments.push(BoundarySegment::new(orientation, fixed, pair[0], pair[1]));
            }
        }
    }
    Ok(segments)
}

fn check_crossings(
    name: &str,
    horizontal: &[BoundarySegment],
    vertical: &[BoundarySegment],
) -> Result<(), GeometryError> {
    for h in horizontal {
        for v in vertical {
            if h.crosses(v) {
                return Err(GeometryError::IntersectingLines {
                    name: name.to_string(),
                    h_start: h.start,
                    h_end: h.end,
                    v_start: v.start,
                    v_end: v.end,
                });
            }
        }
    }
    Ok(())
}

/// Remove segments sandwiched between parallel segments on both sides.
///
/// The outermost lines are always kept. Only applies once there are at
/// least three distinct lines; with fewer every segment is outline.
fn drop_interior_segments(
    segments: &[BoundarySegment],
    horizontal: &[BoundarySegment],
    vertical: &[BoundarySegment],
) -> Vec<BoundarySegment> {
    let mut groups: BTreeMap<i32, Vec<BoundarySegment>> = BTreeMap::new();
    for s in segments {
        groups.entry(s.fixed()).or_default().push(*s);
    }

    if groups.len() < 3 {
        return groups.into_values().flatten().collect();
    }

    let (first, last) = match (groups.keys().next(), groups.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut kept = Vec::new();
    for (&fixed, group) in &groups {
        if fixed == first || fixed == last {
            kept.extend(group.iter().copied());
            continue;
        }

        for segment in group {
            let mid = segment.midpoint();
            let covered = |mut range: Range<'_, i32, Vec<BoundarySegment>>| {
                range.any(|(_, g)| g.iter().any(|other| other.spans_strictly(mid)))
            };
            let beyond = covered(groups.range(fixed + 1..));
            let before = covered(groups.range(..fixed));

            // half a unit either side of the midpoint
            let f = fixed as f64;
            let (near, far) = match segment.orientation {
                Orientation::Horizontal => ((mid, f - 0.5), (mid, f + 0.5)),
                Orientation::Vertical => ((f - 0.5, mid), (f + 0.5, mid)),
            };

            if beyond && before && encloses(horizontal, vertical, near) && encloses(horizontal, vertical, far) {
                log::trace!("Dropping interior segment {} -> {}", segment.start, segment.end);
            } else {
                kept.push(*segment);
            }
        }
    }
    kept
}

/// True when segments lie above, below, left and right of `(x, y)`, each spanning it.
fn encloses(horizontal: &[BoundarySegment], vertical: &[BoundarySegment], (x, y): (f64, f64)) -> bool {
    let across = |segments: &[BoundarySegment], at: f64, pos: f64, lesser: bool| {
        segments.iter().any(|s| {
            let f = s.fixed() as f64;
            (if lesser { f < pos } else { f > pos }) && s.spans_strictly(at)
        })
    };
    across(horizontal, x, y, true)
        && across(horizontal, x, y, false)
        && across(vertical, y, x, true)
        && across(vertical, y, x, false)
}

/// Every segment end must meet a perpendicular segment or continue into a
/// collinear one.
fn check_closed(name: &str, outline: &AreaOutline) -> Result<(), GeometryError> {
    for segment in outline.segments() {
        let (collinear, perpendicular) = match segment.orientation {
            Orientation::Horizontal => (&outline.horizontal, &outline.vertical),
            Orientation::Vertical => (&outline.vertical, &outline.horizontal),
        };
        for end in [segment.start, segment.end] {
            let joined = perpendicular.iter().any(|p| p.contains(end))
                || collinear
                    .iter()
                    .any(|c| c != segment && (c.start == end || c.end == end));
            if !joined {
                return Err(GeometryError::OpenOutline { name: name.to_string(), at: end });
            }
        }
    }
    Ok(())
}
