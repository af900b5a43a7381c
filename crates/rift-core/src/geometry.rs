use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Penetration depths at or below this are treated as touching, not overlapping.
pub const CONTACT_EPSILON: f64 = 1e-9;

/// A 2D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product.
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared Euclidean length.
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn try_normalize(self) -> Option<Vec2> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Vec2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Unit vector in the same direction. A zero-length vector normalizes to zero.
    pub fn normalize(self) -> Vec2 {
        self.try_normalize().unwrap_or(Vec2::ZERO)
    }

    /// True if both components are exactly zero.
    pub fn is_zero(self) -> bool {
        self == Vec2::ZERO
    }

    /// Component-wise clamp into the box spanned by `min` and `max`.
    pub fn clamp(self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box used for the broad phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Inclusive overlap test. Touching boxes count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Occupied space in the world.
///
/// The simulation only talks to geometry through this contract: point
/// containment for projectile hits, a conservative broad-phase test, and the
/// translation that pushes a region out of a static solid.
pub trait Region: Clone + fmt::Debug {
    /// True if `point` lies inside (or on the boundary of) the region.
    fn contains(&self, point: Vec2) -> bool;

    /// Bounding box enclosing the region.
    fn bounds(&self) -> Aabb;

    /// Translation that, applied to `self`, removes its penetration into
    /// `solid`. Returns [`Vec2::ZERO`] when the two do not overlap.
    fn uncollide(&self, solid: &Self) -> Vec2;

    /// Move the region by `offset`.
    fn translate(&mut self, offset: Vec2);

    /// Representative center point.
    fn center(&self) -> Vec2;

    /// Broad-phase test. May report false positives, never false negatives.
    fn might_collide(&self, other: &Self) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

/// Reference geometry: circles and axis-aligned rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A disc.
    Circle {
        /// Center point.
        center: Vec2,
        /// Radius, non-negative.
        radius: f64,
    },
    /// An axis-aligned rectangle.
    Rect {
        /// Lower-left corner.
        min: Vec2,
        /// Upper-right corner.
        max: Vec2,
    },
}

impl Shape {
    /// Create a validated circle.
    pub fn circle(center: Vec2, radius: f64) -> CoreResult<Self> {
        let shape = Shape::Circle { center, radius };
        shape.validate()?;
        Ok(shape)
    }

    /// Create a validated rectangle from its corners.
    pub fn rect(min: Vec2, max: Vec2) -> CoreResult<Self> {
        let shape = Shape::Rect { min, max };
        shape.validate()?;
        Ok(shape)
    }

    /// Check dimensions. Shapes deserialized from scenario files go through here.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Shape::Circle { center, radius } => {
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(CoreError::InvalidShape(format!(
                        "circle at {center} has radius {radius}"
                    )));
                }
            }
            Shape::Rect { min, max } => {
                if min.x > max.x || min.y > max.y {
                    return Err(CoreError::InvalidShape(format!(
                        "rectangle corners {min} and {max} are inverted"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The exit with the smallest depth. Ties keep the earlier entry.
fn shallowest(exits: [(f64, Vec2); 4]) -> (f64, Vec2) {
    let mut best = exits[0];
    for exit in &exits[1..] {
        if exit.0 < best.0 {
            best = *exit;
        }
    }
    best
}

/// Push a circle out of a rectangle.
fn circle_out_of_rect(center: Vec2, radius: f64, min: Vec2, max: Vec2) -> Vec2 {
    let closest = center.clamp(min, max);
    if closest == center {
        // Center is inside the rectangle: leave through the nearest edge.
        let (depth, dir) = shallowest([
            (center.x - min.x, Vec2::new(-1.0, 0.0)),
            (max.x - center.x, Vec2::new(1.0, 0.0)),
            (center.y - min.y, Vec2::new(0.0, -1.0)),
            (max.y - center.y, Vec2::new(0.0, 1.0)),
        ]);
        return dir * (depth + radius);
    }
    let offset = center - closest;
    let overlap = radius - offset.length();
    if overlap <= CONTACT_EPSILON {
        return Vec2::ZERO;
    }
    offset.normalize() * overlap
}

impl Region for Shape {
    fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Circle { center, radius } => (point - *center).length_squared() <= radius * radius,
            Shape::Rect { min, max } => {
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            Shape::Circle { center, radius } => Aabb {
                min: Vec2::new(center.x - radius, center.y - radius),
                max: Vec2::new(center.x + radius, center.y + radius),
            },
            Shape::Rect { min, max } => Aabb { min: *min, max: *max },
        }
    }

    fn uncollide(&self, solid: &Self) -> Vec2 {
        match (self, solid) {
            (
                Shape::Circle { center: a, radius: ra },
                Shape::Circle { center: b, radius: rb },
            ) => {
                let offset = *a - *b;
                let overlap = ra + rb - offset.length();
                if overlap <= CONTACT_EPSILON {
                    return Vec2::ZERO;
                }
                // Coincident centers have no preferred direction; pick +x.
                offset.try_normalize().unwrap_or(Vec2::new(1.0, 0.0)) * overlap
            }
            (Shape::Circle { center, radius }, Shape::Rect { min, max }) => {
                circle_out_of_rect(*center, *radius, *min, *max)
            }
            (Shape::Rect { min, max }, Shape::Circle { center, radius }) => {
                -circle_out_of_rect(*center, *radius, *min, *max)
            }
            (Shape::Rect { min: amin, max: amax }, Shape::Rect { min: bmin, max: bmax }) => {
                let overlap_x = amax.x.min(bmax.x) - amin.x.max(bmin.x);
                let overlap_y = amax.y.min(bmax.y) - amin.y.max(bmin.y);
                if overlap_x <= CONTACT_EPSILON || overlap_y <= CONTACT_EPSILON {
                    return Vec2::ZERO;
                }
                // Distance needed to clear the solid through each of its sides.
                let exits = [
                    (amax.x - bmin.x, Vec2::new(-1.0, 0.0)),
                    (bmax.x - amin.x, Vec2::new(1.0, 0.0)),
                    (amax.y - bmin.y, Vec2::new(0.0, -1.0)),
                    (bmax.y - amin.y, Vec2::new(0.0, 1.0)),
                ];
                let (depth, dir) = shallowest(exits);
                dir * depth
            }
        }
    }

    fn translate(&mut self, offset: Vec2) {
        match self {
            Shape::Circle { center, .. } => *center += offset,
            Shape::Rect { min, max } => {
                *min += offset;
                *max += offset;
            }
        }
    }

    fn center(&self) -> Vec2 {
        match self {
            Shape::Circle { center, .. } => *center,
            Shape::Rect { min, max } => Vec2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn circle(x: f64, y: f64, r: f64) -> Shape {
        Shape::circle(Vec2::new(x, y), r).unwrap()
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::rect(Vec2::new(x0, y0), Vec2::new(x1, y1)).unwrap()
    }

    fn separated(a: &Shape, solid: &Shape) -> bool {
        a.uncollide(solid).length() <= 1e-6
    }

    #[test]
    fn normalize_zero_vector_is_none() {
        assert!(Vec2::ZERO.try_normalize().is_none());
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        let unit = Vec2::new(3.0, 4.0).normalize();
        assert!((unit.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_shapes_rejected() {
        assert!(Shape::circle(Vec2::ZERO, -1.0).is_err());
        assert!(Shape::rect(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)).is_err());
        assert!(Shape::circle(Vec2::ZERO, 0.0).is_ok());
    }

    #[test]
    fn containment_includes_boundary() {
        let c = circle(0.0, 0.0, 1.0);
        assert!(c.contains(Vec2::new(1.0, 0.0)));
        assert!(!c.contains(Vec2::new(1.0, 0.1)));
        let r = rect(0.0, 0.0, 2.0, 1.0);
        assert!(r.contains(Vec2::new(2.0, 1.0)));
        assert!(!r.contains(Vec2::new(2.1, 0.5)));
    }

    #[test]
    fn disjoint_shapes_get_zero_translation() {
        let solid = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(circle(20.0, 5.0, 2.0).uncollide(&solid), Vec2::ZERO);
        assert_eq!(rect(11.0, 0.0, 12.0, 1.0).uncollide(&solid), Vec2::ZERO);
        assert_eq!(circle(0.0, 0.0, 1.0).uncollide(&circle(5.0, 0.0, 1.0)), Vec2::ZERO);
    }

    #[test]
    fn touching_is_not_penetrating() {
        let solid = rect(0.0, 0.0, 10.0, 10.0);
        let touching = rect(10.0, 0.0, 12.0, 2.0);
        assert!(touching.might_collide(&solid));
        assert_eq!(touching.uncollide(&solid), Vec2::ZERO);
    }

    #[test]
    fn circle_pushed_out_of_circle() {
        let mut c = circle(1.0, 0.0, 1.0);
        let solid = circle(0.0, 0.0, 1.0);
        let t = c.uncollide(&solid);
        assert!((t.x - 1.0).abs() < 1e-12);
        assert_eq!(t.y, 0.0);
        c.translate(t);
        assert!(separated(&c, &solid));
    }

    #[test]
    fn circle_with_center_inside_rect_leaves_through_nearest_edge() {
        let solid = rect(0.0, 0.0, 10.0, 10.0);
        let mut c = circle(9.0, 5.0, 1.0);
        let t = c.uncollide(&solid);
        assert_eq!(t, Vec2::new(2.0, 0.0));
        c.translate(t);
        assert!(separated(&c, &solid));
    }

    #[test]
    fn rect_pushed_along_shallow_axis() {
        let solid = rect(0.0, 0.0, 10.0, 10.0);
        let r = rect(-1.0, 2.0, 1.0, 4.0);
        assert_eq!(r.uncollide(&solid), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn rect_pushed_out_of_circle() {
        let solid = circle(0.0, 0.0, 2.0);
        let mut r = rect(1.0, -0.5, 3.0, 0.5);
        let t = r.uncollide(&solid);
        assert!(t.x > 0.0);
        r.translate(t);
        assert!(separated(&r, &solid));
    }

    #[test]
    fn broad_phase_is_conservative_for_overlap() {
        let a = circle(0.0, 0.0, 1.0);
        let b = circle(1.5, 0.0, 1.0);
        assert!(a.might_collide(&b));
        assert!(!a.might_collide(&circle(5.0, 5.0, 1.0)));
    }

    #[test]
    fn shape_json_uses_kind_tag() {
        let json = r#"{"kind":"circle","center":{"x":1.0,"y":2.0},"radius":3.0}"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape, circle(1.0, 2.0, 3.0));
    }

    proptest! {
        #[test]
        fn uncollide_separates_circle_from_rect(
            x in -5.0f64..15.0,
            y in -5.0f64..15.0,
            r in 0.1f64..4.0,
        ) {
            let solid = rect(0.0, 0.0, 10.0, 10.0);
            let mut c = circle(x, y, r);
            let t = c.uncollide(&solid);
            c.translate(t);
            prop_assert!(separated(&c, &solid));
        }

        #[test]
        fn uncollide_separates_rects(
            x in -5.0f64..10.0,
            y in -5.0f64..10.0,
            w in 0.5f64..5.0,
            h in 0.5f64..5.0,
        ) {
            let solid = rect(0.0, 0.0, 6.0, 6.0);
            let mut r = rect(x, y, x + w, y + h);
            let t = r.uncollide(&solid);
            r.translate(t);
            prop_assert!(separated(&r, &solid));
        }
    }
}
