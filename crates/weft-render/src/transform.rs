//! 2D affine transformations.
//!
//! Widgets carry a scale and rotation around a relative origin; their render
//! transform is that local transform composed with the parent's.

use crate::types::{Point, Rect};

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix in column-major order:
/// ```text
/// | m00 m10 m20 |   | scale_x  skew_x   translate_x |
/// | m01 m11 m21 | = | skew_y   scale_y  translate_y |
/// ```
///
/// # Example
///
/// ```
/// use weft_render::{Point, Transform2D};
///
/// // Transforms compose right-to-left with `then`
/// // (first translate, then scale)
/// let transform = Transform2D::scale(2.0, 2.0).then(&Transform2D::translate(10.0, 0.0));
/// let p = transform.transform_point(Point::new(5.0, 0.0));
/// assert_eq!(p, Point::new(30.0, 0.0));
///
/// let back = transform.inverse().unwrap().transform_point(p);
/// assert!((back.x - 5.0).abs() < 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Matrix elements in column-major order.
    m: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform (no transformation).
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Create a translation transform.
    #[inline]
    pub const fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    /// Create a (possibly non-uniform) scale transform.
    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Create a rotation transform (angle in radians, clockwise on screen).
    #[inline]
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    /// Scale then rotate around `center`.
    ///
    /// This is the local transform of a widget whose transform origin resolves
    /// to `center`.
    pub fn around(center: Point, sx: f32, sy: f32, angle: f32) -> Self {
        Self::translate(center.x, center.y)
            .then(&Self::rotate(angle))
            .then(&Self::scale(sx, sy))
            .then(&Self::translate(-center.x, -center.y))
    }

    /// Concatenate this transform with another (self * other).
    ///
    /// The resulting transform first applies `other`, then `self`.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self {
            m: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    /// Transform a point.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.m[0] * p.x + self.m[2] * p.y + self.m[4],
            y: self.m[1] * p.x + self.m[3] * p.y + self.m[5],
        }
    }

    /// Compute the inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < 1e-10 {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Self {
            m: [
                self.m[3] * inv_det,
                -self.m[1] * inv_det,
                -self.m[2] * inv_det,
                self.m[0] * inv_det,
                (self.m[2] * self.m[5] - self.m[3] * self.m[4]) * inv_det,
                (self.m[1] * self.m[4] - self.m[0] * self.m[5]) * inv_det,
            ],
        })
    }

    /// Get the translation component.
    #[inline]
    pub fn translation(&self) -> (f32, f32) {
        (self.m[4], self.m[5])
    }

    /// Get the determinant of the transform matrix.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// Check if this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Check if the transform keeps rectangles axis-aligned (no rotation or skew).
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.m[1] == 0.0 && self.m[2] == 0.0
    }

    /// Transform a rectangle's bounding box.
    ///
    /// Returns the axis-aligned bounding box of the transformed rectangle,
    /// which may be larger than the original if rotation is involved.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.transform_point(rect.top_left()),
            self.transform_point(rect.top_right()),
            self.transform_point(rect.bottom_left()),
            self.transform_point(rect.bottom_right()),
        ];

        let min_x = corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let min_y = corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_x = corners
            .iter()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max);
        let max_y = corners
            .iter()
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max);

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_translate_and_inverse() {
        let t = Transform2D::translate(100.0, 50.0);
        assert_eq!(t.transform_point(Point::ZERO), Point::new(100.0, 50.0));
        let inv = t.inverse().unwrap();
        assert_eq!(inv.transform_point(Point::new(100.0, 50.0)), Point::ZERO);
        assert!(t.is_axis_aligned());
    }

    #[test]
    fn test_around_keeps_center_fixed() {
        let center = Point::new(50.0, 50.0);
        let t = Transform2D::around(center, 2.0, 2.0, std::f32::consts::FRAC_PI_2);
        assert!(approx(t.transform_point(center), center));

        // (60, 50) is 10px right of center: scaled to 20px, then rotated 90 degrees
        assert!(approx(t.transform_point(Point::new(60.0, 50.0)), Point::new(50.0, 70.0)));
        assert!(!t.is_axis_aligned());
    }

    #[test]
    fn test_transform_rect_with_scale() {
        let t = Transform2D::around(Point::new(10.0, 10.0), 2.0, 2.0, 0.0);
        let r = t.transform_rect(&Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(r, Rect::new(-10.0, -10.0, 40.0, 40.0));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Transform2D::scale(0.0, 1.0).inverse().is_none());
    }
}
