use impacted::{CollisionShape, Transform};
use macroquad::math::{vec2, Vec2};

/// Extra length added to every wall when locating a hit along it. Keeps the
/// hit fraction below 1 near wall ends and avoids dividing by a tiny length.
pub const WALL_LENGTH_EPSILON: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub point: Vec2,
    pub fraction: f32,    // Position of the hit along the wall, 0..1
    pub wall_length: f32, // Includes the epsilon
}

/// Axis aligned box, positioned by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn offset(&self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Inclusive bounds test used for screen culling.
    pub fn is_visible_in(&self, viewport: &Rect) -> bool {
        !(self.x + self.width < viewport.x
            || self.x > viewport.x + viewport.width
            || self.y + self.height < viewport.y
            || self.y > viewport.y + viewport.height)
    }

    pub fn collision_shape(&self) -> CollisionShape {
        CollisionShape::new_rectangle(self.width, self.height)
            .with_transform(Transform::from_translation(self.center().to_array()))
    }

    /// Contact test, shapes that touch count as colliding.
    pub fn touches(&self, other: &Rect) -> bool {
        self.collision_shape()
            .is_collided_with(&other.collision_shape())
    }
}

pub fn normalize_angle(angle: f32) -> f32 {
    let angle = angle % 360.0;
    let angle = if angle < 0.0 { angle + 360.0 } else { angle };
    // -tiny % 360 + 360 rounds up to exactly 360 in f32
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}

pub fn vector_to_position(angle: f32, magnitude: f32) -> Vec2 {
    let radians = angle.to_radians();
    vec2(magnitude * radians.cos(), magnitude * radians.sin())
}

pub fn calculate_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle in degrees of the direction pointing from `from` to `to`.
pub fn calculate_angle(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees()
}

pub fn point_to_segment_distance(point: Vec2, segment: &Segment) -> f32 {
    let a = point - segment.start;
    let c = segment.end - segment.start;

    let dot = a.dot(c);
    let len_sq = c.length_squared();
    // zero-length segments keep the sentinel and measure to the start point
    let param = if len_sq != 0.0 { dot / len_sq } else { -1.0 };

    let closest = if param < 0.0 {
        segment.start
    } else if param > 1.0 {
        segment.end
    } else {
        segment.start + c * param
    };

    point.distance(closest)
}

/// Intersection of the ray segment with a wall. Parallel and collinear pairs
/// never hit, and touching exactly at an endpoint of either segment does not
/// count.
pub fn segment_intersection(ray: &Segment, wall: &Segment) -> Option<SegmentHit> {
    let (a, b) = (ray.start.x, ray.start.y);
    let (c, d) = (ray.end.x, ray.end.y);
    let (p, q) = (wall.start.x, wall.start.y);
    let (r, s) = (wall.end.x, wall.end.y);

    let det = (c - a) * (s - q) - (r - p) * (d - b);
    if det == 0.0 {
        return None;
    }

    let lambda = ((s - q) * (r - a) + (p - r) * (s - b)) / det;
    let gamma = ((b - d) * (r - a) + (c - a) * (s - b)) / det;

    if !(0.0 < lambda && lambda < 1.0 && 0.0 < gamma && gamma < 1.0) {
        return None;
    }

    let point = vec2(a + lambda * (c - a), b + lambda * (d - b));
    let wall_length = wall.length() + WALL_LENGTH_EPSILON;

    Some(SegmentHit {
        point,
        fraction: point.distance(wall.start) / wall_length,
        wall_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 8.0, 8.0);
        assert!(a.overlaps(&Rect::new(7.0, 7.0, 8.0, 8.0)));
        assert!(!a.overlaps(&Rect::new(8.0, 0.0, 8.0, 8.0)));
        assert!(a.touches(&Rect::new(4.0, 4.0, 8.0, 8.0)));
        assert!(!a.touches(&Rect::new(20.0, 0.0, 8.0, 8.0)));
        assert!(a.is_visible_in(&Rect::new(8.0, 8.0, 16.0, 16.0)));
        assert!(!a.is_visible_in(&Rect::new(9.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn normalize_angle_stays_in_range() {
        for angle in [-720.5, -360.0, -90.0, -1e-7, 0.0, 45.0, 359.9, 360.0, 725.0, 1e7] {
            let once = normalize_angle(angle);
            assert!((0.0..360.0).contains(&once), "{angle} -> {once}");
            assert_eq!(normalize_angle(once), once);
        }
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(450.0), 90.0);
    }

    #[test]
    fn vector_to_position_uses_degrees() {
        let v = vector_to_position(90.0, 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn point_to_segment_distance_clamps() {
        let segment = Segment::new(vec2(0.0, 0.0), vec2(10.0, 0.0));
        assert_eq!(point_to_segment_distance(vec2(5.0, 3.0), &segment), 3.0);
        assert_eq!(point_to_segment_distance(vec2(-4.0, 3.0), &segment), 5.0);
        assert_eq!(point_to_segment_distance(vec2(13.0, 4.0), &segment), 5.0);

        let degenerate = Segment::new(vec2(1.0, 1.0), vec2(1.0, 1.0));
        assert_eq!(point_to_segment_distance(vec2(4.0, 5.0), &degenerate), 5.0);
    }

    #[test]
    fn intersection_reports_fraction_and_length() {
        let ray = Segment::new(vec2(5.0, 5.0), vec2(5.0, -5.0));
        let wall = Segment::new(vec2(0.0, 0.0), vec2(10.0, 0.0));
        let hit = segment_intersection(&ray, &wall).unwrap();
        assert_eq!(hit.point, vec2(5.0, 0.0));
        assert_eq!(hit.wall_length, 12.0);
        assert!((hit.fraction - 5.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn intersection_excludes_endpoints_and_parallels() {
        let wall = Segment::new(vec2(0.0, 0.0), vec2(10.0, 0.0));

        // ray ends exactly on the wall
        let touching = Segment::new(vec2(5.0, 5.0), vec2(5.0, 0.0));
        assert!(segment_intersection(&touching, &wall).is_none());

        // ray passes exactly through the wall's start point
        let corner = Segment::new(vec2(0.0, 5.0), vec2(0.0, -5.0));
        assert!(segment_intersection(&corner, &wall).is_none());

        let parallel = Segment::new(vec2(0.0, 1.0), vec2(10.0, 1.0));
        assert!(segment_intersection(&parallel, &wall).is_none());

        let collinear = Segment::new(vec2(-5.0, 0.0), vec2(5.0, 0.0));
        assert!(segment_intersection(&collinear, &wall).is_none());
    }
}
