use macroquad::math::Vec2;

use crate::{
    geometry::{normalize_angle, segment_intersection, vector_to_position, Segment},
    world::{SegmentWorld, Sprite},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayHit {
    None,
    Wall {
        fraction: f32,    // Where along the wall the ray landed, 0..1
        wall_length: f32, // Wall length plus epsilon
        wall: usize,      // Index into the world's walls
    },
    Target,
}

impl RayHit {
    pub fn is_hit(&self) -> bool {
        !matches!(self, RayHit::None)
    }
}

/// A single cast through a [`SegmentWorld`]. Build one, cast it once, read the
/// result.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec2,
    pub position: Vec2,
    pub angle: f32, // Degrees, 0..360
    pub traveled: f32,
    pub hit: RayHit,
}

impl Ray {
    pub fn new(origin: Vec2, angle: f32) -> Self {
        Self {
            origin,
            position: origin,
            angle: normalize_angle(angle),
            traveled: 0.0,
            hit: RayHit::None,
        }
    }

    /// Steps the ray `fidelity` pixels at a time until it crosses a wall, the
    /// optional target sprite, `max_distance`, or the world bounds.
    pub fn cast(
        &mut self,
        world: &SegmentWorld,
        fidelity: f32,
        max_distance: Option<f32>,
        target: Option<&Sprite>,
    ) -> RayHit {
        self.traveled = 0.0;
        self.hit = RayHit::None;

        if !(fidelity > 0.0 && fidelity.is_finite()) {
            log::warn!("Failed to cast ray: fidelity must be positive, got {fidelity}");
            return self.hit;
        }

        let step = vector_to_position(self.angle, fidelity);
        let target = target.map(Sprite::cross_segment);

        while max_distance.map_or(true, |max| self.traveled <= max)
            && world.contains(self.position)
        {
            self.position += step;
            let path = Segment::new(self.origin, self.position);

            for index in world.find_lines_within_distance(self.position, fidelity) {
                if let Some(hit) = segment_intersection(&path, &world.walls[index].segment) {
                    self.hit = RayHit::Wall {
                        fraction: hit.fraction,
                        wall_length: hit.wall_length,
                        wall: index,
                    };
                    return self.hit;
                }
            }

            if let Some(cross) = &target {
                if segment_intersection(&path, cross).is_some() {
                    self.hit = RayHit::Target;
                    return self.hit;
                }
            }

            self.traveled += fidelity;
        }

        self.hit
    }
}
