// Axis-aligned boxes and facing helpers shared by collision, raycasts and AI.

use glam::Vec3;

/// Axis-aligned bounding box, the only collision primitive in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Builds a box from two corners in any order so `min <= max` holds per axis.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Upright body volume: `radius` around `pos` horizontally, `height` above its feet.
    pub fn body(pos: Vec3, radius: f32, height: f32) -> Self {
        Self {
            min: Vec3::new(pos.x - radius, pos.y, pos.z - radius),
            max: Vec3::new(pos.x + radius, pos.y + height, pos.z + radius),
        }
    }

    /// Box of half-extents `half` centred on `center`.
    pub fn centered(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn intersects(&self, o: &Aabb) -> bool {
        self.min.x <= o.max.x
            && self.max.x >= o.min.x
            && self.min.y <= o.max.y
            && self.max.y >= o.min.y
            && self.min.z <= o.max.z
            && self.max.z >= o.min.z
    }

    /// Slab-method ray test. Returns the entry distance along `dir`.
    ///
    /// A ray starting inside the box reports `None` (entry lies behind the origin),
    /// matching how shots fired from inside geometry are treated.
    pub fn raycast(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (mn, mx) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-8 {
                if o < mn || o > mx {
                    return None;
                }
                continue;
            }

            let mut t1 = (mn - o) / d;
            let mut t2 = (mx - o) / d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_near = t_near.max(t1);
            t_far = t_far.min(t2);
            if t_near > t_far || t_far < 0.0 {
                return None;
            }
        }

        (t_near >= 0.0).then_some(t_near)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Horizontal forward vector for a yaw angle (yaw 0 faces +Z).
pub fn forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Horizontal right vector for a yaw angle.
pub fn right(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.cos(), 0.0, yaw.sin())
}

/// Unit aim direction for a yaw/pitch pair.
pub fn aim_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos()).normalize_or_zero()
}

/// Yaw that faces along the horizontal part of `delta`.
pub fn yaw_towards(delta: Vec3) -> f32 {
    delta.x.atan2(delta.z)
}
