//! Ray casting against primitive shapes in their local space.
//!
//! Callers move the ray into the mesh frame first (see [`Ray::to_local`]);
//! the returned normal is local too and faces the incoming ray.

use bevy::math::{Quat, Vec2, Vec3};

const EPSILON: f32 = 1e-6;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3, // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed in the frame of an object at `position` with `rotation`
    pub fn to_local(&self, position: Vec3, rotation: Quat) -> Ray {
        let inverse = rotation.inverse();
        Ray {
            origin: inverse * (self.origin - position),
            direction: inverse * self.direction,
        }
    }
}

/// Intersection in local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalHit {
    pub distance: f32,
    pub normal: Vec3,
}

/// Axis-aligned box centered on the origin
pub fn intersect_box(ray: &Ray, half_extents: Vec3) -> Option<LocalHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;
    let mut exit_normal = Vec3::ZERO;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let half = half_extents[axis];

        if dir.abs() < EPSILON {
            if origin < -half || origin > half {
                return None;
            }
            continue;
        }

        let mut near = (-half - origin) / dir;
        let mut far = (half - origin) / dir;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }

        let mut facing = Vec3::ZERO;
        facing[axis] = -dir.signum();

        if near > t_enter {
            t_enter = near;
            enter_normal = facing;
        }
        if far < t_exit {
            t_exit = far;
            exit_normal = -facing;
        }
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    if t_enter >= 0.0 {
        Some(LocalHit {
            distance: t_enter,
            normal: enter_normal,
        })
    } else {
        // origin inside the box
        Some(LocalHit {
            distance: t_exit,
            normal: exit_normal,
        })
    }
}

/// Horizontal rectangle on y = 0 with the given half extents on x and z
pub fn intersect_plane(ray: &Ray, half_width: f32, half_depth: f32) -> Option<LocalHit> {
    let (t, point) = hit_ground(ray)?;
    if point.x.abs() > half_width || point.z.abs() > half_depth {
        return None;
    }
    Some(LocalHit {
        distance: t,
        normal: Vec3::new(0.0, -ray.direction.y.signum(), 0.0),
    })
}

/// Horizontal polygon on y = 0, outline given as XZ points
pub fn intersect_polygon(ray: &Ray, outline: &[Vec2]) -> Option<LocalHit> {
    let (t, point) = hit_ground(ray)?;
    if !point_in_polygon(Vec2::new(point.x, point.z), outline) {
        return None;
    }
    Some(LocalHit {
        distance: t,
        normal: Vec3::new(0.0, -ray.direction.y.signum(), 0.0),
    })
}

pub fn intersect_sphere(ray: &Ray, radius: f32) -> Option<LocalHit> {
    let b = ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let mut t = -b - root;
    if t < 0.0 {
        t = -b + root;
    }
    if t < 0.0 {
        return None;
    }
    Some(LocalHit {
        distance: t,
        normal: ray.at(t) / radius,
    })
}

/// Upright cylinder centered on the origin
pub fn intersect_cylinder(ray: &Ray, radius: f32, half_height: f32) -> Option<LocalHit> {
    let o = ray.origin;
    let d = ray.direction;
    let mut best: Option<LocalHit> = None;
    let mut consider = |hit: LocalHit| {
        if hit.distance >= 0.0 && best.map_or(true, |b| hit.distance < b.distance) {
            best = Some(hit);
        }
    };

    let a = d.x * d.x + d.z * d.z;
    if a > EPSILON {
        let b = o.x * d.x + o.z * d.z;
        let c = o.x * o.x + o.z * o.z - radius * radius;
        let discriminant = b * b - a * c;
        if discriminant >= 0.0 {
            let root = discriminant.sqrt();
            for t in [(-b - root) / a, (-b + root) / a] {
                let p = ray.at(t);
                if p.y.abs() <= half_height {
                    consider(LocalHit {
                        distance: t,
                        normal: Vec3::new(p.x, 0.0, p.z) / radius,
                    });
                }
            }
        }
    }

    if d.y.abs() > EPSILON {
        for cap in [-half_height, half_height] {
            let t = (cap - o.y) / d.y;
            let p = ray.at(t);
            if p.x * p.x + p.z * p.z <= radius * radius {
                consider(LocalHit {
                    distance: t,
                    normal: Vec3::new(0.0, cap.signum(), 0.0),
                });
            }
        }
    }

    best
}

fn hit_ground(ray: &Ray) -> Option<(f32, Vec3)> {
    if ray.direction.y.abs() < EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    Some((t, ray.at(t)))
}

/// Even-odd rule
pub fn point_in_polygon(point: Vec2, outline: &[Vec2]) -> bool {
    if outline.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = outline.len() - 1;
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[j];
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_front_face() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let hit = intersect_box(&ray, Vec3::splat(1.0)).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::NEG_X);
    }

    #[test]
    fn test_box_miss_and_behind() {
        let miss = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(intersect_box(&miss, Vec3::splat(1.0)).is_none());

        let behind = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        assert!(intersect_box(&behind, Vec3::splat(1.0)).is_none());
    }

    #[test]
    fn test_box_from_inside_hits_exit_face() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = intersect_box(&ray, Vec3::new(1.0, 1.0, 2.0)).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn test_plane_from_above() {
        let ray = Ray::new(Vec3::new(0.5, 4.0, 0.5), Vec3::NEG_Y);
        let hit = intersect_plane(&ray, 1.0, 1.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::Y);

        let outside = Ray::new(Vec3::new(3.0, 4.0, 0.0), Vec3::NEG_Y);
        assert!(intersect_plane(&outside, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_polygon_cut_corner() {
        // square with the (+x, +z) corner bevelled off
        let outline = [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ];
        assert!(point_in_polygon(Vec2::new(0.0, 0.0), &outline));
        assert!(!point_in_polygon(Vec2::new(0.9, 0.9), &outline));

        let ray = Ray::new(Vec3::new(0.9, 2.0, 0.9), Vec3::NEG_Y);
        assert!(intersect_polygon(&ray, &outline).is_none());
    }

    #[test]
    fn test_sphere_and_cylinder() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let sphere = intersect_sphere(&ray, 2.0).unwrap();
        assert!((sphere.distance - 8.0).abs() < 1e-4);
        assert!((sphere.normal - Vec3::NEG_Z).length() < 1e-4);

        let cylinder = intersect_cylinder(&ray, 1.0, 1.0).unwrap();
        assert!((cylinder.distance - 9.0).abs() < 1e-4);

        let top = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let cap = intersect_cylinder(&top, 1.0, 1.0).unwrap();
        assert!((cap.distance - 4.0).abs() < 1e-4);
        assert_eq!(cap.normal, Vec3::Y);
    }

    #[test]
    fn test_to_local_undoes_rotation() {
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_X);
        let local = ray.to_local(Vec3::new(5.0, 0.0, 0.0), rotation);
        assert!((local.origin.length() - 5.0).abs() < 1e-4);
        assert!((local.direction.length() - 1.0).abs() < 1e-5);
    }
}
