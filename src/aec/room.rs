//! Room assembly.
//!
//! The four walls are laid out as a pinwheel around the floor rectangle:
//! each wall starts flush with the interior corner behind it and runs on
//! past the next interior corner by one wall depth, so the corner squares
//! are covered exactly once.
//!
//! ```text
//!          C (180°)
//!      +-----------+ B
//!    D |           | (-90°)
//!  (90°)|           |
//!      +-----------+
//!          A (0°)  --> +X
//! ```
//!
//! A diamond corner cuts the interior corner at the end of a wall by 45°:
//! that wall stops `c + depth` earlier, the next wall starts `c` later and
//! a mitre run bridges the outer corners.

use bevy::math::{Vec2, Vec3};
use std::f32::consts::SQRT_2;
use tracing::debug;

use super::wall::WallRun;
use super::{AecContext, RoomSpec};
use crate::constants::UNBREAKABLE;
use crate::logging::TimingSpan;
use crate::math::deg_to_rad;
use crate::mesh::{MeshOptions, Texture};
use crate::model::Model;
use crate::object::{GameObject, Interaction};
use crate::physics::{PhysicBody, PhysicSet};

/// Placement of one wall run on the floor plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunLayout {
    pub origin: Vec2,
    pub rot_y: f32,
    pub length: f32,
}

impl RunLayout {
    /// Unit direction of the run on the XZ plane
    pub fn direction(&self) -> Vec2 {
        let rad = deg_to_rad(self.rot_y);
        Vec2::new(rad.cos(), -rad.sin())
    }

    pub fn end(&self) -> Vec2 {
        self.origin + self.direction() * self.length
    }
}

/// Builds rooms and staircases into game objects
pub struct RoomFactory;

impl RoomFactory {
    /// Wall runs A, B, C, D with diamond corners applied, plus the mitre
    /// closing the corner at the end of each wall (if cut)
    pub fn layout(spec: &RoomSpec, wall_depth: f32) -> ([RunLayout; 4], [Option<RunLayout>; 4]) {
        let (x, z) = (spec.position.x, spec.position.z);
        let (w, d) = (spec.size.x, spec.size.z);
        let depth = wall_depth;

        let mut runs = [
            RunLayout {
                origin: Vec2::new(x, z - depth),
                rot_y: 0.0,
                length: w + depth,
            },
            RunLayout {
                origin: Vec2::new(x + w + depth, z),
                rot_y: -90.0,
                length: d + depth,
            },
            RunLayout {
                origin: Vec2::new(x + w, z + d + depth),
                rot_y: 180.0,
                length: w + depth,
            },
            RunLayout {
                origin: Vec2::new(x - depth, z + d),
                rot_y: 90.0,
                length: d + depth,
            },
        ];
        let mut mitres = [None; 4];

        for i in 0..4 {
            let corner = spec.walls[i].diamond_corner;
            if corner <= 0.0 {
                continue;
            }
            let next = (i + 1) % 4;
            runs[i].length -= corner + depth;
            let advance = runs[next].direction() * corner;
            runs[next].origin += advance;
            runs[next].length -= corner;

            mitres[i] = Some(RunLayout {
                origin: runs[i].end(),
                rot_y: runs[i].rot_y - 45.0,
                length: mitre_length(corner, depth),
            });
        }

        (runs, mitres)
    }

    /// Floor outline relative to the room position, corners cut where
    /// diamond corners are set. `None` for a plain rectangle.
    pub fn floor_outline(spec: &RoomSpec) -> Option<Vec<Vec2>> {
        let corners: [f32; 4] = std::array::from_fn(|i| spec.walls[i].diamond_corner.max(0.0));
        if corners.iter().all(|&c| c == 0.0) {
            return None;
        }
        let (w, d) = (spec.size.x, spec.size.z);
        // interior corners in traversal order, each cut by the wall ending there;
        // (0,0) closes wall D, (w,0) wall A, (w,d) wall B, (0,d) wall C
        let plan = [
            (Vec2::new(0.0, 0.0), corners[3], Vec2::Y, Vec2::X),
            (Vec2::new(w, 0.0), corners[0], Vec2::NEG_X, Vec2::Y),
            (Vec2::new(w, d), corners[1], Vec2::NEG_Y, Vec2::NEG_X),
            (Vec2::new(0.0, d), corners[2], Vec2::X, Vec2::NEG_Y),
        ];
        let mut outline = Vec::with_capacity(8);
        for (point, cut, incoming, outgoing) in plan {
            if cut > 0.0 {
                outline.push(point + incoming * cut);
                outline.push(point + outgoing * cut);
            } else {
                outline.push(point);
            }
        }
        Some(outline)
    }

    /// Assemble a room: walls and mitres in A, AB, B, BC, C, CD, D, DA order,
    /// then ceiling and floor, all rotated around the room position by `rot_y`
    pub fn build(ctx: &mut AecContext<'_>, spec: &RoomSpec) -> Vec<GameObject> {
        let _span = TimingSpan::new("room_assembly");
        let mut objects = Self::build_unrotated(ctx, spec);
        Self::rotate_group(&mut objects, spec.position, spec.rot_y);
        debug!(objects = objects.len(), rot_y = spec.rot_y, "assembled room");
        objects
    }

    pub(crate) fn rotate_group(objects: &mut [GameObject], position: Vec3, rot_y: f32) {
        if rot_y == 0.0 {
            return;
        }
        let pivot = Vec2::new(position.x, position.z);
        for object in objects {
            object.rotate_around_pivot_xz(pivot, rot_y);
        }
    }

    pub(crate) fn build_unrotated(ctx: &mut AecContext<'_>, spec: &RoomSpec) -> Vec<GameObject> {
        let (runs, mitres) = Self::layout(spec, ctx.settings.wall_depth);
        let height = spec.size.y;
        let base_y = spec.position.y;

        let mut objects = Vec::new();
        for (i, wall) in spec.walls.iter().enumerate() {
            let Some(texture) = &wall.texture else {
                debug!(wall = i, "wall without texture omitted");
                continue;
            };
            let run = WallRun::new(
                Vec3::new(runs[i].origin.x, base_y, runs[i].origin.y),
                runs[i].length,
                height,
                runs[i].rot_y,
            )
            .texture(Some(texture.clone()))
            .doors(wall.doors.clone())
            .windows(wall.windows.clone());
            objects.extend(run.build(ctx));

            if let Some(mitre) = mitres[i] {
                let run = WallRun::new(
                    Vec3::new(mitre.origin.x, base_y, mitre.origin.y),
                    mitre.length,
                    height,
                    mitre.rot_y,
                )
                .texture(Some(texture.clone()));
                objects.extend(run.build(ctx));
            }
        }

        let outline = Self::floor_outline(spec);
        if let Some(texture) = &spec.ceiling {
            let position = spec.position + Vec3::new(0.0, height, 0.0);
            // the flip about X mirrors z, so the outline is mirrored up front
            let mirrored = outline.as_ref().map(|points| {
                points
                    .iter()
                    .rev()
                    .map(|p| Vec2::new(p.x, -p.y))
                    .collect()
            });
            objects.push(Self::surface(
                ctx,
                spec,
                position,
                mirrored,
                texture,
                Vec3::new(180.0, 0.0, 0.0),
            ));
        }
        if let Some(texture) = &spec.floor {
            objects.push(Self::surface(
                ctx,
                spec,
                spec.position,
                outline,
                texture,
                Vec3::ZERO,
            ));
        }
        objects
    }

    fn surface(
        ctx: &mut AecContext<'_>,
        spec: &RoomSpec,
        position: Vec3,
        outline: Option<Vec<Vec2>>,
        texture: &Texture,
        rotation: Vec3,
    ) -> GameObject {
        let options = MeshOptions::new()
            .texture(Some(texture.clone()))
            .rotation(rotation)
            .body(PhysicBody::fixed(PhysicSet::Concrete));
        let mesh = match outline {
            Some(outline) => ctx
                .factory
                .create_polygon(ctx.physics, position, outline, &options),
            None => ctx.factory.create_plane(
                ctx.physics,
                position,
                spec.size.x,
                spec.size.z,
                &options,
            ),
        };
        let model = Model::new(vec![mesh], Some(PhysicSet::Concrete));
        GameObject::wall(
            ctx.factory.next_object_id(),
            model,
            UNBREAKABLE,
            Interaction::none(),
        )
    }
}

/// Hypotenuse of a diamond corner mitre
pub fn mitre_length(corner: f32, wall_depth: f32) -> f32 {
    (corner + wall_depth) * SQRT_2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aec::WallSpec;
    use crate::config::AecSettings;
    use crate::mesh::{MeshFactory, MeshShape};
    use crate::physics::BodyRegistry;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    fn room() -> RoomSpec {
        RoomSpec::closed(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(20.0, 10.0, 10.0),
            Texture::new("plaster"),
        )
    }

    fn build(spec: &RoomSpec) -> Vec<GameObject> {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let settings = AecSettings::default();
        let mut ctx = AecContext {
            factory: &mut factory,
            physics: &mut physics,
            rng: &mut rng,
            settings: &settings,
        };
        RoomFactory::build(&mut ctx, spec)
    }

    #[test]
    fn test_pinwheel_runs_meet_at_outer_corners() {
        let (runs, mitres) = RoomFactory::layout(&room(), 0.5);
        assert!(mitres.iter().all(Option::is_none));
        // each run ends where the next one's outer edge begins
        assert!(approx(runs[0].end(), Vec2::new(20.5, -0.5)));
        assert!(approx(runs[1].end(), Vec2::new(20.5, 10.5)));
        assert!(approx(runs[2].end(), Vec2::new(-0.5, 10.5)));
        assert!(approx(runs[3].end(), Vec2::new(-0.5, -0.5)));
    }

    #[test]
    fn test_diamond_corner_mitre_bridges_runs() {
        let mut spec = room();
        spec.walls[0] = spec.walls[0].clone().diamond_corner(2.0);
        let (runs, mitres) = RoomFactory::layout(&spec, 0.5);

        assert!((runs[0].length - 18.0).abs() < 1e-4);
        assert!((runs[1].length - 8.5).abs() < 1e-4);
        assert!(approx(runs[1].origin, Vec2::new(20.5, 2.0)));

        let mitre = mitres[0].unwrap();
        assert_eq!(mitre.rot_y, -45.0);
        assert!((mitre.length - mitre_length(2.0, 0.5)).abs() < 1e-4);
        assert!(approx(mitre.origin, runs[0].end()));
        assert!(approx(mitre.end(), runs[1].origin));
    }

    #[test]
    fn test_generation_order() {
        let mut spec = room();
        spec.walls[1] = spec.walls[1].clone().diamond_corner(1.0);
        let objects = build(&spec);
        // four plain walls, one mitre, ceiling, floor
        assert_eq!(objects.len(), 7);

        let ceiling = &objects[5].model().meshes()[0];
        let floor = &objects[6].model().meshes()[0];
        assert!((ceiling.position.y - 10.0).abs() < 1e-4);
        assert!(floor.position.y.abs() < 1e-4);
        assert!(matches!(floor.shape, MeshShape::Polygon { .. }));
        // the mitre comes right after wall B
        let mitre = &objects[2].model().meshes()[0];
        assert!(mitre.position.x > 19.0 && mitre.position.z > 9.0);
    }

    #[test]
    fn test_cut_floor_outline() {
        let mut spec = room();
        spec.walls[0] = spec.walls[0].clone().diamond_corner(2.0);
        let outline = RoomFactory::floor_outline(&spec).unwrap();
        assert_eq!(
            outline,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(18.0, 0.0),
                Vec2::new(20.0, 2.0),
                Vec2::new(20.0, 10.0),
                Vec2::new(0.0, 10.0),
            ]
        );
        assert!(RoomFactory::floor_outline(&room()).is_none());
    }

    #[test]
    fn test_missing_textures_omit_surfaces() {
        let mut spec = room();
        spec.walls[2] = WallSpec::open();
        spec.ceiling = None;
        let objects = build(&spec);
        assert_eq!(objects.len(), 4);
    }

    #[test]
    fn test_room_rotates_around_position() {
        let spec = room().rot_y(90.0);
        let objects = build(&spec);
        let floor = &objects.last().unwrap().model().meshes()[0];
        // floor center (10, 5) turned a quarter counter-clockwise around the origin
        assert!((floor.position - Vec3::new(5.0, 0.0, -10.0)).length() < 1e-4);
    }
}
