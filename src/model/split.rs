//! Splitting a hit box mesh into two physically independent halves.

use bevy::math::Vec3;
use tracing::debug;

use super::Model;
use crate::constants::MIN_SPLIT_PIECE_SIZE;
use crate::mesh::{Mesh, MeshFactory, MeshId, MeshShape};
use crate::physics::{ImpostorShape, PhysicSet, RigidBodyBackend};

/// Cut a box mesh across its longest local axis through `hit_point`.
///
/// Returns `None` when the mesh is not a box or one of the pieces would be
/// thinner than [`MIN_SPLIT_PIECE_SIZE`].
pub fn split_box(factory: &mut MeshFactory, mesh: &Mesh, hit_point: Vec3) -> Option<[Mesh; 2]> {
    let MeshShape::Box { size } = mesh.shape else {
        return None;
    };

    let axis = if size.x >= size.y && size.x >= size.z {
        0
    } else if size.y >= size.z {
        1
    } else {
        2
    };
    let half = size[axis] / 2.0;
    let local_hit = mesh.rotation.inverse() * (hit_point - mesh.position);
    let cut = local_hit[axis].clamp(-half, half);

    let low_size = cut + half;
    let high_size = half - cut;
    if low_size < MIN_SPLIT_PIECE_SIZE || high_size < MIN_SPLIT_PIECE_SIZE {
        return None;
    }

    let mut pieces = [(low_size, -half + low_size / 2.0), (high_size, cut + high_size / 2.0)]
        .map(|(extent, offset)| {
            let mut piece_size = size;
            piece_size[axis] = extent;
            let mut local_offset = Vec3::ZERO;
            local_offset[axis] = offset;

            let position = mesh.position + mesh.rotation * local_offset;
            let mut piece = factory.clone_mesh(mesh, position, mesh.rotation);
            piece.shape = MeshShape::Box { size: piece_size };
            piece
        });
    for piece in &mut pieces {
        piece.pivot = Vec3::ZERO;
    }
    Some(pieces)
}

impl Model {
    /// Replace a live, unparented box member by two dynamic halves cut at `hit_point`,
    /// each pushed by `impulse`. Returns the ids of the new meshes, or `None` if the
    /// mesh cannot be split and stays intact.
    pub fn split_mesh(
        &mut self,
        factory: &mut MeshFactory,
        physics: &mut dyn RigidBodyBackend,
        mesh: MeshId,
        hit_point: Vec3,
        impulse: Vec3,
    ) -> Option<[MeshId; 2]> {
        let index = self.mesh_index(mesh)?;
        let original = &self.meshes[index];
        if original.is_disposed() || !original.is_primitive() || original.parent.is_some() {
            return None;
        }

        let pieces = split_box(factory, original, hit_point)?;
        let ids = [pieces[0].id, pieces[1].id];
        let params = self
            .physic_set
            .unwrap_or(PhysicSet::Synthetic)
            .impostor(ImpostorShape::Box, false);

        physics.detach(mesh);
        let mut removed = self.meshes.remove(index);
        removed.dispose();

        for (offset, piece) in pieces.into_iter().enumerate() {
            physics.attach(piece.id, params);
            physics.apply_impulse(piece.id, impulse, hit_point);
            physics.force_sync(piece.id);
            self.meshes.insert(index + offset, piece);
        }

        if let Some(impostors) = &mut self.impostors {
            impostors.splice(index..=index, [Some(params), Some(params)]);
        }

        debug!(%mesh, low = %ids[0], high = %ids[1], "split mesh at hit point");
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::yaw_quat;
    use crate::mesh::MeshOptions;
    use crate::physics::{BodyRegistry, PhysicBody};

    fn wall(factory: &mut MeshFactory, physics: &mut BodyRegistry) -> Mesh {
        factory.create_box(
            physics,
            Vec3::ZERO,
            Vec3::new(10.0, 4.0, 0.5),
            &MeshOptions::new().body(PhysicBody::fixed(PhysicSet::Concrete)),
        )
    }

    #[test]
    fn test_split_box_along_longest_axis() {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mesh = wall(&mut factory, &mut physics);

        let [low, high] = split_box(&mut factory, &mesh, Vec3::new(3.0, 2.0, 0.0)).unwrap();
        let MeshShape::Box { size: low_size } = low.shape else {
            panic!("expected box");
        };
        let MeshShape::Box { size: high_size } = high.shape else {
            panic!("expected box");
        };
        assert!((low_size.x - 3.0).abs() < 1e-4);
        assert!((high_size.x - 7.0).abs() < 1e-4);
        assert_eq!(low_size.y, 4.0);

        let (low_min, low_max) = low.bounds();
        let (high_min, high_max) = high.bounds();
        assert!(low_min.x.abs() < 1e-4);
        assert!((low_max.x - 3.0).abs() < 1e-4);
        assert!((high_min.x - 3.0).abs() < 1e-4);
        assert!((high_max.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_split_respects_rotation() {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mut mesh = wall(&mut factory, &mut physics);
        mesh.position = Vec3::ZERO;
        mesh.rotation = yaw_quat(-90.0);

        // local +X now points along world +Z
        let [low, high] = split_box(&mut factory, &mesh, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(low.position.z < 0.0);
        assert!(high.position.z > 0.0);
        assert!(low.position.x.abs() < 1e-4);
    }

    #[test]
    fn test_split_at_edge_is_refused() {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mesh = wall(&mut factory, &mut physics);
        assert!(split_box(&mut factory, &mesh, Vec3::new(0.0, 2.0, 0.0)).is_none());
        assert!(split_box(&mut factory, &mesh, Vec3::new(10.01, 2.0, 0.0)).is_none());

        let sphere = factory.create_sphere(&mut physics, Vec3::ZERO, 2.0, &MeshOptions::new());
        assert!(split_box(&mut factory, &sphere, Vec3::ONE).is_none());
    }

    #[test]
    fn test_model_split_replaces_mesh() {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mesh = wall(&mut factory, &mut physics);
        let original = mesh.id;
        let mut model = Model::new(vec![mesh], Some(PhysicSet::Concrete));

        let ids = model
            .split_mesh(
                &mut factory,
                &mut physics,
                original,
                Vec3::new(5.0, 2.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
            )
            .unwrap();

        assert_eq!(model.meshes().len(), 2);
        assert!(!model.contains_mesh(original));
        assert!(physics.params(original).is_none());
        for id in ids {
            let body = physics.body(id).unwrap();
            assert_eq!(body.params.mass, PhysicSet::Concrete.weight());
            assert_eq!(body.total_impulse, Vec3::new(0.0, 0.0, 2.0));
        }
    }

    #[test]
    fn test_model_split_refuses_unknown_mesh() {
        let mut factory = MeshFactory::default();
        let mut physics = BodyRegistry::new();
        let mesh = wall(&mut factory, &mut physics);
        let mut model = Model::new(vec![mesh], None);
        assert!(model
            .split_mesh(&mut factory, &mut physics, MeshId(999), Vec3::ZERO, Vec3::ZERO)
            .is_none());
        assert_eq!(model.meshes().len(), 1);
    }
}
