//! Primitive mesh factory.
//!
//! Creates box/plane/polygon/cylinder/sphere meshes with a fresh id, places
//! them according to an [`Anchor`] and binds the requested impostor through
//! the rigid body backend before handing the mesh out.

use bevy::math::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::{IdAllocator, Mesh, MeshId, MeshShape, ObjectId, Texture};
use crate::config::DebugSettings;
use crate::math::euler_deg_to_quat;
use crate::physics::{ImpostorShape, PhysicBody, RigidBodyBackend};

/// Which point of the mesh the given position refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Position is the minimum corner of the unrotated bounding box
    #[default]
    LowestXyz,
    /// Position is the center
    CenterXyz,
    /// Position is the center of the bottom face
    CenterXzLowestY,
}

impl Anchor {
    /// Center of a shape with `half_extents` anchored at `position`
    pub fn center(&self, position: Vec3, half_extents: Vec3) -> Vec3 {
        match self {
            Self::LowestXyz => position + half_extents,
            Self::CenterXyz => position,
            Self::CenterXzLowestY => position + Vec3::new(0.0, half_extents.y, 0.0),
        }
    }
}

/// Optional creation parameters shared by every primitive
#[derive(Debug, Clone, Default)]
pub struct MeshOptions {
    pub texture: Option<Texture>,
    pub reverse_texture_x: bool,
    pub body: Option<PhysicBody>,
    pub anchor: Anchor,
    /// Euler rotation in degrees, applied around the mesh center
    pub rotation: Vec3,
}

impl MeshOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(mut self, texture: Option<Texture>) -> Self {
        self.texture = texture;
        self
    }

    pub fn reverse_texture_x(mut self, reverse: bool) -> Self {
        self.reverse_texture_x = reverse;
        self
    }

    pub fn body(mut self, body: PhysicBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Builds meshes for one stage; owns the stage's id allocator
#[derive(Debug, Clone, Default)]
pub struct MeshFactory {
    ids: IdAllocator,
    debug: DebugSettings,
}

impl MeshFactory {
    pub fn new(debug: DebugSettings) -> Self {
        Self {
            ids: IdAllocator::new(),
            debug,
        }
    }

    pub fn debug(&self) -> DebugSettings {
        self.debug
    }

    pub fn set_debug(&mut self, debug: DebugSettings) {
        self.debug = debug;
    }

    pub fn next_mesh_id(&mut self) -> MeshId {
        self.ids.next_mesh_id()
    }

    pub fn next_object_id(&mut self) -> ObjectId {
        self.ids.next_object_id()
    }

    pub fn create_box(
        &mut self,
        physics: &mut dyn RigidBodyBackend,
        position: Vec3,
        size: Vec3,
        options: &MeshOptions,
    ) -> Mesh {
        self.create(physics, MeshShape::Box { size }, position, options)
    }

    /// Horizontal plane of `width` (x) by `depth` (z)
    pub fn create_plane(
        &mut self,
        physics: &mut dyn RigidBodyBackend,
        position: Vec3,
        width: f32,
        depth: f32,
        options: &MeshOptions,
    ) -> Mesh {
        self.create(physics, MeshShape::Plane { width, depth }, position, options)
    }

    /// Horizontal polygon; the anchor is ignored, `position` is the outline origin
    pub fn create_polygon(
        &mut self,
        physics: &mut dyn RigidBodyBackend,
        position: Vec3,
        outline: Vec<Vec2>,
        options: &MeshOptions,
    ) -> Mesh {
        let options = options.clone().anchor(Anchor::CenterXyz);
        self.create(physics, MeshShape::Polygon { outline }, position, &options)
    }

    pub fn create_cylinder(
        &mut self,
        physics: &mut dyn RigidBodyBackend,
        position: Vec3,
        diameter: f32,
        height: f32,
        options: &MeshOptions,
    ) -> Mesh {
        self.create(
            physics,
            MeshShape::Cylinder { diameter, height },
            position,
            options,
        )
    }

    pub fn create_sphere(
        &mut self,
        physics: &mut dyn RigidBodyBackend,
        position: Vec3,
        diameter: f32,
        options: &MeshOptions,
    ) -> Mesh {
        self.create(physics, MeshShape::Sphere { diameter }, position, options)
    }

    /// Zero-size node without physics, used as compound parent
    pub fn create_empty(&mut self, position: Vec3) -> Mesh {
        let mut mesh = Mesh::new(self.next_mesh_id(), MeshShape::Empty, position, Quat::IDENTITY);
        self.apply_debug(&mut mesh);
        mesh
    }

    /// Independent copy of `source` placed at the given world transform.
    /// The copy has a fresh id, no parent and no impostor.
    pub fn clone_mesh(&mut self, source: &Mesh, position: Vec3, rotation: Quat) -> Mesh {
        let mut mesh = source.clone();
        mesh.id = self.next_mesh_id();
        mesh.position = position;
        mesh.rotation = rotation;
        mesh.parent = None;
        self.apply_debug(&mut mesh);
        mesh
    }

    fn create(
        &mut self,
        physics: &mut dyn RigidBodyBackend,
        shape: MeshShape,
        position: Vec3,
        options: &MeshOptions,
    ) -> Mesh {
        let center = options.anchor.center(position, shape.half_extents());
        let impostor_shape = ImpostorShape::for_mesh_shape(&shape);

        let mut mesh = Mesh::new(
            self.next_mesh_id(),
            shape,
            center,
            euler_deg_to_quat(options.rotation),
        );
        mesh.texture = options.texture.clone();
        mesh.reverse_texture_x = options.reverse_texture_x;
        self.apply_debug(&mut mesh);

        if let Some(body) = options.body {
            physics.attach(mesh.id, body.set.impostor(impostor_shape, body.is_static));
        }
        mesh
    }

    fn apply_debug(&self, mesh: &mut Mesh) {
        mesh.show_collisions = self.debug.show_collisions;
        mesh.show_bounding_box = self.debug.show_bounding_boxes;
    }
}
