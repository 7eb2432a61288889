//! Scene Builder and the per-mount scene state.

use glam::{EulerRot, Mat4, Quat, Vec3};

use folio_engine::coords::Rect;

use crate::context::{DrawBatch, DrawContext, DrawItem};
use crate::geometry::Mesh;
use crate::projection::Projection;
use crate::shape::ShapeDescriptor;

/// Runtime state of one shape: its descriptor, its renderable and its current pose.
#[derive(Debug)]
pub struct AnimatedObject<H> {
    pub shape: ShapeDescriptor,
    pub handle: H,
    pub rotation: Vec3,
    pub position: Vec3,
}

impl<H> AnimatedObject<H> {
    /// Translation times intrinsic XYZ Euler rotation.
    pub fn model(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_rotation_translation(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z), self.position)
    }
}

/// Ordered animated objects of one mounted section plus its projection.
#[derive(Debug)]
pub struct SceneState<H> {
    pub objects: Vec<AnimatedObject<H>>,
    pub projection: Projection,
    /// Animator steps applied since the build.
    pub ticks: u64,
}

impl<H> SceneState<H> {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// `(rotation, position)` per object, in order.
    pub fn poses(&self) -> Vec<(Vec3, Vec3)> {
        self.objects.iter().map(|o| (o.rotation, o.position)).collect()
    }

    /// Draw batch for the current poses laid out over `region`.
    pub fn batch(&self, region: Rect) -> DrawBatch<'_, H> {
        DrawBatch {
            region,
            view_proj: self.projection.view_proj(),
            items: self
                .objects
                .iter()
                .map(|o| DrawItem { handle: &o.handle, model: o.model() })
                .collect(),
        }
    }

    /// Returns every handle to `ctx`, consuming the scene.
    pub fn release_into<C>(self, ctx: &mut C)
    where
        C: DrawContext<Handle = H>,
    {
        for object in self.objects {
            ctx.release(object.handle);
        }
    }
}

/// Builds scenes from a theme seed.
pub struct SceneBuilder;

impl SceneBuilder {
    /// Allocates one renderable per descriptor, in palette order.
    ///
    /// Deterministic: the same seed always yields the same initial poses.
    pub fn build<C>(seed: &[ShapeDescriptor], projection: Projection, ctx: &mut C) -> SceneState<C::Handle>
    where
        C: DrawContext,
    {
        let objects = seed
            .iter()
            .map(|shape| {
                let mesh = Mesh::build(&shape.kind);
                log::trace!(
                    "allocating {} ({} vertices, {} triangles)",
                    shape.kind.name(),
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                AnimatedObject {
                    handle: ctx.allocate(shape, &mesh),
                    rotation: shape.rotation,
                    position: shape.position,
                    shape: shape.clone(),
                }
            })
            .collect();

        SceneState { objects, projection, ticks: 0 }
    }
}
