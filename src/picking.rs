//! Pointer picking: which interactive object is under the pointer.
//!
//! The core only needs one primitive, "given a camera and a normalized
//! pointer position, return the frontmost interactive object", expressed by
//! the [`Picker`] trait. [`ColliderPicker`] implements it by casting a ray
//! against box colliders stored on the scene's entities.
//!
//! - [`Ray`] - A 3D ray with origin and direction for raycasting
//! - [`Collider`] - Box collision shapes attached to interactive entities
//! - [`RayHit`] - Information about a ray-collider intersection

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::camera::Camera;
use crate::compositor::Region;
use crate::object::ObjectId;
use crate::scene_index::{ObjectLink, SceneIndex, SlotTransform, Transform};

/// A ray in 3D space, used for raycasting and picking.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// The starting point of the ray.
    pub origin: Vec3,
    /// The normalized direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray through a point in normalized device coordinates.
    ///
    /// `ndc` spans `-1..1` on both axes with +y pointing up.
    pub fn from_ndc(ndc: Vec2, view_matrix: Mat4, projection_matrix: Mat4) -> Self {
        let near_clip = Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far_clip = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let inv_view_proj = (projection_matrix * view_matrix).inverse();

        let near_world = inv_view_proj * near_clip;
        let far_world = inv_view_proj * far_clip;

        // Perspective divide
        let near_point = near_world.truncate() / near_world.w;
        let far_point = far_world.truncate() / far_world.w;

        Self {
            origin: near_point,
            direction: (far_point - near_point).normalize_or_zero(),
        }
    }

    /// Create a picking ray for `camera` rendered at `aspect`.
    pub fn from_camera(camera: &Camera, ndc: Vec2, aspect: f32) -> Self {
        Self::from_ndc(ndc, camera.view_matrix(), camera.projection_matrix(aspect))
    }

    /// Get a point along the ray at the given distance from the origin.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance to the nearest positive intersection with an axis-aligned box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for i in 0..3 {
            let origin = self.origin[i];
            let dir = self.direction[i];

            if dir.abs() < f32::EPSILON {
                // Parallel to this slab
                if origin < min[i] || origin > max[i] {
                    return None;
                }
            } else {
                let inv_dir = 1.0 / dir;
                let mut t1 = (min[i] - origin) * inv_dir;
                let mut t2 = (max[i] - origin) * inv_dir;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }
                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        if t_min > 0.0 {
            Some(t_min)
        } else if t_max > 0.0 {
            Some(t_max)
        } else {
            None
        }
    }
}

/// A collision shape for picking.
///
/// Interactive entities get a box collider matching their bounds at load
/// time. Colliders follow the entity's position and scale, not its rotation.
#[derive(Clone, Copy, Debug)]
pub enum Collider {
    /// Axis-aligned box defined by half-extents.
    Box { half_extents: Vec3 },
}

impl Collider {
    /// Create a box collider from full dimensions.
    pub fn box_collider(size: Vec3) -> Self {
        Self::Box {
            half_extents: size * 0.5,
        }
    }

    /// Test a ray against this collider placed by `transform`.
    pub fn intersect(&self, ray: &Ray, transform: &Transform) -> Option<f32> {
        match self {
            Collider::Box { half_extents } => {
                let scaled_half = *half_extents * transform.scale;
                ray.intersect_aabb(
                    transform.position - scaled_half,
                    transform.position + scaled_half,
                )
            }
        }
    }
}

/// A ray hitting an interactive object.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    pub object: ObjectId,
    /// Distance from ray origin to the hit point.
    pub distance: f32,
    /// World-space position of the hit point.
    pub point: Vec3,
}

/// Resolves a pointer position to the frontmost interactive object.
///
/// Used for both regions; the caller passes that region's camera.
pub trait Picker {
    fn pick(
        &self,
        scene: &SceneIndex,
        region: Region,
        camera: &Camera,
        ndc: Vec2,
        aspect: f32,
    ) -> Option<ObjectId>;
}

/// Ray-casting [`Picker`] over the scene's colliders.
///
/// In the primary region only visible objects at their world transform are
/// candidates; in the inventory region only held objects at their slot
/// transform are.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColliderPicker;

impl ColliderPicker {
    /// All hits in the region, closest first.
    pub fn raycast_all(&self, scene: &SceneIndex, region: Region, ray: &Ray) -> Vec<RayHit> {
        let world = scene.world();
        let mut hits = Vec::new();
        let mut test = |object: ObjectId, collider: &Collider, transform: &Transform| {
            if let Some(distance) = collider.intersect(ray, transform) {
                hits.push(RayHit {
                    object,
                    distance,
                    point: ray.point_at(distance),
                });
            }
        };

        match region {
            Region::Primary => {
                for (_, (transform, collider, link)) in world
                    .query::<(&Transform, &Collider, &ObjectLink)>()
                    .iter()
                {
                    if scene.object(link.0).is_visible() {
                        test(link.0, collider, transform);
                    }
                }
            }
            Region::Inventory => {
                for (_, (slot, collider, link)) in world
                    .query::<(&SlotTransform, &Collider, &ObjectLink)>()
                    .iter()
                {
                    test(link.0, collider, &slot.0);
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl Picker for ColliderPicker {
    fn pick(
        &self,
        scene: &SceneIndex,
        region: Region,
        camera: &Camera,
        ndc: Vec2,
        aspect: f32,
    ) -> Option<ObjectId> {
        let ray = Ray::from_camera(camera, ndc, aspect);
        self.raycast_all(scene, region, &ray)
            .first()
            .map(|hit| hit.object)
    }
}
