//! The primary viewpoint: its camera, transitions and highlighted object.

mod animator;

pub use animator::CameraAnimator;

use glam::Vec2;

use crate::camera::{Camera, Pose};
use crate::compositor::Region;
use crate::handler::ViewName;
use crate::object::ObjectId;
use crate::picking::Picker;
use crate::scene_index::SceneIndex;

/// Owns the primary region's camera.
///
/// Camera moves between views go through the [`CameraAnimator`], which is
/// stepped once per tick by [`advance`](Self::advance). While it runs, the
/// world reports [`is_animating`](Self::is_animating) and callers keep all
/// interaction off.
pub struct World {
    camera: Camera,
    animator: CameraAnimator<ViewName>,
    highlight: Option<ObjectId>,
    aspect: f32,
}

impl World {
    pub fn new(transition_steps: usize, aspect: f32) -> Self {
        Self {
            camera: Camera::new(),
            animator: CameraAnimator::new(transition_steps),
            highlight: None,
            aspect,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Place the camera at `pose` immediately.
    pub fn jump_to(&mut self, pose: Pose) {
        self.camera.set_pose(pose);
    }

    /// Start animating from the live camera pose to `pose`; `view` is
    /// returned by [`advance`](Self::advance) when the camera arrives.
    pub fn move_to(&mut self, pose: Pose, view: ViewName) {
        self.animator.start(self.camera.pose(), pose, view);
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_active()
    }

    /// Step the running transition; yields the target view on arrival.
    pub fn advance(&mut self) -> Option<ViewName> {
        self.animator.advance(&mut self.camera)
    }

    /// The object under the pointer, `ndc` being normalized to the primary region.
    pub fn pick(&self, scene: &SceneIndex, picker: &dyn Picker, ndc: Vec2) -> Option<ObjectId> {
        picker.pick(scene, Region::Primary, &self.camera, ndc, self.aspect)
    }

    pub fn highlight(&self) -> Option<ObjectId> {
        self.highlight
    }

    pub fn set_highlight(&mut self, object: Option<ObjectId>) {
        self.highlight = object;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::ColliderPicker;
    use crate::scene_index::SceneEntity;
    use glam::Vec3;

    #[test]
    fn move_to_reports_view_on_arrival() {
        let mut world = World::new(3, 1.0);
        let target = Pose::new(Vec3::new(0.0, 1.0, 2.0), Vec3::ZERO);
        world.move_to(target, ViewName::from("hall"));

        assert!(world.is_animating());
        assert!(world.advance().is_none());
        assert!(world.advance().is_none());
        assert_eq!(world.advance(), Some(ViewName::from("hall")));
        assert!(!world.is_animating());
        assert_eq!(world.camera().pose(), target);
    }

    #[test]
    fn picks_through_the_primary_camera() {
        let scene =
            SceneIndex::from_entities(vec![SceneEntity::object("box", Vec3::ZERO, Vec3::ONE)])
                .unwrap();
        let mut world = World::new(1, 1.0);
        world.jump_to(Pose::new(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO));

        let hit = world.pick(&scene, &ColliderPicker, Vec2::ZERO);
        assert_eq!(hit, scene.object_id("box"));
        assert!(world.pick(&scene, &ColliderPicker, Vec2::new(0.95, 0.95)).is_none());
    }
}
