use glam::{Mat4, Vec3};

/// A camera placement: where it sits and the point it looks at.
///
/// Views are identified by a pose, and camera transitions interpolate
/// between two poses axis by axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }

    /// Linear interpolation of both points; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(other.position, t),
            look_at: self.look_at.lerp(other.look_at, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
        }
    }
}

/// A perspective camera aimed at a look-at point.
///
/// One camera drives the primary region and a second, fixed one drives the
/// inventory region.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pose: Pose,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pose: Pose::default(),
            up: Vec3::Y,
            fov: 50f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.pose.look_at = target;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Unit vector from the camera position towards the look-at point.
    pub fn forward(&self) -> Vec3 {
        (self.pose.look_at - self.pose.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.position, self.pose.look_at, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Height of the visible area on the plane `distance` units in front of the camera.
    pub fn visible_height_at(&self, distance: f32) -> f32 {
        2.0 * distance * (self.fov * 0.5).tan()
    }
}
