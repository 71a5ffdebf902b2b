//! Step-per-tick camera transitions between two poses.

use crate::camera::{Camera, Pose};

/// Moves a camera from one pose to another over a fixed number of ticks.
///
/// The payload handed to [`start`](Self::start) comes back from
/// [`advance`](Self::advance) exactly once, on the tick the camera reaches
/// the target. A new transition replaces the one in flight.
///
/// # Example
///
/// ```
/// use escape_room::{Camera, CameraAnimator, Pose, Vec3};
///
/// let mut camera = Camera::new();
/// let mut animator = CameraAnimator::new(4);
/// let target = Pose::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
///
/// animator.start(camera.pose(), target, "study");
/// let mut done = None;
/// while animator.is_active() {
///     done = animator.advance(&mut camera);
/// }
/// assert_eq!(done, Some("study"));
/// assert_eq!(camera.pose(), target);
/// ```
#[derive(Debug)]
pub struct CameraAnimator<T> {
    steps: usize,
    samples: Vec<Pose>,
    cursor: usize,
    payload: Option<T>,
}

impl<T> CameraAnimator<T> {
    /// `steps` is the number of ticks a transition takes, at least one.
    pub fn new(steps: usize) -> Self {
        Self {
            steps: steps.max(1),
            samples: Vec::new(),
            cursor: 0,
            payload: None,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Begin a transition from `from` (the camera's live pose) to `to`.
    pub fn start(&mut self, from: Pose, to: Pose, payload: T) {
        let k = self.steps;
        self.samples = (0..k)
            .map(|i| {
                if i + 1 == k {
                    to
                } else {
                    from.lerp(&to, (i + 1) as f32 / k as f32)
                }
            })
            .collect();
        self.cursor = 0;
        self.payload = Some(payload);
    }

    pub fn is_active(&self) -> bool {
        self.cursor < self.samples.len()
    }

    /// Ticks left until the transition completes.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.cursor
    }

    /// Apply the next sample to `camera`.
    ///
    /// Returns the payload on the final step; `None` otherwise and while idle.
    pub fn advance(&mut self, camera: &mut Camera) -> Option<T> {
        let pose = *self.samples.get(self.cursor)?;
        camera.set_pose(pose);
        self.cursor += 1;

        if self.cursor == self.samples.len() {
            self.samples.clear();
            self.cursor = 0;
            return self.payload.take();
        }
        None
    }
}
