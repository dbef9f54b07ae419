use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// Manages the View and Projection matrices.
///
/// Left-handed: the camera looks down +Z of its own frame.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov_y_rad: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            fov_y_rad,
            aspect_ratio,
            near,
            far,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Recalculates View and Projection matrices based on current parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);
        self.projection_matrix =
            TransformFactory::perspective(self.aspect_ratio, self.fov_y_rad, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    /// Projection * View.
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }

    /// Camera-to-world transform.
    pub fn view_inverse(&self) -> Matrix4<f32> {
        self.view_matrix
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Vertical field of view in radians.
    pub fn fov(&self) -> f32 {
        self.fov_y_rad
    }

    pub fn set_fov(&mut self, fov_y_rad: f32) {
        self.fov_y_rad = fov_y_rad;
        self.update_matrices();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_matrices();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new_perspective(
            Point3::new(0.0, 0.0, -10.0),
            Point3::origin(),
            Vector3::y(),
            45f32.to_radians(),
            4.0 / 3.0,
            0.1,
            100.0,
        )
    }

    #[test]
    fn point_in_front_projects_to_center() {
        let cam = camera();
        let clip = cam.view_projection() * Point3::origin().to_homogeneous();
        assert_relative_eq!(clip.w, 10.0, epsilon = 1e-5);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn view_inverse_recovers_the_eye() {
        let cam = camera();
        let eye = cam.view_inverse() * Point3::origin().to_homogeneous();
        assert_relative_eq!(eye.xyz(), cam.position().coords, epsilon = 1e-5);
    }

    #[test]
    fn aspect_change_rebuilds_projection() {
        let mut cam = camera();
        let before = cam.projection_matrix();
        cam.set_aspect_ratio(2.0);
        assert_relative_eq!(cam.projection_matrix()[(1, 1)], before[(1, 1)]);
        assert!(cam.projection_matrix()[(0, 0)] < before[(0, 0)]);
    }

    #[test]
    fn right_of_camera_is_positive_x_on_screen() {
        let cam = camera();
        let clip = cam.view_projection() * Point3::new(1.0, 0.0, 0.0).to_homogeneous();
        assert!(clip.x / clip.w > 0.0);
    }
}
