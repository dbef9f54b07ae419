use crate::pipeline::render_config::ToggleCommand;
use crate::scene::camera::Camera;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window};
use nalgebra::Vector3;
use std::f32::consts::FRAC_PI_2;

/// Function keys and the switch each one flips.
pub const TOGGLE_KEYS: [(Key, ToggleCommand); 9] = [
    (Key::F1, ToggleCommand::Backend),
    (Key::F2, ToggleCommand::Rotation),
    (Key::F4, ToggleCommand::TextureFilter),
    (Key::F5, ToggleCommand::LightMode),
    (Key::F6, ToggleCommand::NormalMapping),
    (Key::F7, ToggleCommand::DepthVisualization),
    (Key::F8, ToggleCommand::BoundingBox),
    (Key::F9, ToggleCommand::CullMode),
    (Key::F10, ToggleCommand::Background),
];

/// Toggle commands for the keys pressed since the last frame.
pub fn poll_toggle_commands(window: &Window) -> Vec<ToggleCommand> {
    TOGGLE_KEYS
        .iter()
        .filter(|(key, _)| window.is_key_pressed(*key, KeyRepeat::No))
        .map(|&(_, command)| command)
        .collect()
}

/// Unit view direction for yaw (around +Y, 0 = +Z) and pitch, left-handed.
pub fn direction_from_angles(yaw: f32, pitch: f32) -> Vector3<f32> {
    Vector3::new(
        yaw.sin() * pitch.cos(),
        pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}

/// Fly camera: WASD/arrows move, Space/LeftShift rise and sink, left-drag looks
/// around, scroll changes the field of view.
pub struct CameraController {
    pub speed: f32,
    pub sensitivity: f32,

    // Rotation state
    pub yaw: f32,
    pub pitch: f32,

    // FOV control state
    pub fov: f32, // radians
    pub min_fov: f32,
    pub max_fov: f32,
    pub zoom_speed: f32,

    last_mouse_pos: Option<(f32, f32)>,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32, zoom_speed: f32, camera: &Camera) -> Self {
        let direction = (camera.target - camera.position)
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::z);

        Self {
            speed,
            sensitivity,
            yaw: direction.x.atan2(direction.z),
            pitch: direction.y.clamp(-1.0, 1.0).asin(),
            fov: camera.fov(),
            min_fov: 10.0f32.to_radians(),
            max_fov: 120.0f32.to_radians(),
            zoom_speed,
            last_mouse_pos: None,
        }
    }

    pub fn update(&mut self, window: &Window, camera: &mut Camera, dt: f32) {
        // --- Scroll to Zoom (FOV) ---
        if let Some((_, scroll_y)) = window.get_scroll_wheel()
            && scroll_y != 0.0
        {
            self.zoom(scroll_y, camera);
        }

        // --- Keyboard Movement ---
        let held = |keys: &[Key]| keys.iter().any(|&k| window.is_key_down(k));
        let mut forward_amount = 0.0;
        let mut right_amount = 0.0;
        let mut up_amount = 0.0;
        if held(&[Key::W, Key::Up]) {
            forward_amount += 1.0;
        }
        if held(&[Key::S, Key::Down]) {
            forward_amount -= 1.0;
        }
        if held(&[Key::D, Key::Right]) {
            right_amount += 1.0;
        }
        if held(&[Key::A, Key::Left]) {
            right_amount -= 1.0;
        }
        if held(&[Key::Space]) {
            up_amount += 1.0;
        }
        if held(&[Key::LeftShift]) {
            up_amount -= 1.0;
        }
        self.translate(camera, forward_amount, right_amount, up_amount, dt);

        // --- Mouse Look (Left Drag) ---
        if window.get_mouse_down(MouseButton::Left) {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    self.rotate(camera, x - last_x, y - last_y);
                }
                self.last_mouse_pos = Some((x, y));
            }
        } else {
            self.last_mouse_pos = None;
        }

        camera.update_matrices();
    }

    pub fn zoom(&mut self, amount: f32, camera: &mut Camera) {
        self.fov = (self.fov - amount * self.zoom_speed).clamp(self.min_fov, self.max_fov);
        camera.set_fov(self.fov);
    }

    /// Moves position and target together so the view direction is kept.
    pub fn translate(&self, camera: &mut Camera, forward: f32, right: f32, up: f32, dt: f32) {
        let front = (camera.target - camera.position)
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3::z);
        let side = Vector3::y().cross(&front).try_normalize(1e-6).unwrap_or_else(Vector3::x);

        let move_dir = front * forward + side * right + Vector3::y() * up;
        if move_dir.norm_squared() > 1e-6 {
            let offset = move_dir.normalize() * self.speed * dt;
            camera.position += offset;
            camera.target += offset;
        }
    }

    /// Mouse delta in pixels; right turns right, down looks down.
    pub fn rotate(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        // Keep away from the poles
        self.pitch = self.pitch.clamp(-FRAC_PI_2 + 0.01, FRAC_PI_2 - 0.01);

        camera.target = camera.position + direction_from_angles(self.yaw, self.pitch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn camera() -> Camera {
        Camera::new_perspective(
            Point3::origin(),
            Point3::new(0.0, 0.0, 1.0),
            Vector3::y(),
            45f32.to_radians(),
            1.0,
            0.1,
            100.0,
        )
    }

    #[test]
    fn angles_round_trip_through_the_camera() {
        let cam = camera();
        let controller = CameraController::new(1.0, 0.01, 0.1, &cam);
        assert_relative_eq!(controller.yaw, 0.0);
        assert_relative_eq!(controller.pitch, 0.0);
        assert_relative_eq!(
            direction_from_angles(controller.yaw, controller.pitch),
            Vector3::z(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn strafing_right_moves_along_x() {
        let mut cam = camera();
        let controller = CameraController::new(2.0, 0.01, 0.1, &cam);
        controller.translate(&mut cam, 0.0, 1.0, 0.0, 0.5);
        assert_relative_eq!(cam.position, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(cam.target, Point3::new(1.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera();
        let mut controller = CameraController::new(1.0, 1.0, 0.1, &cam);
        controller.rotate(&mut cam, 0.0, -1000.0);
        assert!(controller.pitch < FRAC_PI_2);
        assert!(cam.target.y > cam.position.y);
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut cam = camera();
        let mut controller = CameraController::new(1.0, 1.0, 1.0, &cam);
        controller.zoom(100.0, &mut cam);
        assert_relative_eq!(cam.fov(), controller.min_fov);
        controller.zoom(-100.0, &mut cam);
        assert_relative_eq!(cam.fov(), controller.max_fov);
    }

    #[test]
    fn every_toggle_has_a_distinct_key() {
        for (i, (key, command)) in TOGGLE_KEYS.iter().enumerate() {
            for (other_key, other_command) in &TOGGLE_KEYS[i + 1..] {
                assert_ne!(key, other_key);
                assert_ne!(command, other_command);
            }
        }
    }
}
