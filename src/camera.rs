//! Lagged camera that eases toward centring the player.

use glam::Vec2;

use crate::config::CameraConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World position of the top-left corner of the view.
    pub offset: Vec2,
    pub viewport: Vec2,
    /// Fraction of the remaining distance covered each tick, 0..=1.
    pub lag: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Camera {
            offset: Vec2::ZERO,
            viewport: Vec2::new(config.view_width, config.view_height),
            lag: config.lag.clamp(0.0, 1.0),
        }
    }

    /// Offset that would put `target` at the centre of the view.
    pub fn target_for(&self, target: Vec2) -> Vec2 {
        target - (self.viewport / 2.0).floor()
    }

    pub fn follow(&mut self, target: Vec2) {
        let desired = self.target_for(target);
        self.offset += (desired - self.offset) * self.lag;
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.offset
    }

    /// Horizontal world span kept alive around the view.
    pub fn x_span(&self, margin: f32) -> (f32, f32) {
        (self.offset.x - margin, self.offset.x + self.viewport.x + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_moves_a_fraction() {
        let mut camera = Camera::new(&CameraConfig::default());
        camera.follow(Vec2::new(683.0, 590.0));
        // target offset is (683 - 683, 590 - 384) = (0, 206)
        assert!((camera.offset.x - 0.0).abs() < 1e-4);
        assert!((camera.offset.y - 10.3).abs() < 1e-4);
    }

    #[test]
    fn follow_converges() {
        let mut camera = Camera::new(&CameraConfig::default());
        let player = Vec2::new(2000.0, 100.0);
        for _ in 0..600 {
            camera.follow(player);
        }
        let goal = camera.target_for(player);
        assert!(camera.offset.distance(goal) < 0.1);
        assert_eq!(camera.world_to_screen(player), player - camera.offset);
        camera.reset();
        assert_eq!(camera.offset, Vec2::ZERO);
    }

    #[test]
    fn x_span_includes_margin() {
        let camera = Camera::new(&CameraConfig::default());
        assert_eq!(camera.x_span(100.0), (-100.0, 1466.0));
    }
}
