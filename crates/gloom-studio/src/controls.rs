//! Keyboard bindings for the preview window.
//!
//! - `1`..`5`: vignette level 0..4
//! - `G` / `S`: cycle film grain / scanline level
//! - `D`: toggle dust
//! - `F`: toggle the 60 fps cap
//! - arrows: turn and walk, `Q` / `E`: strafe
//! - `Escape`: quit

use gloom_fx::dust::CameraMotion;
use gloom_fx::frame::levels;
use winit::keyboard::KeyCode;

/// Forward speed in world units per second.
pub const WALK_SPEED: f32 = 3.0;
/// Strafe speed in world units per second.
pub const STRAFE_SPEED: f32 = 2.0;
/// Turn rate in radians per second.
pub const TURN_RATE: f32 = 1.6;

/// Capped frame rate toggled by `F`.
pub const CAPPED_FPS: i32 = 60;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    VignetteLevel(i32),
    CycleGrain,
    CycleScanlines,
    ToggleDust,
    ToggleFpsCap,
    Exit,
}

/// One-shot action bound to `code`, if any.
pub fn action_for(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Digit1 => Action::VignetteLevel(0),
        KeyCode::Digit2 => Action::VignetteLevel(1),
        KeyCode::Digit3 => Action::VignetteLevel(2),
        KeyCode::Digit4 => Action::VignetteLevel(3),
        KeyCode::Digit5 => Action::VignetteLevel(4),
        KeyCode::KeyG => Action::CycleGrain,
        KeyCode::KeyS => Action::CycleScanlines,
        KeyCode::KeyD => Action::ToggleDust,
        KeyCode::KeyF => Action::ToggleFpsCap,
        KeyCode::Escape => Action::Exit,
        _ => return None,
    };
    Some(action)
}

/// Level after `level` in the 0..=4 cycle.
#[inline]
pub fn next_level(level: i32) -> i32 {
    if level >= levels::MAX_LEVEL || level < levels::MIN_LEVEL {
        levels::MIN_LEVEL
    } else {
        level + 1
    }
}

/// Held movement keys.
#[derive(Debug, Copy, Clone, Default)]
pub struct Steering {
    forward: bool,
    back: bool,
    turn_left: bool,
    turn_right: bool,
    strafe_left: bool,
    strafe_right: bool,
}

impl Steering {
    /// Tracks a movement key. Returns `false` for keys it does not own.
    pub fn key(&mut self, code: KeyCode, pressed: bool) -> bool {
        let slot = match code {
            KeyCode::ArrowUp => &mut self.forward,
            KeyCode::ArrowDown => &mut self.back,
            KeyCode::ArrowLeft => &mut self.turn_left,
            KeyCode::ArrowRight => &mut self.turn_right,
            KeyCode::KeyQ => &mut self.strafe_left,
            KeyCode::KeyE => &mut self.strafe_right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Releases everything (focus loss).
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Camera motion rates for the held keys. Opposite keys cancel.
    pub fn motion(&self) -> CameraMotion {
        let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        CameraMotion::new(
            axis(self.strafe_left, self.strafe_right) * STRAFE_SPEED,
            axis(self.back, self.forward) * WALK_SPEED,
            axis(self.turn_left, self.turn_right) * TURN_RATE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_vignette_levels() {
        assert_eq!(action_for(KeyCode::Digit1), Some(Action::VignetteLevel(0)));
        assert_eq!(action_for(KeyCode::Digit5), Some(Action::VignetteLevel(4)));
        assert_eq!(action_for(KeyCode::Digit6), None);
    }

    #[test]
    fn level_cycle_wraps_to_off() {
        assert_eq!(next_level(0), 1);
        assert_eq!(next_level(3), 4);
        assert_eq!(next_level(4), 0);
        assert_eq!(next_level(17), 0);
    }

    #[test]
    fn held_keys_become_rates() {
        let mut s = Steering::default();
        assert!(s.key(KeyCode::ArrowUp, true));
        assert!(s.key(KeyCode::ArrowRight, true));
        let m = s.motion();
        assert_eq!(m.forward, WALK_SPEED);
        assert_eq!(m.yaw_rate, TURN_RATE);
        assert_eq!(m.lateral, 0.0);

        s.key(KeyCode::ArrowUp, false);
        assert_eq!(s.motion().forward, 0.0);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut s = Steering::default();
        s.key(KeyCode::KeyQ, true);
        s.key(KeyCode::KeyE, true);
        assert_eq!(s.motion().lateral, 0.0);
    }

    #[test]
    fn release_all_stops_motion() {
        let mut s = Steering::default();
        s.key(KeyCode::ArrowDown, true);
        s.release_all();
        assert_eq!(s.motion(), CameraMotion::ZERO);
        assert!(!s.key(KeyCode::KeyZ, true));
    }
}
