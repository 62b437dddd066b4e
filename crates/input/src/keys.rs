use terrain_common::CameraConfig;

use crate::Action;

/// Keys the 3D view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    S,
    A,
    D,
    Q,
    E,
    Shift,
    Ctrl,
}

impl Key {
    /// Parse a single-character or modifier key name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "w" => Some(Self::W),
            "s" => Some(Self::S),
            "a" => Some(Self::A),
            "d" => Some(Self::D),
            "q" => Some(Self::Q),
            "e" => Some(Self::E),
            "shift" => Some(Self::Shift),
            "ctrl" | "control" => Some(Self::Ctrl),
            _ => None,
        }
    }
}

/// Camera action bound to `key`, scaled by the configured steps.
pub fn action_for_key(key: Key, camera: &CameraConfig) -> Action {
    let angle = camera.angle_step;
    let radius = camera.radius_step;
    let action = match key {
        Key::W => Action::Pitch(angle),
        Key::S => Action::Pitch(-angle),
        Key::A => Action::Yaw(-angle),
        Key::D => Action::Yaw(angle),
        Key::Q => Action::Roll(angle),
        Key::E => Action::Roll(-angle),
        Key::Shift => Action::Zoom(-radius),
        Key::Ctrl => Action::Zoom(radius),
    };
    tracing::trace!(?key, ?action, "key mapped");
    action
}
