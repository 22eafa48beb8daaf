//! Panoramic look-around camera.
//!
//! The viewer stands at eye height and rotates in place: left-drag turns the
//! view, nothing translates. Drag state distinguishes a look-drag from a
//! marker click so releasing after a drag never fires a click.

use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use scene::coords::EYE_HEIGHT;

const LOOK_SENSITIVITY: f32 = 0.0035;
const MIN_PITCH: f32 = -60.0 * std::f32::consts::PI / 180.0;
const MAX_PITCH: f32 = 75.0 * std::f32::consts::PI / 180.0;

/// Pixels of mouse travel before a press becomes a look-drag instead of a
/// click.
const DRAG_THRESHOLD: f32 = 5.0;

/// Look direction of the panoramic camera. Yaw 0 / pitch 0 faces -Z, which is
/// where the coordinate mapper puts board center.
#[derive(Resource, Debug, Default)]
pub struct PanoramaCamera {
    /// Horizontal rotation in radians, positive turns right.
    pub yaw: f32,
    /// Elevation in radians, clamped between MIN_PITCH and MAX_PITCH.
    pub pitch: f32,
}

/// Tracks left-press drag state: differentiates click from look-drag.
#[derive(Resource, Debug, Default)]
pub struct LookDrag {
    pub pressed: bool,
    pub start_pos: Vec2,
    pub last_pos: Vec2,
    /// True once the mouse moved beyond the threshold; suppresses the click.
    pub is_dragging: bool,
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(Vec3::new(0.0, EYE_HEIGHT, 0.0))
            .looking_to(Vec3::NEG_Z, Vec3::Y),
    ));
    commands.init_resource::<PanoramaCamera>();
    commands.init_resource::<LookDrag>();
}

/// Left-drag rotates the view in place.
pub fn camera_look_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut drag: ResMut<LookDrag>,
    mut panorama: ResMut<PanoramaCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        if buttons.just_released(MouseButton::Left) {
            drag.pressed = false;
            drag.is_dragging = false;
        }
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        drag.pressed = true;
        drag.is_dragging = false;
        drag.start_pos = cursor;
        drag.last_pos = cursor;
    }

    if drag.pressed && buttons.pressed(MouseButton::Left) {
        if !drag.is_dragging && cursor.distance(drag.start_pos) > DRAG_THRESHOLD {
            drag.is_dragging = true;
        }
        if drag.is_dragging {
            let delta = cursor - drag.last_pos;
            panorama.yaw += delta.x * LOOK_SENSITIVITY;
            panorama.pitch =
                (panorama.pitch + delta.y * LOOK_SENSITIVITY).clamp(MIN_PITCH, MAX_PITCH);
        }
        drag.last_pos = cursor;
    }

    if buttons.just_released(MouseButton::Left) {
        drag.pressed = false;
        // is_dragging stays set for this frame so the click handler can see
        // the release belonged to a drag; it resets on the next press.
    }
}

/// Apply `PanoramaCamera` orientation to the camera transform.
pub fn apply_panorama_camera(
    panorama: Res<PanoramaCamera>,
    mut query: Query<&mut Transform, With<Camera3d>>,
) {
    if !panorama.is_changed() {
        return;
    }
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };
    let rotation = Quat::from_euler(EulerRot::YXZ, -panorama.yaw, -panorama.pitch, 0.0);
    transform.rotation = rotation;
}
