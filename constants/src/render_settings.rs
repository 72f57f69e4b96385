use bevy::color::Color;

/// Largest on-screen star quad, used for alpha 1.0 stars.
pub const STAR_POINT_SIZE_MAX_PX: f32 = 7.0;

/// Smallest on-screen star quad, used for barely visible stars.
pub const STAR_POINT_SIZE_MIN_PX: f32 = 1.5;

/// Exponent of the radial glow falloff inside each star quad.
pub const STAR_GLOW_FALLOFF: f32 = 1.6;

/// Ground hemisphere radius. Kept inside the dome so it hides anything at or below the horizon.
pub const GROUND_RADIUS: f32 = 95.0;
pub const GROUND_SEGMENTS: u32 = 64;
pub const GROUND_RINGS: u32 = 16;

/// darkgreen
pub const GROUND_COLOUR: Color = Color::srgb(0.0, 0.392, 0.0);

pub const SKY_CLEAR_COLOUR: Color = Color::srgb(0.0, 0.0, 0.02);

/// Observer eye height above the horizon plane.
pub const EYE_HEIGHT: f32 = 0.5;

pub const CAMERA_FOV_DEGREES: f32 = 70.0;
pub const CAMERA_FAR_PLANE: f32 = 1000.0;

/// Look-around sensitivity in radians per pixel of mouse motion.
pub const YAW_SENSITIVITY: f32 = 0.0035;
pub const PITCH_SENSITIVITY: f32 = 0.0030;

/// Pitch limits of the free orbit camera, in radians above the horizon.
pub const MIN_PITCH: f32 = -0.05;
pub const MAX_PITCH: f32 = 1.55;

/// Screen-space radius within which a click selects a star.
pub const PICK_TOLERANCE_PX: f32 = 8.0;

/// Cursor travel between press and release beyond which a click counts as a drag.
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 4.0;

/// Camera slew time when focusing a selected star.
pub const FOCUS_DURATION_SECS: f32 = 0.8;

/// Keyboard time scrubbing step, and multiplier while Shift is held.
pub const TIME_SCRUB_STEP_MINUTES: i32 = 10;
pub const TIME_SCRUB_FAST_MULTIPLIER: i32 = 6;
