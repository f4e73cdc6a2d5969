// Physics
pub const GRAVITY: f32 = 9.82;
pub const FIXED_TIME_STEP: f32 = 1.0 / 60.0;
pub const MAX_SUBSTEPS: usize = 3;
pub const MAX_FRAME_DELTA: f32 = 0.1; // clamp for stalled frames (window drag, tab switch)

// Ducky body and avatar
pub const PLAYER_RADIUS: f32 = 0.8;
pub const PLAYER_MASS: f32 = 5.0;
pub const PLAYER_SPAWN: [f32; 3] = [0.0, 0.9, 0.0];
pub const VISUAL_Y_OFFSET: f32 = -0.4; // model origin sits below the sphere centre

// Movement
pub const MOVE_SPEED: f32 = 5.0;
pub const JUMP_SPEED: f32 = 6.0;
pub const GROUND_THRESHOLD: f32 = 1.05;
pub const GROUND_BAND: f32 = 0.2;
pub const TURN_FACTOR: f32 = 0.15; // per tick, not scaled by dt
pub const MOVING_EPSILON: f32 = 0.0001;

// Fox
pub const FOX_MIN_SPEED: f32 = 2.5;
pub const FOX_MAX_SPEED: f32 = 5.0;
pub const FOX_START_Z: f32 = -15.0;
pub const FOX_SCALE: f32 = 0.1;
pub const FOX_CLIP_DURATION: f32 = 0.7;

// Round
pub const VICTORY_Z: f32 = 222.0;
pub const CAPTURE_RADIUS: f32 = 1.5;

// Camera
pub const CAMERA_FIXED_X: f32 = 0.0;
pub const CAMERA_FIXED_Y: f32 = 4.0;
pub const CAMERA_Z_OFFSET: f32 = 7.0;
pub const CAMERA_LERP: f32 = 0.08; // per tick, not scaled by dt
pub const CAMERA_LOOK_DROP: f32 = 0.5;
pub const CAMERA_START: [f32; 3] = [0.0, 2.0, 7.0];
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Scene
pub const BACKGROUND_COLOR: [f32; 3] = [0.008, 0.012, 0.039]; // #02030a
pub const FOG_DENSITY: f32 = 0.055;
pub const AMBIENT_INTENSITY: f32 = 0.25;
pub const MOON_DIRECTION: [f32; 3] = [-10.0, 10.0, -10.0];
pub const FLASHLIGHT_RANGE: f32 = 12.0;
pub const FLASHLIGHT_CONE: f32 = std::f32::consts::PI * 0.11;

// Minimum half extent for flat level pieces
pub const MIN_HALF_EXTENT: f32 = 0.01;
