//! Application-wide constants.
//!
//! Centralizes magic numbers so the defaults in `BoardConfig` and the
//! painting contract live in one place.

// ============================================================================
// Zoom & Pan
// ============================================================================

/// Minimum linear zoom of the viewport
pub const MIN_ZOOM: f64 = 0.005;

/// Maximum linear zoom of the viewport
pub const MAX_ZOOM: f64 = 500.0;

/// Multiplicative factor applied per wheel step (zoom-out uses the inverse)
pub const ZOOM_STEP: f64 = 1.2;

/// Padding, in device pixels, kept around the view in the scrollable region
pub const SCENE_PADDING: f64 = 16000.0;

// ============================================================================
// Gestures
// ============================================================================

/// Scale change per device pixel of horizontal pointer travel
pub const SCALE_SENSITIVITY: f64 = 0.001;

/// Smallest scale the scale gesture will produce
pub const MIN_ITEM_SCALE: f64 = 0.01;

/// Marquee bands smaller than this (device pixels) count as clicks
pub const DRAG_THRESHOLD: f64 = 2.0;

// ============================================================================
// History
// ============================================================================

/// Maximum undo commands to keep
pub const MAX_HISTORY_COMMANDS: usize = 50;

// ============================================================================
// Painting
// ============================================================================

/// Outline of an unselected item: width in device pixels and RGBA color
pub const BORDER_WIDTH: f64 = 1.0;
pub const BORDER_COLOR: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// Outline of a selected item
pub const SELECTED_BORDER_WIDTH: f64 = 2.0;
pub const SELECTED_BORDER_COLOR: [u8; 4] = [0x33, 0xCC, 0xCC, 0xFF];

/// Backdrop drawn behind the union of all items
pub const BACKDROP_COLOR: [u8; 4] = [0x22, 0x22, 0x22, 0xFF];

/// Rubber band shown while marquee-selecting
pub const MARQUEE_FILL_COLOR: [u8; 4] = [0x33, 0xCC, 0xCC, 0x33];
pub const MARQUEE_BORDER_COLOR: [u8; 4] = [0x33, 0xCC, 0xCC, 0xFF];

// ============================================================================
// Persistence
// ============================================================================

/// Version tag written into JSON project files
pub const PROJECT_VERSION: u32 = 1;

/// Default file name for a new project
pub const DEFAULT_PROJECT_NAME: &str = "untitled.riv";
