// Page wiring and GPU tuning for the web front-end.
//
// Element ids and attribute names must match the host page markup.

// Host elements
pub const CONTAINER_ID: &str = "viewer-container";
pub const CANVAS_ID: &str = "viewer-canvas";
pub const LOADING_OVERLAY_ID: &str = "loading-overlay";
pub const LOADING_TEXT_ID: &str = "loading-progress";
pub const INFO_OVERLAY_ID: &str = "info-overlay";
pub const INFO_TEXT_ID: &str = "info-status";
pub const QUALITY_SELECT_ID: &str = "quality-select";
pub const AVATAR_BUTTON_ID: &str = "toggle-avatar";
pub const INFO_BUTTON_ID: &str = "toggle-info";
pub const RESET_BUTTON_ID: &str = "reset-camera";

// Container attributes
pub const DATA_URL_ATTR: &str = "data-lcc-url";
pub const CONFIG_URL_ATTR: &str = "data-config-url";

// Global object exposed by the splat engine bundle
pub const SPLAT_ENGINE_GLOBAL: &str = "SplatEngine";

// Wheel deltas reported in lines are scaled to approximate pixels
pub const WHEEL_LINE_HEIGHT_PX: f32 = 16.0;
