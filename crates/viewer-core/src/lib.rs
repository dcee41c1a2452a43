//! Platform-free core of the survey scene viewer: first-person camera,
//! capsule collision, quality presets, drone avatar and the per-frame
//! pipeline. The web front-end supplies the renderer, surface and input.

pub mod avatar;
pub mod camera;
pub mod collision;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod events;
pub mod input;
pub mod loading;
pub mod quality;
pub mod renderer;
pub mod resize;
pub mod scene;
pub mod viewer;

pub static AVATAR_WGSL: &str = include_str!("../shaders/avatar.wgsl");

pub use avatar::*;
pub use camera::*;
pub use collision::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use events::*;
pub use input::*;
pub use loading::*;
pub use quality::*;
pub use renderer::*;
pub use resize::*;
pub use scene::*;
pub use viewer::*;
