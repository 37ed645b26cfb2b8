//! WebGPU rendering module
//!
//! Shapes are built on the CPU as a colored triangle list each frame; emoji
//! are handed to the DOM overlay as sprites.

pub mod camera;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use camera::Viewport;
pub use pipeline::RenderState;
pub use scene::{EmojiSprite, build_vertices, emoji_sprites};
pub use vertex::Vertex;
