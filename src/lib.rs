//! A small pixel-buffer scene graph.
//!
//! Nodes live in a [`Tree`] arena and are addressed by [`NodeId`]. Each frame the
//! driver runs [`Tree::tick`] then [`Tree::render`] on a root (or just
//! [`Scene::frame`]):
//!
//! - **tick** culls against the camera and runs each visible node's `update` hook.
//! - **render** culls the same way, draws each node through a [`Canvas`] offset to
//!   its position, and sorts children by z-index before visiting them.
//!
//! Overlay nodes skip culling and paint into a separate screen-fixed buffer.
//!
//! # Example
//! ```
//! use sprig::prelude::*;
//!
//! let mut scene = Scene::new(node().size(32.0, 32.0).build());
//! scene
//!     .spawn(
//!         node()
//!             .position(2.0, 2.0)
//!             .speed(1000.0, 0.0)
//!             .sprite(Sprite::filled(2, 2, Color::WHITE).unwrap())
//!             .behavior(Hooks::new().on_update(|tree, id, frame| {
//!                 tree.apply_velocity(id, frame.delta);
//!             }))
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let camera = Viewport::new(0.0, 0.0, 32.0, 32.0);
//! let mut buffer = PixelBuffer::new(32, 32);
//! scene.frame(&Frame::new(4.0, &camera), &mut Targets::new(&mut buffer));
//!
//! // Moved 4px to the right before it was drawn
//! assert_eq!(buffer.get(6, 2), Some(Color::WHITE));
//! ```

pub mod behavior;
pub mod camera;
pub mod canvas;
pub mod color;
pub mod geometry;
pub mod logging;
pub mod node;
pub mod pixels;
pub mod scene;
pub mod sprite;
pub mod traversal;
pub mod traversal_stats;
pub mod tree;

pub use tree::{NodeId, Tree, TreeError};

pub mod prelude {
    pub use crate::behavior::{draw_sprite, Behavior, Hooks};
    pub use crate::camera::{Camera, Unbounded, Viewport};
    pub use crate::canvas::{Canvas, PixelRounding};
    pub use crate::color::Color;
    pub use crate::geometry::{PartialPosition, Rect, Size, Vec2};
    pub use crate::node::{node, Node, NodeBuilder, RenderMode};
    pub use crate::pixels::{DrawTarget, PixelBuffer, PixelSink, Scrolled, Targets};
    pub use crate::scene::{MovementMode, Scene, SceneConfig};
    pub use crate::sprite::{Sprite, SpriteError};
    pub use crate::traversal::Frame;
    pub use crate::tree::{NodeId, Tree, TreeError};
}
