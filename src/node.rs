use std::fmt;

use crate::behavior::Behavior;
use crate::geometry::{Size, Vec2};
use crate::sprite::Sprite;

/// How a node is culled and which buffer it paints into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Never culled; paints into the overlay buffer relative to the screen.
    Overlay,
    /// Culled against the camera; paints into the scene buffer.
    #[default]
    CameraRelative,
}

/// Per-node state owned by the [`Tree`](crate::Tree).
pub struct Node {
    /// Position relative to the parent, or absolute for a root.
    pub position: Vec2,
    /// Culling bounds. Never used as painting geometry.
    pub size: Size,
    /// Pixels per second. Only applied when integrated explicitly (or in auto movement mode).
    pub speed: Vec2,
    pub sprite: Option<Sprite>,
    /// Paint order among siblings; lower paints first.
    pub z_index: i32,
    pub render_mode: RenderMode,
    pub(crate) tags: Vec<&'static str>,
    /// `None` only while a hook is running with the behavior taken out.
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Size::ZERO,
            speed: Vec2::ZERO,
            sprite: None,
            z_index: 0,
            render_mode: RenderMode::CameraRelative,
            tags: Vec::new(),
            behavior: None,
        }
    }

    pub fn tags(&self) -> &[&'static str] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| *t == tag)
    }

    pub fn add_tag(&mut self, tag: &'static str) {
        if !self.has_tag(tag) {
            self.tags.push(tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| *t != tag);
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("speed", &self.speed)
            .field("sprite", &self.sprite.as_ref().map(|s| (s.width(), s.height())))
            .field("z_index", &self.z_index)
            .field("render_mode", &self.render_mode)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Create a node builder.
///
/// # Example
/// ```
/// use sprig::prelude::*;
///
/// let mut tree = Tree::new();
/// let player = node()
///     .position(10.0, 20.0)
///     .size(8.0, 8.0)
///     .z_index(2)
///     .tag("player")
///     .insert(&mut tree);
/// assert_eq!(tree.position(player), Some(Vec2::new(10.0, 20.0)));
/// ```
pub fn node() -> NodeBuilder {
    NodeBuilder { node: Node::new() }
}

/// Builder for [`Node`]. Finish with [`NodeBuilder::build`] or [`NodeBuilder::insert`].
#[derive(Debug, Default)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.node.position = Vec2::new(x, y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.node.size = Size::new(width, height);
        self
    }

    pub fn speed(mut self, x: f32, y: f32) -> Self {
        self.node.speed = Vec2::new(x, y);
        self
    }

    pub fn sprite(mut self, sprite: Sprite) -> Self {
        self.node.sprite = Some(sprite);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.node.z_index = z_index;
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.node.render_mode = mode;
        self
    }

    pub fn overlay(self) -> Self {
        self.render_mode(RenderMode::Overlay)
    }

    pub fn tag(mut self, tag: &'static str) -> Self {
        self.node.add_tag(tag);
        self
    }

    pub fn behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.node.behavior = Some(Box::new(behavior));
        self
    }

    pub fn build(self) -> Node {
        self.node
    }

    /// Register the node in `tree` as a detached root and return its handle.
    pub fn insert(self, tree: &mut crate::Tree) -> crate::NodeId {
        tree.insert(self.node)
    }
}
