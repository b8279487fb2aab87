//! Per-node behavior hooks.
//!
//! Every node may carry one [`Behavior`]. The tree calls its hooks at fixed points:
//!
//! - `init` right after the node is attached with [`Tree::add_child`].
//! - `teardown` when the node's subtree is detached, descendants first.
//! - `update` once per tick while the node is in bounds.
//! - `draw` once per render while the node is in bounds.
//!
//! Hooks that receive `&mut Tree` run while the behavior is taken out of its node, so
//! they may freely add, remove or reparent nodes, including their own.

use crate::canvas::Canvas;
use crate::traversal::Frame;
use crate::tree::{NodeId, Tree};

pub trait Behavior {
    fn init(&mut self, _tree: &mut Tree, _id: NodeId) {}

    fn teardown(&mut self, _tree: &mut Tree, _id: NodeId) {}

    fn update(&mut self, _tree: &mut Tree, _id: NodeId, _frame: &Frame<'_>) {}

    /// Paint the node. The canvas is already offset to the node's position.
    ///
    /// The default blits the node's sprite, if it has one.
    fn draw(&self, tree: &Tree, id: NodeId, _frame: &Frame<'_>, canvas: &mut Canvas<'_>) {
        draw_sprite(tree, id, canvas);
    }
}

/// The default draw: blit the node's sprite at the canvas origin.
pub fn draw_sprite(tree: &Tree, id: NodeId, canvas: &mut Canvas<'_>) {
    if let Some(sprite) = tree.sprite(id) {
        canvas.draw_sprite(sprite);
    }
}

pub type InitFn = Box<dyn FnMut(&mut Tree, NodeId)>;
pub type UpdateFn = Box<dyn FnMut(&mut Tree, NodeId, &Frame<'_>)>;
pub type DrawFn = Box<dyn Fn(&Tree, NodeId, &Frame<'_>, &mut Canvas<'_>)>;

/// A [`Behavior`] assembled from closures.
///
/// # Example
/// ```
/// use sprig::prelude::*;
///
/// let mut tree = Tree::new();
/// let ship = node()
///     .speed(60.0, 0.0)
///     .behavior(Hooks::new().on_update(|tree, id, frame| {
///         tree.apply_velocity(id, frame.delta);
///     }))
///     .insert(&mut tree);
/// # let _ = ship;
/// ```
#[derive(Default)]
pub struct Hooks {
    init: Option<InitFn>,
    teardown: Option<InitFn>,
    update: Option<UpdateFn>,
    draw: Option<DrawFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init(mut self, f: impl FnMut(&mut Tree, NodeId) + 'static) -> Self {
        self.init = Some(Box::new(f));
        self
    }

    pub fn on_teardown(mut self, f: impl FnMut(&mut Tree, NodeId) + 'static) -> Self {
        self.teardown = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut Tree, NodeId, &Frame<'_>) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    /// Replace the default sprite blit.
    pub fn on_draw(
        mut self,
        f: impl Fn(&Tree, NodeId, &Frame<'_>, &mut Canvas<'_>) + 'static,
    ) -> Self {
        self.draw = Some(Box::new(f));
        self
    }
}

impl Behavior for Hooks {
    fn init(&mut self, tree: &mut Tree, id: NodeId) {
        if let Some(f) = self.init.as_mut() {
            f(tree, id);
        }
    }

    fn teardown(&mut self, tree: &mut Tree, id: NodeId) {
        if let Some(f) = self.teardown.as_mut() {
            f(tree, id);
        }
    }

    fn update(&mut self, tree: &mut Tree, id: NodeId, frame: &Frame<'_>) {
        if let Some(f) = self.update.as_mut() {
            f(tree, id, frame);
        }
    }

    fn draw(&self, tree: &Tree, id: NodeId, frame: &Frame<'_>, canvas: &mut Canvas<'_>) {
        match &self.draw {
            Some(f) => f(tree, id, frame, canvas),
            None => draw_sprite(tree, id, canvas),
        }
    }
}
