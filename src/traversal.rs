//! Per-frame traversals.
//!
//! A frame is one [`Tree::tick`] followed by one [`Tree::render`] on the root. Both are
//! depth-first and share a single visibility predicate ([`Tree::in_bound`]): a culled
//! node skips its own hook and its whole subtree.
//!
//! Render composes node-local coordinates by keeping a stack of local offsets from the
//! node that bound the current buffer down to the node being drawn. An overlay node
//! starts a fresh stack on the overlay buffer; everything else extends its parent's.

use std::any::Any;

use crate::behavior::draw_sprite;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::geometry::Vec2;
use crate::node::RenderMode;
use crate::pixels::{DrawTarget, Targets};
use crate::scene::MovementMode;
use crate::traversal_stats;
use crate::tree::{NodeId, Tree};

/// Everything a traversal hands to node hooks for one frame.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    /// Milliseconds since the previous frame.
    pub delta: f32,
    pub camera: &'a dyn Camera,
    /// Opaque per-frame input, see [`Frame::input`].
    pub input: Option<&'a (dyn Any + 'static)>,
}

impl<'a> Frame<'a> {
    pub fn new(delta: f32, camera: &'a dyn Camera) -> Self {
        Self {
            delta,
            camera,
            input: None,
        }
    }

    pub fn with_input(mut self, input: &'a (dyn Any + 'static)) -> Self {
        self.input = Some(input);
        self
    }

    /// Downcast the input object. `None` if there is none or it is not a `T`.
    pub fn input<T: Any>(&self) -> Option<&'a T> {
        self.input.and_then(|input| input.downcast_ref::<T>())
    }
}

impl std::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("delta", &self.delta)
            .field("input", &self.input.is_some())
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Culling gate. Overlay nodes are always in bounds; camera-relative nodes ask the
    /// camera about their absolute box. Stale handles are never in bounds.
    pub fn in_bound(&self, id: NodeId, camera: &dyn Camera) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        match node.render_mode {
            RenderMode::Overlay => true,
            RenderMode::CameraRelative => {
                let position = self.absolute_position(id).unwrap_or(node.position);
                camera.in_bound(position, node.size)
            }
        }
    }

    /// Update and render share the same predicate.
    pub fn need_update(&self, id: NodeId, camera: &dyn Camera) -> bool {
        self.in_bound(id, camera)
    }

    /// Update traversal: cull, integrate (auto movement only), run `update`, recurse.
    pub fn tick(&mut self, id: NodeId, frame: &Frame<'_>) {
        if !self.need_update(id, frame.camera) {
            log::trace!("Tick culled {:?}", id);
            traversal_stats::record_tick_culled();
            return;
        }
        traversal_stats::record_ticked();

        if self.config().movement == MovementMode::Auto {
            self.apply_velocity(id, frame.delta);
        }

        self.with_behavior_mut(id, |behavior, tree| behavior.update(tree, id, frame));

        let children = self.children(id).to_vec();
        for child in children {
            // Skip children that a sibling's hook moved elsewhere
            if self.parent(child) == Some(id) {
                self.tick(child, frame);
            }
        }
    }

    /// Render traversal rooted at `id`.
    ///
    /// Camera-relative nodes paint into `targets.scene`, overlay nodes into
    /// `targets.overlay` (or the scene when there is no overlay buffer). Each node's
    /// children are stably sorted by z-index right before they are visited.
    ///
    /// Rendering from inside a hook draws the hook's own node (and any other node whose
    /// hook is still running) with the default sprite blit, since its behavior is
    /// checked out; a warning is logged when that happens.
    pub fn render(&mut self, id: NodeId, frame: &Frame<'_>, targets: &mut Targets<'_>) {
        let mut offsets = Vec::new();
        self.render_node(id, frame, targets, &mut offsets, 0, DrawTarget::Scene);
    }

    fn render_node(
        &mut self,
        id: NodeId,
        frame: &Frame<'_>,
        targets: &mut Targets<'_>,
        offsets: &mut Vec<Vec2>,
        base: usize,
        inherited: DrawTarget,
    ) {
        if !self.in_bound(id, frame.camera) {
            log::trace!("Render culled {:?}", id);
            traversal_stats::record_render_culled();
            return;
        }
        let Some(node) = self.node(id) else {
            return;
        };

        let target = DrawTarget::resolve(node.render_mode, inherited);
        let base = match node.render_mode {
            RenderMode::Overlay => offsets.len(),
            RenderMode::CameraRelative => base,
        };
        offsets.push(node.position);

        {
            let mut canvas = Canvas::new(
                targets.sink(target),
                &offsets[base..],
                self.config().rounding,
                target,
            );
            match node.behavior.as_deref() {
                Some(behavior) => behavior.draw(self, id, frame, &mut canvas),
                None => {
                    if self.is_checked_out(id) {
                        log::warn!(
                            "Rendering {:?} while its hook is running, drawing the default sprite instead",
                            id
                        );
                    }
                    draw_sprite(self, id, &mut canvas)
                }
            }
        }
        traversal_stats::record_drawn();

        self.sort_children(id);
        let children = self.children(id).to_vec();
        for child in children {
            self.render_node(child, frame, targets, offsets, base, target);
        }

        offsets.pop();
    }
}
