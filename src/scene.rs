use crate::canvas::PixelRounding;
use crate::node::Node;
use crate::pixels::Targets;
use crate::traversal::Frame;
use crate::traversal_stats;
use crate::tree::{NodeId, Tree, TreeError};

/// Whether the tick pass integrates speed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Behaviors call [`Tree::apply_velocity`] from `update` when they want to move.
    #[default]
    Manual,
    /// Every ticked node moves by `speed * delta / 1000` right before its `update` hook.
    Auto,
}

/// Traversal settings shared by a whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneConfig {
    pub movement: MovementMode,
    pub rounding: PixelRounding,
}

impl SceneConfig {
    pub fn movement(mut self, movement: MovementMode) -> Self {
        self.movement = movement;
        self
    }

    pub fn rounding(mut self, rounding: PixelRounding) -> Self {
        self.rounding = rounding;
        self
    }
}

/// A tree plus its root: the unit a frame loop drives.
///
/// # Example
/// ```
/// use sprig::prelude::*;
///
/// let mut scene = Scene::new(node().size(64.0, 64.0).build());
/// let star = scene
///     .spawn(
///         node()
///             .position(3.0, 4.0)
///             .sprite(Sprite::filled(1, 1, Color::WHITE).unwrap())
///             .build(),
///     )
///     .unwrap();
///
/// let camera = Viewport::new(0.0, 0.0, 64.0, 64.0);
/// let mut buffer = PixelBuffer::new(64, 64);
/// scene.frame(&Frame::new(16.0, &camera), &mut Targets::new(&mut buffer));
///
/// assert_eq!(buffer.get(3, 4), Some(Color::WHITE));
/// # let _ = star;
/// ```
#[derive(Debug)]
pub struct Scene {
    tree: Tree,
    root: NodeId,
}

impl Scene {
    pub fn new(root: Node) -> Self {
        Self::with_config(SceneConfig::default(), root)
    }

    pub fn with_config(config: SceneConfig, root: Node) -> Self {
        let mut tree = Tree::with_config(config);
        let root = tree.insert(root);
        log::debug!("Created scene with root {:?} ({:?})", root, config);
        Self { tree, root }
    }

    pub fn movement(mut self, movement: MovementMode) -> Self {
        let config = self.tree.config().movement(movement);
        self.tree.set_config(config);
        self
    }

    pub fn rounding(mut self, rounding: PixelRounding) -> Self {
        let config = self.tree.config().rounding(rounding);
        self.tree.set_config(config);
        self
    }

    pub fn config(&self) -> SceneConfig {
        self.tree.config()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert `node` and attach it under the root.
    pub fn spawn(&mut self, node: Node) -> Result<NodeId, TreeError> {
        self.spawn_under(self.root, node)
    }

    /// Insert `node` and attach it under `parent`. Nothing is left behind on failure.
    pub fn spawn_under(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        let id = self.tree.insert(node);
        if let Err(err) = self.tree.add_child(parent, id) {
            self.tree.despawn(id);
            return Err(err);
        }
        Ok(id)
    }

    pub fn tick(&mut self, frame: &Frame<'_>) {
        self.tree.tick(self.root, frame);
    }

    pub fn render(&mut self, frame: &Frame<'_>, targets: &mut Targets<'_>) {
        self.tree.render(self.root, frame, targets);
    }

    /// One full frame: tick, then render.
    pub fn frame(&mut self, frame: &Frame<'_>, targets: &mut Targets<'_>) {
        self.tick(frame);
        self.render(frame, targets);
        traversal_stats::end_frame();
    }
}
