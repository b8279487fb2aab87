//! Fixture scenes rendered by the visual regression tests.

use sprig::prelude::*;

/// A scene plus the camera and frame count to capture it with.
pub struct Fixture {
    pub scene: Scene,
    pub camera: Viewport,
    pub frames: u32,
}

/// Names of every fixture, in the order the tests list them.
pub const FIXTURES: &[&str] = &[
    "nested_offsets",
    "paint_order",
    "overlay_hud",
    "culling",
    "movement",
    "pixel_rounding",
];

pub fn fixture(name: &str) -> Option<Fixture> {
    let fixture = match name {
        "nested_offsets" => nested_offsets(),
        "paint_order" => paint_order(),
        "overlay_hud" => overlay_hud(),
        "culling" => culling(),
        "movement" => movement(),
        "pixel_rounding" => pixel_rounding(),
        _ => return None,
    };
    Some(fixture)
}

const RED: Color = Color::rgb(0xE0, 0x30, 0x30);
const GREEN: Color = Color::rgb(0x30, 0xC0, 0x50);
const BLUE: Color = Color::rgb(0x30, 0x60, 0xE0);
const YELLOW: Color = Color::rgb(0xF0, 0xD0, 0x20);
const GREY: Color = Color::rgb(0x60, 0x60, 0x60);

fn block(width: usize, height: usize, color: Color) -> Sprite {
    Sprite::filled(width, height, color).expect("fixture sprites have a non-zero width")
}

fn world() -> Scene {
    Scene::new(node().size(64.0, 48.0).build())
}

fn full_view() -> Viewport {
    Viewport::new(0.0, 0.0, 64.0, 48.0)
}

fn spawn_under(scene: &mut Scene, parent: NodeId, builder: NodeBuilder) -> NodeId {
    scene
        .spawn_under(parent, builder.build())
        .expect("fixture parents are alive")
}

/// Three levels of children, each drawn relative to its parent.
fn nested_offsets() -> Fixture {
    let mut scene = world();
    let root = scene.root();
    let a = spawn_under(
        &mut scene,
        root,
        node()
            .position(4.0, 4.0)
            .size(40.0, 30.0)
            .sprite(block(24, 24, RED)),
    );
    let b = spawn_under(
        &mut scene,
        a,
        node()
            .position(6.0, 6.0)
            .size(20.0, 20.0)
            .sprite(block(14, 14, GREEN)),
    );
    spawn_under(
        &mut scene,
        b,
        node()
            .position(4.0, 4.0)
            .size(8.0, 8.0)
            .sprite(block(6, 6, BLUE)),
    );
    spawn_under(
        &mut scene,
        root,
        node()
            .position(40.0, 8.0)
            .size(8.0, 8.0)
            .sprite(block(8, 8, YELLOW)),
    );

    Fixture {
        scene,
        camera: full_view(),
        frames: 1,
    }
}

/// Overlapping squares attached in reverse paint order.
fn paint_order() -> Fixture {
    let mut scene = world();
    let root = scene.root();
    let colors = [(3, YELLOW), (2, BLUE), (1, GREEN), (0, RED)];
    for (z, color) in colors {
        let offset = 8.0 + z as f32 * 6.0;
        spawn_under(
            &mut scene,
            root,
            node()
                .position(offset, offset)
                .size(16.0, 16.0)
                .z_index(z)
                .sprite(block(16, 16, color)),
        );
    }

    Fixture {
        scene,
        camera: full_view(),
        frames: 1,
    }
}

/// A scrolled camera over the world with a screen-fixed HUD bar.
fn overlay_hud() -> Fixture {
    let mut scene = Scene::new(node().size(200.0, 200.0).build());
    let root = scene.root();
    spawn_under(
        &mut scene,
        root,
        node()
            .position(40.0, 30.0)
            .size(12.0, 12.0)
            .sprite(block(12, 12, GREEN)),
    );
    spawn_under(
        &mut scene,
        root,
        node()
            .position(70.0, 40.0)
            .size(12.0, 12.0)
            .sprite(block(12, 12, RED)),
    );

    let hud = spawn_under(
        &mut scene,
        root,
        node()
            .overlay()
            .position(0.0, 40.0)
            .z_index(10)
            .sprite(block(64, 8, GREY)),
    );
    spawn_under(&mut scene, hud, node().position(2.0, 2.0).sprite(block(20, 4, YELLOW)));

    Fixture {
        scene,
        camera: Viewport::new(32.0, 20.0, 64.0, 48.0),
        frames: 1,
    }
}

/// A culled parent hides a child that would be visible on its own.
fn culling() -> Fixture {
    let mut scene = world();
    let root = scene.root();
    let far = spawn_under(
        &mut scene,
        root,
        node()
            .position(100.0, 0.0)
            .size(4.0, 4.0)
            .sprite(block(4, 4, RED)),
    );
    spawn_under(
        &mut scene,
        far,
        node()
            .position(-90.0, 10.0)
            .size(10.0, 10.0)
            .sprite(block(10, 10, RED)),
    );

    let near = spawn_under(
        &mut scene,
        root,
        node()
            .position(30.0, 10.0)
            .size(10.0, 10.0)
            .sprite(block(10, 10, GREEN)),
    );
    spawn_under(
        &mut scene,
        near,
        node()
            .position(10.0, 10.0)
            .size(6.0, 6.0)
            .sprite(block(6, 6, BLUE)),
    );

    Fixture {
        scene,
        camera: full_view(),
        frames: 1,
    }
}

/// Auto movement carries two nodes along their speed over several frames.
fn movement() -> Fixture {
    let mut scene = Scene::new(node().size(64.0, 48.0).build()).movement(MovementMode::Auto);
    let root = scene.root();
    spawn_under(
        &mut scene,
        root,
        node()
            .position(0.0, 8.0)
            .size(6.0, 6.0)
            .speed(250.0, 0.0)
            .sprite(block(6, 6, GREEN)),
    );
    spawn_under(
        &mut scene,
        root,
        node()
            .position(0.0, 30.0)
            .size(6.0, 6.0)
            .speed(125.0, -62.5)
            .sprite(block(6, 6, BLUE)),
    );

    Fixture {
        scene,
        camera: full_view(),
        frames: 10,
    }
}

/// Fractional offsets stacked across levels snap to the grid at every level.
fn pixel_rounding() -> Fixture {
    let mut scene = world();
    let mut parent = scene.root();
    for level in 0..6 {
        let color = if level % 2 == 0 { YELLOW } else { BLUE };
        parent = spawn_under(
            &mut scene,
            parent,
            node()
                .position(4.5, 3.5)
                .size(8.0, 8.0)
                .sprite(block(4, 4, color)),
        );
    }

    Fixture {
        scene,
        camera: full_view(),
        frames: 1,
    }
}
