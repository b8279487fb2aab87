//! Scrolling starfield with a HUD overlay.
//!
//! Runs a few frames and prints the final picture as ASCII. Pass a path to also save
//! it as a PNG:
//!
//! ```bash
//! cargo run --example starfield -- starfield.png
//! ```

use sprig::logging::{init_logging, LoggingConfig};
use sprig::prelude::*;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 24;
const FRAMES: u32 = 30;
const DELTA_MS: f32 = 16.0;

const STAR: Color = Color::rgb(0xFF, 0xFF, 0xFF);
const SHIP: Color = Color::rgb(0x30, 0xC0, 0x50);
const HUD: Color = Color::rgb(0x60, 0x60, 0x60);
const GAUGE: Color = Color::rgb(0xF0, 0xD0, 0x20);

/// Small deterministic generator so every run draws the same sky.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    fn below(&mut self, max: u32) -> f32 {
        (self.next() % max) as f32
    }
}

/// Stars drift left and wrap around to the right edge.
fn star_behavior() -> Hooks {
    Hooks::new().on_update(|tree, id, frame| {
        tree.apply_velocity(id, frame.delta);
        if let Some(position) = tree.absolute_position(id) {
            if position.x < 0.0 {
                tree.set_absolute(id, PartialPosition::x(position.x + WIDTH as f32));
            }
        }
    })
}

/// The gauge grows with elapsed time, redrawn from scratch every frame.
fn gauge_behavior() -> Hooks {
    let elapsed = std::rc::Rc::new(std::cell::Cell::new(0.0_f32));
    let seen = elapsed.clone();
    Hooks::new()
        .on_update(move |_, _, frame| elapsed.set(elapsed.get() + frame.delta))
        .on_draw(move |_, _, _, canvas| {
            let filled = ((seen.get() / 20.0) as u32).min(WIDTH - 4);
            canvas.fill_rect(0.0, 0.0, filled, 1, GAUGE);
        })
}

fn build_scene() -> Result<Scene, Box<dyn std::error::Error>> {
    let mut scene = Scene::new(node().size(WIDTH as f32, HEIGHT as f32).build());
    let mut rng = XorShift(0x9E37_79B9);

    let sky = scene.spawn(node().tag("sky").build())?;
    for _ in 0..40 {
        let speed = -20.0 - rng.below(60);
        let star = node()
            .position(rng.below(WIDTH), rng.below(HEIGHT - 3))
            .size(1.0, 1.0)
            .speed(speed, 0.0)
            .sprite(Sprite::filled(1, 1, STAR)?)
            .behavior(star_behavior())
            .build();
        scene.spawn_under(sky, star)?;
    }

    const NONE: Color = Color::TRANSPARENT;
    #[rustfmt::skip]
    let ship_pixels = vec![
        SHIP, NONE, NONE,
        SHIP, SHIP, SHIP,
        SHIP, NONE, NONE,
    ];
    let ship_sprite = Sprite::new(3, ship_pixels)?;
    scene.spawn(
        node()
            .position(8.0, 9.0)
            .size(3.0, 3.0)
            .z_index(1)
            .tag("player")
            .sprite(ship_sprite)
            .build(),
    )?;

    let hud = scene.spawn(
        node()
            .overlay()
            .position(0.0, (HEIGHT - 3) as f32)
            .z_index(10)
            .sprite(Sprite::filled(WIDTH as usize, 3, HUD)?)
            .build(),
    )?;
    scene.spawn_under(
        hud,
        node().position(2.0, 1.0).behavior(gauge_behavior()).build(),
    )?;

    Ok(scene)
}

fn to_ascii(buffer: &PixelBuffer) -> String {
    let mut out = String::new();
    for y in 0..buffer.height() as i32 {
        for x in 0..buffer.width() as i32 {
            let ch = match buffer.get(x, y) {
                Some(STAR) => '.',
                Some(SHIP) => '>',
                Some(HUD) => '=',
                Some(GAUGE) => '#',
                _ => ' ',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default());

    let mut scene = build_scene()?;
    let camera = Viewport::new(0.0, 0.0, WIDTH as f32, HEIGHT as f32);
    let mut buffer = PixelBuffer::new(WIDTH, HEIGHT);
    let mut overlay = PixelBuffer::new(WIDTH, HEIGHT);

    for _ in 0..FRAMES {
        buffer.clear(Color::BLACK);
        overlay.clear(Color::TRANSPARENT);
        let frame = Frame::new(DELTA_MS, &camera);
        scene.frame(&frame, &mut Targets::with_overlay(&mut buffer, &mut overlay));
    }
    buffer.composite(&overlay);

    log::info!("Rendered {} frames of {} nodes", FRAMES, scene.tree().len());
    print!("{}", to_ascii(&buffer));

    if let Some(path) = std::env::args().nth(1) {
        buffer.to_rgba_image().save(&path)?;
        log::info!("Saved {}", path);
    }

    Ok(())
}
