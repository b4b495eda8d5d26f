//! Bouncing Sprites Demo
//!
//! Headless simulation of sprites bouncing inside a walled arena:
//! - Randomly placed sprites with random velocities
//! - Immovable walls that sprites bounce off
//! - Sprite-versus-sprite bounces through a group check
//! - Optional quadtree broad phase, rebuilt every frame
//!
//! Usage: `collision_demo [scene.toml|scene.ron]`

mod config;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprite_collision::foundation::logging;
use sprite_collision::prelude::*;

use config::SceneSettings;

const WALL_THICKNESS: f64 = 20.0;

struct BouncingSpritesApp {
    settings: SceneSettings,
    world: CollisionWorld,
    sprites: GroupHandle,
    walls: GroupHandle,
    visualizer: CollisionDebugVisualizer,
}

impl BouncingSpritesApp {
    fn new(settings: SceneSettings) -> Result<Self> {
        settings.validate()?;
        let mut world = CollisionWorld::new(settings.collision);
        let sprites = world.create_group();
        let walls = world.create_group();

        let (w, h, t) = (settings.width, settings.height, WALL_THICKNESS);
        let wall_bodies = [
            (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w + 2.0 * t, t)),
            (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w + 2.0 * t, t)),
            (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, h)),
            (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t, h)),
        ];
        for (position, size) in wall_bodies {
            let wall = world.add_body(Body::new(position).with_size(size.x, size.y).immovable());
            world.add_to_group(walls, wall)?;
        }

        let mut rng = StdRng::seed_from_u64(settings.seed);
        let margin = settings.sprite_size;
        for _ in 0..settings.sprite_count {
            let position = Vec2::new(
                rng.gen_range(margin..settings.width - margin),
                rng.gen_range(margin..settings.height - margin),
            );
            let velocity = Vec2::new(
                rng.gen_range(-settings.max_speed..=settings.max_speed),
                rng.gen_range(-settings.max_speed..=settings.max_speed),
            );
            let mut body = Body::new(position)
                .with_size(settings.sprite_size, settings.sprite_size)
                .with_velocity(velocity)
                .with_mass(rng.gen_range(0.5..2.0));
            if rng.gen_bool(0.3) {
                body.set_collider(&ColliderSpec::Circle {
                    offset: Vec2::zeros(),
                    radius: None,
                })?;
            } else {
                body.ensure_collider();
            }
            let sprite = world.add_body(body);
            world.add_to_group(sprites, sprite)?;
        }

        log::info!(
            "Scene ready: {} sprites, quadtree {}",
            settings.sprite_count,
            if world.spatial_index().is_enabled() { "on" } else { "off" }
        );

        Ok(Self {
            settings,
            world,
            sprites,
            walls,
            visualizer: CollisionDebugVisualizer::new(),
        })
    }

    fn run(mut self) -> Result<()> {
        let mut total_contacts = 0usize;

        for frame in 0..self.settings.frames {
            self.world.step_all();
            self.world.update_spatial_index();

            let mut contacts = 0usize;
            let mut count = |_: &mut Body, _: &mut Body| contacts += 1;
            self.world.group_bounce_off(self.sprites, self.walls, None)?;
            self.world.group_bounce(self.sprites, self.sprites, Some(&mut count))?;
            total_contacts += contacts;

            self.visualizer.update(1.0);
            self.visualizer.draw_world(&self.world);

            if frame % 60 == 0 {
                log::info!(
                    "Frame {frame}: {contacts} sprite contacts, {} debug shapes, kinetic energy {:.1}",
                    self.visualizer.shapes().len(),
                    self.kinetic_energy()
                );
            }
        }

        let escaped = self.escaped_sprites()?;
        log::info!("Done: {total_contacts} sprite contacts, {escaped} sprites left the arena");
        Ok(())
    }

    fn kinetic_energy(&self) -> f64 {
        self.world
            .bodies()
            .filter(|(_, body)| !body.immovable)
            .map(|(_, body)| 0.5 * body.mass * body.velocity.norm_squared())
            .sum()
    }

    fn escaped_sprites(&self) -> Result<usize> {
        let arena = Rect::from_origin_size(0.0, 0.0, self.settings.width, self.settings.height);
        let members = self.world.group_members(self.sprites)?;
        Ok(members
            .iter()
            .filter_map(|handle| self.world.body(*handle))
            .filter(|body| !arena.contains_point(&body.position))
            .count())
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {path}");
            SceneSettings::load_from_file(&path)?
        }
        None => SceneSettings::default(),
    };

    println!("=== Bouncing Sprites Demo ===");
    println!("  {} sprites, {} frames", settings.sprite_count, settings.frames);
    println!();

    let app = BouncingSpritesApp::new(settings)?;
    app.run()?;
    Ok(())
}
