//! voxcast probe
//!
//! Generates a small procedural world, scatters billboard entities over it,
//! casts a fan of rays from a camera above the terrain and runs a handful of
//! collider pairs, logging what it finds.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p voxcast-probe
//! ```
//!
//! ## Environment Variables
//!
//! - `VOXCAST_SEED`: World generation seed (default: 42)
//! - `VOXCAST_CEILING_SCALE`: Voxel height in world units (default: 1.0)
//! - `VOXCAST_RAYS`: Rays in the camera fan (default: 4096)
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use std::str::FromStr;
use std::time::Instant;

use anyhow::{ensure, Context};
use glam::{DVec2, DVec3};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voxcast_core::constants::CHUNK_DIM;
use voxcast_core::ChunkPos;
use voxcast_entity::{BillboardAnimation, BillboardFrame, EntityBounds, EntityDesc, EntityManager};
use voxcast_physics::{
    test_collision, BoxShape, CapsuleShape, Collider, ColliderId, CollisionError, CylinderShape,
    QuadShape, RayCastConfig, RayCastHitKind, RayCaster,
};
use voxcast_world::{ChunkManager, CollisionChunk, TerrainConfig, TerrainGenerator, VoxelChunk};

/// Chunks loaded around the origin in each direction.
const LOAD_RADIUS: i32 = 2;
const ENTITY_COUNT: usize = 48;

/// Probe parameters.
#[derive(Debug, Clone)]
struct ProbeConfig {
    seed: u64,
    ceiling_scale: f64,
    rays: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ceiling_scale: 1.0,
            rays: 4096,
        }
    }
}

impl ProbeConfig {
    /// Read overrides from the environment.
    fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let config = Self {
            seed: env_or("VOXCAST_SEED", defaults.seed)?,
            ceiling_scale: env_or("VOXCAST_CEILING_SCALE", defaults.ceiling_scale)?,
            rays: env_or("VOXCAST_RAYS", defaults.rays)?,
        };
        ensure!(
            RayCastConfig::default()
                .with_ceiling_scale(config.ceiling_scale)
                .is_valid(),
            "VOXCAST_CEILING_SCALE must be positive, got {}",
            config.ceiling_scale
        );
        Ok(config)
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid {name}: {value:?}")),
        Err(_) => Ok(default),
    }
}

struct World {
    generator: TerrainGenerator,
    voxels: ChunkManager<VoxelChunk>,
    collision: ChunkManager<CollisionChunk>,
    entities: EntityManager,
}

fn build_world(config: &ProbeConfig) -> anyhow::Result<World> {
    let start = Instant::now();
    let generator = TerrainGenerator::new(TerrainConfig {
        seed: config.seed,
        ..TerrainConfig::default()
    });

    let positions: Vec<ChunkPos> = ChunkPos::new(0, 0).neighborhood(LOAD_RADIUS).collect();
    let voxels = ChunkManager::new();
    let collision = ChunkManager::new();
    for (chunk, colliders) in generator
        .generate_chunks_parallel(&positions)
        .context("terrain generation failed")?
    {
        voxels.insert(chunk);
        collision.insert(colliders);
    }
    info!(
        chunks = positions.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "world generated"
    );

    // Eight view angles per entity.
    let frames: Vec<_> = (0..8)
        .map(|_| BillboardFrame::new(0.8, 1.8))
        .collect();
    let animation = BillboardAnimation::new(frames).context("billboard needs frames")?;

    let mut entities = EntityManager::new();
    for i in 0..ENTITY_COUNT {
        let angle = i as f64 * 0.618 * std::f64::consts::TAU;
        let radius = 6.0 + (i % 12) as f64 * 4.0;
        let x = (angle.cos() * radius).floor() as i32;
        let z = (angle.sin() * radius).floor() as i32;
        let ground = f64::from(generator.height_at(x, z)) * config.ceiling_scale;
        entities.spawn(EntityDesc {
            position: DVec3::new(f64::from(x) + 0.5, ground, f64::from(z) + 0.5),
            facing: DVec2::from_angle(angle),
            bounds: EntityBounds::new(0.6, 1.8, 0.6),
            animation: animation.clone(),
        });
    }
    info!(entities = entities.len(), "entities spawned");

    Ok(World {
        generator,
        voxels,
        collision,
        entities,
    })
}

fn cast_fan(world: &World, config: &ProbeConfig) {
    let ray_config = RayCastConfig::default().with_ceiling_scale(config.ceiling_scale);
    let caster = RayCaster::new(&world.voxels, &world.collision, &world.entities, ray_config);

    // Camera over the middle of the center chunk.
    let center = ChunkPos::new(0, 0);
    let eye_height = f64::from(world.generator.config().chunk_height) * config.ceiling_scale - 0.5;
    let middle = f64::from(CHUNK_DIM / 2) + 0.5;
    let origin = center.origin() + DVec3::new(middle, eye_height, middle);
    let camera_forward = DVec3::new(0.0, -0.3, 1.0).normalize();

    let rays: Vec<(DVec3, DVec3)> = (0..config.rays)
        .map(|i| {
            let yaw = i as f64 / config.rays as f64 * std::f64::consts::TAU;
            let pitch = -0.05 - (i % 7) as f64 * 0.04;
            (origin, DVec3::new(yaw.cos(), pitch, yaw.sin()).normalize())
        })
        .collect();

    let start = Instant::now();
    let hits = caster.cast_many(&rays, camera_forward);
    let elapsed = start.elapsed();

    let mut voxel_hits = 0usize;
    let mut entity_hits = 0usize;
    let mut nearest = f64::INFINITY;
    for hit in hits.iter().flatten() {
        match hit.kind {
            RayCastHitKind::Voxel { .. } => voxel_hits += 1,
            RayCastHitKind::Entity { .. } => entity_hits += 1,
        }
        nearest = nearest.min(hit.t);
    }

    info!(
        chunks_near_camera = world.voxels.chunks_in_radius(center, 1).len(),
        rays = rays.len(),
        voxel_hits,
        entity_hits,
        misses = rays.len() - voxel_hits - entity_hits,
        nearest,
        elapsed_us = elapsed.as_micros(),
        "ray fan cast"
    );
}

fn probe_collisions(world: &World, config: &ProbeConfig) -> anyhow::Result<()> {
    let ground = f64::from(world.generator.height_at(0, 0)) * config.ceiling_scale;
    let floor = Collider::new(
        ColliderId(1),
        BoxShape::new(DVec3::new(0.5, ground - 1.0, 0.5), 4.0, 1.0, 4.0),
    );
    let player = Collider::new(
        ColliderId(2),
        CapsuleShape::upright(DVec3::new(0.5, ground + 0.85, 0.5), 0.3, 1.2),
    );
    let crate_box = Collider::new(
        ColliderId(3),
        BoxShape::new(DVec3::new(0.9, ground, 0.6), 1.0, 1.0, 1.0).with_yaw(0.3),
    );
    let post = Collider::new(
        ColliderId(4),
        CylinderShape::new(DVec3::new(1.6, ground, 0.5), 0.25, 2.0),
    );
    let door = Collider::new(
        ColliderId(5),
        QuadShape::new(DVec3::new(0.5, ground + 1.0, 1.2), DVec3::NEG_Z, 1.0, 2.0),
    );

    let pairs = [
        (&player, &floor),
        (&player, &crate_box),
        (&crate_box, &post),
        (&post, &door),
        (&door, &crate_box),
        (&player, &door),
        (&post, &player),
    ];
    for (a, b) in pairs {
        match test_collision(a, b) {
            Ok(Some(hit)) => info!(
                a = hit.a.0,
                b = hit.b.0,
                depth = hit.contact().depth(),
                normal = %hit.normal,
                "contact"
            ),
            Ok(None) => info!(a = a.id.0, b = b.id.0, "no contact"),
            Err(err @ CollisionError::UnsupportedPair { .. }) => {
                warn!(a = a.id.0, b = b.id.0, "{err}");
            }
            Err(err) => return Err(err).context("collision probe failed"),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ProbeConfig::from_env()?;
    info!(?config, "voxcast probe");

    let world = build_world(&config)?;
    cast_fan(&world, &config);
    probe_collisions(&world, &config)?;
    Ok(())
}

fn print_help() {
    eprintln!(
        "voxcast probe

USAGE:
    cargo run -p voxcast-probe

ENVIRONMENT:
    VOXCAST_SEED            World generation seed (default: 42)
    VOXCAST_CEILING_SCALE   Voxel height in world units (default: 1.0)
    VOXCAST_RAYS            Rays in the camera fan (default: 4096)
    RUST_LOG                Log filter (default: info)"
    );
}
