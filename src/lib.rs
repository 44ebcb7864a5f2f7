//! Crater Arena - destructible-terrain combat simulation core
//!
//! Core module:
//! - `sim`: deterministic simulation (terrain grid, projectiles, explosions)
//!
//! Rendering, audio, input, AI, match flow, and map generation are external.
//! The host paints the terrain through [`sim::Terrain`], issues
//! [`sim::ProjectileSim::fire`] calls, drives [`sim::ProjectileSim::update`]
//! once per tick, then drains explosion events and applies them to its
//! actors via [`sim::resolve_explosions`].
//!
//! Coordinates are screen-space pixels: +x right, +y down.

pub mod sim;

pub use sim::{
    Actor, ExplosionEvent, FireMode, Material, Projectile, ProjectileSim, Terrain, Tracer,
    WeaponDef, resolve_explosions,
};

use glam::Vec2;

/// Simulation tuning constants
pub mod consts {
    /// Reference tick the motion constants are authored at (60 Hz).
    /// `update` scales velocities by `dt / REFERENCE_DT`.
    pub const REFERENCE_DT: f32 = 1.0 / 60.0;
    /// Maximum dt accepted per update, bounds integration error on hitches.
    pub const MAX_DT: f32 = 0.05;
    /// Global gravity in px per reference-tick, before weapon multipliers
    /// and the x10 integration scale.
    pub const GRAVITY: f32 = 0.05;

    /// Horizontal cull margin outside the world when wrap mode is off (px).
    pub const CULL_MARGIN: f32 = 200.0;
    /// Vertical cull distance below the world floor (always applies).
    pub const CULL_BELOW: f32 = 400.0;
    /// Vertical cull distance above the world ceiling (always applies).
    pub const CULL_ABOVE: f32 = 600.0;

    /// Post-fire window during which a projectile ignores its owner (s).
    pub const SELF_HIT_GRACE: f32 = 0.2;
    /// Velocity retained perpendicular to the surface on a bounce.
    pub const BOUNCE_RESTITUTION: f32 = 0.6;
    /// Fixed power fed into `Terrain::destroy_circle` on detonation.
    pub const DETONATION_POWER: f32 = 3.0;
    /// Knockback discount applied by cluster submunitions.
    pub const SUB_KNOCKBACK_SCALE: f32 = 0.6;
    /// Cosmetic blast radius of a cluster split puff (no damage).
    pub const CLUSTER_PUFF_RADIUS: f32 = 6.0;

    /// Hitscan ray-march step (px).
    pub const HITSCAN_STEP: f32 = 2.0;
    /// Lifetime of a hitscan tracer record (s).
    pub const TRACER_TTL: f32 = 0.15;

    /// Melee terrain gouge: offset along aim as a fraction of range.
    pub const MELEE_GOUGE_FRACTION: f32 = 0.5;
    /// Melee terrain gouge radius before the weapon's destruct scalar (px).
    pub const MELEE_GOUGE_RADIUS: f32 = 10.0;

    /// Fallbacks for projectiles flagged as mines on a weapon without a
    /// mine spec of its own.
    pub const MINE_DEFAULT_LIFETIME: f32 = 30.0;
    pub const MINE_DEFAULT_PROXIMITY: f32 = 20.0;

    /// Constant upward bias mixed into knockback direction.
    pub const KNOCKBACK_UP_BIAS: f32 = 0.35;
}

/// Unit vector for an angle in radians (screen coords, +y down).
#[inline]
pub fn vec_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Guard against NaN/inf reaching positions or blast parameters: asserts in
/// debug builds, clamps to `fallback` in release.
#[inline]
pub fn sanitize(v: f32, fallback: f32) -> f32 {
    debug_assert!(v.is_finite(), "non-finite value entered the simulation");
    if v.is_finite() { v } else { fallback }
}
