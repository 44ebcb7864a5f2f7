//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed conceptual tick, dt-clamped by the caller's loop
//! - Seeded RNG only (injected per match)
//! - No rendering or platform dependencies

pub mod actor;
pub mod explosion;
pub mod projectile;
pub mod simulator;
pub mod terrain;
pub mod weapons;

pub use actor::Actor;
pub use explosion::{ExplosionEvent, knockback_vector, resolve_explosions};
pub use projectile::{Projectile, Tracer};
pub use simulator::ProjectileSim;
pub use terrain::{Material, Terrain};
pub use weapons::{ClusterSpec, FireMode, LaunchSpeed, MineSpec, SubStats, WeaponDef, arsenal};
