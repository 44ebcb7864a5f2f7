//! Live projectile entity and hitscan tracers

use std::sync::Arc;

use glam::Vec2;

use super::weapons::WeaponDef;

/// A traveling projectile. Created only by `ProjectileSim::fire`; owned
/// exclusively by the simulator's live list.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub weapon: Arc<WeaponDef>,
    pub owner: usize,
    /// Seconds since fire (reset when a mine lands, so the mine lifetime
    /// counts from landing).
    pub age: f32,
    pub bounces: u32,
    /// Cumulative Euclidean distance traveled, for max-range culling.
    pub traveled: f32,
    /// Spawned by a cluster split; submunitions never split again.
    pub is_sub: bool,
    /// Lands on terrain contact instead of detonating.
    pub is_mine: bool,
    /// Mine at rest, waiting on proximity or lifetime.
    pub landed: bool,
    /// Cleared on detonation/cull; dead entries drop at the start of the
    /// next update pass.
    pub alive: bool,
}

impl Projectile {
    pub fn new(weapon: Arc<WeaponDef>, pos: Vec2, vel: Vec2, owner: usize) -> Self {
        Self {
            pos,
            vel,
            weapon,
            owner,
            age: 0.0,
            bounces: 0,
            traveled: 0.0,
            is_sub: false,
            is_mine: false,
            landed: false,
            alive: true,
        }
    }
}

/// Short-lived cosmetic record of a hitscan shot, for the external renderer.
/// Decays inside `update`; never affects gameplay.
#[derive(Debug, Clone, Copy)]
pub struct Tracer {
    pub from: Vec2,
    pub to: Vec2,
    pub ttl: f32,
}
