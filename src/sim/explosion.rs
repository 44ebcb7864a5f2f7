//! Explosion events and the damage/knockback resolver
//!
//! Every detonation - blast, melee swing, or hitscan impact - arrives here
//! as one `ExplosionEvent`. The resolver is the single place damage and
//! force are computed; instant-hit sources carry a direct-hit index and a
//! zero-ish radius, which the falloff formula handles without special cases.

use std::sync::Arc;

use glam::Vec2;

use super::actor::Actor;
use super::weapons::WeaponDef;
use crate::consts::KNOCKBACK_UP_BIAS;

/// Transient value produced exactly once per detonation and consumed once
/// per tick by the caller, then discarded.
#[derive(Debug, Clone)]
pub struct ExplosionEvent {
    /// Blast center.
    pub pos: Vec2,
    pub weapon: Arc<WeaponDef>,
    pub owner: usize,
    /// Effective blast radius (submunition variant already selected).
    pub radius: f32,
    /// Effective base damage before falloff.
    pub damage: f32,
    /// Knockback magnitude before falloff.
    pub knockback: f32,
    /// Actor struck physically; takes full damage regardless of distance.
    pub direct_hit: Option<usize>,
}

/// Apply one tick's drained events to the live actors. Run exactly once per
/// tick, after `ProjectileSim::update`.
///
/// An actor is affected iff it is the direct hit or strictly inside the
/// blast radius. Falloff is 1.0 for direct hits, else `1 - dist / radius`.
/// Note there is no owner immunity here: standing in your own blast hurts.
pub fn resolve_explosions<A: Actor>(events: &[ExplosionEvent], actors: &mut [A]) {
    for ev in events {
        for actor in actors.iter_mut() {
            if actor.dead() {
                continue;
            }
            let dist = actor.center().distance(ev.pos);
            let direct = ev.direct_hit == Some(actor.index());
            if !direct && dist >= ev.radius {
                continue;
            }
            let falloff = if direct { 1.0 } else { 1.0 - dist / ev.radius };
            actor.take_damage(ev.damage * falloff);
            actor.apply_knockback(ev.pos, ev.knockback * falloff, ev.radius);
        }
    }
}

/// Shared knockback direction formula: away from the blast center with a
/// small constant upward bias (screen coords, -y is up). Actor
/// implementations and test doubles use this so blasts feel identical.
pub fn knockback_vector(from: Vec2, to: Vec2, force: f32) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    (dir + Vec2::new(0.0, -KNOCKBACK_UP_BIAS)).normalize_or_zero() * force
}
