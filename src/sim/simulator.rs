//! Projectile simulation: firing, integration, collision, detonation
//!
//! Single-threaded and tick-driven. Per tick the host issues all `fire`
//! calls, then one `update`, then drains events. Instant modes (melee,
//! hitscan) resolve inside `fire` and append to the same event queue, which
//! is why events are drained only after `update`.

use std::sync::Arc;

use glam::Vec2;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::actor::Actor;
use super::explosion::ExplosionEvent;
use super::projectile::{Projectile, Tracer};
use super::terrain::Terrain;
use super::weapons::{FireMode, MineSpec, WeaponDef};
use crate::consts::*;
use crate::{sanitize, vec_from_angle};

/// Debug-build guard for the fire -> update -> drain ordering contract.
#[cfg(debug_assertions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickPhase {
    Firing,
    AwaitingDrain,
}

/// Owns the live projectile list and the pending explosion events.
pub struct ProjectileSim {
    world_w: f32,
    world_h: f32,
    /// Horizontal wrap-around (arena without side walls). Vertical never
    /// wraps.
    pub wrap: bool,
    projectiles: Vec<Projectile>,
    events: Vec<ExplosionEvent>,
    tracers: Vec<Tracer>,
    rng: Pcg32,
    #[cfg(debug_assertions)]
    phase: TickPhase,
}

impl ProjectileSim {
    /// `seed` fixes all randomness (spread, scatter) for the match, so a
    /// replayed seed reproduces the simulation exactly.
    pub fn new(world_w: f32, world_h: f32, seed: u64) -> Self {
        Self {
            world_w,
            world_h,
            wrap: false,
            projectiles: Vec::new(),
            events: Vec::new(),
            tracers: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            #[cfg(debug_assertions)]
            phase: TickPhase::Firing,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Pending explosion events, in detonation order.
    pub fn events(&self) -> &[ExplosionEvent] {
        &self.events
    }

    /// Live hitscan tracers (cosmetic, for the renderer).
    pub fn tracers(&self) -> &[Tracer] {
        &self.tracers
    }

    /// Take this tick's events. Call exactly once per tick, after `update`.
    pub fn drain_events(&mut self) -> Vec<ExplosionEvent> {
        #[cfg(debug_assertions)]
        {
            self.phase = TickPhase::Firing;
        }
        std::mem::take(&mut self.events)
    }

    /// Drop all projectiles, pending events, and tracers atomically (round
    /// restart). Never observed half-cleared by the caller.
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.events.clear();
        self.tracers.clear();
        #[cfg(debug_assertions)]
        {
            self.phase = TickPhase::Firing;
        }
    }

    /// Fire a weapon. Ballistic modes spawn projectiles; melee and hitscan
    /// resolve synchronously against `terrain` and `actors` and append
    /// their events immediately. `charge` only matters for charge-scaled
    /// launches; `mine_mode` flags the spawned projectiles (and any cluster
    /// submunitions they produce) as mines.
    #[allow(clippy::too_many_arguments)]
    pub fn fire<A: Actor>(
        &mut self,
        terrain: &mut Terrain,
        weapon: &Arc<WeaponDef>,
        pos: Vec2,
        angle: f32,
        owner: usize,
        charge: f32,
        mine_mode: bool,
        actors: &[A],
    ) {
        #[cfg(debug_assertions)]
        debug_assert_eq!(
            self.phase,
            TickPhase::Firing,
            "fire after update: drain_events first"
        );

        let pos = Vec2::new(sanitize(pos.x, 0.0), sanitize(pos.y, 0.0));
        let angle = sanitize(angle, 0.0);

        match weapon.mode {
            FireMode::Melee { range, arc } => {
                self.fire_melee(terrain, weapon, pos, angle, owner, range, arc, actors);
            }
            FireMode::Hitscan { max_dist } => {
                self.fire_hitscan(terrain, weapon, pos, angle, owner, max_dist, actors);
            }
            FireMode::Ballistic {
                launch,
                pellets,
                spread,
                mine,
                ..
            } => {
                let speed = launch.speed(charge);
                let pellets = pellets.max(1);
                for _ in 0..pellets {
                    let pellet_angle = if pellets > 1 {
                        angle + self.rng.random_range(-spread..=spread)
                    } else {
                        angle
                    };
                    let mut p =
                        Projectile::new(Arc::clone(weapon), pos, vec_from_angle(pellet_angle) * speed, owner);
                    p.is_mine = mine_mode || mine.is_some();
                    self.projectiles.push(p);
                }
            }
        }
    }

    /// Instant swing: gouge a small disc out of the terrain ahead of the
    /// attacker, then direct-hit every non-owner actor inside range and
    /// within half the swing arc of the aim direction.
    #[allow(clippy::too_many_arguments)]
    fn fire_melee<A: Actor>(
        &mut self,
        terrain: &mut Terrain,
        weapon: &Arc<WeaponDef>,
        origin: Vec2,
        angle: f32,
        owner: usize,
        range: f32,
        arc: f32,
        actors: &[A],
    ) {
        let aim = vec_from_angle(angle);
        let gouge = self.wrapped_pos(origin + aim * range * MELEE_GOUGE_FRACTION);
        terrain.destroy_circle(
            gouge.x,
            gouge.y,
            MELEE_GOUGE_RADIUS * weapon.terrain_destruct,
            DETONATION_POWER,
        );

        for actor in actors {
            if actor.dead() || actor.index() == owner {
                continue;
            }
            let to = actor.center() - origin;
            let dist = to.length();
            if dist > range {
                continue;
            }
            let dir = to / dist.max(1e-3);
            let off_axis = dir.dot(aim).clamp(-1.0, 1.0).acos();
            if off_axis > arc * 0.5 {
                continue;
            }
            self.events.push(ExplosionEvent {
                pos: origin,
                weapon: Arc::clone(weapon),
                owner,
                radius: 0.0,
                damage: weapon.damage,
                knockback: weapon.knockback,
                direct_hit: Some(actor.index()),
            });
        }
    }

    /// Instant ray: fixed-step march until the first solid cell or
    /// non-owner actor, then detonate there. The tracer is cosmetic only.
    #[allow(clippy::too_many_arguments)]
    fn fire_hitscan<A: Actor>(
        &mut self,
        terrain: &mut Terrain,
        weapon: &Arc<WeaponDef>,
        origin: Vec2,
        angle: f32,
        owner: usize,
        max_dist: f32,
        actors: &[A],
    ) {
        let dir = vec_from_angle(angle);
        let steps = (max_dist / HITSCAN_STEP).ceil().max(1.0) as usize;
        let mut point = origin;
        let mut direct_hit = None;

        'march: for i in 1..=steps {
            point = origin + dir * (i as f32 * HITSCAN_STEP);
            if solid_at(terrain, self.wrap, self.world_w, point) {
                break;
            }
            for actor in actors {
                if actor.dead() || actor.index() == owner {
                    continue;
                }
                if actor.contains(point) {
                    direct_hit = Some(actor.index());
                    break 'march;
                }
            }
        }

        self.tracers.push(Tracer {
            from: origin,
            to: point,
            ttl: TRACER_TTL,
        });
        // The tracer keeps the unwrapped endpoint (the renderer draws the
        // ray as aimed); the impact itself wraps back in-world.
        let impact = self.wrapped_pos(point);
        self.detonate(terrain, weapon, impact, owner, direct_hit, false, false);
    }

    /// Advance all live projectiles by one tick. `dt` is clamped to
    /// `MAX_DT`; motion is normalized against the 60 Hz reference tick.
    /// Submunitions appended during this pass are first integrated next
    /// tick.
    pub fn update<A: Actor>(&mut self, terrain: &mut Terrain, dt: f32, actors: &[A]) {
        let dt = sanitize(dt, REFERENCE_DT).clamp(0.0, MAX_DT);
        let dt_factor = dt / REFERENCE_DT;

        // Dead entries from last tick's detonations drop here, before the
        // pass, so indices below stay stable while we append submunitions.
        self.projectiles.retain(|p| p.alive);
        let live = self.projectiles.len();

        for i in 0..live {
            let mut p = self.projectiles[i].clone();
            let weapon = Arc::clone(&p.weapon);

            // Landed mines: stationary; lifetime or proximity detonates.
            if p.landed {
                p.age += dt;
                let mine = mine_spec(&weapon);
                // No owner immunity: a mine arms against its layer too.
                let triggered = p.age >= mine.lifetime
                    || actors
                        .iter()
                        .any(|a| !a.dead() && a.center().distance(p.pos) < mine.proximity);
                if triggered {
                    p.alive = false;
                    let (pos, owner, is_sub) = (p.pos, p.owner, p.is_sub);
                    self.projectiles[i] = p;
                    self.detonate(terrain, &weapon, pos, owner, None, is_sub, true);
                } else {
                    self.projectiles[i] = p;
                }
                continue;
            }

            p.age += dt;

            // Integration: gravity, then position, then distance.
            p.vel.y += weapon.gravity_mult * GRAVITY * dt_factor * 10.0;
            let prev = p.pos;
            let step = p.vel * dt_factor;
            p.pos += step;
            p.traveled += step.length();

            // Bounds. Horizontal: wrap or cull. Vertical: always cull.
            if !self.wrap
                && (p.pos.x < -CULL_MARGIN || p.pos.x > self.world_w + CULL_MARGIN)
            {
                trace!("projectile culled horizontally at x={:.0}", p.pos.x);
                p.alive = false;
                self.projectiles[i] = p;
                continue;
            }
            if p.pos.y > self.world_h + CULL_BELOW || p.pos.y < -CULL_ABOVE {
                trace!("projectile culled vertically at y={:.0}", p.pos.y);
                p.alive = false;
                self.projectiles[i] = p;
                continue;
            }

            if let FireMode::Ballistic {
                max_range,
                fuse_time,
                bounce_budget,
                ..
            } = weapon.mode
            {
                // Max-range cull (short-range spread weapons): silent.
                if max_range > 0.0 && p.traveled > max_range {
                    p.alive = false;
                    self.projectiles[i] = p;
                    continue;
                }

                // Fuse: force-detonation independent of collision. The
                // position wraps first so a seam-crossing tick still
                // detonates in-world.
                if fuse_time > 0.0 && p.age >= fuse_time {
                    p.alive = false;
                    let (pos, owner, is_sub, is_mine) =
                        (self.wrapped_pos(p.pos), p.owner, p.is_sub, p.is_mine);
                    self.projectiles[i] = p;
                    self.detonate(terrain, &weapon, pos, owner, None, is_sub, is_mine);
                    continue;
                }

                // Terrain: ray-step from the previous position at integer-
                // pixel resolution; first solid cell is the contact point.
                if let Some(contact) = self.raycast_terrain(terrain, prev, p.pos) {
                    // Ray samples wrap per-step, so a seam-crossing contact
                    // comes back with an out-of-world x; wrap it before it
                    // becomes a landing or detonation position.
                    let contact = self.wrapped_pos(contact);
                    if p.is_mine {
                        // Mines land rather than detonate; lifetime counts
                        // from here.
                        p.pos = contact;
                        p.vel = Vec2::ZERO;
                        p.landed = true;
                        p.age = 0.0;
                        self.projectiles[i] = p;
                        continue;
                    }
                    if p.bounces < bounce_budget {
                        p.bounces += 1;
                        let wrap = self.wrap;
                        let world_w = self.world_w;
                        // Probe which axis the surface blocks; corners
                        // reflect both components.
                        let hit_x = solid_at(terrain, wrap, world_w, Vec2::new(contact.x, prev.y));
                        let hit_y = solid_at(terrain, wrap, world_w, Vec2::new(prev.x, contact.y));
                        if hit_x {
                            p.vel.x = -p.vel.x * BOUNCE_RESTITUTION;
                        }
                        if hit_y {
                            p.vel.y = -p.vel.y * BOUNCE_RESTITUTION;
                        }
                        if !hit_x && !hit_y {
                            p.vel = -p.vel * BOUNCE_RESTITUTION;
                        }
                        // Restore the pre-step position so the projectile
                        // never embeds in the surface.
                        p.pos = prev;
                        self.projectiles[i] = p;
                        continue;
                    }
                    p.pos = contact;
                    p.alive = false;
                    let (pos, owner, is_sub, is_mine) = (p.pos, p.owner, p.is_sub, p.is_mine);
                    self.projectiles[i] = p;
                    self.detonate(terrain, &weapon, pos, owner, None, is_sub, is_mine);
                    continue;
                }

                // Actors: AABB test; the owner is skipped during a short
                // post-fire grace window so point-blank launches don't
                // instantly self-hit. After the window, self-hits count.
                let wrapped = self.wrapped_pos(p.pos);
                let mut hit_actor = None;
                for actor in actors {
                    if actor.dead() {
                        continue;
                    }
                    if actor.index() == p.owner && p.age < SELF_HIT_GRACE {
                        continue;
                    }
                    if actor.contains(wrapped) {
                        hit_actor = Some(actor.index());
                        break;
                    }
                }
                if let Some(idx) = hit_actor {
                    p.alive = false;
                    let (pos, owner, is_sub, is_mine) = (wrapped, p.owner, p.is_sub, p.is_mine);
                    self.projectiles[i] = p;
                    self.detonate(terrain, &weapon, pos, owner, Some(idx), is_sub, is_mine);
                    continue;
                }
            }

            if self.wrap {
                p.pos.x = p.pos.x.rem_euclid(self.world_w);
            }
            self.projectiles[i] = p;
        }

        for t in &mut self.tracers {
            t.ttl -= dt;
        }
        self.tracers.retain(|t| t.ttl > 0.0);

        #[cfg(debug_assertions)]
        {
            self.phase = TickPhase::AwaitingDrain;
        }
    }

    /// First solid cell along prev -> pos, sampled at ~1 px spacing.
    fn raycast_terrain(&self, terrain: &Terrain, prev: Vec2, pos: Vec2) -> Option<Vec2> {
        let delta = pos - prev;
        let steps = delta.length().ceil().max(1.0) as i32;
        for s in 1..=steps {
            let sample = prev + delta * (s as f32 / steps as f32);
            if solid_at(terrain, self.wrap, self.world_w, sample) {
                return Some(sample);
            }
        }
        None
    }

    fn wrapped_pos(&self, pos: Vec2) -> Vec2 {
        if self.wrap {
            Vec2::new(pos.x.rem_euclid(self.world_w), pos.y)
        } else {
            pos
        }
    }

    /// Detonate at a point. Cluster parents split into submunitions and emit
    /// only a cosmetic puff; everything else destroys terrain and emits one
    /// explosion event.
    #[allow(clippy::too_many_arguments)]
    fn detonate(
        &mut self,
        terrain: &mut Terrain,
        weapon: &Arc<WeaponDef>,
        pos: Vec2,
        owner: usize,
        direct_hit: Option<usize>,
        is_sub: bool,
        is_mine: bool,
    ) {
        if let FireMode::Ballistic {
            cluster: Some(cluster),
            ..
        } = weapon.mode
            && !is_sub
        {
            debug!(
                "{} split into {} submunitions at ({:.0},{:.0})",
                weapon.name, cluster.count, pos.x, pos.y
            );
            self.events.push(ExplosionEvent {
                pos,
                weapon: Arc::clone(weapon),
                owner,
                radius: CLUSTER_PUFF_RADIUS,
                damage: 0.0,
                knockback: 0.0,
                direct_hit: None,
            });
            for _ in 0..cluster.count {
                let vx = self.rng.random_range(-cluster.spread..=cluster.spread);
                // Upward-biased scatter so submunitions fan out before
                // falling back down.
                let vy = -self.rng.random_range(cluster.spread * 0.5..=cluster.spread * 1.5);
                let mut sub = Projectile::new(
                    Arc::clone(weapon),
                    pos + Vec2::new(0.0, -1.0),
                    Vec2::new(vx, vy),
                    owner,
                );
                sub.is_sub = true;
                sub.is_mine = is_mine;
                self.projectiles.push(sub);
            }
            return;
        }

        let (radius, damage, destruct) = match weapon.mode {
            FireMode::Ballistic {
                cluster: Some(c), ..
            } if is_sub => (c.sub.blast_radius, c.sub.damage, c.sub.terrain_destruct),
            _ => (weapon.blast_radius, weapon.damage, weapon.terrain_destruct),
        };
        let knockback = weapon.knockback * if is_sub { SUB_KNOCKBACK_SCALE } else { 1.0 };

        terrain.destroy_circle(pos.x, pos.y, radius * destruct, DETONATION_POWER);
        trace!(
            "{} detonated at ({:.0},{:.0}) r={:.0}",
            weapon.name, pos.x, pos.y, radius
        );
        self.events.push(ExplosionEvent {
            pos,
            weapon: Arc::clone(weapon),
            owner,
            radius,
            damage,
            knockback,
            direct_hit,
        });
    }
}

/// Solidity probe that honors horizontal wrap.
fn solid_at(terrain: &Terrain, wrap: bool, world_w: f32, pos: Vec2) -> bool {
    let x = if wrap { pos.x.rem_euclid(world_w) } else { pos.x };
    terrain.is_solid_at(x, pos.y)
}

/// Mine parameters for a landed projectile, falling back to defaults when a
/// projectile was force-flagged as a mine on a weapon without a spec.
fn mine_spec(weapon: &WeaponDef) -> MineSpec {
    if let FireMode::Ballistic {
        mine: Some(spec), ..
    } = weapon.mode
    {
        spec
    } else {
        MineSpec {
            lifetime: MINE_DEFAULT_LIFETIME,
            proximity: MINE_DEFAULT_PROXIMITY,
        }
    }
}
