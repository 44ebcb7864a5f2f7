//! Actor capability contract
//!
//! The minimal surface the core needs from the external player entity: an
//! AABB, liveness, a stable index, and damage/knockback mutators. Test
//! doubles implement it too (see `sim::testing`).

use glam::Vec2;

pub trait Actor {
    /// AABB min corner.
    fn pos(&self) -> Vec2;

    /// AABB extent.
    fn size(&self) -> Vec2;

    fn dead(&self) -> bool;

    /// Stable 0..N-1 index; explosion events tag direct hits with it.
    fn index(&self) -> usize;

    fn center(&self) -> Vec2 {
        self.pos() + self.size() * 0.5
    }

    fn take_damage(&mut self, amount: f32);

    /// Impulse directed away from `from`, with magnitude `force`. `radius`
    /// is the blast radius that produced it, for implementations that scale
    /// by proximity themselves.
    fn apply_knockback(&mut self, from: Vec2, force: f32, radius: f32);

    /// Point-in-AABB test used for projectile and hitscan collision.
    fn contains(&self, point: Vec2) -> bool {
        let p = self.pos();
        let s = self.size();
        point.x >= p.x && point.x <= p.x + s.x && point.y >= p.y && point.y <= p.y + s.y
    }
}
