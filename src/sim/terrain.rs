//! Destructible material grid
//!
//! A width x height grid of materials mutated in place by explosions. The
//! external map generator paints it via `clear`/`set`; the external renderer
//! watches the `dirty` flag and rebuilds its visual once per change batch.
//!
//! Craters are material-aware: blast power decays toward the rim, so soft
//! materials clear further out than hard ones at equal power.

use serde::{Deserialize, Serialize};

use crate::sanitize;

/// Per-cell terrain material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Air,
    Dirt,
    Rock,
    Grass,
    Sand,
    Brick,
    Lava,
    Snow,
}

impl Material {
    /// Destruction threshold: an explosion's effective power must meet or
    /// exceed this to clear the cell.
    pub fn resistance(self) -> f32 {
        match self {
            Material::Air => 0.0,
            Material::Snow => 0.6,
            Material::Sand => 0.8,
            Material::Grass => 1.0,
            Material::Dirt => 1.2,
            Material::Brick => 2.0,
            Material::Rock => 2.5,
            // Indestructible hazard, also non-solid
            Material::Lava => f32::INFINITY,
        }
    }

    /// Solid materials block projectiles and actors. Air and Lava do not.
    pub fn is_solid(self) -> bool {
        !matches!(self, Material::Air | Material::Lava)
    }

    pub const ALL: [Material; 8] = [
        Material::Air,
        Material::Dirt,
        Material::Rock,
        Material::Grass,
        Material::Sand,
        Material::Brick,
        Material::Lava,
        Material::Snow,
    ];
}

/// The per-cell terrain composition array.
///
/// Allocated once per match; `clear` + `set` repaint it at round start.
/// Out-of-range queries resolve to Air rather than failing.
#[derive(Debug, Clone)]
pub struct Terrain {
    width: usize,
    height: usize,
    cells: Vec<Material>,
    dirty: bool,
}

impl Terrain {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Material::Air; width * height],
            dirty: true,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True after any mutation; the external renderer clears it with
    /// `mark_clean` once it has rebuilt its representation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Material at a cell; out-of-bounds reads as Air.
    pub fn get(&self, x: i32, y: i32) -> Material {
        self.index(x, y).map_or(Material::Air, |i| self.cells[i])
    }

    /// Paint a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, mat: Material) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = mat;
            self.dirty = true;
        }
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_solid()
    }

    pub fn is_lava(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Material::Lava
    }

    /// Solidity at a continuous point (floored to the containing cell).
    pub fn is_solid_at(&self, x: f32, y: f32) -> bool {
        self.is_solid(x.floor() as i32, y.floor() as i32)
    }

    /// Reset every cell to Air (round restart, before repainting).
    pub fn clear(&mut self) {
        self.cells.fill(Material::Air);
        self.dirty = true;
    }

    /// Clear cells within `radius` of the center whose resistance yields to
    /// the blast. Power decays linearly from 100% at the center to 40% at
    /// the rim, so the crater shape tracks local material composition.
    /// Lava never yields. Returns the number of cells cleared.
    pub fn destroy_circle(&mut self, cx: f32, cy: f32, radius: f32, power: f32) -> usize {
        let cx = sanitize(cx, 0.0);
        let cy = sanitize(cy, 0.0);
        let radius = sanitize(radius, 0.0).max(0.0);
        let power = sanitize(power, 0.0);
        if radius <= 0.0 || power <= 0.0 {
            return 0;
        }

        let min_x = (cx - radius).floor() as i32;
        let max_x = (cx + radius).ceil() as i32;
        let min_y = (cy - radius).floor() as i32;
        let max_y = (cy + radius).ceil() as i32;

        let mut destroyed = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let Some(i) = self.index(x, y) else { continue };
                let mat = self.cells[i];
                if mat == Material::Air || mat == Material::Lava {
                    continue;
                }
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > radius {
                    continue;
                }
                let f = dist / radius;
                let effective_power = power * (1.0 - 0.6 * f);
                if effective_power >= mat.resistance() {
                    self.cells[i] = Material::Air;
                    destroyed += 1;
                }
            }
        }

        if destroyed > 0 {
            self.dirty = true;
        }
        destroyed
    }

    /// Topmost solid row in a column, or the grid height if the column has
    /// no solid cell (spawn placement helper for the host).
    pub fn surface_y(&self, x: i32) -> usize {
        for y in 0..self.height {
            if self.is_solid(x, y as i32) {
                return y;
            }
        }
        self.height
    }

    /// Edge-sampled AABB-vs-terrain overlap test: samples the rectangle's
    /// perimeter at roughly one-pixel spacing.
    pub fn rect_collides(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        let steps_x = w.ceil().max(1.0) as i32;
        let steps_y = h.ceil().max(1.0) as i32;
        for i in 0..=steps_x {
            let sx = x + w * i as f32 / steps_x as f32;
            if self.is_solid_at(sx, y) || self.is_solid_at(sx, y + h) {
                return true;
            }
        }
        for i in 0..=steps_y {
            let sy = y + h * i as f32 / steps_y as f32;
            if self.is_solid_at(x, sy) || self.is_solid_at(x + w, sy) {
                return true;
            }
        }
        false
    }
}
