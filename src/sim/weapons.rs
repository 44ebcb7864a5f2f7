//! Weapon descriptors
//!
//! Static, shared, read-only records describing how a weapon fires and
//! detonates. Many live projectiles reference the same descriptor through an
//! `Arc`; nothing here mutates at runtime.
//!
//! Firing behavior is an explicit tagged variant rather than a pile of
//! booleans, so a new mode is a compile error everywhere it matters.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::lerp;

/// How launch speed is determined at fire time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LaunchSpeed {
    Fixed(f32),
    /// Charge-scaled: lerps min..max with the charge fraction. The input
    /// layer converts held time to a fraction using `max_charge_time`.
    Charged {
        min: f32,
        max: f32,
        max_charge_time: f32,
    },
}

impl LaunchSpeed {
    pub fn speed(self, charge: f32) -> f32 {
        match self {
            LaunchSpeed::Fixed(s) => s,
            LaunchSpeed::Charged { min, max, .. } => lerp(min, max, charge.clamp(0.0, 1.0)),
        }
    }
}

/// Stat overrides for cluster submunitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubStats {
    pub damage: f32,
    pub blast_radius: f32,
    pub terrain_destruct: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterSpec {
    /// Submunitions spawned when the parent detonates.
    pub count: u32,
    /// Horizontal scatter speed range (px per reference tick).
    pub spread: f32,
    pub sub: SubStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MineSpec {
    /// Seconds a landed mine stays armed before force-detonating.
    pub lifetime: f32,
    /// Trigger distance to any live actor center, the owner included.
    pub proximity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FireMode {
    /// Traveling projectile(s) under gravity.
    Ballistic {
        launch: LaunchSpeed,
        /// Projectiles per shot; > 1 applies angular spread per pellet.
        #[serde(default = "default_pellets")]
        pellets: u32,
        /// Half-width of the uniform spread cone (radians).
        #[serde(default)]
        spread: f32,
        /// Terrain bounces before the projectile detonates on contact.
        #[serde(default)]
        bounce_budget: u32,
        /// Force-detonation age in seconds; 0 disables the fuse.
        #[serde(default)]
        fuse_time: f32,
        /// Cull distance in px of travel; 0 means unlimited.
        #[serde(default)]
        max_range: f32,
        #[serde(default)]
        cluster: Option<ClusterSpec>,
        #[serde(default)]
        mine: Option<MineSpec>,
    },
    /// Instant ray resolved inside `fire`; no projectile object.
    Hitscan { max_dist: f32 },
    /// Instant close-range swing resolved inside `fire`.
    Melee {
        range: f32,
        /// Full angular width of the swing (radians).
        arc: f32,
    },
}

fn default_pellets() -> u32 {
    1
}

/// Static weapon descriptor. See module docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub name: String,
    /// Base damage before falloff.
    pub damage: f32,
    /// Distance within which an explosion applies falloff-scaled damage.
    pub blast_radius: f32,
    /// Scalar converting blast radius into destructible terrain radius.
    pub terrain_destruct: f32,
    /// Multiplier on global gravity; 0 flies flat.
    pub gravity_mult: f32,
    /// Knockback magnitude before falloff.
    pub knockback: f32,
    /// Seconds between shots. Scheduling belongs to the input layer; the
    /// core only carries the value.
    pub cooldown: f32,
    pub mode: FireMode,
}

/// Built-in weapon table plus the JSON loader for data-driven tuning.
pub mod arsenal {
    use super::*;

    /// Parse a weapon table from JSON. Descriptors are trusted static data;
    /// this is the one fallible entry point in the crate.
    pub fn load_table(json: &str) -> Result<Vec<WeaponDef>, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn rocket_launcher() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "rocket launcher".into(),
            damage: 35.0,
            blast_radius: 40.0,
            terrain_destruct: 1.0,
            gravity_mult: 0.4,
            knockback: 8.0,
            cooldown: 1.2,
            mode: FireMode::Ballistic {
                launch: LaunchSpeed::Fixed(11.0),
                pellets: 1,
                spread: 0.0,
                bounce_budget: 0,
                fuse_time: 0.0,
                max_range: 0.0,
                cluster: None,
                mine: None,
            },
        })
    }

    pub fn grenade() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "grenade".into(),
            damage: 30.0,
            blast_radius: 35.0,
            terrain_destruct: 1.0,
            gravity_mult: 1.0,
            knockback: 7.0,
            cooldown: 1.0,
            mode: FireMode::Ballistic {
                launch: LaunchSpeed::Charged {
                    min: 4.0,
                    max: 12.0,
                    max_charge_time: 1.2,
                },
                pellets: 1,
                spread: 0.0,
                bounce_budget: 3,
                fuse_time: 2.5,
                max_range: 0.0,
                cluster: None,
                mine: None,
            },
        })
    }

    pub fn scatter_gun() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "scatter gun".into(),
            damage: 8.0,
            blast_radius: 10.0,
            terrain_destruct: 0.5,
            gravity_mult: 0.15,
            knockback: 3.0,
            cooldown: 0.9,
            mode: FireMode::Ballistic {
                launch: LaunchSpeed::Fixed(14.0),
                pellets: 6,
                spread: 0.18,
                bounce_budget: 0,
                fuse_time: 0.0,
                max_range: 180.0,
                cluster: None,
                mine: None,
            },
        })
    }

    pub fn rail_rifle() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "rail rifle".into(),
            damage: 25.0,
            blast_radius: 8.0,
            terrain_destruct: 0.5,
            gravity_mult: 0.0,
            knockback: 5.0,
            cooldown: 1.5,
            mode: FireMode::Hitscan { max_dist: 900.0 },
        })
    }

    pub fn breaker_blade() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "breaker blade".into(),
            damage: 20.0,
            blast_radius: 0.0,
            terrain_destruct: 1.0,
            gravity_mult: 0.0,
            knockback: 6.0,
            cooldown: 0.5,
            mode: FireMode::Melee {
                range: 28.0,
                arc: 1.2,
            },
        })
    }

    pub fn cluster_bomb() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "cluster bomb".into(),
            damage: 20.0,
            blast_radius: 30.0,
            terrain_destruct: 1.0,
            gravity_mult: 0.9,
            knockback: 6.0,
            cooldown: 1.8,
            mode: FireMode::Ballistic {
                launch: LaunchSpeed::Fixed(9.0),
                pellets: 1,
                spread: 0.0,
                bounce_budget: 0,
                fuse_time: 2.0,
                max_range: 0.0,
                cluster: Some(ClusterSpec {
                    count: 5,
                    spread: 3.0,
                    sub: SubStats {
                        damage: 12.0,
                        blast_radius: 18.0,
                        terrain_destruct: 0.8,
                    },
                }),
                mine: None,
            },
        })
    }

    pub fn mine_layer() -> Arc<WeaponDef> {
        Arc::new(WeaponDef {
            name: "mine layer".into(),
            damage: 40.0,
            blast_radius: 32.0,
            terrain_destruct: 1.0,
            gravity_mult: 1.0,
            knockback: 9.0,
            cooldown: 2.0,
            mode: FireMode::Ballistic {
                launch: LaunchSpeed::Fixed(7.0),
                pellets: 1,
                spread: 0.0,
                bounce_budget: 0,
                fuse_time: 0.0,
                max_range: 0.0,
                cluster: None,
                mine: Some(MineSpec {
                    lifetime: 30.0,
                    proximity: 22.0,
                }),
            },
        })
    }

    /// Every built-in descriptor (host-facing convenience).
    pub fn all() -> Vec<Arc<WeaponDef>> {
        vec![
            rocket_launcher(),
            grenade(),
            scatter_gun(),
            rail_rifle(),
            breaker_blade(),
            cluster_bomb(),
            mine_layer(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_speed_endpoints() {
        let charged = LaunchSpeed::Charged {
            min: 4.0,
            max: 12.0,
            max_charge_time: 1.0,
        };
        assert_eq!(charged.speed(0.0), 4.0);
        assert_eq!(charged.speed(1.0), 12.0);
        assert_eq!(charged.speed(0.5), 8.0);
        // Out-of-range charge clamps
        assert_eq!(charged.speed(-1.0), 4.0);
        assert_eq!(charged.speed(2.0), 12.0);
        assert_eq!(LaunchSpeed::Fixed(9.0).speed(0.3), 9.0);
    }

    #[test]
    fn test_arsenal_table_roundtrips_through_json() {
        let defs: Vec<WeaponDef> = arsenal::all().iter().map(|w| (**w).clone()).collect();
        let json = serde_json::to_string(&defs).unwrap();
        let loaded = arsenal::load_table(&json).unwrap();
        assert_eq!(loaded, defs);
    }

    #[test]
    fn test_load_table_defaults_optional_fields() {
        let json = r#"[{
            "name": "pea shooter",
            "damage": 5.0,
            "blast_radius": 6.0,
            "terrain_destruct": 0.5,
            "gravity_mult": 0.2,
            "knockback": 1.0,
            "cooldown": 0.2,
            "mode": { "Ballistic": { "launch": { "Fixed": 10.0 } } }
        }]"#;
        let defs = arsenal::load_table(json).unwrap();
        let FireMode::Ballistic {
            pellets,
            spread,
            bounce_budget,
            fuse_time,
            max_range,
            cluster,
            mine,
            ..
        } = defs[0].mode
        else {
            panic!("expected ballistic mode");
        };
        assert_eq!(pellets, 1);
        assert_eq!(spread, 0.0);
        assert_eq!(bounce_budget, 0);
        assert_eq!(fuse_time, 0.0);
        assert_eq!(max_range, 0.0);
        assert!(cluster.is_none());
        assert!(mine.is_none());
    }

    #[test]
    fn test_load_table_rejects_garbage() {
        assert!(arsenal::load_table("not json").is_err());
    }
}
