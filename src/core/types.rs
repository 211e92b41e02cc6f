//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an in-progress craft owned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CraftId(pub Uuid);

impl CraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "craft-{}", self.0)
    }
}

/// Simulation turn counter (one turn is one second of game time)
pub type Tick = u64;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Item type identifier (key into the item template database)
    ItemTypeId
);
string_id!(
    /// Recipe identifier
    RecipeId
);
string_id!(
    /// Skill identifier, e.g. `fabrication` or `electronics`
    SkillId
);
string_id!(
    /// Character trait identifier, e.g. `HYPEROPIC`
    TraitId
);
string_id!(
    /// Tool quality identifier, e.g. `CUT` or `HAMMER`
    QualityId
);

/// Item mass in grams
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Mass(pub i64);

impl Mass {
    pub const ZERO: Mass = Mass(0);

    pub fn from_grams(grams: i64) -> Self {
        Self(grams)
    }

    pub fn from_kilograms(kg: i64) -> Self {
        Self(kg * 1000)
    }

    pub fn grams(self) -> i64 {
        self.0
    }
}

impl std::ops::Add for Mass {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Mul<i64> for Mass {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl std::iter::Sum for Mass {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Mass::ZERO, |a, b| a + b)
    }
}

/// Item volume in millilitres
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Volume(pub i64);

impl Volume {
    pub const ZERO: Volume = Volume(0);

    pub fn from_milliliters(ml: i64) -> Self {
        Self(ml)
    }

    pub fn from_liters(l: i64) -> Self {
        Self(l * 1000)
    }

    pub fn milliliters(self) -> i64 {
        self.0
    }
}

impl std::ops::Add for Volume {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Mul<i64> for Volume {
    type Output = Self;
    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl std::iter::Sum for Volume {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Volume::ZERO, |a, b| a + b)
    }
}

/// Map tile position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tripoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Tripoint {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance on the same z-level; different levels are never adjacent
    pub fn square_dist(&self, other: &Self) -> i32 {
        if self.z != other.z {
            return i32::MAX;
        }
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// All points within `radius`, ordered by distance (the point itself first)
    pub fn closest_points_first(&self, radius: i32) -> Vec<Tripoint> {
        let mut points = Vec::new();
        for ring in 0..=radius.max(0) {
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dy.abs()) == ring {
                        points.push(Tripoint::new(self.x + dx, self.y + dy, self.z));
                    }
                }
            }
        }
        points
    }
}

impl fmt::Display for Tripoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
