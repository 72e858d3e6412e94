//! Block positions and their canonical string keys.
//!
//! A position is encoded as `<world>_<x>_<y>_<z>`. World names may contain
//! underscores, so decoding always takes the rightmost three tokens as the
//! coordinates and everything before them as the world. A world name that
//! itself ends in `_<digits>` is therefore ambiguous with a shorter name:
//! `a_1_2_3_4` decodes as world `a_1` at `(2, 3, 4)`.

use crate::world::WorldDirectory;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Largest coordinate magnitude a key can carry.
pub const MAX_COORD: i32 = 999_999_999;

/// Signed integer of at most nine digits, so every match fits in an `i32`.
static COORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]{1,9}$").expect("coordinate pattern is valid"));

/// Block-granularity location within a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPosition {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Position of the block containing the given entity coordinates.
    ///
    /// Offsets are floored, so `-0.5` lands in block `-1`.
    pub fn from_coords(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self::new(
            world,
            x.floor() as i32,
            y.floor() as i32,
            z.floor() as i32,
        )
    }

    /// Canonical key used for the location index and in owner files.
    pub fn key(&self) -> String {
        canonical_key(self)
    }

    /// Whether the key for this position decodes back to it.
    ///
    /// False for an empty world or a coordinate beyond [`MAX_COORD`].
    pub fn is_storable(&self) -> bool {
        let range = -MAX_COORD..=MAX_COORD;
        !self.world.is_empty() && [self.x, self.y, self.z].iter().all(|c| range.contains(c))
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

/// Encode a position as `<world>_<x>_<y>_<z>`.
pub fn canonical_key(position: &BlockPosition) -> String {
    format!(
        "{}_{}_{}_{}",
        position.world, position.x, position.y, position.z
    )
}

/// Split a key into its parts without checking that the world exists.
///
/// Returns `None` for fewer than four tokens, an empty world name, or
/// coordinates that are not signed integers of at most nine digits.
pub fn parse_key_parts(key: &str) -> Option<BlockPosition> {
    let mut parts = key.rsplitn(4, '_');
    let z = parts.next()?;
    let y = parts.next()?;
    let x = parts.next()?;
    let world = parts.next()?;

    if world.is_empty() {
        return None;
    }

    Some(BlockPosition::new(
        world,
        parse_coord(x)?,
        parse_coord(y)?,
        parse_coord(z)?,
    ))
}

/// Decode a key, rejecting worlds the directory does not know.
pub fn parse_key(key: &str, worlds: &dyn WorldDirectory) -> Option<BlockPosition> {
    parse_key_parts(key).filter(|position| worlds.world_exists(&position.world))
}

fn parse_coord(token: &str) -> Option<i32> {
    if !COORD_RE.is_match(token) {
        return None;
    }
    token.parse().ok()
}
