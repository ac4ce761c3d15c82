use serde::{Deserialize, Serialize};
use failure::Fail;

pub mod diagram;
pub mod generator;
pub mod resize;

pub type Position = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Validated number of tires mounted on each side of an axle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Simple = 1,
    Dual = 2,
    Triple = 3,
}

impl Arrangement {
    pub fn from_tires_per_side(value: i64) -> Option<Arrangement> {
        match value {
            1 => Some(Arrangement::Simple),
            2 => Some(Arrangement::Dual),
            3 => Some(Arrangement::Triple),
            _ => None,
        }
    }

    pub fn tires_per_side(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            Arrangement::Simple => "simple",
            Arrangement::Dual => "dual",
            Arrangement::Triple => "triple",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tire {
    pub global_position: Position,
    pub axle_number: u32,
    pub side: Side,
    pub position_in_side: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axle {
    pub number: u32,
    pub name: String,
    pub tires_per_side: u32,
    pub tires: Vec<Tire>, // Left block first, then right block
}

impl Axle {
    pub fn arrangement(&self) -> Option<Arrangement> {
        Arrangement::from_tires_per_side(i64::from(self.tires_per_side))
    }

    pub fn left_tires(&self) -> impl DoubleEndedIterator<Item = &Tire> {
        self.tires_on(Side::Left)
    }

    pub fn right_tires(&self) -> impl DoubleEndedIterator<Item = &Tire> {
        self.tires_on(Side::Right)
    }

    fn tires_on(&self, side: Side) -> impl DoubleEndedIterator<Item = &Tire> {
        self.tires.iter().filter(move |tire| tire.side == side)
    }
}

/// Rejections raised while validating axle input, always before any tire is
/// emitted. Indices are 0-based positions in the input list.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[fail(display = "configuration has no axles")]
    EmptyConfiguration,
    #[fail(display = "axle {} has invalid tires per side \"{}\", expected 1, 2 or 3", axle_index, value)]
    InvalidTiresPerSide { axle_index: usize, value: i64 },
    #[fail(display = "axle {} has a blank name", axle_index)]
    InvalidAxleName { axle_index: usize },
}

impl LayoutError {
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::EmptyConfiguration => "EmptyConfiguration",
            LayoutError::InvalidTiresPerSide { .. } => "InvalidTiresPerSide",
            LayoutError::InvalidAxleName { .. } => "InvalidAxleName",
        }
    }

    pub fn axle_index(&self) -> Option<usize> {
        match self {
            LayoutError::EmptyConfiguration => None,
            LayoutError::InvalidTiresPerSide { axle_index, .. } => Some(*axle_index),
            LayoutError::InvalidAxleName { axle_index } => Some(*axle_index),
        }
    }
}
