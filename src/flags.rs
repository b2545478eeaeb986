//! Result flag word and the flag/mask combiner
//!
//! Bit 0 marks pixels rejected by the valid-pixel expression. Each retrieval stage `s`
//! (1 = chlorophyll .. 4 = atmospheric correction) owns bit `2s-1` for an input range
//! failure and bit `2s` for an output range failure. Downstream mask expressions refer
//! to these bits by name, so names and values must not change.

use serde::Serialize;

use crate::catalog::RESULT_MASK_VALUE;
use crate::estimator::{EstimatorKind, RangeStatus};
use crate::sat_bands::{FLAG_BAND_NAME, L1_FLAGS};

pub const RESULT_FLAGS_NAME: &str = "result_flags";

pub const LEVEL1B_MASKED: u16 = 0x0001;

/// Name, description, value, colour (RGB) and transparency of every result flag
const RESULT_FLAGS: [(&str, &str, u16, [u8; 3], f32); 9] = [
    ("LEVEL1b_MASKED", "Pixel was a priori masked out", 0x0001, [0, 255, 255], 0.0),
    ("CHL_IN", "CHL retrieval failure (input)", 0x0002, [0, 255, 0], 0.5),
    ("CHL_OUT", "CHL retrieval failure (output)", 0x0004, [0, 255, 0], 0.5),
    ("YEL_IN", "YEL retrieval failure (input)", 0x0008, [255, 255, 0], 0.5),
    ("YEL_OUT", "YEL retrieval failure (output)", 0x0010, [255, 255, 0], 0.5),
    ("TSM_IN", "TSM retrieval failure (input)", 0x0020, [255, 200, 0], 0.5),
    ("TSM_OUT", "TSM retrieval failure (output)", 0x0040, [255, 200, 0], 0.5),
    ("ATM_IN", "Atmospheric correction failure (input)", 0x0080, [0, 0, 255], 0.5),
    ("ATM_OUT", "Atmospheric correction failure (output)", 0x0100, [0, 0, 255], 0.5),
];

/// Description and colour of each `l1_flags` bit, in `L1_FLAGS` order
const L1_FLAG_STYLE: [(&str, [u8; 3]); 8] = [
    ("Pixel is cosmetic", [204, 153, 255]),
    ("Pixel has been duplicated (filled in)", [153, 153, 255]),
    ("Pixel has glint risk", [255, 102, 0]),
    ("Pixel is suspect", [204, 102, 255]),
    ("Pixel is over land, not ocean", [51, 153, 0]),
    ("Pixel is bright", [255, 255, 255]),
    ("Pixel is part of a coastline", [0, 255, 0]),
    ("Pixel is invalid", [255, 0, 0]),
];

pub fn input_failure_flag(kind: EstimatorKind) -> u16 {
    1 << (2 * kind.stage_index() - 1)
}

pub fn output_failure_flag(kind: EstimatorKind) -> u16 {
    1 << (2 * kind.stage_index())
}

/// Flag bits a stage contributes for a given range status.
pub fn stage_flags(kind: EstimatorKind, status: RangeStatus) -> u16 {
    let mut flags = 0;
    if status.input_failed() {
        flags |= input_failure_flag(kind);
    }
    if status.output_failed() {
        flags |= output_failure_flag(kind);
    }
    flags
}

/// Combine the a-priori bit with the stage bits. A nonzero word replaces every
/// output value with [`RESULT_MASK_VALUE`].
pub fn combine(a_priori_valid: bool, stage_flags: u16, values: &mut [f32]) -> u16 {
    let mut flags = stage_flags;
    if !a_priori_valid {
        flags |= LEVEL1B_MASKED;
    }
    if flags != 0 {
        values.fill(RESULT_MASK_VALUE);
    }
    flags
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagDefinition {
    pub name: String,
    pub description: String,
    pub value: u16,
    pub color: [u8; 3],
    pub transparency: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagCoding {
    pub name: String,
    pub description: String,
    pub flags: Vec<FlagDefinition>,
}

impl FlagCoding {
    pub fn result_flags() -> Self {
        Self {
            name: RESULT_FLAGS_NAME.to_string(),
            description: "RESULT Flag Coding".to_string(),
            flags: RESULT_FLAGS
                .iter()
                .map(
                    |&(name, description, value, color, transparency)| FlagDefinition {
                        name: name.to_string(),
                        description: description.to_string(),
                        value,
                        color,
                        transparency,
                    },
                )
                .collect(),
        }
    }

    /// Coding of the Level 1b flag band passed through to the output product.
    pub fn l1_flags() -> Self {
        Self {
            name: FLAG_BAND_NAME.to_string(),
            description: "Level 1b Flag Coding".to_string(),
            flags: L1_FLAGS
                .iter()
                .zip(L1_FLAG_STYLE)
                .map(|(&(name, value), (description, color))| FlagDefinition {
                    name: name.to_string(),
                    description: description.to_string(),
                    value: value as u16,
                    color,
                    transparency: 0.5,
                })
                .collect(),
        }
    }

    pub fn value_of(&self, name: &str) -> Option<u16> {
        self.flags.iter().find(|f| f.name == name).map(|f| f.value)
    }

    /// Names of the flags set in `word`
    pub fn names_in(&self, word: u16) -> Vec<&str> {
        self.flags
            .iter()
            .filter(|f| word & f.value != 0)
            .map(|f| f.name.as_str())
            .collect()
    }
}
