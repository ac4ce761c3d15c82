use serde::{Deserialize, Serialize};
use failure::Fail;
use crate::layout::resize::resize_axle_list;

/// One editable axle row as supplied by a form or an import.
///
/// Axle order is defined solely by the position of the row in its list, any
/// `order` key present in the input is ignored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AxleConfigInput {
    pub name: String,
    pub tires_per_side: i64, // 1 = simple, 2 = dual, 3 = triple
}

impl AxleConfigInput {
    pub fn new<S: Into<String>>(name: S, tires_per_side: i64) -> AxleConfigInput {
        AxleConfigInput {
            name: name.into(),
            tires_per_side,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    pub axles: Vec<AxleConfigInput>,
}

impl Default for LayoutConfig {
    fn default() -> LayoutConfig {
        LayoutConfig {
            axles: resize_axle_list(&[], 2),
        }
    }
}

fn default_max_axles() -> usize {
    6
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    #[serde(default = "default_max_axles")]
    pub max_axles: usize, // Upper bound on axles accepted by the HTTP surface
}

impl Default for ServiceSettings {
    fn default() -> ServiceSettings {
        ServiceSettings {
            max_axles: default_max_axles(),
        }
    }
}

#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "requested {} axles but at most {} are allowed", count, max_axles)]
pub struct AxleLimitExceeded {
    pub count: usize,
    pub max_axles: usize,
}

impl ServiceSettings {
    pub fn check_axle_count(&self, count: usize) -> Result<(), AxleLimitExceeded> {
        if count > self.max_axles {
            return Err(AxleLimitExceeded {
                count,
                max_axles: self.max_axles,
            });
        }

        Ok(())
    }
}
