use serde::{Deserialize, Serialize};

use crate::{coords::Coordinates, error::LocationError};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
        }
    }
}

pub type LocateCallback = Box<dyn FnOnce(Result<Coordinates, LocationError>)>;

/// One-shot position lookup. `done` is invoked at most once, either with a
/// position or with the reason there is none (including the timeout).
pub trait Geolocator {
    fn locate(&self, options: &LocateOptions, done: LocateCallback);
}
