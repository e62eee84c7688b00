use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Load state of a catalog that is fetched once per session.
#[derive(Clone, Debug, PartialEq)]
pub enum Resource<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Resource<T> {
    pub fn from_result(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err.message),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn status(&self) -> ResourceStatus {
        match self {
            Self::Loading => ResourceStatus::Loading,
            Self::Ready(_) => ResourceStatus::Ready,
            Self::Failed(_) => ResourceStatus::Failed,
        }
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::Loading
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatus {
    pub rates: ResourceStatus,
    pub extras: ResourceStatus,
    pub vehicles: ResourceStatus,
    pub commission: ResourceStatus,
}
