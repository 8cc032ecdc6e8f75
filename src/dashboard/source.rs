use crate::dataset::Dataset;
use crate::telemetry::EquipmentProfile;
use serde::Serialize;
use std::sync::Arc;

/// Where the dashboard's data comes from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Live feed simulated for a connected equipment profile
    Hardware(EquipmentProfile),
    /// Replay of an uploaded, labeled dataset
    Dataset(Arc<Dataset>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Hardware,
    Dataset,
}

impl DataSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Hardware(_) => SourceKind::Hardware,
            Self::Dataset(_) => SourceKind::Dataset,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Hardware(profile) => profile.name.clone(),
            Self::Dataset(dataset) => format!("dataset ({} records)", dataset.len()),
        }
    }
}
