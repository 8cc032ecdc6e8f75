use crate::config::AppConfig;
use crate::dashboard::{Dashboard, DataSource};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::prediction::PredictionService;
use crate::telemetry::{equipment, EquipmentProfile};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Application-wide state shared by the views: which equipment is connected
/// and which dataset was uploaded. Views receive it by reference; only the
/// owner mutates it.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    config: AppConfig,
    connection: Option<EquipmentProfile>,
    dataset: Option<Arc<Dataset>>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            connection: None,
            dataset: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn connect(&mut self, equipment_id: &str) -> Result<&EquipmentProfile> {
        let profile = equipment::find(equipment_id)?;
        info!(equipment = %profile.id, channels = profile.channels.len(), "Hardware connected");
        Ok(&*self.connection.insert(profile))
    }

    pub fn disconnect(&mut self) {
        if let Some(profile) = self.connection.take() {
            info!(equipment = %profile.id, "Hardware disconnected");
        }
    }

    pub fn connection(&self) -> Option<&EquipmentProfile> {
        self.connection.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn set_dataset(&mut self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        self.dataset = Some(dataset.clone());
        dataset
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn clear_dataset(&mut self) {
        self.dataset = None;
    }

    /// Send a file through the prediction service and keep the labeled result.
    /// On failure the context is left untouched.
    pub async fn upload(
        &mut self,
        service: &dyn PredictionService,
        path: &Path,
    ) -> Result<Arc<Dataset>> {
        match service.predict_file(path).await {
            Ok(dataset) => Ok(self.set_dataset(dataset)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Upload failed");
                Err(e)
            }
        }
    }

    /// An uploaded dataset wins over a hardware connection
    pub fn data_source(&self) -> Option<DataSource> {
        if let Some(dataset) = &self.dataset {
            return Some(DataSource::Dataset(dataset.clone()));
        }
        self.connection.clone().map(DataSource::Hardware)
    }

    /// Build the dashboard for the current source, if any
    pub fn open_dashboard(&self) -> Option<Dashboard> {
        self.data_source()
            .map(|source| Dashboard::new(source, &self.config))
    }
}
