use crate::config::PredictionConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Remote model that labels an uploaded dataset file
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Upload `contents` as `file_name` and return the labeled records
    async fn predict(&self, file_name: &str, contents: Vec<u8>) -> Result<Dataset>;

    async fn predict_file(&self, path: &Path) -> Result<Dataset> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload")
            .to_string();
        self.predict(&file_name, contents).await
    }
}

/// `POST {api_base}/predict` with the file under multipart field `file`
pub struct HttpPredictionClient {
    client: reqwest::Client,
    api_base: String,
}

impl HttpPredictionClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    pub fn from_config(config: &PredictionConfig) -> Result<Self> {
        Self::new(config.api_base.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/predict", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, file_name: &str, contents: Vec<u8>) -> Result<Dataset> {
        let url = self.endpoint();
        let size = contents.len();
        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name.to_string()));

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, %status, "Prediction request rejected");
            let detail = if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body
            };
            return Err(Error::Prediction(detail));
        }

        let body: Value = response.json().await?;
        let dataset = Dataset::from_json_value(body)
            .map_err(|e| Error::Prediction(format!("unexpected response: {}", e)))?;

        info!(file = file_name, bytes = size, records = dataset.len(), "Prediction received");
        Ok(dataset)
    }
}
