use super::{OptionCategory, PredictionBackend, PredictionRequest, PredictionResponse, StageLabelResponse};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

const PREDICT_PATH: &str = "predict_treatment";
const STAGE_LABEL_PATH: &str = "get_stage_label";

/// [`PredictionBackend`] talking to the Flask prediction service over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends the request and decodes a JSON body, rejecting non-success statuses.
    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(|e| ClientError::decode(e.to_string()))
    }
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    warn!(status = status.as_u16(), "Prediction service returned an error status");
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PredictionBackend for HttpBackend {
    #[instrument(skip(self, request), fields(stage = request.ajcc_pathologic_stage))]
    async fn predict(&self, request: &PredictionRequest) -> ClientResult<String> {
        let url = self.config.endpoint(PREDICT_PATH)?;
        let response: PredictionResponse = self.fetch_json(self.client.post(url).form(request)).await?;
        let prediction = response.into_result()?;
        debug!(prediction = %prediction, "Prediction received");
        Ok(prediction)
    }

    #[instrument(skip(self))]
    async fn option_list(&self, category: OptionCategory) -> ClientResult<Vec<String>> {
        let url = self.config.endpoint(category.path())?;
        let body: serde_json::Value = self.fetch_json(self.client.get(url)).await?;
        let options = category.extract(body)?;
        debug!(count = options.len(), "Option list received");
        Ok(options)
    }

    #[instrument(skip(self))]
    async fn stage_label(&self, stage: i32) -> ClientResult<String> {
        let url = self.config.endpoint(STAGE_LABEL_PATH)?;
        let response: StageLabelResponse = self
            .fetch_json(self.client.get(url).query(&[("stage", stage)]))
            .await?;
        response.into_result()
    }
}
