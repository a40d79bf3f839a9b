use async_trait::async_trait;

use super::NutritionRecord;
use crate::NutritionSource;
use crate::error::LookupError;

const API_URL: &str = "https://api.api-ninjas.com/v1/nutrition";

/// Client for the api-ninjas nutrition lookup service.
///
/// One GET per lookup, no retries and no caching. An empty result set is a
/// valid answer ("unknown food"); only non-success statuses are failures.
pub struct NutritionClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl NutritionClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_url: API_URL.to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NutritionSource for NutritionClient {
    async fn lookup(&self, query: &str) -> Result<Vec<NutritionRecord>, LookupError> {
        tracing::debug!(%query, "querying nutrition service");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("query", query)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!(status = status.as_u16(), "nutrition service rejected the lookup");
            return Err(LookupError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
