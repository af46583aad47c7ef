use crate::core::insight::{CategoryRow, HistoryRow, InsightProvider, SavingRow, SavingsSummary};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Insight provider talking to a flow server over HTTP.
///
/// Each insight is one flow: `POST {base_url}/{flow}` with `{"data": input}`,
/// answered by `{"result": output}`. Calls are made once, without retries.
pub struct FlowServerProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FlowServerProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("savr/0.1")
            .build()?;
        Ok(FlowServerProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn run_flow<I, O>(&self, flow: &str, input: &I) -> Result<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned + Send,
    {
        let url = format!("{}/{}", self.base_url, flow);
        debug!("Running flow at {}", url);

        let response = self
            .client
            .post(&url)
            .json(&FlowRequest { data: input })
            .send()
            .await
            .with_context(|| format!("Request error for flow {flow} at {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Flow {} failed with {}: {}", flow, status, body));
        }

        let body = response
            .json::<FlowResponse<O>>()
            .await
            .with_context(|| format!("Failed to parse response of flow {flow}"))?;
        Ok(body.result)
    }
}

#[derive(Serialize)]
struct FlowRequest<'a, I> {
    data: &'a I,
}

#[derive(Deserialize)]
struct FlowResponse<O> {
    result: O,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavingsInput<'a, R> {
    savings_data: &'a [R],
}

#[derive(Deserialize)]
struct Visualization {
    visualization: String,
}

#[async_trait]
impl InsightProvider for FlowServerProvider {
    #[instrument(name = "SummarizeSavings", skip_all, fields(rows = rows.len()))]
    async fn summarize(&self, rows: &[SavingRow]) -> Result<SavingsSummary> {
        self.run_flow("summarizeSavingsFlow", &SavingsInput { savings_data: rows })
            .await
    }

    #[instrument(name = "VisualizeHistory", skip_all, fields(rows = rows.len()))]
    async fn visualize_history(&self, rows: &[HistoryRow]) -> Result<String> {
        let output: Visualization = self
            .run_flow(
                "visualizeSavingHistoryFlow",
                &SavingsInput { savings_data: rows },
            )
            .await?;
        Ok(output.visualization)
    }

    #[instrument(name = "VisualizeCategories", skip_all, fields(rows = rows.len()))]
    async fn visualize_categories(&self, rows: &[CategoryRow]) -> Result<String> {
        let output: Visualization = self
            .run_flow(
                "visualizeSavingCategoriesFlow",
                &SavingsInput { savings_data: rows },
            )
            .await?;
        Ok(output.visualization)
    }
}
