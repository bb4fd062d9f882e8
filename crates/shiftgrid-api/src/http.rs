use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shiftgrid_core::config::ApiConfig;
use shiftgrid_core::{
    AssignmentId, AssignmentUpdate, OptimizeResponse, Period, PeriodId, ScheduleResponse,
    ShiftSlot, SlotValue, Staff,
};
use tracing::{debug, warn};

use crate::api::ScheduleApi;
use crate::error::{ApiError, Result};

/// Schedule server client over JSON/HTTP.
pub struct HttpScheduleApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScheduleApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the request and turn transport and status failures into [`ApiError`].
    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| {
                // Connection refused and timeouts mean "try again later", not a bad request.
                if e.is_connect() || e.is_timeout() {
                    ApiError::Unavailable(e.to_string())
                } else {
                    ApiError::Http(e)
                }
            })?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "schedule server error");
            return Err(ApiError::Status {
                status,
                message: text,
            });
        }
        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let resp = self.execute(self.client.get(self.url(path))).await?;
        Self::decode(resp).await
    }
}

#[async_trait]
impl ScheduleApi for HttpScheduleApi {
    async fn fetch_schedule(&self, period_id: PeriodId) -> Result<ScheduleResponse> {
        self.get_json(&format!("/api/schedules/{period_id}")).await
    }

    async fn update_assignment(
        &self,
        period_id: PeriodId,
        assignment_id: AssignmentId,
        value: SlotValue,
    ) -> Result<()> {
        let path = format!("/api/schedules/{period_id}/assignments/{assignment_id}");
        debug!(%path, %value, "PUT assignment");
        let body = AssignmentUpdate {
            shift_slot_id: value,
        };
        // The response echoes the row; only the status matters here, 204 included.
        let req = self
            .client
            .put(self.url(&path))
            .header("content-type", "application/json")
            .json(&body);
        self.execute(req).await?;
        Ok(())
    }

    async fn list_periods(&self) -> Result<Vec<Period>> {
        self.get_json("/api/schedules").await
    }

    async fn publish(&self, period_id: PeriodId) -> Result<Period> {
        let path = format!("/api/schedules/{period_id}/publish");
        let resp = self.execute(self.client.put(self.url(&path))).await?;
        Self::decode(resp).await
    }

    async fn optimize(&self, period_id: PeriodId) -> Result<OptimizeResponse> {
        let path = format!("/api/schedules/{period_id}/optimize");
        let resp = self.execute(self.client.post(self.url(&path))).await?;
        Self::decode(resp).await
    }

    async fn list_staff(&self) -> Result<Vec<Staff>> {
        self.get_json("/api/staff").await
    }

    async fn list_shift_slots(&self) -> Result<Vec<ShiftSlot>> {
        self.get_json("/api/shift-slots").await
    }
}
