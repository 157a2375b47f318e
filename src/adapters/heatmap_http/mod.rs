// Heatmap HTTP adapter - Scrapes Most Replayed markers from the watch page

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::heatmap::parse_markers;
use crate::ports::*;

const USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Heatmap source backed by a plain HTTPS page fetch
pub struct YoutubeHeatmapAdapter {
    client: reqwest::Client,
    base_url: String,
    max_duration: f64,
}

impl YoutubeHeatmapAdapter {
    /// Create new adapter capping segment durations at `max_duration`
    pub fn new(max_duration: f64, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_duration,
        })
    }

    /// Point the adapter at another host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn page_url(&self, video: &VideoId) -> String {
        format!("{}/watch?v={}", self.base_url, video.as_str())
    }

    /// Fetch the watch page document
    pub async fn fetch_page(&self, video: &VideoId) -> Result<String, DomainError> {
        let response = self
            .client
            .get(self.page_url(video))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| DomainError::Network(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| DomainError::Network(format!("Failed to read page body: {}", e)))
    }
}

#[async_trait]
impl HeatmapPort for YoutubeHeatmapAdapter {
    async fn fetch_engagement_segments(&self, video: &VideoId) -> Vec<HeatmapSegment> {
        info!(video = %video, "Reading heatmap data");

        let html = match self.fetch_page(video).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Heatmap unavailable: {}", e);
                return Vec::new();
            }
        };

        match parse_markers(&html, self.max_duration) {
            Ok(segments) => {
                info!(count = segments.len(), "Heatmap markers extracted");
                segments
            }
            Err(e) => {
                warn!("Heatmap unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
