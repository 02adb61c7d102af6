//! HTTP client for the panel backend's dashboard API
//!
//! Endpoint map:
//! - `GET  /api/dashboard/stats/quick` -> StatsSnapshot
//! - `GET  /api/dashboard/stats?force=<bool>` -> FullStatsEnvelope (202 while
//!   the backend is still computing first-ever stats)
//! - `GET  /api/dashboard/live` -> LiveDetailSnapshot
//! - `GET/PUT /api/preferences/dashboard` -> PreferenceBundle

use super::{ PreferencesApi, StatsApi };
use crate::core::constants::HTTP_TIMEOUT_SECS;
use crate::core::{
    DashError,
    DashResult,
    FullStatsEnvelope,
    LiveDetailSnapshot,
    PreferenceBundle,
    StatsSnapshot,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpPanelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPanelClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> DashResult<Self> {
        if base_url.is_empty() {
            return Err(DashError::Config("Panel base URL is empty".to_string()));
        }

        let http = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| DashError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(key) = &self.api_key {
            req = req.header("X-Api-Key", key);
        }
        req
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DashResult<T> {
        let response = self
            .request(reqwest::Method::GET, path)
            .send().await
            .map_err(map_transport_error)?;

        // 202 = the backend accepted the request but has not finished its
        // first aggregation pass yet
        if response.status() == StatusCode::ACCEPTED {
            return Err(DashError::NotReady);
        }

        if !response.status().is_success() {
            return Err(DashError::Api { status: response.status().as_u16() });
        }

        response.json::<T>().await.map_err(map_transport_error)
    }
}

fn map_transport_error(e: reqwest::Error) -> DashError {
    if e.is_timeout() {
        DashError::Timeout { seconds: HTTP_TIMEOUT_SECS }
    } else if e.is_decode() {
        DashError::Network(format!("Malformed response body: {}", e))
    } else {
        DashError::Network(e.to_string())
    }
}

#[async_trait]
impl StatsApi for HttpPanelClient {
    async fn fetch_quick_stats(&self) -> DashResult<StatsSnapshot> {
        self.get_json("/api/dashboard/stats/quick").await
    }

    async fn fetch_full_stats(&self, force: bool) -> DashResult<FullStatsEnvelope> {
        let path = if force {
            "/api/dashboard/stats?force=true"
        } else {
            "/api/dashboard/stats?force=false"
        };
        self.get_json(path).await
    }

    async fn fetch_live_detail(&self) -> DashResult<LiveDetailSnapshot> {
        self.get_json("/api/dashboard/live").await
    }
}

#[async_trait]
impl PreferencesApi for HttpPanelClient {
    async fn fetch_preferences(&self) -> DashResult<Option<PreferenceBundle>> {
        match self.get_json::<PreferenceBundle>("/api/preferences/dashboard").await {
            Ok(bundle) => Ok(Some(bundle)),
            // Nothing saved yet for this user
            Err(DashError::Api { status: 404 }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save_preferences(&self, bundle: &PreferenceBundle) -> DashResult<()> {
        let response = self
            .request(reqwest::Method::PUT, "/api/preferences/dashboard")
            .json(bundle)
            .send().await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(DashError::Api { status: response.status().as_u16() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_base_url() {
        assert!(HttpPanelClient::new("", None).is_err());
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let client = HttpPanelClient::new("http://panel.local:3000/", None).unwrap();
        assert_eq!(
            client.url("/api/dashboard/stats/quick"),
            "http://panel.local:3000/api/dashboard/stats/quick"
        );
    }
}
