//! HTTP client for the directions proxy.
//!
//! The proxy fronts a commercial routing API and exposes two endpoints:
//! walking directions between two points, and the fixed geometry of a named
//! transit route. Coordinates go over the wire as `lon,lat`.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::trace;

use crate::domain::{Coordinate, LngLat, RouteId};

use super::error::ProviderError;
use super::types::{WalkDirections, parse_route_geometry, parse_walk_directions};

/// Default base URL for the directions proxy.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3001";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Base URL of the proxy
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a config pointing at the given proxy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }
}

/// Format a coordinate the way the proxy expects: `lon,lat`.
fn lon_lat_param(c: Coordinate) -> String {
    let p = LngLat::from(c);
    format!("{},{}", p.lon(), p.lat())
}

/// Directions proxy client.
///
/// Uses a semaphore to limit concurrent requests so a planning burst does
/// not overwhelm the upstream routing API.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl DirectionsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Issue a GET and return the body of a successful response.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, ProviderError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProviderError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        trace!(url, ?query, "directions request");
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NoRoute);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch walking directions from `from` to `to`.
    pub async fn walk_directions(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<WalkDirections, ProviderError> {
        let url = format!("{}/api/mapbox/directions/walk", self.base_url);
        let body = self
            .get_text(&url, &[("from", lon_lat_param(from)), ("to", lon_lat_param(to))])
            .await?;
        parse_walk_directions(&body)
    }

    /// Fetch the fixed polyline of a transit route.
    pub async fn route_geometry(&self, route_id: &RouteId) -> Result<Vec<LngLat>, ProviderError> {
        let url = format!("{}/api/mapbox/route", self.base_url);
        let body = self
            .get_text(&url, &[("routeId", route_id.as_str().to_string())])
            .await?;
        parse_route_geometry(&body)
    }
}
