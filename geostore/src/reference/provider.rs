//! Reference dataset providers.

use std::fmt;
use std::future::Future;

use tracing::{debug, trace, warn};

use super::error::FetchError;
use super::features::{CityFeature, CountryFeature};
use super::geojson;
use crate::config::ReferenceConfig;

/// The reference datasets the cache tracks independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Countries,
    Cities,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Countries => write!(f, "countries"),
            DatasetKind::Cities => write!(f, "cities"),
        }
    }
}

/// Source of reference datasets.
///
/// Implementations fetch and parse a full dataset per call; caching and
/// request coalescing are layered on top by
/// [`ReferenceCache`](super::ReferenceCache).
pub trait ReferenceProvider: Send + Sync {
    /// Fetch every country feature, in dataset order.
    fn fetch_countries(
        &self,
    ) -> impl Future<Output = Result<Vec<CountryFeature>, FetchError>> + Send;

    /// Fetch every city feature, in dataset order.
    fn fetch_cities(&self) -> impl Future<Output = Result<Vec<CityFeature>, FetchError>> + Send;

    /// Advisory connectivity probe. A `true` result does not guarantee the
    /// next fetch succeeds.
    fn is_reachable(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }
}

/// User-Agent sent with dataset requests.
const USER_AGENT: &str = concat!("geostore/", env!("CARGO_PKG_VERSION"));

/// Downloads GeoJSON datasets over HTTP.
#[derive(Clone)]
pub struct HttpReferenceProvider {
    client: reqwest::Client,
    config: ReferenceConfig,
}

impl HttpReferenceProvider {
    /// Creates a provider using the URLs, timeout and locale in `config`.
    pub fn new(config: ReferenceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ReferenceConfig {
        &self.config
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(FetchError::Http(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))
    }
}

impl fmt::Debug for HttpReferenceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpReferenceProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl ReferenceProvider for HttpReferenceProvider {
    async fn fetch_countries(&self) -> Result<Vec<CountryFeature>, FetchError> {
        let text = self.get_text(self.config.countries_url()).await?;
        geojson::parse_countries(&text, self.config.locale())
    }

    async fn fetch_cities(&self) -> Result<Vec<CityFeature>, FetchError> {
        let text = self.get_text(self.config.cities_url()).await?;
        geojson::parse_cities(&text)
    }

    async fn is_reachable(&self) -> bool {
        match self.client.head(self.config.countries_url()).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Reference source unreachable");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_dataset_kind_display() {
        assert_eq!(DatasetKind::Countries.to_string(), "countries");
        assert_eq!(DatasetKind::Cities.to_string(), "cities");
    }

    #[test]
    fn test_http_provider_keeps_config() {
        let config = ReferenceConfig::new().with_timeout(Duration::from_secs(3));
        let provider = HttpReferenceProvider::new(config.clone()).unwrap();
        assert_eq!(provider.config(), &config);
    }

    #[tokio::test]
    async fn test_unreachable_source_is_http_error() {
        // Port 9 on loopback is the discard service, closed on test hosts
        let config = ReferenceConfig::new()
            .with_countries_url("http://127.0.0.1:9/countries.geojson")
            .with_timeout(Duration::from_secs(2));
        let provider = HttpReferenceProvider::new(config).unwrap();

        let err = provider.fetch_countries().await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(!provider.is_reachable().await);
    }
}
