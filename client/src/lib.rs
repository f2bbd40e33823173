//! Client for the remote calculation service.
//!
//! All arithmetic happens on the service. [`CalculationService`] is the seam
//! the engine talks to; [`HttpCalculationService`] is the production
//! implementation over `POST /api/calculate`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use abacus_types::{CalculationRequest, CalculationResponse, HealthStatus, MalformedResponse};

const CALCULATE_PATH: &str = "api/calculate";
const HEALTH_PATH: &str = "api/health";

/// Future returned by [`CalculationService::calculate`].
pub type CalcFut<'a> =
    Pin<Box<dyn Future<Output = Result<CalculationResponse, TransportError>> + Send + 'a>>;

/// The call could not produce a service verdict.
///
/// A `success: false` body is not a transport error; it arrives as
/// [`CalculationResponse::Failure`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid service URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("malformed response (HTTP {status}): {source}")]
    Malformed {
        status: u16,
        #[source]
        source: MalformedResponse,
    },
}

pub trait CalculationService: Send + Sync {
    fn calculate(&self, request: CalculationRequest) -> CalcFut<'_>;
}

#[derive(Debug, Clone)]
pub struct HttpCalculationService {
    client: reqwest::Client,
    calculate_url: Url,
    health_url: Url,
}

impl HttpCalculationService {
    /// Build a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be a base".to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let calculate_url = base
            .join(CALCULATE_PATH)
            .map_err(|e| invalid(e.to_string()))?;
        let health_url = base.join(HEALTH_PATH).map_err(|e| invalid(e.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            calculate_url,
            health_url,
        })
    }

    #[must_use]
    pub fn calculate_url(&self) -> &Url {
        &self.calculate_url
    }

    /// Probe `GET /api/health`.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(TransportError::Request)?
            .error_for_status()
            .map_err(TransportError::Request)?;
        response
            .json::<HealthStatus>()
            .await
            .map_err(TransportError::Request)
    }

    async fn post_calculation(
        &self,
        request: CalculationRequest,
    ) -> Result<CalculationResponse, TransportError> {
        tracing::debug!(operation = %request.operator(), "Sending calculation");
        let response = self
            .client
            .post(self.calculate_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(TransportError::Request)?;

        // Error statuses still carry a `{success: false, error}` body.
        let status = response.status().as_u16();
        let body = response.text().await.map_err(TransportError::Request)?;
        CalculationResponse::from_json(&body)
            .map_err(|source| TransportError::Malformed { status, source })
    }
}

impl CalculationService for HttpCalculationService {
    fn calculate(&self, request: CalculationRequest) -> CalcFut<'_> {
        Box::pin(self.post_calculation(request))
    }
}
