//! Earth Engine REST client
//!
//! Minimal client for the `value:compute` endpoint of the Earth Engine REST API.

use super::{ExpressionBuilder, GeoService, ReductionRequest};
use crate::Result;
use crate::config::Config;
use crate::regions::Region;
use ohno::{IntoAppError, app_err};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;

/// Reply of `value:compute`.
#[derive(Debug, Deserialize)]
struct ComputeResponse {
    #[serde(default)]
    result: Value,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Earth Engine API client bound to one cloud project.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct EarthEngineClient {
    client: reqwest::Client,
    base_url: String,
    project: String,
    expressions: ExpressionBuilder,
}

impl EarthEngineClient {
    /// Create a client for `project`, authenticating with an OAuth access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the project id or token is blank, or the HTTP client cannot be built
    pub fn new(project: &str, access_token: &str, config: &Config) -> Result<Self> {
        let project = project.trim();
        if project.is_empty() {
            return Err(app_err!("Earth Engine project id must not be empty"));
        }

        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(app_err!("Earth Engine access token must not be empty"));
        }

        let mut auth_val = HeaderValue::from_str(&format!("Bearer {access_token}")).into_app_err("access token contains invalid characters")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);

        let client = reqwest::Client::builder()
            .user_agent(concat!("nightglow/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            project: project.to_string(),
            expressions: ExpressionBuilder::from_config(config),
        })
    }

    fn project_url(&self, method: &str) -> String {
        format!("{}/v1/projects/{}/{method}", self.base_url, self.project)
    }

    /// Check that the project exists and the credentials are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the API cannot be reached or rejects the project or token
    pub async fn verify(&self) -> Result<()> {
        let url = self.project_url("algorithms");
        log::debug!("verifying Earth Engine access via {url}");

        let resp = self.client.get(&url).send().await.into_app_err("contacting Earth Engine")?;
        if resp.status().is_success() {
            log::info!("Earth Engine project '{}' is ready", self.project);
            return Ok(());
        }

        Err(app_err!(
            "Earth Engine rejected project '{}': {}",
            self.project,
            describe_failure(resp).await
        ))
    }

    /// Evaluate an expression graph and return its `result` value.
    async fn compute(&self, body: &Value) -> Result<Value> {
        let url = self.project_url("value:compute");

        let resp = self.client.post(&url).json(body).send().await.into_app_err("contacting Earth Engine")?;
        if !resp.status().is_success() {
            return Err(app_err!("Earth Engine computation failed: {}", describe_failure(resp).await));
        }

        let reply: ComputeResponse = resp.json().await.into_app_err("decoding Earth Engine reply")?;
        Ok(reply.result)
    }
}

impl GeoService for EarthEngineClient {
    async fn reduce(&self, request: &ReductionRequest) -> Result<Option<f64>> {
        log::debug!("{} {} over {} at {} m", request.reducer, request.layer, request.region, request.scale_m);

        let value = self.compute(&self.expressions.reduction(request)).await?;
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| out_of_range(&n)),
            other => Err(app_err!("expected a number from Earth Engine, got {other}")),
        }
    }

    async fn area(&self, region: &Region) -> Result<f64> {
        log::debug!("area of {region}");

        match self.compute(&self.expressions.area(region)).await? {
            Value::Number(n) => n.as_f64().ok_or_else(|| out_of_range(&n)),
            other => Err(app_err!("expected a number from Earth Engine, got {other}")),
        }
    }
}

fn out_of_range(n: &serde_json::Number) -> ohno::AppError {
    app_err!("Earth Engine returned {n}, which does not fit in an f64")
}

/// Summarize a failed response, preferring the API's own error message.
async fn describe_failure(resp: reqwest::Response) -> String {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(ErrorResponse { error }) => {
            let code = error.code.unwrap_or_else(|| status.as_u16());
            match error.status {
                Some(s) => format!("{code} {s}: {}", error.message),
                None => format!("{code}: {}", error.message),
            }
        }
        Err(_) if text.trim().is_empty() => status.to_string(),
        Err(_) => format!("{status}: {}", text.trim()),
    }
}
