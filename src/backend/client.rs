use crate::backend::fallback;
use crate::config::BackendConfig;
use crate::{Error, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// JSON client for the mock REST backend
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("Backend request: {} {}", method, url);
        self.client.request(method, url)
    }

    /// GET a resource.
    ///
    /// A transport failure on an endpoint with a built-in demo dataset returns
    /// that dataset instead of failing.
    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = match self.request(Method::GET, path).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Backend GET {} failed: {}", path, e);
                if let Some(data) = fallback::dataset_for(path) {
                    warn!("Backend not available, using fallback data for {}", path);
                    return Ok(serde_json::from_value(data)?);
                }
                return Err(Error::Http(e));
            }
        };

        let response = Self::check_status("GET", path, response)?;
        let data = response.json::<T>().await?;
        debug!("Backend GET success: {}", path);
        Ok(data)
    }

    /// POST a JSON body and decode the created record
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Backend POST {} failed: {}", path, e);
                Error::Http(e)
            })?;

        let response = Self::check_status("POST", path, response)?;
        Ok(response.json::<T>().await?)
    }

    /// PATCH a resource.
    ///
    /// Never fails: a rejected or unreachable PATCH is logged and yields `None`,
    /// so secondary updates cannot abort the flow that issued them.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Option<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = match self.request(Method::PATCH, path).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Backend PATCH {} failed: {}", path, e);
                return None;
            }
        };

        if !response.status().is_success() {
            error!("Backend PATCH {} failed: {}", path, response.status());
            return None;
        }

        match response.json::<T>().await {
            Ok(data) => {
                debug!("Backend PATCH success: {}", path);
                Some(data)
            }
            Err(e) => {
                error!("Backend PATCH {} returned an unreadable body: {}", path, e);
                None
            }
        }
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, path)
            .send()
            .await
            .map_err(|e| {
                error!("Backend DELETE {} failed: {}", path, e);
                Error::Http(e)
            })?;

        Self::check_status("DELETE", path, response)?;
        Ok(())
    }

    fn check_status(method: &str, path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            error!("Backend {} {} failed: {}", method, path, status);
            Err(Error::HttpStatus(status.as_u16()))
        }
    }
}
