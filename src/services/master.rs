use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::model::{Collection, HttpResponse, Pagination};
use crate::query::QueryBuilderRequest;
use crate::services::error::{Error, RemoteFailure, Result};

/// Client of the master data service. Built once and shared; cloning shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct MasterClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MasterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build http client: {e}")))?;
        Ok(MasterClient {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn do_request<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{method} {url}");

        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let remote = |source: RemoteFailure| Error::RemoteCall {
            path: path.to_string(),
            source,
        };

        let response = request.send().await.map_err(|e| remote(e.into()))?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| remote(e.into()))?;

        if !status.is_success() {
            return Err(remote(RemoteFailure::Status {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }));
        }

        serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// `None` when the master service does not know the collection.
    pub async fn get_collection(
        &self,
        chain_id: i32,
        collection_id: &str,
    ) -> Result<Option<Collection>> {
        let path = format!("/chain/{chain_id}/collection/{collection_id}");
        match self
            .do_request::<(), HttpResponse<Collection>>(Method::GET, &path, None)
            .await
        {
            Ok(response) => Ok(Some(response.data)),
            Err(e) if e.remote_status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn query_assets<T: DeserializeOwned>(
        &self,
        request: &QueryBuilderRequest<'_>,
    ) -> Result<Pagination<T>> {
        let response: HttpResponse<Pagination<T>> = self
            .do_request(Method::POST, "/query-builder", Some(request))
            .await?;
        Ok(response.data)
    }
}
