//! Firebase Storage client
//!
//! Uploads go to `POST {base}/v0/b/{bucket}/o?uploadType=media&name={path}`
//! authorised with the uploader's id token. The returned download URL is the
//! object URL with `alt=media` and the object's download token.

use classifieds_common::create_client;
use classifieds_common::http::client::DEFAULT_TIMEOUT_SECS;
use classifieds_common::models::Session;
use classifieds_common::services::{BoxFuture, ObjectStorage};
use classifieds_config::FirebaseConfig;
use reqwest::{header, Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::FirebaseError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    download_tokens: Option<String>,
}

/// Client for uploading objects to a Firebase Storage bucket
#[derive(Debug, Clone)]
pub struct FirebaseStorageClient {
    client: Client,
    base_url: String,
    bucket: String,
}

impl FirebaseStorageClient {
    /// Creates a storage client for the configured bucket
    ///
    /// # Errors
    ///
    /// Fails when no storage bucket is configured.
    pub fn new(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        let bucket = config
            .storage_bucket
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                FirebaseError::ConfigError("Missing storage_bucket in FirebaseConfig".to_string())
            })?;

        Ok(Self {
            client: create_client(DEFAULT_TIMEOUT_SECS)?,
            base_url: config.storage_base_url.clone(),
            bucket,
        })
    }

    /// `{base}/v0/b/{bucket}/o` followed by `extra` path segments, each
    /// percent-encoded as a single segment.
    fn object_url(&self, extra: Option<&str>) -> Result<Url, FirebaseError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| FirebaseError::UrlError(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| FirebaseError::UrlError(self.base_url.clone()))?;
            segments
                .pop_if_empty()
                .extend(["v0", "b", self.bucket.as_str(), "o"]);
            if let Some(name) = extra {
                segments.push(name);
            }
        }
        Ok(url)
    }

    /// Upload `bytes` to `path` and return the object's download URL.
    pub async fn upload_object(
        &self,
        id_token: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, FirebaseError> {
        let mut upload_url = self.object_url(None)?;
        upload_url
            .query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", path);

        debug!("Uploading {} bytes to {}", bytes.len(), path);
        let response = self
            .client
            .post(upload_url)
            .header(header::AUTHORIZATION, format!("Firebase {}", id_token))
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(FirebaseError::StorageApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        let mut download_url = self.object_url(Some(&uploaded.name))?;
        {
            let mut query = download_url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = uploaded
                .download_tokens
                .as_deref()
                .and_then(|tokens| tokens.split(',').next())
            {
                query.append_pair("token", token);
            }
        }

        info!("Uploaded object {}", uploaded.name);
        Ok(download_url.to_string())
    }
}

impl ObjectStorage for FirebaseStorageClient {
    type Error = FirebaseError;

    fn upload(
        &self,
        session: &Session,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BoxFuture<'_, String, Self::Error> {
        let id_token = session.id_token.clone();
        let (path, content_type) = (path.to_string(), content_type.to_string());
        Box::pin(async move {
            self.upload_object(&id_token, &path, bytes, &content_type)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header as header_eq, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base: &str, bucket: Option<&str>) -> FirebaseConfig {
        FirebaseConfig {
            api_key: "k".to_string(),
            project_id: None,
            storage_bucket: bucket.map(str::to_string),
            auth_base_url: base.to_string(),
            storage_base_url: base.to_string(),
        }
    }

    #[test]
    fn test_bucket_is_required() {
        let err = FirebaseStorageClient::new(&config("http://localhost", None)).unwrap_err();
        assert!(matches!(err, FirebaseError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_upload_returns_download_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v0/b/app.appspot.com/o"))
            .and(query_param("uploadType", "media"))
            .and(query_param("name", "ads/1700000000000"))
            .and(header_eq("authorization", "Firebase id-token-1"))
            .and(header_eq("content-type", "image/jpeg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "ads/1700000000000",
                "bucket": "app.appspot.com",
                "downloadTokens": "tok-123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            FirebaseStorageClient::new(&config(&server.uri(), Some("app.appspot.com"))).unwrap();
        let session = Session {
            user_id: "u1".to_string(),
            email: None,
            id_token: "id-token-1".to_string(),
        };

        let url = client
            .upload(&session, "ads/1700000000000", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();

        assert_eq!(
            url,
            format!(
                "{}/v0/b/app.appspot.com/o/ads%2F1700000000000?alt=media&token=tok-123",
                server.uri()
            )
        );
    }

    #[tokio::test]
    async fn test_rejected_upload_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Permission denied."))
            .mount(&server)
            .await;

        let client = FirebaseStorageClient::new(&config(&server.uri(), Some("b"))).unwrap();

        let err = client
            .upload_object("t", "ads/1", vec![0], "image/jpeg")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FirebaseError::StorageApiError { status_code: 403, .. }
        ));
    }
}
