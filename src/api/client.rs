// file: src/api/client.rs
// description: reqwest-backed client for the remote document API
// reference: https://docs.rs/reqwest

use crate::api::{CancelToken, DocumentApi};
use crate::config::ApiConfig;
use crate::error::{ArchiveError, Result};
use crate::models::{Document, DocumentPayload, OcrExtraction, SelectedFile, Tag};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use url::Url;

const DOCUMENTS_PATH: &str = "/api/documents";
const UPLOAD_PATH: &str = "/api/documents/upload/";
const OCR_PATH: &str = "/api/documents/ocr/";
const TAGS_PATH: &str = "/api/tags";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpDocumentClient {
    client: Client,
    base_url: String,
}

impl HttpDocumentClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Validator::validate_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ArchiveError::Config(format!("Invalid API URL for {}: {}", path, e)))
    }

    fn document_endpoint(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint(DOCUMENTS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| ArchiveError::Config(format!("Cannot append id to {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn fetch_documents(
        &self,
        filter: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Document>> {
        let mut url = self.endpoint(DOCUMENTS_PATH)?;

        let params: Vec<(&str, &str)> = [("tag", filter), ("search", search)]
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        debug!("GET {}", url);
        read_json(self.client.get(url), "Network response was not ok").await
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>> {
        let url = self.endpoint(TAGS_PATH)?;
        debug!("GET {}", url);
        read_json(self.client.get(url), "Network response was not ok").await
    }

    async fn fetch_document(&self, id: &str) -> Result<Document> {
        let url = self.document_endpoint(id)?;
        debug!("GET {}", url);
        read_json(self.client.get(url), "Failed to fetch document").await
    }

    async fn submit(&self, request: RequestBuilder, payload: &DocumentPayload) -> Result<Document> {
        let response = request.json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Request failed with status: {}", status.as_u16()));
            return Err(ArchiveError::status(status.as_u16(), message));
        }

        Ok(response.json().await?)
    }

    async fn upload_for_ocr(&self, file: &SelectedFile) -> Result<OcrExtraction> {
        let url = self.endpoint(OCR_PATH)?;
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        debug!("POST {} ({} bytes, {})", url, file.size, file.mime);
        let response = self.client.post(url).multipart(form).send().await?;
        let response = ensure_success(response, "OCR request failed")?;
        Ok(response.json().await?)
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let url = self.document_endpoint(id)?;
        debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        ensure_success(response, "Delete request failed")?;
        Ok(())
    }
}

fn ensure_success(response: Response, failure: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ArchiveError::status(
            status.as_u16(),
            format!("{} with status: {}", failure, status.as_u16()),
        ))
    }
}

async fn read_json<T: DeserializeOwned>(request: RequestBuilder, failure: &str) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::status(status.as_u16(), failure));
    }
    Ok(response.json().await?)
}

fn log_read_failure(context: &str, err: &ArchiveError) {
    if err.is_cancelled() {
        debug!("{}: request cancelled", context);
    } else {
        error!("{}: {}", context, err);
    }
}

#[async_trait]
impl DocumentApi for HttpDocumentClient {
    async fn list(
        &self,
        filter: Option<&str>,
        search: Option<&str>,
        cancel: &CancelToken,
    ) -> Vec<Document> {
        match cancel.guard(self.fetch_documents(filter, search)).await {
            Ok(documents) => {
                debug!("Fetched {} documents", documents.len());
                documents
            }
            Err(e) => {
                log_read_failure("Error fetching documents", &e);
                Vec::new()
            }
        }
    }

    async fn list_tags(&self, cancel: &CancelToken) -> Vec<Tag> {
        match cancel.guard(self.fetch_tags()).await {
            Ok(tags) => tags,
            Err(e) => {
                log_read_failure("Error fetching tags", &e);
                Vec::new()
            }
        }
    }

    async fn get_by_id(&self, id: &str, cancel: &CancelToken) -> Option<Document> {
        match cancel.guard(self.fetch_document(id)).await {
            Ok(document) => Some(document),
            Err(e) => {
                log_read_failure("Error fetching document by ID", &e);
                None
            }
        }
    }

    async fn create(&self, payload: &DocumentPayload, cancel: &CancelToken) -> Result<Document> {
        let url = self.endpoint(UPLOAD_PATH)?;
        debug!("POST {}", url);
        let created = cancel.guard(self.submit(self.client.post(url), payload)).await?;
        info!("Created document {}", created.id.as_ref().map(|id| id.as_str()).unwrap_or("?"));
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        payload: &DocumentPayload,
        cancel: &CancelToken,
    ) -> Result<Document> {
        let url = self.document_endpoint(id)?;
        debug!("PUT {}", url);
        let updated = cancel.guard(self.submit(self.client.put(url), payload)).await?;
        info!("Updated document {}", id);
        Ok(updated)
    }

    async fn ocr_extract(
        &self,
        file: &SelectedFile,
        cancel: &CancelToken,
    ) -> Result<OcrExtraction> {
        cancel.guard(self.upload_for_ocr(file)).await
    }

    async fn delete_by_id(&self, id: &str, cancel: &CancelToken) -> Result<()> {
        cancel.guard(self.remove(id)).await?;
        info!("Deleted document {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client_for(base_url: &str) -> HttpDocumentClient {
        let mut config = Config::default_config().api;
        config.base_url = base_url.to_string();
        HttpDocumentClient::new(&config).unwrap()
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let client = client_for("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.endpoint(TAGS_PATH).unwrap().as_str(),
            "http://localhost:5000/api/tags"
        );
    }

    #[test]
    fn test_document_endpoint_encodes_id() {
        let client = client_for("http://localhost:5000");
        assert_eq!(
            client.document_endpoint("abc 1").unwrap().as_str(),
            "http://localhost:5000/api/documents/abc%201"
        );
    }

    #[test]
    fn test_edit_route_id_is_encoded_once() {
        let client = client_for("http://localhost:5000");
        let Some(crate::routes::Route::EditDocument(id)) =
            crate::routes::Route::parse("/documents/edit/abc%201")
        else {
            panic!("expected an edit route");
        };
        assert_eq!(
            client.document_endpoint(id.as_str()).unwrap().as_str(),
            "http://localhost:5000/api/documents/abc%201"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let mut config = Config::default_config().api;
        config.base_url = "localhost".to_string();
        assert!(HttpDocumentClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_transport_failure_resolves_to_empty_list() {
        // Port 9 (discard) on loopback is not expected to host an HTTP server.
        let client = client_for("http://127.0.0.1:9");
        let documents = client.list(Some("x"), Some("y"), &CancelToken::new()).await;
        assert!(documents.is_empty());
        assert!(client.get_by_id("missing", &CancelToken::new()).await.is_none());
        assert!(client.list_tags(&CancelToken::new()).await.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_mutation_is_an_error() {
        let client = client_for("http://127.0.0.1:9");
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = client.delete_by_id("1", &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
