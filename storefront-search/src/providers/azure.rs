//! Azure AI Search provider over the REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_core::Product;
use storefront_core::config::{SearchConfig, ServiceCredential, endpoint_base};

use super::SearchIndexProvider;
use crate::errors::SearchError;
use crate::types::{IndexQuery, IndexingOutcome, ScoredProduct};

/// Search index provider backed by an Azure AI Search index.
#[derive(Debug, Clone)]
pub struct AzureSearchProvider {
    client: reqwest::Client,
    endpoint: url::Url,
    credential: ServiceCredential,
    index_name: String,
    api_version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_fields: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    select: String,
    top: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    vector_queries: Vec<VectorQueryBody<'a>>,
}

#[derive(Debug, Serialize)]
struct VectorQueryBody<'a> {
    kind: &'static str,
    vector: &'a [f32],
    k: usize,
    fields: &'a str,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    value: Vec<ScoredProduct>,
}

#[derive(Debug, Serialize)]
struct IndexBatchBody<'a> {
    value: Vec<IndexAction<'a>>,
}

#[derive(Debug, Serialize)]
struct IndexAction<'a> {
    #[serde(rename = "@search.action")]
    action: &'static str,
    #[serde(flatten)]
    document: &'a Product,
}

#[derive(Debug, Deserialize)]
struct IndexBatchResponse {
    value: Vec<IndexingOutcome>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl<'a> SearchRequestBody<'a> {
    fn from_query(query: &'a IndexQuery) -> Self {
        let search_fields = (!query.search_fields.is_empty()).then(|| {
            query
                .search_fields
                .iter()
                .map(|field| field.index_name())
                .collect::<Vec<_>>()
                .join(",")
        });

        Self {
            search: query.search_text.as_deref(),
            search_fields,
            select: query.select.join(","),
            top: query.top,
            vector_queries: query
                .vector
                .iter()
                .map(|vector| VectorQueryBody {
                    kind: "vector",
                    vector: &vector.vector,
                    k: vector.k_nearest_neighbors,
                    fields: &vector.fields,
                })
                .collect(),
        }
    }
}

impl AzureSearchProvider {
    /// Creates a provider from configuration.
    ///
    /// # Errors
    /// - `SearchError::ProviderError` - Endpoint or credential missing, or endpoint is not a URL
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| SearchError::ProviderError {
                reason: "AZURE_SEARCH_SERVICE_ENDPOINT is not set".to_string(),
            })?;
        let credential = config
            .credential
            .clone()
            .ok_or_else(|| SearchError::ProviderError {
                reason: "AZURE_SEARCH_API_KEY is not set".to_string(),
            })?;
        let endpoint = endpoint_base(endpoint).map_err(|e| SearchError::ProviderError {
            reason: format!("Invalid search endpoint '{endpoint}': {e}"),
        })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SearchError::ProviderError {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            credential,
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
        })
    }

    fn docs_url(&self, operation: &str) -> Result<url::Url, SearchError> {
        let mut url = self
            .endpoint
            .join(&format!("indexes/{}/docs/{operation}", self.index_name))
            .map_err(|e| SearchError::ProviderError {
                reason: format!("Invalid index URL: {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    async fn post<B: Serialize>(
        &self,
        url: url::Url,
        body: &B,
    ) -> Result<reqwest::Response, SearchError> {
        let (header, value) = self.credential.header();
        tracing::debug!("POST {}", url.path());

        self.client
            .post(url)
            .header(header, value)
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::NetworkError {
                reason: format!("Azure AI Search request failed: {e}"),
            })
    }
}

async fn error_reason(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
    format!("HTTP {status}: {message}")
}

#[async_trait]
impl SearchIndexProvider for AzureSearchProvider {
    async fn query(&self, query: &IndexQuery) -> Result<Vec<ScoredProduct>, SearchError> {
        let url = self.docs_url("search")?;
        let body = SearchRequestBody::from_query(query);
        let response = self.post(url, &body).await?;

        if !response.status().is_success() {
            let reason = error_reason(response).await;
            tracing::warn!("Search request rejected: {}", reason);
            return Err(SearchError::SearchFailed {
                query: query.search_text.clone().unwrap_or_default(),
                reason,
            });
        }

        let parsed: SearchResponseBody =
            response.json().await.map_err(|e| SearchError::ParseError {
                reason: format!("Search response parsing failed: {e}"),
            })?;
        tracing::debug!("Search returned {} hits", parsed.value.len());
        Ok(parsed.value)
    }

    async fn upload(&self, products: &[Product]) -> Result<Vec<IndexingOutcome>, SearchError> {
        let url = self.docs_url("index")?;
        let body = IndexBatchBody {
            value: products
                .iter()
                .map(|document| IndexAction {
                    action: "upload",
                    document,
                })
                .collect(),
        };
        let response = self.post(url, &body).await?;

        // 207 carries per-document failures in the same shape as 200
        let status = response.status();
        if status != reqwest::StatusCode::OK && status != reqwest::StatusCode::MULTI_STATUS {
            return Err(SearchError::UploadFailed {
                reason: error_reason(response).await,
            });
        }

        let parsed: IndexBatchResponse =
            response.json().await.map_err(|e| SearchError::ParseError {
                reason: format!("Indexing response parsing failed: {e}"),
            })?;
        Ok(parsed.value)
    }

    fn name(&self) -> &'static str {
        "azure-ai-search"
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::types::{SearchField, VectorQuery};

    fn provider_for(server: &MockServer) -> AzureSearchProvider {
        let config = SearchConfig {
            endpoint: Some(server.base_url()),
            credential: Some(ServiceCredential::ApiKey("search-key".to_string())),
            ..SearchConfig::default()
        };
        AzureSearchProvider::from_config(&config).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let query = IndexQuery {
            search_text: Some("linen".to_string()),
            search_fields: vec![SearchField::Name, SearchField::ImageTags],
            vector: Some(VectorQuery {
                vector: vec![0.5, 0.25],
                k_nearest_neighbors: 3,
                fields: "descriptionVector".to_string(),
            }),
            select: vec!["id", "name"],
            top: 3,
        };

        let body = serde_json::to_value(SearchRequestBody::from_query(&query)).unwrap();
        assert_eq!(
            body,
            json!({
                "search": "linen",
                "searchFields": "name,imageTags",
                "select": "id,name",
                "top": 3,
                "vectorQueries": [
                    {"kind": "vector", "vector": [0.5, 0.25], "k": 3, "fields": "descriptionVector"}
                ]
            })
        );
    }

    #[test]
    fn test_pure_vector_body_omits_text_clauses() {
        let query = IndexQuery {
            vector: Some(VectorQuery {
                vector: vec![1.0],
                k_nearest_neighbors: 5,
                fields: "descriptionVector".to_string(),
            }),
            top: 5,
            ..IndexQuery::default()
        };
        let body = serde_json::to_value(SearchRequestBody::from_query(&query)).unwrap();
        assert!(body.get("search").is_none());
        assert!(body.get("searchFields").is_none());
        assert!(body.get("select").is_none());
    }

    #[tokio::test]
    async fn test_query_parses_hits() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/indexes/products-index/docs/search")
                    .query_param("api-version", "2024-07-01")
                    .header("api-key", "search-key")
                    .body_includes("\"search\":\"coat\"");
                then.status(200).json_body(json!({
                    "value": [
                        {"@search.score": 2.5, "id": "p-1", "name": "Wool Coat", "price": 189000},
                        {"@search.score": 1.25, "id": "p-2", "name": "Rain Coat"}
                    ]
                }));
            })
            .await;

        let hits = provider_for(&server)
            .query(&IndexQuery {
                search_text: Some("coat".to_string()),
                top: 5,
                ..IndexQuery::default()
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].product.price, Some(189000.0));
        assert_eq!(hits[1].score, Some(1.25));
    }

    #[tokio::test]
    async fn test_query_error_becomes_search_failed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(400).json_body(json!({
                    "error": {"code": "", "message": "Unknown field 'colour' in vector field list."}
                }));
            })
            .await;

        let err = provider_for(&server)
            .query(&IndexQuery {
                search_text: Some("coat".to_string()),
                top: 5,
                ..IndexQuery::default()
            })
            .await
            .unwrap_err();

        match err {
            SearchError::SearchFailed { query, reason } => {
                assert_eq!(query, "coat");
                assert!(reason.contains("Unknown field 'colour'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_reports_partial_failure() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/indexes/products-index/docs/index")
                    .body_includes("\"@search.action\":\"upload\"");
                then.status(207).json_body(json!({
                    "value": [
                        {"key": "p-1", "status": true, "errorMessage": null, "statusCode": 201},
                        {"key": "p-2", "status": false, "errorMessage": "Bad vector", "statusCode": 400}
                    ]
                }));
            })
            .await;

        let outcomes = provider_for(&server)
            .upload(&[Product::new("p-1", "Coat"), Product::new("p-2", "Boots")])
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(outcomes[0].succeeded);
        assert!(!outcomes[1].succeeded);
        assert_eq!(outcomes[1].error_message.as_deref(), Some("Bad vector"));
    }

    #[tokio::test]
    async fn test_upload_rejected_batch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(403).body("Forbidden");
            })
            .await;

        let err = provider_for(&server)
            .upload(&[Product::new("p-1", "Coat")])
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::UploadFailed { .. }));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let err = AzureSearchProvider::from_config(&SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::ProviderError { .. }));
    }
}
