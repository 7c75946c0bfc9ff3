use anyhow::{anyhow, bail, Context};
use axum::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::models::page::{Page, PageRequest};
use crate::models::restaurant::Restaurant;
use crate::repositories::query::RestaurantQuery;
use crate::repositories::RestaurantRepository;

pub const RETRY_LIMIT: usize = 5;

const REFRESH: [(&str, &str); 1] = [("refresh", "wait_for")];

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct ElasticsearchRestaurantRepository {
    client: Client,
    base_url: Url,
    index: String,
    credentials: Option<Credentials>,
}

#[derive(Deserialize)]
struct GetResponse {
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Restaurant>,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    total: TotalHits,
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Restaurant,
}

impl ElasticsearchRestaurantRepository {
    pub fn new(
        base_url: &str,
        index: &str,
        credentials: Option<Credentials>,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid elasticsearch url: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Elasticsearch url cannot carry a path: {}", base_url);
        }
        if !is_document_id(index) {
            bail!("Invalid elasticsearch index name: {:?}", index);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            index: index.to_string(),
            credentials,
        })
    }

    /// Appends each segment percent-encoded, so ids can never address
    /// another path of the cluster.
    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Elasticsearch url cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn document_url(&self, id: &str) -> anyhow::Result<Url> {
        self.url(&[self.index.as_str(), "_doc", id])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            None => builder,
        }
    }

    /// Creates the index with its mapping if it is not there yet. The cluster
    /// may still be starting, so connection failures are retried.
    pub async fn ensure_index(&self) -> anyhow::Result<()> {
        let index_url = self.url(&[self.index.as_str()])?;
        for _ in 0..RETRY_LIMIT {
            match self.request(Method::HEAD, index_url.clone()).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    let response = self
                        .request(Method::PUT, index_url.clone())
                        .json(&index_mapping())
                        .send()
                        .await
                        .context("Failed to create restaurant index")?;
                    check_status(response).await?;
                    info!("Created index {}", self.index);
                    return Ok(());
                }
                Ok(response) => {
                    check_status(response).await?;
                    info!("Using existing index {}", self.index);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Failed to reach elasticsearch due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to reach elasticsearch at {}, BAILING", self.base_url))
    }
}

#[async_trait]
impl RestaurantRepository for ElasticsearchRestaurantRepository {
    async fn save(&self, restaurant: Restaurant) -> anyhow::Result<Restaurant> {
        if !is_document_id(&restaurant.id) {
            bail!("Refusing to save restaurant with id {:?}", restaurant.id);
        }
        let response = self
            .request(Method::PUT, self.document_url(&restaurant.id)?)
            .query(&REFRESH)
            .json(&restaurant)
            .send()
            .await
            .with_context(|| format!("Failed to save restaurant {}", restaurant.id))?;
        check_status(response).await?;

        Ok(restaurant)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Restaurant>> {
        if !is_document_id(id) {
            return Ok(None);
        }
        let response = self
            .request(Method::GET, self.document_url(id)?)
            .send()
            .await
            .with_context(|| format!("Failed to retrieve restaurant {}", id))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document: GetResponse = check_status(response)
            .await?
            .json()
            .await
            .context("Malformed restaurant document")?;
        Ok(document.source.filter(|_| document.found))
    }

    async fn search(
        &self,
        query: &RestaurantQuery,
        page_request: PageRequest,
    ) -> anyhow::Result<Page<Restaurant>> {
        let body = json!({
            "from": page_request.offset(),
            "size": page_request.size,
            "track_total_hits": true,
            "query": query.to_query_dsl(),
        });
        let response = self
            .request(Method::POST, self.url(&[self.index.as_str(), "_search"])?)
            .json(&body)
            .send()
            .await
            .context("Failed to search restaurants")?;

        let result: SearchResponse = check_status(response)
            .await?
            .json()
            .await
            .context("Malformed search response")?;
        let restaurants = result.hits.hits.into_iter().map(|hit| hit.source).collect();

        Ok(Page::new(restaurants, page_request, result.hits.total.value))
    }

    async fn delete_by_id(&self, id: &str) -> anyhow::Result<()> {
        if !is_document_id(id) {
            return Ok(());
        }
        let response = self
            .request(Method::DELETE, self.document_url(id)?)
            .query(&REFRESH)
            .send()
            .await
            .with_context(|| format!("Failed to delete restaurant {}", id))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).await?;

        Ok(())
    }
}

/// Dot segments are dropped when a path is built, so they can't name a document.
fn is_document_id(id: &str) -> bool {
    !matches!(id, "" | "." | "..")
}

async fn check_status(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("Elasticsearch responded with {}: {}", status, body)
}

fn photo_mapping() -> Value {
    json!({
        "type": "nested",
        "properties": {
            "url": { "type": "keyword" },
            "uploadDate": { "type": "date" }
        }
    })
}

fn user_mapping() -> Value {
    json!({
        "type": "nested",
        "properties": {
            "id": { "type": "keyword" },
            "username": { "type": "text" },
            "givenName": { "type": "text" },
            "familyName": { "type": "text" }
        }
    })
}

fn time_range_mapping() -> Value {
    json!({
        "type": "nested",
        "properties": {
            "openTime": { "type": "keyword" },
            "closeTime": { "type": "keyword" }
        }
    })
}

pub fn index_mapping() -> Value {
    let days = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];
    let hours: serde_json::Map<String, Value> = days
        .iter()
        .map(|day| (day.to_string(), time_range_mapping()))
        .collect();

    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "name": { "type": "text" },
                "cuisineType": { "type": "text" },
                "contactInformation": { "type": "keyword" },
                "averageRating": { "type": "float" },
                "geoLocation": { "type": "geo_point" },
                "address": {
                    "type": "nested",
                    "properties": {
                        "streetNumber": { "type": "keyword" },
                        "streetName": { "type": "text" },
                        "unit": { "type": "keyword" },
                        "city": { "type": "keyword" },
                        "state": { "type": "keyword" },
                        "postalCode": { "type": "keyword" },
                        "country": { "type": "keyword" }
                    }
                },
                "operatingHours": { "type": "nested", "properties": hours },
                "photos": photo_mapping(),
                "reviews": {
                    "type": "nested",
                    "properties": {
                        "id": { "type": "keyword" },
                        "content": { "type": "text" },
                        "rating": { "type": "integer" },
                        "datePosted": { "type": "date" },
                        "lastEdited": { "type": "date" },
                        "photos": photo_mapping(),
                        "writtenBy": user_mapping()
                    }
                },
                "createdBy": user_mapping()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_declares_searchable_fields() {
        let properties = &index_mapping()["mappings"]["properties"];

        assert_eq!(properties["geoLocation"]["type"], "geo_point");
        assert_eq!(properties["averageRating"]["type"], "float");
        assert_eq!(properties["name"]["type"], "text");
        assert_eq!(properties["cuisineType"]["type"], "text");
        assert_eq!(properties["reviews"]["type"], "nested");
        assert_eq!(
            properties["operatingHours"]["properties"]["sunday"]["properties"]["openTime"]["type"],
            "keyword"
        );
    }

    #[test]
    fn search_response_parses_hits_and_total() {
        let raw = json!({
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "hits": [{
                    "_id": "r1",
                    "_source": {
                        "id": "r1",
                        "name": "A",
                        "cuisineType": "Italian",
                        "contactInformation": "555",
                        "averageRating": 4.5,
                        "geoLocation": { "lat": 39.1, "lon": -94.6 },
                        "address": { "streetNumber": "1", "streetName": "Main", "city": "KC",
                                     "state": "MO", "postalCode": "64105", "country": "US" }
                    }
                }]
            }
        });

        let parsed: SearchResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.hits.total.value, 42);
        assert_eq!(parsed.hits.hits[0].source.name, "A");
        assert!(parsed.hits.hits[0].source.reviews.is_empty());
    }

    fn repository(base_url: &str) -> ElasticsearchRestaurantRepository {
        ElasticsearchRestaurantRepository::new(base_url, "restaurants", None).unwrap()
    }

    #[test]
    fn document_urls_ignore_trailing_slash_and_keep_prefix() {
        assert_eq!(
            repository("http://localhost:9200/").document_url("r1").unwrap().as_str(),
            "http://localhost:9200/restaurants/_doc/r1"
        );
        assert_eq!(
            repository("http://search.local/es/").url(&["restaurants", "_search"]).unwrap().as_str(),
            "http://search.local/es/restaurants/_search"
        );
    }

    #[test]
    fn ids_cannot_escape_the_document_path() {
        let repo = repository("http://localhost:9200");

        let url = repo.document_url("../../restaurants#").unwrap();
        assert_eq!(url.path(), "/restaurants/_doc/..%2F..%2Frestaurants%23");
        assert_eq!(url.fragment(), None);

        let url = repo.document_url("x?refresh=true&op=delete").unwrap();
        assert_eq!(url.path(), "/restaurants/_doc/x%3Frefresh=true&op=delete");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn dot_segments_are_not_document_ids() {
        assert!(!is_document_id(".."));
        assert!(!is_document_id("."));
        assert!(!is_document_id(""));
        assert!(is_document_id("..x"));
    }

    #[tokio::test]
    async fn dot_segment_ids_never_reach_the_cluster() {
        // Nothing listens on port 9; any request would fail.
        let repo = repository("http://127.0.0.1:9");

        assert!(repo.find_by_id("..").await.unwrap().is_none());
        assert!(repo.delete_by_id("..").await.is_ok());
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        assert!(ElasticsearchRestaurantRepository::new("not a url", "restaurants", None).is_err());
        assert!(ElasticsearchRestaurantRepository::new("mailto:es@example.com", "restaurants", None).is_err());
        assert!(ElasticsearchRestaurantRepository::new("http://localhost:9200", "..", None).is_err());
    }
}
