use crate::infra::{
    api_client::{ApiClient, RequestError},
    cache::{CachedPayload, QueryCache, QueryState},
};

const CONTAINER_SIZES_PATH: &str = "container-sizes";
const SHIPMENT_TYPES_PATH: &str = "shipment-types";

/// The option lists the form is populated from; one cache entry each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceQuery {
    ContainerSizes,
    ShipmentTypes,
}

impl ReferenceQuery {
    fn path(&self) -> &'static str {
        match self {
            ReferenceQuery::ContainerSizes => CONTAINER_SIZES_PATH,
            ReferenceQuery::ShipmentTypes => SHIPMENT_TYPES_PATH,
        }
    }
}

#[derive(Clone)]
pub struct ReferenceDataLoader {
    client: ApiClient,
    cache: QueryCache<ReferenceQuery, Vec<String>>,
}

impl ReferenceDataLoader {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: QueryCache::default(),
        }
    }

    pub async fn load_container_sizes(&self) -> Result<CachedPayload<Vec<String>>, RequestError> {
        self.load(ReferenceQuery::ContainerSizes).await
    }

    pub async fn load_shipment_types(&self) -> Result<CachedPayload<Vec<String>>, RequestError> {
        self.load(ReferenceQuery::ShipmentTypes).await
    }

    pub async fn load(
        &self,
        query: ReferenceQuery,
    ) -> Result<CachedPayload<Vec<String>>, RequestError> {
        let payload = self
            .cache
            .get_or_fetch(query, || self.client.get_json::<Vec<String>>(query.path()))
            .await?;
        tracing::debug!(
            ?query,
            status = ?payload.status,
            age = ?payload.fetched_at.elapsed(),
            options = payload.data.len(),
            "reference data ready"
        );
        Ok(payload)
    }

    pub async fn state(&self, query: ReferenceQuery) -> QueryState<Vec<String>> {
        self.cache.state(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::cache::CacheStatus;
    use crate::util::config::ApiConfig;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn loader_for(server: &MockServer) -> ReferenceDataLoader {
        let config = ApiConfig::with_base_url(&server.uri()).unwrap();
        ReferenceDataLoader::new(ApiClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn second_load_within_window_hits_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/container-sizes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["20ft", "40ft", "reefer"])))
            .expect(1)
            .mount(&server)
            .await;

        let loader = loader_for(&server);
        let first = loader.load_container_sizes().await.unwrap();
        let second = loader.load_container_sizes().await.unwrap();

        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(second.status, CacheStatus::Cached);
        assert_eq!(second.data, vec!["20ft", "40ft", "reefer"]);
    }

    #[tokio::test]
    async fn simultaneous_loads_issue_a_single_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/container-sizes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!(["20ft", "40ft"]))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let loader = loader_for(&server);
        let (first, second) = tokio::join!(loader.load_container_sizes(), loader.load_container_sizes());

        assert_eq!(first.unwrap().data, vec!["20ft", "40ft"]);
        assert_eq!(second.unwrap().data, vec!["20ft", "40ft"]);
        assert_eq!(server.received_requests().await.unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn queries_are_cached_independently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/container-sizes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["20ft"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/shipment-types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["import", "export"])))
            .expect(1)
            .mount(&server)
            .await;

        let loader = loader_for(&server);
        let (sizes, types) = tokio::join!(loader.load_container_sizes(), loader.load_shipment_types());

        assert_eq!(sizes.unwrap().data, vec!["20ft"]);
        assert_eq!(types.unwrap().data, vec!["import", "export"]);
        assert_eq!(
            loader.state(ReferenceQuery::ShipmentTypes).await,
            QueryState::Loaded(vec!["import".to_string(), "export".to_string()])
        );
    }

    #[tokio::test]
    async fn failed_load_surfaces_an_error_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shipment-types"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let loader = loader_for(&server);
        assert_eq!(loader.state(ReferenceQuery::ShipmentTypes).await, QueryState::Idle);

        let error = loader.load_shipment_types().await.unwrap_err();
        assert!(matches!(error, RequestError::HttpStatus { .. }));

        let state = loader.state(ReferenceQuery::ShipmentTypes).await;
        assert!(state.error().is_some());
        assert!(!state.is_loading());
        assert_eq!(loader.state(ReferenceQuery::ContainerSizes).await, QueryState::Idle);
    }
}
