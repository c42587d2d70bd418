//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions live behind [`QdrantStore`], hiding the verbose
//! builder pattern and keeping the rest of the application decoupled from
//! `qdrant-client`.
//!
//! Point ids are UUIDv5 of the external id (Qdrant only accepts UUID or
//! integer keys). The external id is stored in the payload under `id`, and
//! the chunk text under [`CONTENT_KEY`].

use std::collections::HashMap;

use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchParamsBuilder, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::{Map, Value};
use services::uuid::stable_uuid;
use tracing::{debug, info, instrument, warn};

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::filters::{FilterSet, PROJECT_KEY, to_qdrant_filter};
use crate::record::{SearchHit, VectorPoint};
use crate::store::{StoreFuture, VectorStore};

/// Payload key holding the chunk text.
pub const CONTENT_KEY: &str = "_content";

/// A facade over the Qdrant client.
///
/// Encapsulates the client, the target collection and its vector space.
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    space: VectorSpace,
    exact: bool,
}

impl QdrantStore {
    /// Creates a new store from the given configuration.
    ///
    /// Does not touch the network; call [`QdrantStore::ensure_collection`]
    /// before serving traffic.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(RagError::qdrant("connect"))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            space: cfg.space.clone(),
            exact: cfg.exact_search,
        })
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the configured vector space.
    pub async fn ensure_collection(&self) -> Result<(), RagError> {
        info!(
            "Ensuring collection '{}' with size={} distance={:?}",
            self.collection, self.space.size, self.space.distance
        );

        match self.client.collection_exists(&self.collection).await {
            Ok(true) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Ok(false) => {
                warn!("Collection '{}' not found, will be created", self.collection);
            }
            Err(e) => return Err(RagError::qdrant("collection_exists")(e)),
        }

        let distance = match self.space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.space.size as u64, distance)),
            )
            .await
            .map_err(RagError::qdrant("create_collection"))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    #[instrument(skip_all, fields(collection = %self.collection, id = %point.id))]
    async fn upsert_point(&self, point: VectorPoint) -> Result<(), RagError> {
        if point.vector.len() != self.space.size {
            return Err(RagError::VectorSizeMismatch {
                got: point.vector.len(),
                want: self.space.size,
            });
        }

        let pid = stable_uuid(&point.point_key()).to_string();
        let payload = point_payload(&point)?;

        let res = self
            .client
            .upsert_points(
                UpsertPointsBuilder::new(&self.collection, vec![PointStruct::new(
                    pid,
                    point.vector,
                    payload,
                )])
                .wait(true),
            )
            .await
            .map_err(RagError::qdrant("upsert"))?;

        debug!("Upsert operation result={:?}", res.result);
        Ok(())
    }

    #[instrument(skip_all, fields(collection = %self.collection, top_k, exact = self.exact))]
    async fn search_points(
        &self,
        vector: Vec<f32>,
        filter: &FilterSet,
        top_k: u64,
    ) -> Result<Vec<SearchHit>, RagError> {
        let mut builder = SearchPointsBuilder::new(&self.collection, vector, top_k)
            .filter(to_qdrant_filter(filter))
            .with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(RagError::qdrant("search"))?;

        let hits: Vec<SearchHit> = res
            .result
            .into_iter()
            .map(|p| hit_from_payload(p.score, p.payload))
            .collect();

        debug!("Search completed: {} hits returned", hits.len());
        Ok(hits)
    }
}

impl VectorStore for QdrantStore {
    fn upsert<'a>(&'a self, point: VectorPoint) -> StoreFuture<'a, ()> {
        Box::pin(self.upsert_point(point))
    }

    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        filter: &'a FilterSet,
        top_k: u64,
    ) -> StoreFuture<'a, Vec<SearchHit>> {
        Box::pin(self.search_points(vector, filter, top_k))
    }
}

/// Serializes metadata + content to a Qdrant [`Payload`] via JSON, as the
/// client recommends.
fn point_payload(point: &VectorPoint) -> Result<Payload, RagError> {
    let mut obj = point.metadata.clone();
    obj.insert("id".into(), Value::String(point.id.clone()));
    obj.insert(PROJECT_KEY.into(), Value::String(point.project_id.clone()));
    obj.insert(CONTENT_KEY.into(), Value::String(point.content.clone()));
    Value::Object(obj)
        .try_into()
        .map_err(RagError::qdrant("payload_convert"))
}

fn hit_from_payload(score: f32, payload: HashMap<String, QValue>) -> SearchHit {
    let mut metadata = qpayload_to_json(payload);
    let content = match metadata.remove(CONTENT_KEY) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    let id = metadata
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    SearchHit {
        id,
        content,
        score: Some(score),
        metadata,
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
fn qpayload_to_json(p: HashMap<String, QValue>) -> Map<String, Value> {
    p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect()
}

fn qvalue_to_json(v: QValue) -> Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => Value::String(s),
        Some(K::IntegerValue(i)) => Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => Value::Bool(b),
        Some(K::ListValue(l)) => Value::Array(l.values.into_iter().map(qvalue_to_json).collect()),
        Some(K::StructValue(s)) => Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, qvalue_to_json(v)))
                .collect(),
        ),
        Some(K::NullValue(_)) | None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::value::Kind;

    fn qs(s: &str) -> QValue {
        QValue {
            kind: Some(Kind::StringValue(s.into())),
        }
    }

    #[test]
    fn hit_splits_content_from_metadata() {
        let mut payload = HashMap::new();
        payload.insert("id".to_string(), qs("auth_doc_1"));
        payload.insert("project_id".to_string(), qs("proj_1"));
        payload.insert(CONTENT_KEY.to_string(), qs("Auth uses JWT"));

        let hit = hit_from_payload(0.87, payload);
        assert_eq!(hit.id, "auth_doc_1");
        assert_eq!(hit.content, "Auth uses JWT");
        assert_eq!(hit.score, Some(0.87));
        assert!(!hit.metadata.contains_key(CONTENT_KEY));
        assert_eq!(hit.metadata["project_id"], "proj_1");
    }

    #[test]
    fn payload_carries_external_id() {
        let point = VectorPoint {
            id: "doc-7".into(),
            project_id: "proj_1".into(),
            vector: vec![0.1, 0.2],
            content: "text".into(),
            metadata: Map::new(),
        };
        let payload = point_payload(&point).unwrap();
        let json: Map<String, Value> = qpayload_to_json(payload.into());
        assert_eq!(json["id"], "doc-7");
        assert_eq!(json["project_id"], "proj_1");
        assert_eq!(json[CONTENT_KEY], "text");
    }

    #[tokio::test]
    async fn new_does_not_connect() {
        let cfg = RagConfig::new_default("http://localhost:6334", "devdoc-test");
        assert!(QdrantStore::new(&cfg).is_ok());
    }
}
