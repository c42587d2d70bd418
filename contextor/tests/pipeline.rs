use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ai_llm_service::AiLlmError;
use chrono::{TimeZone, Utc};
use contextor::llm::SynthesisFuture;
use contextor::{
    ContextorError, QuerySpec, RagEngine, Stage, Synthesizer, SynthesizerFactory,
};
use rag_store::{
    DocumentSource, EmbeddingsProvider, FilterSet, InMemoryStore, IndexableDocument, RagError,
    SearchHit, StoreFuture, VectorPoint, VectorStore,
};
use serde_json::{Map, json};

const DIM: usize = 64;
const ANSWER: &str = "Authentication is handled with JWT.";

/* ---------- stubs ---------- */

/// Bag-of-words embedder: similar wording → similar vectors.
#[derive(Default)]
struct WordsEmbedder {
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
    fail: bool,
}

impl WordsEmbedder {
    fn vectorize(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIM];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let idx = token
                .to_lowercase()
                .bytes()
                .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize))
                % DIM;
            v[idx] += 1.0;
        }
        v
    }
}

impl EmbeddingsProvider for WordsEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        let out = if self.fail {
            Err(RagError::Config("embedder offline".into()))
        } else {
            Ok(Self::vectorize(text))
        };
        Box::pin(async move { out })
    }
}

/// Wraps the in-memory store and counts calls.
struct CountingStore {
    inner: InMemoryStore,
    upserts: AtomicUsize,
    searches: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryStore::with_dimension(DIM),
            upserts: AtomicUsize::new(0),
            searches: AtomicUsize::new(0),
        }
    }
}

impl VectorStore for CountingStore {
    fn upsert<'a>(&'a self, point: VectorPoint) -> StoreFuture<'a, ()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert(point)
    }

    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        filter: &'a FilterSet,
        top_k: u64,
    ) -> StoreFuture<'a, Vec<SearchHit>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.search(vector, filter, top_k)
    }
}

#[derive(Default)]
struct Recorder {
    builds: AtomicUsize,
    generations: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    seen_models: Mutex<Vec<String>>,
}

struct StubFactory {
    rec: Arc<Recorder>,
    fail_generate: bool,
}

struct StubSynthesizer {
    rec: Arc<Recorder>,
    fail: bool,
}

impl SynthesizerFactory for StubFactory {
    fn build(&self, model: &str, _credential: &str) -> Result<Box<dyn Synthesizer>, AiLlmError> {
        self.rec.builds.fetch_add(1, Ordering::SeqCst);
        self.rec.seen_models.lock().unwrap().push(model.to_string());
        Ok(Box::new(StubSynthesizer {
            rec: self.rec.clone(),
            fail: self.fail_generate,
        }))
    }
}

impl Synthesizer for StubSynthesizer {
    fn generate<'a>(&'a self, prompt: &'a str) -> SynthesisFuture<'a> {
        self.rec.generations.fetch_add(1, Ordering::SeqCst);
        self.rec.prompts.lock().unwrap().push(prompt.to_string());
        let out = if self.fail {
            Err(AiLlmError::Timeout(Duration::from_secs(120)))
        } else {
            Ok(ANSWER.to_string())
        };
        Box::pin(async move { out })
    }
}

struct Harness {
    engine: RagEngine,
    store: Arc<CountingStore>,
    embedder: Arc<WordsEmbedder>,
    rec: Arc<Recorder>,
}

fn harness_with(embedder: WordsEmbedder, fail_generate: bool) -> Harness {
    let store = Arc::new(CountingStore::new());
    let embedder = Arc::new(embedder);
    let rec = Arc::new(Recorder::default());
    let factory = Arc::new(StubFactory {
        rec: rec.clone(),
        fail_generate,
    });
    let engine = RagEngine::new(store.clone(), embedder.clone(), factory);
    Harness {
        engine,
        store,
        embedder,
        rec,
    }
}

fn harness() -> Harness {
    harness_with(WordsEmbedder::default(), false)
}

fn doc(id: &str, project: &str, content: &str) -> IndexableDocument {
    IndexableDocument {
        id: id.into(),
        content: content.into(),
        project_id: project.into(),
        source: DocumentSource::Journal,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        author_id: "u1".into(),
        git_commit_hash: "abc".into(),
        git_branch: "main".into(),
        file_path: None,
        repo_url: "https://git.example.com/acme/app".into(),
        linked_jira_issue: None,
    }
}

fn ask(question: &str, project: &str) -> QuerySpec {
    QuerySpec::new(question, project)
        .with_model("openai/gpt-4o-mini")
        .with_credential("sk-or-test")
}

/* ---------- preconditions ---------- */

#[tokio::test]
async fn missing_credential_touches_nothing() {
    let h = harness();
    let spec = QuerySpec::new("How does auth work?", "proj_1").with_model("openai/gpt-4o-mini");

    let err = h.engine.query(&spec).await.unwrap_err();
    assert!(matches!(err, ContextorError::MissingCredential));

    assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.searches.load(Ordering::SeqCst), 0);
    assert_eq!(h.rec.builds.load(Ordering::SeqCst), 0);
    assert_eq!(h.rec.generations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn preconditions_are_checked_in_order() {
    let h = harness();

    let mut spec = QuerySpec::new("q", "");
    let err = h.engine.query(&spec).await.unwrap_err();
    assert!(matches!(err, ContextorError::MissingCredential));

    spec.credential = Some("sk".into());
    spec.model_id = Some("   ".into());
    let err = h.engine.query(&spec).await.unwrap_err();
    assert!(matches!(err, ContextorError::MissingModel));

    spec.model_id = Some("m".into());
    let err = h.engine.query(&spec).await.unwrap_err();
    assert!(matches!(err, ContextorError::MissingTenant));

    spec.project_id = None;
    let err = h.engine.query(&spec).await.unwrap_err();
    assert!(matches!(err, ContextorError::MissingTenant));

    spec.project_id = Some("proj_1".into());
    spec.top_k = 0;
    let err = h.engine.query(&spec).await.unwrap_err();
    assert!(matches!(err, ContextorError::InvalidArgument(_)));

    assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.rec.builds.load(Ordering::SeqCst), 0);
}

/* ---------- indexing ---------- */

#[tokio::test]
async fn index_then_search_round_trip() {
    let h = harness();
    let d = doc("doc-42", "proj_1", "Payments are retried three times");
    let id = h.engine.index(&d).await.unwrap();
    assert_eq!(id, "doc-42");

    let extra = json!({"id": "doc-42"}).as_object().cloned().unwrap();
    let filter = FilterSet::build("proj_1", &extra).unwrap();
    let hits = h
        .store
        .search(WordsEmbedder::vectorize(&d.content), &filter, 5)
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].metadata["id"], "doc-42");
    assert_eq!(hits[0].content, d.content);
}

#[tokio::test]
async fn reindex_replaces_content() {
    let h = harness();
    h.engine.index(&doc("d1", "proj_1", "first draft")).await.unwrap();
    h.engine.index(&doc("d1", "proj_1", "second draft")).await.unwrap();

    assert_eq!(h.store.inner.len(), 1);
    let filter = FilterSet::build("proj_1", &Map::new()).unwrap();
    let hits = h
        .store
        .search(WordsEmbedder::vectorize("draft"), &filter, 10)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "second draft");
}

#[tokio::test]
async fn same_id_in_another_project_does_not_overwrite() {
    let h = harness();
    h.engine.index(&doc("d1", "proj_1", "auth notes")).await.unwrap();
    h.engine.index(&doc("d1", "proj_2", "billing notes")).await.unwrap();

    assert_eq!(h.store.inner.len(), 2);
    let answer = h
        .engine
        .query(&ask("auth notes", "proj_1"))
        .await
        .unwrap();
    assert_eq!(answer.chunks.len(), 1);
    assert_eq!(answer.chunks[0].content, "auth notes");
    assert_eq!(h.store.inner.get("proj_2", "d1").unwrap().content, "billing notes");
}

#[tokio::test]
async fn blank_fields_are_rejected_before_embedding() {
    let h = harness();
    let err = h.engine.index(&doc("d1", "proj_1", "   ")).await.unwrap_err();
    assert!(matches!(err, ContextorError::InvalidArgument(_)));
    let err = h.engine.index(&doc("", "proj_1", "text")).await.unwrap_err();
    assert!(matches!(err, ContextorError::InvalidArgument(_)));
    assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.upserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn embedding_failure_is_an_indexing_error() {
    let h = harness_with(
        WordsEmbedder {
            fail: true,
            ..Default::default()
        },
        false,
    );
    let err = h.engine.index(&doc("d1", "proj_1", "text")).await.unwrap_err();
    assert!(matches!(
        err,
        ContextorError::Indexing {
            stage: Stage::Embedding,
            ..
        }
    ));
    assert_eq!(h.store.upserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn optional_nulls_never_stored() {
    let h = harness();
    let mut d = doc("d1", "proj_1", "text");
    d.file_path = Some("src/auth.rs".into());
    h.engine.index(&d).await.unwrap();

    let stored = h.store.inner.get("proj_1", "d1").unwrap();
    assert_eq!(stored.metadata["file_path"], "src/auth.rs");
    assert!(!stored.metadata.contains_key("linked_jira_issue"));
    assert!(stored.metadata.values().all(|v| !v.is_null()));
}

/* ---------- query ---------- */

#[tokio::test]
async fn auth_doc_end_to_end() {
    let h = harness();
    h.engine
        .index(&doc("auth_doc_1", "proj_1", "Auth uses JWT"))
        .await
        .unwrap();

    let answer = h
        .engine
        .query(&ask("How does auth work?", "proj_1"))
        .await
        .unwrap();

    assert_eq!(answer.answer, ANSWER);
    assert_eq!(answer.chunks.len(), 1);
    assert_eq!(answer.chunks[0].id, "auth_doc_1");
    assert_eq!(answer.chunks[0].content, "Auth uses JWT");
    assert!(answer.chunks[0].score > 0.0);

    let prompts = h.rec.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("You are a Senior Developer."));
    assert!(prompts[0].contains("Auth uses JWT"));
    assert!(prompts[0].ends_with("Question: How does auth work?"));
    assert_eq!(h.rec.seen_models.lock().unwrap()[0], "openai/gpt-4o-mini");
}

#[tokio::test]
async fn projects_are_isolated() {
    let h = harness();
    h.engine
        .index(&doc("auth_doc_1", "proj_1", "Auth uses JWT"))
        .await
        .unwrap();
    h.engine
        .index(&doc("billing_1", "proj_2", "Billing uses Stripe"))
        .await
        .unwrap();

    let answer = h
        .engine
        .query(&ask("How does auth use JWT?", "proj_2"))
        .await
        .unwrap();

    assert!(answer.chunks.iter().all(|c| c.metadata["project_id"] == "proj_2"));
    assert!(answer.chunks.iter().all(|c| c.id != "auth_doc_1"));
    let prompts = h.rec.prompts.lock().unwrap();
    assert!(!prompts[0].contains("Auth uses JWT"));
}

#[tokio::test]
async fn extra_filters_narrow_results() {
    let h = harness();
    h.engine.index(&doc("a", "proj_1", "auth notes")).await.unwrap();
    let mut commit = doc("b", "proj_1", "auth commit");
    commit.source = DocumentSource::CommitMessage;
    h.engine.index(&commit).await.unwrap();

    let spec = ask("auth", "proj_1").with_filter("source", "commit_message");
    let answer = h.engine.query(&spec).await.unwrap();
    let ids: Vec<&str> = answer.chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["b"]);
}

#[tokio::test]
async fn synthesis_failure_returns_no_chunks() {
    let h = harness_with(WordsEmbedder::default(), true);
    h.engine
        .index(&doc("auth_doc_1", "proj_1", "Auth uses JWT"))
        .await
        .unwrap();

    let err = h
        .engine
        .query(&ask("How does auth work?", "proj_1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ContextorError::Upstream {
            stage: Stage::Synthesis,
            ..
        }
    ));
}

#[tokio::test]
async fn excluded_keys_hidden_from_models_but_stored() {
    let h = harness();
    h.engine
        .index(&doc("auth_doc_1", "proj_1", "Auth uses JWT"))
        .await
        .unwrap();
    let answer = h
        .engine
        .query(&ask("How does auth work?", "proj_1"))
        .await
        .unwrap();

    let returned = &answer.chunks[0].metadata;
    assert_eq!(returned["id"], "auth_doc_1");
    assert_eq!(returned["git_branch"], "main");
    assert!(!returned.contains_key("git_commit_hash"));
    assert!(!returned.contains_key("author_id"));

    let inputs = h.embedder.inputs.lock().unwrap();
    let indexed = &inputs[0];
    assert!(indexed.contains("Auth uses JWT"));
    assert!(indexed.contains("git_branch: main"));
    assert!(!indexed.contains("git_commit_hash"));
    assert!(!indexed.contains("author_id"));

    let prompts = h.rec.prompts.lock().unwrap();
    assert!(prompts[0].contains("id: auth_doc_1"));
    assert!(!prompts[0].contains("git_commit_hash"));
    assert!(!prompts[0].contains("author_id"));

    let stored = h.store.inner.get("proj_1", "auth_doc_1").unwrap();
    assert_eq!(stored.metadata["git_commit_hash"], "abc");
    assert_eq!(stored.metadata["author_id"], "u1");
}
