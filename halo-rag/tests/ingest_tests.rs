use async_trait::async_trait;
use halo_rag::{
    Chunk, EmbeddingProvider, HashEmbeddingProvider, InMemoryVectorStore, IngestPipeline,
    KnowledgeRetriever, RagError, Result, Retriever, VectorCollection,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts embedding calls so tests can assert nothing was embedded.
struct CountingEmbedder {
    inner: HashEmbeddingProvider,
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        "counting"
    }
}

fn pipeline(dir: &std::path::Path) -> (IngestPipeline, Arc<CountingEmbedder>, VectorCollection) {
    let embedder =
        Arc::new(CountingEmbedder { inner: HashEmbeddingProvider::default(), calls: AtomicUsize::new(0) });
    let collection =
        VectorCollection::new("ai_cs", Arc::new(InMemoryVectorStore::new()), embedder.clone());
    (IngestPipeline::new(collection.clone(), dir.join("uploads")), embedder, collection)
}

#[tokio::test]
async fn empty_file_is_rejected_before_embedding() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, embedder, _) = pipeline(dir.path());

    let err = pipeline.ingest_bytes(b"", "empty.txt", None, true).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyFile(_)));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.files_count().await, 0);
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, embedder, _) = pipeline(dir.path());

    let err = pipeline.ingest_bytes(b"MZ..", "setup.exe", None, true).await.unwrap_err();
    assert!(matches!(err, RagError::UnsupportedFileType(_)));
    assert!(err.is_validation());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ingest_text_file_tags_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _, collection) = pipeline(dir.path());
    let text = "Pengembalian barang dapat dilakukan dalam 30 hari. ".repeat(60);

    let report = pipeline.ingest_bytes(text.as_bytes(), "return-policy.txt", None, true).await.unwrap();
    assert_eq!(report.title, "Return Policy");
    assert_eq!(report.collection, "ai_cs");
    assert!(report.chunk_ids.len() > 1);
    assert!(report.saved_path.exists());

    let hits = collection.filter_by_metadata("title", "Return Policy", 100, 0).await.unwrap();
    assert_eq!(hits.len(), report.chunk_ids.len());
    let mut indices: Vec<usize> = hits.iter().filter_map(|h| h.chunk.chunk_index()).collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..hits.len()).collect::<Vec<_>>());
    for hit in &hits {
        assert_eq!(hit.chunk.metadata["filename"], "return-policy.txt");
        assert_eq!(hit.chunk.metadata["knowledge_base"], "ai_cs");
        assert_eq!(hit.chunk.metadata["category"], "txt file");
    }
    assert_eq!(pipeline.list_uploaded_files().await.unwrap(), vec!["return-policy.txt"]);
}

#[tokio::test]
async fn reingest_replaces_by_title() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _, collection) = pipeline(dir.path());

    pipeline.ingest_bytes(b"old shipping policy", "shipping.txt", None, true).await.unwrap();
    let second = pipeline.ingest_bytes(b"new shipping policy", "shipping.txt", None, true).await.unwrap();
    assert_eq!(second.replaced, 1);
    assert_eq!(collection.stats().await.unwrap().total_vector_count, 1);

    // Without replacement both versions remain.
    pipeline.ingest_bytes(b"newest shipping policy", "shipping.txt", None, false).await.unwrap();
    assert_eq!(collection.stats().await.unwrap().total_vector_count, 2);
}

#[tokio::test]
async fn csv_rows_are_indexed_across_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _, _) = pipeline(dir.path());
    let csv = b"question,answer\nOngkir?,Gratis di atas 100rb\nRetur?,30 hari\n";

    let chunks: Vec<Chunk> = pipeline.prepare_chunks(csv, "faq.csv", "ai_cs").unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].metadata["chunk_index"], "0");
    assert_eq!(chunks[1].metadata["chunk_index"], "1");
    assert_eq!(chunks[1].metadata["row_index"], "1");
    assert_eq!(chunks[1].text, "question: Retur?, answer: 30 hari");
}

#[tokio::test]
async fn ingested_text_is_retrievable_in_named_collection() {
    let dir = tempfile::tempdir().unwrap();
    let (pipeline, _, collection) = pipeline(dir.path());
    pipeline
        .ingest_bytes(b"Warranty covers one year of repairs", "warranty.md", Some("kb_support"), true)
        .await
        .unwrap();

    let retriever = KnowledgeRetriever::new(collection);
    assert!(retriever.retrieve("warranty", None).await.is_empty());
    let hits = retriever.retrieve("warranty repairs", Some("kb_support")).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].metadata["knowledge_base"], "kb_support");
}
