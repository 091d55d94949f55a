use std::sync::Arc;

use thiserror::Error;

use super::corpus::CorpusError;
use super::index::{EmbeddingIndex, IndexError, KnowledgeChunk, RetrievedChunk};
use crate::core::config::RetrievalSettings;
use crate::llm::{EmbeddingProvider, LlmError};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding request failed: {0}")]
    Embedding(#[from] LlmError),
    #[error("embedding provider returned no vector for the query")]
    MissingEmbedding,
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),
}

/// Query-time front of the embedding index: embeds the question with the
/// same provider used for the corpus and applies the configured search.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: EmbeddingIndex,
    top_k: usize,
    min_similarity: f32,
}

impl Retriever {
    /// Embeds every chunk once and builds the index.
    pub async fn build(
        embedder: Arc<dyn EmbeddingProvider>,
        corpus: Vec<String>,
        settings: &RetrievalSettings,
    ) -> Result<Self, RetrievalError> {
        let batch_size = settings.embed_batch_size.max(1);
        let mut chunks = Vec::with_capacity(corpus.len());

        for batch in corpus.chunks(batch_size) {
            let vectors = embedder.embed(batch).await?;
            if vectors.len() != batch.len() {
                return Err(RetrievalError::Embedding(LlmError::Other(format!(
                    "{} returned {} embeddings for {} chunks",
                    embedder.name(),
                    vectors.len(),
                    batch.len()
                ))));
            }
            chunks.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(text, embedding)| KnowledgeChunk { text, embedding }),
            );
        }

        let index = EmbeddingIndex::new(chunks)?;
        tracing::info!(
            "Knowledge base ready: {} chunks, dimension {}",
            index.len(),
            index.dimension()
        );

        Ok(Self::from_index(
            embedder,
            index,
            settings.top_k,
            settings.min_similarity,
        ))
    }

    pub fn from_index(
        embedder: Arc<dyn EmbeddingProvider>,
        index: EmbeddingIndex,
        top_k: usize,
        min_similarity: f32,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            min_similarity,
        }
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    /// Chunks relevant to `query`, nearest first. Empty means no grounding.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        if vectors.is_empty() {
            return Err(RetrievalError::MissingEmbedding);
        }
        let query_vector = vectors.swap_remove(0);

        let results = self
            .index
            .search(&query_vector, self.top_k, self.min_similarity)?;
        tracing::debug!(
            "Retrieved {} of {} candidates above {:.2}",
            results.len(),
            self.top_k,
            self.min_similarity
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps known phrases to fixed vectors; anything else points away from all of them.
    struct KeywordEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        fn name(&self) -> &str {
            "keyword"
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(inputs
                .iter()
                .map(|text| {
                    let lower = text.to_lowercase();
                    if lower.contains("loss") {
                        vec![1.0, 0.0, 0.0]
                    } else if lower.contains("outage") {
                        vec![0.0, 1.0, 0.0]
                    } else if lower.contains("rates") {
                        vec![0.0, 0.0, 1.0]
                    } else {
                        vec![0.0, 0.0, -1.0]
                    }
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            Err(LlmError::Other("embedding service unavailable".to_string()))
        }
    }

    fn settings(batch: usize) -> RetrievalSettings {
        RetrievalSettings {
            embed_batch_size: batch,
            ..RetrievalSettings::default()
        }
    }

    fn corpus() -> Vec<String> {
        vec![
            "SYSTEM LOSS\nLoss fell below 8%.".to_string(),
            "REPORTING AN OUTAGE\nCall the hotline.".to_string(),
            "RATES\nGeneration charge.".to_string(),
        ]
    }

    #[tokio::test]
    async fn build_embeds_corpus_in_batches() {
        let embedder = Arc::new(KeywordEmbedder {
            calls: AtomicUsize::new(0),
        });
        let retriever = Retriever::build(embedder.clone(), corpus(), &settings(2))
            .await
            .unwrap();

        assert_eq!(retriever.index().len(), 3);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retrieve_returns_matching_chunks_only() {
        let embedder = Arc::new(KeywordEmbedder {
            calls: AtomicUsize::new(0),
        });
        let retriever = Retriever::build(embedder, corpus(), &settings(64))
            .await
            .unwrap();

        let query = "How many kWh loss last month?";
        let results = retriever.retrieve(query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].text.starts_with("SYSTEM LOSS"));

        let again = retriever.retrieve(query).await.unwrap();
        assert_eq!(results, again);
    }

    #[tokio::test]
    async fn unrelated_query_yields_no_grounding() {
        let embedder = Arc::new(KeywordEmbedder {
            calls: AtomicUsize::new(0),
        });
        let retriever = Retriever::build(embedder, corpus(), &settings(64))
            .await
            .unwrap();

        let results = retriever.retrieve("hello there").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let err = Retriever::build(Arc::new(FailingEmbedder), corpus(), &settings(64))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
