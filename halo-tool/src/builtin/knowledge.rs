use crate::args::{object_arg, field, text_arg};
use async_trait::async_trait;
use halo_core::{Result, Tool, ToolContext};
use halo_rag::Retriever;
use serde_json::{Value, json};
use std::sync::Arc;

pub const MAX_KB_SNIPPETS: usize = 5;

pub struct RetrieveKbSnippetsTool {
    retriever: Arc<dyn Retriever>,
}

impl RetrieveKbSnippetsTool {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for RetrieveKbSnippetsTool {
    fn name(&self) -> &str {
        "retrieve_kb_snippets"
    }

    fn description(&self) -> &str {
        "Retrieve the top knowledge base snippets (at most 5) for a query. \
         Input: the query, or {\"query\": ..., \"collection_name\": ...} to search a specific collection."
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let query = text_arg(&args, &["query", "q"]);
        let collection = field(&object_arg(&args), "collection_name");
        let chunks = self.retriever.retrieve(&query, collection.as_deref()).await;
        let snippets: Vec<String> =
            chunks.into_iter().take(MAX_KB_SNIPPETS).map(|c| c.text).collect();
        tracing::debug!(hits = snippets.len(), "knowledge base lookup");
        Ok(json!({ "snippets": snippets }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::SessionToolContext;
    use halo_rag::{Chunk, Metadata};
    use std::sync::Mutex;

    /// Returns `n` chunks regardless of query and records the collection.
    struct Flood {
        n: usize,
        seen: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl Retriever for Flood {
        async fn retrieve(&self, _query: &str, collection: Option<&str>) -> Vec<Chunk> {
            self.seen.lock().unwrap().push(collection.map(str::to_string));
            (0..self.n).map(|i| Chunk::new(format!("snippet {i}"), Metadata::new())).collect()
        }
    }

    #[tokio::test]
    async fn test_snippets_are_capped_at_five() {
        let retriever = Arc::new(Flood { n: 9, seen: Mutex::new(Vec::new()) });
        let tool = RetrieveKbSnippetsTool::new(retriever.clone());
        let ctx = Arc::new(SessionToolContext::new("web:1", "web"));

        let result = tool.execute(ctx.clone(), json!("return policy")).await.unwrap();
        assert_eq!(result["snippets"].as_array().unwrap().len(), MAX_KB_SNIPPETS);

        tool.execute(ctx, json!({"query": "warranty", "collection_name": "kb_support"})).await.unwrap();
        let seen = retriever.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[None, Some("kb_support".to_string())]);
    }
}
