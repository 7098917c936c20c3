//! Knowledge-base subcommands.

use anyhow::Result;
use halo_rag::SearchResult;
use halo_runner::Services;
use std::path::Path;

const SNIPPET_CHARS: usize = 160;

pub async fn ingest(services: &Services, file: &Path, collection: Option<&str>, replace: bool) -> Result<()> {
    let report = services.ingest_pipeline().ingest_path(file, collection, replace).await?;
    println!(
        "Ingested {} into '{}': {} document(s), {} chunk(s), {} replaced",
        report.filename,
        report.collection,
        report.documents,
        report.chunk_ids.len(),
        report.replaced
    );
    println!("Saved to {}", report.saved_path.display());
    Ok(())
}

pub async fn search(services: &Services, query: &str, k: usize, collection: Option<&str>) -> Result<()> {
    let target = match collection {
        Some(name) => services.collection.with_name(name),
        None => services.collection.clone(),
    };
    let results = target.similarity_search(query, k, None).await;
    if results.is_empty() {
        println!("No matches in '{}'", target.name());
        return Ok(());
    }
    for (rank, result) in results.iter().enumerate() {
        println!("{}", format_hit(rank + 1, result));
    }
    Ok(())
}

pub async fn stats(services: &Services, collection: Option<&str>) -> Result<()> {
    let target = match collection {
        Some(name) => services.collection.with_name(name),
        None => services.collection.clone(),
    };
    let stats = target.stats().await?;
    let files = services.ingest_pipeline().files_count().await;

    let mut value = serde_json::to_value(&stats)?;
    value["uploaded_files"] = files.into();
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn format_hit(rank: usize, result: &SearchResult) -> String {
    let title = result.chunk.metadata.get("title").map(String::as_str).unwrap_or("untitled");
    let flat = result.chunk.text.split_whitespace().collect::<Vec<_>>().join(" ");
    let snippet = match flat.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    };
    format!("{rank}. [{:.3}] {title}\n   {snippet}", result.score)
}
