use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::catalog::{AccessMode, Catalog, Source};
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::types::{FetchOutcome, FetchResult, RawDocument, SourceFailure};

/// Run every source of `catalog` concurrently.
///
/// Sources report into one channel drained by a single consumer, which is the only place the
/// namespace map is built. The call returns once every dispatched source task has finished,
/// whatever its outcome. A failed source is listed in [`FetchOutcome::failures`] and contributes
/// nothing else.
pub async fn fetch_all<F: Fetcher>(fetcher: Arc<F>, catalog: &Catalog) -> Result<FetchOutcome> {
    let started = Instant::now();
    let (tx, mut rx) = mpsc::channel::<FetchResult>(1);

    let consumer = tokio::spawn(async move {
        let mut documents: HashMap<String, Vec<RawDocument>> = HashMap::new();
        while let Some(result) = rx.recv().await {
            documents
                .entry(result.namespace)
                .or_default()
                .extend(result.documents);
        }
        documents
    });

    let mut tasks = JoinSet::new();
    let mut pending: Vec<String> = Vec::new();
    for source in catalog {
        let tx = tx.clone();
        let fetcher = Arc::clone(&fetcher);
        let source = source.clone();
        pending.push(source.namespace.clone());

        tasks.spawn(async move {
            let namespace = source.namespace.clone();
            let outcome = report_source(fetcher, source, tx).await;
            (namespace, outcome)
        });
    }
    drop(tx);

    let mut failures = Vec::new();
    let mut finished = 0usize;
    while let Some(joined) = tasks.join_next().await {
        finished += 1;
        match joined {
            Ok((namespace, outcome)) => {
                if let Some(pos) = pending.iter().position(|ns| *ns == namespace) {
                    pending.remove(pos);
                }
                if let Err(reason) = outcome {
                    log::debug!("Source {namespace} failed: {reason}");
                    failures.push(SourceFailure { namespace, reason });
                }
            }
            Err(e) => log::debug!("Source task failed: {e}"),
        }
    }

    // Tasks that died without reporting back.
    for namespace in pending {
        log::debug!("Source {namespace} aborted");
        failures.push(SourceFailure {
            namespace,
            reason: "source task aborted".to_string(),
        });
    }

    let documents = consumer.await?;
    log::info!(
        "Fetched {} namespaces from {finished} sources in {} ms ({} failed)",
        documents.len(),
        started.elapsed().as_millis(),
        failures.len()
    );

    Ok(FetchOutcome {
        documents,
        failures,
    })
}

async fn report_source<F: Fetcher>(
    fetcher: Arc<F>,
    source: Source,
    tx: mpsc::Sender<FetchResult>,
) -> std::result::Result<(), String> {
    let namespace = source.namespace.clone();
    let result = run_source(fetcher, source).await.map_err(|e| e.to_string())?;
    tx.send(result)
        .await
        .map_err(|_| format!("result channel closed before {namespace} reported"))
}

async fn run_source<F: Fetcher>(fetcher: Arc<F>, source: Source) -> Result<FetchResult> {
    let documents = match source.mode {
        AccessMode::File => {
            let bytes = fetcher.fetch(&source, &source.path).await?;
            vec![RawDocument::new(source.path.clone(), bytes)]
        }
        AccessMode::Tree => {
            let paths = fetcher.list(&source).await?;
            fetch_children(fetcher, &source, paths).await
        }
    };

    Ok(FetchResult {
        namespace: source.namespace,
        documents,
    })
}

/// Second fan-out level: one task per listed child. A failed child is dropped on its own.
async fn fetch_children<F: Fetcher>(
    fetcher: Arc<F>,
    source: &Source,
    paths: Vec<String>,
) -> Vec<RawDocument> {
    let shared = Arc::new(source.clone());
    let mut children = JoinSet::new();

    for path in paths {
        let fetcher = Arc::clone(&fetcher);
        let source = Arc::clone(&shared);
        children.spawn(async move {
            let bytes = fetcher.fetch(&source, &path).await;
            (path, bytes)
        });
    }

    let mut documents = Vec::new();
    while let Some(joined) = children.join_next().await {
        match joined {
            Ok((path, Ok(bytes))) => documents.push(RawDocument::new(path, bytes)),
            Ok((path, Err(e))) => {
                log::debug!("Dropping {path} from {}: {e}", source.namespace)
            }
            Err(e) => log::debug!("Child fetch of {} failed: {e}", source.namespace),
        }
    }
    documents
}
