//! Async analysis worker: requests in, responses out, no shared state.
//!
//! Analysis runs off the interactive thread so rapid note toggling never
//! blocks input handling. Requests can be dispatched faster than they
//! complete, so each carries a monotonically increasing id; the consumer
//! keeps only the response matching the newest submitted id. There is no
//! cancellation — each run is a bounded enumeration over at most twelve
//! roots, so "cancelling" means ignoring a stale response.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::envelope::{AnalysisRequest, AnalysisResponse};
use crate::Engine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRequest {
    pub id: u64,
    pub request: AnalysisRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResponse {
    pub id: u64,
    pub response: AnalysisResponse,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("analysis service is no longer running")]
    Closed,
}

/// Spawns the worker task and hands back the submission side plus the
/// response stream.
pub struct AnalysisService;

impl AnalysisService {
    /// Spawn onto the current tokio runtime. `buffer` bounds both
    /// channels; the worker drains requests strictly in order.
    pub fn spawn(engine: Engine, buffer: usize) -> (AnalysisHandle, mpsc::Receiver<TaggedResponse>) {
        let (request_tx, mut request_rx) = mpsc::channel::<TaggedRequest>(buffer);
        let (response_tx, response_rx) = mpsc::channel::<TaggedResponse>(buffer);

        tokio::spawn(async move {
            while let Some(TaggedRequest { id, request }) = request_rx.recv().await {
                let response = engine.analyze(&request);
                if response_tx.send(TaggedResponse { id, response }).await.is_err() {
                    break; // consumer dropped the stream
                }
            }
            debug!("analysis service stopped");
        });

        let handle = AnalysisHandle {
            request_tx,
            latest: Arc::new(AtomicU64::new(0)),
        };
        (handle, response_rx)
    }
}

/// Submission handle; clones share the id sequence.
#[derive(Clone)]
pub struct AnalysisHandle {
    request_tx: mpsc::Sender<TaggedRequest>,
    latest: Arc<AtomicU64>,
}

impl AnalysisHandle {
    /// Submit a request, returning the id assigned to it.
    pub async fn submit(&self, request: AnalysisRequest) -> Result<u64, ServiceError> {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.request_tx
            .send(TaggedRequest { id, request })
            .await
            .map_err(|_| ServiceError::Closed)?;
        Ok(id)
    }

    /// Id of the most recently submitted request.
    pub fn latest_id(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Whether a response corresponds to the newest request. Stale
    /// responses must be discarded, never displayed.
    pub fn is_current(&self, response: &TaggedResponse) -> bool {
        response.id == self.latest_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_echo_request_ids_in_order() {
        let (handle, mut responses) = AnalysisService::spawn(Engine::new(), 8);

        let id = handle.submit(AnalysisRequest::new(vec![60, 64, 67])).await.unwrap();
        let tagged = responses.recv().await.unwrap();
        assert_eq!(tagged.id, id);
        assert_eq!(tagged.response.resolved.root_name, "C");
        assert!(handle.is_current(&tagged));
    }

    #[tokio::test]
    async fn stale_responses_are_flagged() {
        let (handle, mut responses) = AnalysisService::spawn(Engine::new(), 8);

        handle.submit(AnalysisRequest::new(vec![60, 64, 67])).await.unwrap();
        handle.submit(AnalysisRequest::new(vec![60, 64, 67, 70])).await.unwrap();

        let first = responses.recv().await.unwrap();
        let second = responses.recv().await.unwrap();

        // The first chord's analysis arrived after a newer request; it
        // must be ignored in favor of the second.
        assert!(!handle.is_current(&first));
        assert!(handle.is_current(&second));
        assert_eq!(second.response.resolved.root_name, "C");
        assert_eq!(second.response.resolved.function, "Minor 7th");
    }

    #[tokio::test]
    async fn dropped_worker_surfaces_closed_error() {
        let (handle, responses) = AnalysisService::spawn(Engine::new(), 1);
        drop(responses);
        // The worker exits once it notices the closed response channel;
        // subsequent submits eventually fail.
        let mut saw_closed = false;
        for _ in 0..8 {
            if handle.submit(AnalysisRequest::new(vec![60])).await.is_err() {
                saw_closed = true;
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(saw_closed);
    }
}
