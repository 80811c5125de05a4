//! Asynchronous bulk import and removal
//!
//! Drains a stream of quads into a store one item at a time, through the
//! same add/remove operations as single quads. The returned future resolves
//! once the stream ends, or with the first source error.

use super::factory::DataFactory;
use super::store::{QuadStore, StoreError, StoreResult};
use super::types::Quad;
use anyhow::Context;
use futures::{Stream, StreamExt};
use tracing::info;

/// Outcome of draining a quad stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Quads read from the stream
    pub seen: usize,

    /// Quads that changed the store
    pub applied: usize,
}

#[derive(Debug, Clone, Copy)]
enum StreamAction {
    Import,
    Remove,
}

impl<F: DataFactory> QuadStore<F> {
    /// Add every quad of a stream
    ///
    /// Quads added before a failing item stay in the store.
    pub async fn import<S, E>(&mut self, stream: S) -> StoreResult<StreamSummary>
    where
        S: Stream<Item = Result<Quad, E>>,
        E: Into<anyhow::Error>,
    {
        self.drain(stream, StreamAction::Import).await
    }

    /// Remove every quad of a stream, skipping absent ones
    pub async fn remove_stream<S, E>(&mut self, stream: S) -> StoreResult<StreamSummary>
    where
        S: Stream<Item = Result<Quad, E>>,
        E: Into<anyhow::Error>,
    {
        self.drain(stream, StreamAction::Remove).await
    }

    async fn drain<S, E>(&mut self, stream: S, action: StreamAction) -> StoreResult<StreamSummary>
    where
        S: Stream<Item = Result<Quad, E>>,
        E: Into<anyhow::Error>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut summary = StreamSummary::default();

        while let Some(item) = stream.next().await {
            let quad = item
                .map_err(Into::<anyhow::Error>::into)
                .with_context(|| format!("quad stream failed after {} quads", summary.seen))
                .map_err(StoreError::Stream)?;
            summary.seen += 1;

            let applied = match action {
                StreamAction::Import => self.add_quad(&quad)?,
                StreamAction::Remove => self.remove_quad(&quad),
            };
            if applied {
                summary.applied += 1;
            }
        }

        info!(
            "Stream {:?} finished: {} quads seen, {} applied, store size {}",
            action,
            summary.seen,
            summary.applied,
            self.len()
        );
        Ok(summary)
    }
}
