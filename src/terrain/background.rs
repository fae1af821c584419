//! Terrain builds off the render path
//!
//! Large grids take far longer than a frame to build. The pipeline runs on a
//! tokio blocking thread and the finished terrain is handed over whole; there
//! is no partial result and no cancellation.

use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use super::config::{Terrain, TerrainConfig};
use crate::core::{Error, Result};

/// Build a terrain on the blocking pool and await the result
pub async fn build_async(config: TerrainConfig) -> Result<Terrain> {
    tokio::task::spawn_blocking(move || config.build())
        .await
        .map_err(|e| Error::Background(e.to_string()))?
}

/// A terrain build in flight, polled once per frame
pub struct PendingTerrain {
    rx: Option<oneshot::Receiver<Result<Terrain>>>,
    started: Instant,
}

impl PendingTerrain {
    /// Start building on the given runtime's blocking pool
    pub fn spawn(handle: &Handle, config: TerrainConfig) -> Self {
        let (tx, rx) = oneshot::channel();
        handle.spawn_blocking(move || {
            // Receiver may already be gone if the caller lost interest
            let _ = tx.send(config.build());
        });
        Self { rx: Some(rx), started: Instant::now() }
    }

    /// Take the result if the build has finished.
    ///
    /// Returns `Some` exactly once; later calls return `None`.
    pub fn try_take(&mut self) -> Option<Result<Terrain>> {
        let rx = self.rx.as_mut()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => {
                Err(Error::Background("terrain build ended without a result".to_string()))
            }
        };
        self.rx = None;
        log::info!("Background terrain build finished after {:.1}s", self.started.elapsed().as_secs_f64());
        Some(result)
    }

    /// Whether the result has already been taken
    pub fn is_taken(&self) -> bool {
        self.rx.is_none()
    }
}
