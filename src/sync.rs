//! Persistence synchronizer: read-modify-write against the store.
//!
//! DESIGN
//! ======
//! Every write fetches the full snapshot, decodes the owning presentation,
//! swaps one field of it and puts all presentations back. The others go back
//! as the raw records they were fetched as. There is no version token,
//! so the last write to complete wins; concurrent editors are not supported.
//!
//! Structural writes go through [`Synchronizer::write_now`]. Geometry writes
//! go through [`Synchronizer::schedule_slide`], which keeps one timer per
//! slide: a new mutation cancels the pending timer and starts a fresh one, so
//! a burst settles into a single write carrying the final slide. Once a timer
//! has fired its write runs to completion. Outcomes of timed writes come back
//! over a channel and are drained with [`Synchronizer::drain_outcomes`].
//!
//! ERROR HANDLING
//! ==============
//! No retries. A failed fetch or replace is reported to the caller and the
//! store is left as it was; a snapshot that no longer contains the target
//! presentation or slide fails without writing anything.

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use canvas::doc::{Presentation, PresentationId, Slide, SlideId};
use canvas::paint::Paint;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::store::{Store, StoreError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("presentation {0} not found in store")]
    MissingPresentation(PresentationId),
    #[error("slide {0} not found in store")]
    MissingSlide(SlideId),
}

/// The field of a presentation a write replaces.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// Replace the whole `slides` array.
    Slides(Vec<Slide>),
    /// Replace one slide, matched by id, inside the freshly fetched array.
    Slide(Slide),
    DefaultBackground(Paint),
}

impl Write {
    fn label(&self) -> &'static str {
        match self {
            Self::Slides(_) => "slides",
            Self::Slide(_) => "slide",
            Self::DefaultBackground(_) => "default_background",
        }
    }

    /// Apply to the fetched copy of the owning presentation.
    fn apply(&self, presentation: &mut Presentation) -> Result<(), SyncError> {
        match self {
            Self::Slides(slides) => presentation.slides.clone_from(slides),
            Self::Slide(slide) => {
                let index = presentation.slide_index(&slide.id).ok_or(SyncError::MissingSlide(slide.id))?;
                presentation.slides[index] = slide.clone();
            }
            Self::DefaultBackground(paint) => presentation.default_background = Some(paint.clone()),
        }
        Ok(())
    }
}

/// Result of a debounced slide write.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub slide_id: SlideId,
    pub result: Result<(), SyncError>,
}

enum Signal {
    /// A newer mutation superseded this one.
    Cancel,
    /// Skip the rest of the wait.
    FireNow,
}

// =============================================================================
// READ-MODIFY-WRITE
// =============================================================================

/// Fetch, modify the presentation `presentation_id` with `write`, put everything back.
///
/// # Errors
///
/// Returns [`SyncError`] if either request fails or the target is missing.
pub async fn read_modify_write(store: &dyn Store, presentation_id: &str, write: &Write) -> Result<(), SyncError> {
    let mut snapshot = store.fetch().await?;
    let mut presentation = snapshot
        .presentation(presentation_id)?
        .ok_or_else(|| SyncError::MissingPresentation(presentation_id.to_string()))?;
    write.apply(&mut presentation)?;
    snapshot.put_presentation(&presentation)?;
    store.replace_presentations(&snapshot.presentations).await?;
    Ok(())
}

// =============================================================================
// SYNCHRONIZER
// =============================================================================

pub struct Synchronizer {
    store: Arc<dyn Store>,
    presentation_id: PresentationId,
    debounce: Duration,
    timers: HashMap<SlideId, oneshot::Sender<Signal>>,
    tasks: Vec<JoinHandle<()>>,
    outcomes_tx: mpsc::UnboundedSender<Outcome>,
    outcomes_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl Synchronizer {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, presentation_id: impl Into<PresentationId>, debounce: Duration) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            store,
            presentation_id: presentation_id.into(),
            debounce,
            timers: HashMap::new(),
            tasks: Vec::new(),
            outcomes_tx,
            outcomes_rx,
        }
    }

    #[must_use]
    pub fn presentation_id(&self) -> &str {
        &self.presentation_id
    }

    /// Read the current copy of this synchronizer's presentation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the fetch fails or the record does not decode.
    /// A missing presentation is `Ok(None)`.
    pub async fn load(&self) -> Result<Option<Presentation>, StoreError> {
        self.store.fetch().await?.presentation(&self.presentation_id)
    }

    /// Perform a structural write immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the read-modify-write fails.
    pub async fn write_now(&self, write: Write) -> Result<(), SyncError> {
        let kind = write.label();
        match read_modify_write(self.store.as_ref(), &self.presentation_id, &write).await {
            Ok(()) => {
                info!(presentation_id = %self.presentation_id, kind, "write committed");
                Ok(())
            }
            Err(e) => {
                warn!(presentation_id = %self.presentation_id, kind, error = %e, "write failed");
                Err(e)
            }
        }
    }

    /// Queue a debounced write of `slide`, superseding any pending one for the same slide.
    pub fn schedule_slide(&mut self, slide: Slide) {
        self.tasks.retain(|task| !task.is_finished());
        let slide_id = slide.id;
        if let Some(previous) = self.timers.remove(&slide_id) {
            // Fails only if the previous timer already fired; its write stands.
            if previous.send(Signal::Cancel).is_err() {
                debug!(%slide_id, "previous timer already fired");
            }
        }

        let (signal_tx, signal_rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let presentation_id = self.presentation_id.clone();
        let outcomes = self.outcomes_tx.clone();
        let debounce = self.debounce;
        debug!(%slide_id, ?debounce, "slide write scheduled");

        self.tasks.push(tokio::spawn(async move {
            let fire = tokio::select! {
                () = tokio::time::sleep(debounce) => true,
                signal = signal_rx => !matches!(signal, Ok(Signal::Cancel)),
            };
            if !fire {
                return;
            }
            let write = Write::Slide(slide);
            let result = read_modify_write(store.as_ref(), &presentation_id, &write).await;
            match &result {
                Ok(()) => info!(%presentation_id, %slide_id, "debounced write committed"),
                Err(e) => warn!(%presentation_id, %slide_id, error = %e, "debounced write failed"),
            }
            if outcomes.send(Outcome { slide_id, result }).is_err() {
                debug!(%slide_id, "synchronizer dropped before outcome delivery");
            }
        }));
        self.timers.insert(slide_id, signal_tx);
    }

    /// Slides with a timer that has not been superseded. Includes timers that already fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Outcomes of debounced writes that have finished since the last drain.
    pub fn drain_outcomes(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Wait for the next debounced outcome.
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        self.outcomes_rx.recv().await
    }

    /// Fire every pending timer now and wait for all timed writes to finish.
    pub async fn flush(&mut self) {
        for (slide_id, timer) in self.timers.drain() {
            if timer.send(Signal::FireNow).is_err() {
                debug!(%slide_id, "timer already fired");
            }
        }
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                warn!(error = %e, "debounced write task failed");
            }
        }
    }
}
