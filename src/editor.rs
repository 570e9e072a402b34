//! Editor session: one open presentation and the machinery around it.
//!
//! DESIGN
//! ======
//! The session owns the in-memory presentation, the navigator, the
//! drag/resize controller and the synchronizer. Structural edits (slides
//! added, deleted or reordered, backgrounds, element add/edit/delete) build
//! the new state on a copy, write it immediately and only then adopt it, so
//! a failed write leaves the model exactly as it was.
//!
//! Geometry commits from the controller are the exception: they are applied
//! to the model at once, so the element stays where it was dropped, and the
//! slide is handed to the synchronizer's debounced stream. Pending geometry
//! is flushed before any structural write.
//!
//! ERROR HANDLING
//! ==============
//! Every failure the user should see becomes a [`Notice`]. Operations also
//! return the error so callers can react; nothing is retried.

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;

use canvas::doc::{ElementId, Presentation, Slide, SlideId};
use canvas::engine::{Action, EngineCore};
use canvas::geometry::{PercentRect, Point, Viewport};
use canvas::input::Button;
use canvas::paint::Paint;
use canvas::render::{Scene, layout};
use canvas::validate::{ElementDraft, ValidationError};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::navigator::Navigator;
use crate::rearrange::{DropResult, reorder};
use crate::sync::{Outcome, SyncError, Synchronizer, Write};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("cannot delete the only slide")]
    LastSlide,
    #[error("no presentation is open")]
    NoPresentation,
    #[error("element {0} is not on the current slide")]
    NoSuchElement(ElementId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Which background a paint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundScope {
    /// Override on the active slide only.
    CurrentSlide,
    /// The presentation default, used by slides without an override.
    Default,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

// =============================================================================
// EDITOR
// =============================================================================

pub struct Editor {
    sync: Synchronizer,
    presentation: Option<Presentation>,
    navigator: Navigator,
    engine: EngineCore,
    notices: Vec<Notice>,
}

impl Editor {
    /// Load the synchronizer's presentation and seed the navigator from `location`.
    ///
    /// A presentation missing from the store opens an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Sync`] if the store cannot be read.
    pub async fn open(sync: Synchronizer, location: Url) -> Result<Self, EditError> {
        let presentation = sync.load().await.map_err(SyncError::from)?;
        match &presentation {
            Some(p) => info!(presentation_id = %p.id, slides = p.slides.len(), "presentation opened"),
            None => warn!(presentation_id = %sync.presentation_id(), "presentation not found"),
        }
        let len = presentation.as_ref().map_or(0, |p| p.slides.len());
        Ok(Self {
            sync,
            presentation,
            navigator: Navigator::new(location, len),
            engine: EngineCore::default(),
            notices: Vec::new(),
        })
    }

    // --- Queries ---

    #[must_use]
    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.navigator.index()
    }

    #[must_use]
    pub fn current_slide(&self) -> Option<&Slide> {
        self.presentation.as_ref()?.slides.get(self.navigator.index())
    }

    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.presentation.as_ref().map_or(0, |p| p.slides.len())
    }

    #[must_use]
    pub fn location(&self) -> &Url {
        self.navigator.location()
    }

    #[must_use]
    pub fn can_previous(&self) -> bool {
        self.navigator.can_previous()
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.navigator.can_next(self.slide_count())
    }

    /// Lay out the active slide with any in-progress gesture applied.
    #[must_use]
    pub fn render(&self) -> Option<Scene<'_>> {
        let presentation = self.presentation.as_ref()?;
        let slide = presentation.slides.get(self.navigator.index())?;
        let default = presentation.effective_default_background();
        Some(layout(slide, &default, self.engine.viewport, self.engine.preview()))
    }

    /// Notices collected since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- Navigation ---

    pub fn next(&mut self) -> bool {
        let moved = self.navigator.next(self.slide_count());
        if moved {
            self.engine.cancel();
        }
        moved
    }

    pub fn previous(&mut self) -> bool {
        let moved = self.navigator.previous();
        if moved {
            self.engine.cancel();
        }
        moved
    }

    pub fn goto(&mut self, index: usize) {
        self.navigator.goto(index, self.slide_count());
        self.engine.cancel();
    }

    // --- Structural edits ---

    /// Append a blank slide and move to it.
    ///
    /// # Errors
    ///
    /// Returns an error if no presentation is open or the write fails.
    pub async fn add_slide(&mut self) -> Result<SlideId, EditError> {
        let mut slides = self.slides()?.to_vec();
        let slide = Slide::blank();
        let id = slide.id;
        slides.push(slide);
        let len = slides.len();
        self.commit_slides(slides, "Failed to add slide").await?;
        self.navigator.on_append(len);
        self.engine.cancel();
        Ok(id)
    }

    /// Delete the active slide. The only slide of a presentation cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::LastSlide`] without writing when one slide is left,
    /// or the write error.
    pub async fn delete_slide(&mut self) -> Result<SlideId, EditError> {
        let mut slides = self.slides()?.to_vec();
        if slides.len() <= 1 {
            self.notify(EditError::LastSlide.to_string());
            return Err(EditError::LastSlide);
        }
        let index = self.navigator.index().min(slides.len() - 1);
        let removed = slides.remove(index);
        let len = slides.len();
        self.commit_slides(slides, "Failed to delete slide").await?;
        self.navigator.on_delete(index, len);
        self.engine.cancel();
        Ok(removed.id)
    }

    /// Apply a drag-and-drop reorder. Returns false when the drop was a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if no presentation is open or the write fails.
    pub async fn rearrange(&mut self, drop: DropResult) -> Result<bool, EditError> {
        let Some(slides) = reorder(self.slides()?, drop) else {
            return Ok(false);
        };
        self.commit_slides(slides, "Failed to reorder slides").await?;
        self.engine.cancel();
        Ok(true)
    }

    /// Set the active slide's background override or the presentation default.
    ///
    /// # Errors
    ///
    /// Returns an error if no presentation is open or the write fails.
    pub async fn set_background(&mut self, scope: BackgroundScope, paint: Paint) -> Result<(), EditError> {
        match scope {
            BackgroundScope::CurrentSlide => {
                let index = self.navigator.index();
                let mut slides = self.slides()?.to_vec();
                let slide = slides.get_mut(index).ok_or(EditError::NoPresentation)?;
                slide.background_color = Some(paint);
                self.commit_slides(slides, "Failed to save background").await
            }
            BackgroundScope::Default => {
                if self.presentation.is_none() {
                    return Err(EditError::NoPresentation);
                }
                self.settle().await;
                self.write(Write::DefaultBackground(paint.clone()), "Failed to save background").await?;
                if let Some(p) = self.presentation.as_mut() {
                    p.default_background = Some(paint);
                }
                Ok(())
            }
        }
    }

    /// Validate `draft` and add it to the active slide on top of everything else.
    ///
    /// # Errors
    ///
    /// Returns the violated constraint, or the write error.
    pub async fn add_element(&mut self, draft: &ElementDraft) -> Result<ElementId, EditError> {
        let index = self.navigator.index();
        let mut slides = self.slides()?.to_vec();
        let slide = slides.get_mut(index).ok_or(EditError::NoPresentation)?;
        let element = self.validated(draft.build(Uuid::new_v4(), slide.next_layer()))?;
        let id = element.id;
        slide.elements.push(element);
        self.commit_slides(slides, "Failed to add element").await?;
        Ok(id)
    }

    /// Validate `draft` and replace element `id` with it, keeping its layer.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoSuchElement`], the violated constraint, or the write error.
    pub async fn update_element(&mut self, id: ElementId, draft: &ElementDraft) -> Result<(), EditError> {
        let index = self.navigator.index();
        let mut slides = self.slides()?.to_vec();
        let slide = slides.get_mut(index).ok_or(EditError::NoPresentation)?;
        let layer = slide.element(&id).ok_or(EditError::NoSuchElement(id))?.layer;
        let element = self.validated(draft.build(id, layer))?;
        slide.replace_element(element);
        self.commit_slides(slides, "Failed to update element").await
    }

    /// Remove element `id` from the active slide.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoSuchElement`] or the write error.
    pub async fn delete_element(&mut self, id: ElementId) -> Result<(), EditError> {
        let index = self.navigator.index();
        let mut slides = self.slides()?.to_vec();
        let slide = slides.get_mut(index).ok_or(EditError::NoPresentation)?;
        slide.remove_element(&id).ok_or(EditError::NoSuchElement(id))?;
        self.commit_slides(slides, "Failed to delete element").await?;
        self.engine.cancel();
        Ok(())
    }

    // --- Pointer input ---

    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<Action> {
        self.engine.set_viewport(viewport)
    }

    pub fn pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let Some(slide) = self.presentation.as_ref().and_then(|p| p.slides.get(self.navigator.index())) else {
            return Vec::new();
        };
        self.engine.on_pointer_down(pt, button, slide)
    }

    pub fn pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let Some(slide) = self.presentation.as_ref().and_then(|p| p.slides.get(self.navigator.index())) else {
            return Vec::new();
        };
        self.engine.on_pointer_move(pt, slide)
    }

    /// Finish a gesture. Committed geometry is applied now and saved debounced.
    pub fn pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let actions = self.engine.on_pointer_up(pt);
        for action in &actions {
            if let Action::GeometryCommitted { id, rect } = action {
                self.commit_geometry(*id, *rect);
            }
        }
        actions
    }

    pub fn pointer_leave(&mut self) -> Vec<Action> {
        self.engine.on_pointer_leave()
    }

    pub fn double_click(&mut self, pt: Point) -> Vec<Action> {
        let Some(slide) = self.presentation.as_ref().and_then(|p| p.slides.get(self.navigator.index())) else {
            return Vec::new();
        };
        self.engine.on_double_click(pt, slide)
    }

    // --- Debounced writes ---

    /// Collect finished geometry writes, turning failures into notices.
    pub fn poll(&mut self) -> Vec<Outcome> {
        let outcomes = self.sync.drain_outcomes();
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                self.notify(format!("Failed to save slide: {e}"));
            }
        }
        outcomes
    }

    /// Write all pending geometry now and collect the results.
    pub async fn flush(&mut self) -> Vec<Outcome> {
        self.sync.flush().await;
        self.poll()
    }

    // --- Internals ---

    fn slides(&self) -> Result<&[Slide], EditError> {
        self.presentation.as_ref().map(|p| p.slides.as_slice()).ok_or(EditError::NoPresentation)
    }

    fn notify(&mut self, message: String) {
        warn!(%message, "notice");
        self.notices.push(Notice { message });
    }

    fn validated<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, EditError> {
        result.map_err(|e| {
            self.notify(format!("Invalid element: {e}"));
            EditError::Validation(e)
        })
    }

    fn commit_geometry(&mut self, id: ElementId, rect: PercentRect) {
        let index = self.navigator.index();
        let Some(slide) = self.presentation.as_mut().and_then(|p| p.slides.get_mut(index)) else {
            return;
        };
        if slide.element(&id).is_some_and(|e| e.rect == rect) {
            return;
        }
        if slide.set_geometry(&id, rect) {
            self.sync.schedule_slide(slide.clone());
        }
    }

    /// Let pending geometry writes land before a structural write.
    async fn settle(&mut self) {
        if self.sync.pending() > 0 {
            self.flush().await;
        }
    }

    async fn write(&mut self, write: Write, failure: &str) -> Result<(), EditError> {
        match self.sync.write_now(write).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notify(format!("{failure}: {e}"));
                Err(e.into())
            }
        }
    }

    /// Write `slides` as the whole slide list, adopting it on success.
    async fn commit_slides(&mut self, slides: Vec<Slide>, failure: &str) -> Result<(), EditError> {
        self.settle().await;
        self.write(Write::Slides(slides.clone()), failure).await?;
        if let Some(p) = self.presentation.as_mut() {
            p.slides = slides;
        }
        Ok(())
    }
}
