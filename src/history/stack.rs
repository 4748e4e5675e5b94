//! Linear history of committed image states.

use crate::core::error::{EditorError, EditorResult};
use image::DynamicImage;
use log::{debug, warn};

/// Ordered stack of committed images.
///
/// Slot 0 is the floor state: the blank canvas a session starts with, or the
/// image installed by [`replace`](Self::replace). It can never be undone away, so
/// the stack always holds at least one image and [`current`](Self::current) never
/// fails.
///
/// Slots own their images. [`push`](Self::push) takes the image by value, so a
/// caller cannot keep a handle that aliases a committed slot.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    slots: Vec<DynamicImage>,
}

impl HistoryStack {
    /// Create a history whose floor state is `floor`.
    pub fn new(floor: DynamicImage) -> Self {
        Self { slots: vec![floor] }
    }

    /// The most recent committed image.
    pub fn current(&self) -> &DynamicImage {
        // The stack is never empty: `new` seeds it, `replace` refills it and `undo`
        // refuses to pop the floor.
        &self.slots[self.slots.len() - 1]
    }

    /// The floor state at index 0.
    pub fn floor(&self) -> &DynamicImage {
        &self.slots[0]
    }

    /// Whether there is anything above the floor state.
    pub fn can_undo(&self) -> bool {
        self.slots.len() > 1
    }

    /// Whether the document differs from its floor state.
    ///
    /// Always equal to [`can_undo`](Self::can_undo); kept as its own name for
    /// callers deciding whether to prompt about unsaved work.
    pub fn has_changes(&self) -> bool {
        self.can_undo()
    }

    /// Drop every slot and install `image` as the new floor.
    ///
    /// History before this call is gone for good. Staged overlay lines are not
    /// touched here; [`EditorSession::load_image`](crate::session::EditorSession::load_image)
    /// clears them alongside.
    pub fn replace(&mut self, image: DynamicImage) {
        let dropped = self.slots.len();
        self.slots.clear();
        self.slots.push(image);
        debug!("history replaced, {} slot(s) dropped", dropped);
    }

    /// Append a new top state.
    pub fn push(&mut self, image: DynamicImage) {
        self.slots.push(image);
        debug!("history push, depth {}", self.slots.len());
    }

    /// Remove and return the top state.
    ///
    /// Calling this when [`can_undo`](Self::can_undo) is false is a caller bug. It
    /// returns [`EditorError::EmptyHistory`] and leaves the stack untouched.
    pub fn undo(&mut self) -> EditorResult<DynamicImage> {
        if !self.can_undo() {
            warn!("undo rejected: only the floor state remains");
            return Err(EditorError::EmptyHistory);
        }

        let popped = self.slots.pop().ok_or(EditorError::EmptyHistory)?;
        debug!("history undo, depth {}", self.slots.len());
        Ok(popped)
    }

    /// Number of slots, floor included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Image at a version index, 0 being the floor.
    pub fn get(&self, index: usize) -> Option<&DynamicImage> {
        self.slots.get(index)
    }

    /// Iterate from the floor to the current state.
    pub fn iter(&self) -> impl Iterator<Item = &DynamicImage> {
        self.slots.iter()
    }
}
