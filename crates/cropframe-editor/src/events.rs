//! Event sink through which the session reports to its collaborator.

use cropframe_core::NormalizedCrop;

use crate::fetch::FetchError;

/// Callbacks produced by an [`crate::EditorSession`].
///
/// The external state collaborator implements this to receive the committed
/// crop, the load notification, and acquisition failures. Every method has
/// an empty default so implementors subscribe only to what they need.
pub trait EditorEvents {
    /// A gesture settled; called exactly once per completed gesture with
    /// the resulting normalized crop.
    fn crop_committed(&mut self, _crop: NormalizedCrop) {}

    /// The source bitmap decoded and the initial layout is in place.
    fn image_loaded(&mut self) {}

    /// Image acquisition failed; the session stays in its pre-load state.
    fn load_error(&mut self, _error: FetchError) {}
}

/// A sink that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEvents;

impl EditorEvents for NullEvents {}
