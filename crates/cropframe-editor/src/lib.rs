//! Cropframe Editor - stateful crop-editor session
//!
//! This crate hosts the interactive side of Cropframe: the gesture state
//! machine that drives the pure engine in `cropframe-core`, image
//! acquisition over HTTP, debounced viewport-resize handling, and the event
//! sink through which results flow back to the external state collaborator.
//!
//! The session is single-threaded and event-driven. The host owns the event
//! loop and the clock: it forwards pointer events, calls [`EditorSession::tick`]
//! while a settle animation is running, and supplies an [`std::time::Instant`]
//! with resize events.

pub mod debounce;
pub mod events;
pub mod fetch;
pub mod session;

pub use debounce::Debounce;
pub use events::{EditorEvents, NullEvents};
pub use fetch::{fetch_image_bytes, is_local_ref, request_url, FetchError, FetchPolicy};
pub use session::{EditorConfig, EditorError, EditorSession, Handle};
