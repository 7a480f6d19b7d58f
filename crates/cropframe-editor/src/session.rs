//! The editor session: gesture state machine and animation driver.
//!
//! A session moves between three phases. **Idle**: no active gesture.
//! **Dragging**: a pointer holds a corner handle or the border; every move
//! routes through the constraint solver (corners) or the bounds slide
//! (border). **Settling**: the pointer lifted and a fixed-step interpolation
//! converges on the recentered layout; the final step derives the
//! normalized crop and emits it through the event sink.
//!
//! Starting a drag while a settle is in flight cancels the settle, as does
//! teardown. Only one gesture or settle is ever active.

use std::time::{Duration, Instant};

use cropframe_core::animate::{Settle, SettleStep, SETTLE_STEPS, SETTLE_STEP_DURATION};
use cropframe_core::geometry::{
    fit_image, recenter_deltas, to_normalized, to_screen, CropGeometry, Rect, ViewportSize,
};
use cropframe_core::raster::{draw_preview, export_crop, ExportError, Surface};
use cropframe_core::{
    slide_bounds, solve_edges, AspectRatio, Bitmap, NormalizedCrop, ProposedEdges, Transform,
};
use thiserror::Error;

use crate::debounce::{Debounce, RESIZE_DEBOUNCE};
use crate::events::EditorEvents;
use crate::fetch::{fetch_image_bytes, FetchError, FetchPolicy};

/// Fraction of the viewport the displayed crop should fill at rest.
pub const RENDER_FILL_FRACTION: f64 = 0.85;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// An operation needed the source bitmap before one was loaded.
    #[error("No image has been loaded")]
    ImageNotLoaded,

    /// Producing the output buffer failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// The draggable parts of the crop UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    /// The image border: dragging it slides the bounds under a fixed box.
    Border,
}

/// Tunables for a session. The defaults reproduce the stock behavior:
/// 85% fill, 25 settle steps at 3ms, 200ms resize coalescing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub fill_fraction: f64,
    pub settle_steps: u32,
    pub settle_step: Duration,
    pub resize_debounce: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fill_fraction: RENDER_FILL_FRACTION,
            settle_steps: SETTLE_STEPS,
            settle_step: SETTLE_STEP_DURATION,
            resize_debounce: RESIZE_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Dragging {
        handle: Handle,
        /// Bounds captured at drag start; edge solves reset to these.
        initial_bounds: Rect,
    },
    Settling(Settle),
}

/// A stateful crop-editor session.
pub struct EditorSession {
    config: EditorConfig,
    geometry: Option<CropGeometry>,
    bitmap: Option<Bitmap>,
    viewport: ViewportSize,
    transform: Transform,
    aspect: AspectRatio,
    phase: Phase,
    resize_gate: Debounce,
    is_live: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            geometry: None,
            bitmap: None,
            viewport: ViewportSize::default(),
            transform: Transform::default(),
            aspect: AspectRatio::default(),
            phase: Phase::Idle,
            resize_gate: Debounce::new(config.resize_debounce),
            is_live: true,
        }
    }

    // ------------------------------------------------------------------
    // Collaborator inputs

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect
    }

    // ------------------------------------------------------------------
    // Image acquisition

    /// Fetch the source, decode it, and lay out the canvas.
    ///
    /// Blocking; the host calls this off its interactive path and the
    /// session discards the result if it was torn down in the meantime.
    pub fn load(
        &mut self,
        src: &str,
        policy: FetchPolicy,
        viewport: ViewportSize,
        events: &mut dyn EditorEvents,
    ) {
        match fetch_image_bytes(src, policy) {
            Ok(bytes) => self.load_from_bytes(&bytes, viewport, events),
            Err(error) => events.load_error(error),
        }
    }

    /// Decode already-acquired bytes and lay out the canvas.
    ///
    /// A torn-down session ignores the bytes entirely. On success the
    /// bounds fill `fill_fraction` of the viewport preserving the image
    /// ratio and the crop box starts as the full bounds.
    pub fn load_from_bytes(
        &mut self,
        bytes: &[u8],
        viewport: ViewportSize,
        events: &mut dyn EditorEvents,
    ) {
        if !self.is_live {
            return;
        }

        match Bitmap::decode(bytes) {
            Ok(bitmap) => {
                self.viewport = viewport;
                self.geometry = Some(fit_image(
                    bitmap.width,
                    bitmap.height,
                    viewport,
                    self.config.fill_fraction,
                ));
                self.bitmap = Some(bitmap);
                self.phase = Phase::Idle;
                self.resize_gate.reset();
                events.image_loaded();
            }
            Err(error) => events.load_error(FetchError::Decode(error)),
        }
    }

    pub fn is_image_loaded(&self) -> bool {
        self.bitmap.is_some()
    }

    // ------------------------------------------------------------------
    // Gestures

    /// Start a drag on a handle. Cancels any settle still in flight.
    pub fn begin_drag(&mut self, handle: Handle) {
        let Some(geometry) = self.geometry else {
            return;
        };

        self.phase = Phase::Dragging {
            handle,
            initial_bounds: geometry.bounds,
        };
    }

    /// Move a corner handle to an absolute pointer position.
    pub fn drag_handle_to(&mut self, x: f64, y: f64) {
        let (handle, initial_bounds) = match &self.phase {
            Phase::Dragging {
                handle,
                initial_bounds,
            } => (*handle, *initial_bounds),
            _ => return,
        };
        let Some(geometry) = self.geometry else {
            return;
        };

        let proposed = match handle {
            Handle::TopLeft => ProposedEdges::top_left(x, y),
            Handle::TopRight => ProposedEdges::top_right(x, y),
            Handle::BottomRight => ProposedEdges::bottom_right(x, y),
            Handle::BottomLeft => ProposedEdges::bottom_left(x, y),
            Handle::Border => return,
        };

        self.geometry = Some(solve_edges(
            proposed,
            &geometry,
            self.aspect,
            &self.transform,
            initial_bounds,
        ));
    }

    /// Slide the border by the cumulative pointer delta since drag start.
    pub fn drag_border_by(&mut self, dx: f64, dy: f64) {
        let initial_bounds = match &self.phase {
            Phase::Dragging {
                handle: Handle::Border,
                initial_bounds,
            } => *initial_bounds,
            _ => return,
        };
        let Some(geometry) = self.geometry else {
            return;
        };

        let bounds = slide_bounds(geometry.crop_box, initial_bounds, dx, dy);
        self.geometry = Some(geometry.with_bounds(bounds));
    }

    /// Finish the gesture and start the settle animation.
    pub fn end_drag(&mut self) {
        if !matches!(self.phase, Phase::Dragging { .. }) {
            return;
        }
        let Some(geometry) = self.geometry else {
            self.phase = Phase::Idle;
            return;
        };

        let deltas = recenter_deltas(&geometry, self.viewport, self.config.fill_fraction);
        self.phase = Phase::Settling(Settle::new(
            deltas,
            self.config.settle_steps,
            self.config.settle_step,
        ));
    }

    /// Advance an in-flight settle by one step.
    ///
    /// Returns true if a step was applied, in which case the host should
    /// redraw and schedule the next tick after [`EditorConfig::settle_step`].
    /// The final step emits the normalized crop through the sink, exactly
    /// once per gesture.
    pub fn tick(&mut self, events: &mut dyn EditorEvents) -> bool {
        let Phase::Settling(settle) = &mut self.phase else {
            return false;
        };
        let Some(geometry) = self.geometry else {
            self.phase = Phase::Idle;
            return false;
        };

        let (moved, step) = settle.advance(geometry);
        self.geometry = Some(moved);

        if step == SettleStep::Finished {
            self.phase = Phase::Idle;
            events.crop_committed(to_normalized(moved.crop_box, moved.bounds));
        }
        true
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.phase, Phase::Settling(_))
    }

    /// How long the host should wait before the next [`EditorSession::tick`],
    /// or `None` when no settle is in flight.
    pub fn next_tick_delay(&self) -> Option<Duration> {
        match &self.phase {
            Phase::Settling(settle) if !settle.is_finished() => Some(settle.step_duration()),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Viewport

    /// Handle a container resize, coalesced to the configured spacing.
    ///
    /// The current normalized crop is preserved across the relayout.
    /// Returns true if the event was handled (not debounced away).
    pub fn viewport_resized(&mut self, viewport: ViewportSize, now: Instant) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        if !self.resize_gate.accept(now) {
            return false;
        }

        let crop = to_normalized(geometry.crop_box, geometry.bounds);
        let refit = fit_image(
            geometry.image_width,
            geometry.image_height,
            viewport,
            self.config.fill_fraction,
        );

        self.viewport = viewport;
        self.geometry = Some(refit.with_crop_box(to_screen(crop, refit.bounds)));
        true
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    // ------------------------------------------------------------------
    // Output

    /// Redraw the preview into a freshly sized surface.
    pub fn render(&self) -> Option<Surface> {
        let bitmap = self.bitmap.as_ref()?;
        let geometry = self.geometry?;

        let mut surface = Surface::sized_to(self.viewport);
        draw_preview(&mut surface, bitmap, &geometry, &self.transform);
        Some(surface)
    }

    /// Export the committed crop from the source-resolution bitmap.
    pub fn export(&self, crop: NormalizedCrop, mime_type: &str) -> Result<Vec<u8>, EditorError> {
        let bitmap = self.bitmap.as_ref().ok_or(EditorError::ImageNotLoaded)?;
        Ok(export_crop(bitmap, &self.transform, crop, mime_type)?)
    }

    /// The crop the box currently selects, before any commit.
    pub fn current_crop(&self) -> Option<NormalizedCrop> {
        self.geometry
            .map(|g| to_normalized(g.crop_box, g.bounds))
    }

    pub fn geometry(&self) -> Option<CropGeometry> {
        self.geometry
    }

    // ------------------------------------------------------------------
    // Teardown

    /// Stop the session: cancels any settle and makes late fetch results
    /// no-ops. Idempotent.
    pub fn teardown(&mut self) {
        self.is_live = false;
        self.phase = Phase::Idle;
    }

    pub fn is_live(&self) -> bool {
        self.is_live
    }
}
