//! Editing sessions.
//!
//! An [`EditorSession`] owns one [`HistoryStack`] and one [`OverlayStagingBuffer`].
//! Every filter follows the same path: copy the current image, transform the copy,
//! push it. A filter that fails pushes nothing, so the history only ever changes
//! by exactly one slot per successful operation.
//!
//! Sessions are independent values. To share one across threads, wrap it in a
//! [`SharedSession`] and lock around each operation.

pub mod codec;

use crate::core::config::{ClaheParams, FilterSettings, ScaleParams, SessionConfig};
use crate::core::error::{EditorError, EditorResult, SessionId};
use crate::core::node::ImageFilter;
use crate::core::types::{blank_canvas, Color, Rgb};
use crate::filters::builtin::{Clahe, ContrastScale, Grayscale, HistogramEqualize, Negative, Resize};
use crate::filters::registry::FilterRegistry;
use crate::history::{HistoryStack, LineRequest, OverlayStagingBuffer};
use image::DynamicImage;
use log::{debug, info};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A session guarded for use from several threads.
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// One document being edited.
#[derive(Debug)]
pub struct EditorSession {
    id: SessionId,
    config: SessionConfig,
    history: HistoryStack,
    overlay: OverlayStagingBuffer,
    registry: FilterRegistry,
}

impl EditorSession {
    /// Start a session on a blank white canvas of the default size.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Start a session on a blank white canvas sized by `config`.
    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_registry(config, FilterRegistry::with_builtins())
    }

    /// Start a session that resolves [`apply`](Self::apply) names in `registry`.
    pub fn with_registry(config: SessionConfig, registry: FilterRegistry) -> Self {
        let canvas = blank_canvas(config.canvas_width, config.canvas_height, Rgb::WHITE);
        let id = SessionId::new();
        debug!(
            "session {} started on {}x{} canvas",
            id, config.canvas_width, config.canvas_height
        );

        Self {
            id,
            config,
            history: HistoryStack::new(canvas),
            overlay: OverlayStagingBuffer::new(),
            registry,
        }
    }

    /// Wrap this session for shared use.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// This session's identifier.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Settings the session was created with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Committed states.
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Lines staged for the next commit.
    pub fn overlay(&self) -> &OverlayStagingBuffer {
        &self.overlay
    }

    /// Filters available to [`apply`](Self::apply).
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// The most recent committed image.
    pub fn current(&self) -> &DynamicImage {
        self.history.current()
    }

    /// Whether anything above the floor can be undone.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether any operation has been committed since the last load.
    pub fn has_changes(&self) -> bool {
        self.history.has_changes()
    }

    /// Drop the top state. See [`HistoryStack::undo`].
    pub fn undo(&mut self) -> EditorResult<DynamicImage> {
        self.history.undo()
    }

    // ------------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------------

    /// Open an image file as a new document.
    ///
    /// The image is resized to the canvas size and converted to 3-channel RGB. On
    /// success both the history and the staged lines are replaced; on a decode
    /// error nothing changes.
    pub fn load(&mut self, path: impl AsRef<Path>) -> EditorResult<&DynamicImage> {
        let path = path.as_ref();
        let image = codec::decode(path)?;
        info!(
            "session {}: loaded {} ({}x{})",
            self.id,
            path.display(),
            image.width(),
            image.height()
        );
        self.load_image(image)
    }

    /// Install an in-memory image as a new document. Same rules as [`load`](Self::load).
    pub fn load_image(&mut self, image: DynamicImage) -> EditorResult<&DynamicImage> {
        let resize = Resize::new(
            self.config.canvas_width,
            self.config.canvas_height,
            self.config.resize_filter,
        );
        let resized = resize.apply(image)?;
        let normalized = match resized {
            DynamicImage::ImageRgb8(_) => resized,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        self.history.replace(normalized);
        let dropped = self.overlay.discard();
        if dropped > 0 {
            debug!("session {}: discarded {} staged line(s) on load", self.id, dropped);
        }
        Ok(self.history.current())
    }

    /// Write the current image. Paths without a recognized image extension get
    /// `.jpg` appended. Returns the path written.
    pub fn save(&self, path: impl AsRef<Path>) -> EditorResult<PathBuf> {
        let path = codec::normalize_output_path(path);
        codec::encode(self.history.current(), &path)?;
        info!("session {}: saved {}", self.id, path.display());
        Ok(path)
    }

    // ------------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------------

    /// Run `filter` on a copy of the current image and push the result.
    pub fn apply_filter(&mut self, filter: &dyn ImageFilter) -> EditorResult<&DynamicImage> {
        let working = self.history.current().clone();
        let result = filter.apply(working)?;
        debug!("session {}: applied {}", self.id, filter.metadata().id);
        self.history.push(result);
        Ok(self.history.current())
    }

    /// Apply a registered filter by id, parameterized from `settings`.
    pub fn apply(&mut self, name: &str, settings: &FilterSettings) -> EditorResult<&DynamicImage> {
        let filter = self
            .registry
            .create(name, settings)
            .ok_or_else(|| EditorError::UnknownFilter(name.to_string()))?;
        self.apply_filter(filter.as_ref())
    }

    /// Apply a registered filter using the session's configured settings.
    pub fn apply_configured(&mut self, name: &str) -> EditorResult<&DynamicImage> {
        let settings = self.config.filters;
        self.apply(name, &settings)
    }

    /// Convert to single-channel gray.
    pub fn grayscale(&mut self) -> EditorResult<&DynamicImage> {
        self.apply_filter(&Grayscale)
    }

    /// Invert every channel.
    pub fn negative(&mut self) -> EditorResult<&DynamicImage> {
        self.apply_filter(&Negative)
    }

    /// Global histogram equalization of the luma channel.
    pub fn equalize_histogram(&mut self) -> EditorResult<&DynamicImage> {
        self.apply_filter(&HistogramEqualize)
    }

    /// Contrast-limited adaptive histogram equalization.
    pub fn clahe(&mut self, params: ClaheParams) -> EditorResult<&DynamicImage> {
        self.apply_filter(&Clahe::new(params))
    }

    /// Apply `min(255, |alpha * v + beta|)` to every sample.
    pub fn scale_contrast(&mut self, params: ScaleParams) -> EditorResult<&DynamicImage> {
        self.apply_filter(&ContrastScale::new(params))
    }

    // ------------------------------------------------------------------------
    // Overlay
    // ------------------------------------------------------------------------

    /// Stage a line for the next [`commit_overlay`](Self::commit_overlay).
    pub fn record_line(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: impl Into<f64>,
        color: impl Into<Color>,
    ) {
        self.overlay.record_line(x1, y1, x2, y2, width, color);
    }

    /// Flatten all staged lines into one new history entry.
    pub fn commit_overlay(&mut self) -> EditorResult<&DynamicImage> {
        self.overlay.commit(&mut self.history)?;
        Ok(self.history.current())
    }

    /// Drop staged lines without committing. Returns how many were dropped.
    pub fn discard_overlay(&mut self) -> usize {
        self.overlay.discard()
    }

    /// Lines staged but not yet committed.
    pub fn pending_lines(&self) -> &[LineRequest] {
        self.overlay.lines()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FilterError;
    use image::{GrayImage, Luma, RgbImage};

    fn small_session() -> EditorSession {
        EditorSession::with_config(SessionConfig::default().with_canvas_size(32, 32))
    }

    #[test]
    fn test_new_session_is_blank_white() {
        let session = EditorSession::new();
        let current = session.current();

        assert_eq!((current.width(), current.height()), (512, 512));
        assert_eq!(current.color(), image::ColorType::Rgb8);
        assert!(current.as_bytes().iter().all(|&v| v == 255));
        assert!(!session.can_undo());
        assert!(!session.has_changes());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = small_session();
        let b = small_session();
        a.negative().unwrap();

        assert_ne!(a.id(), b.id());
        assert!(a.can_undo());
        assert!(!b.can_undo());
    }

    #[test]
    fn test_filter_pushes_one_slot_and_returns_top() {
        let mut session = small_session();
        let returned = session.negative().unwrap().clone();

        assert_eq!(session.history().len(), 2);
        assert_eq!(&returned, session.current());
        assert!(returned.as_bytes().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_negative_twice_restores_pixels() {
        let mut session = small_session();
        session.record_line(0, 0, 31, 20, 3, "#336699");
        session.commit_overlay().unwrap();
        let before = session.current().clone();

        session.negative().unwrap();
        session.negative().unwrap();

        assert_eq!(session.current(), &before);
    }

    #[test]
    fn test_grayscale_then_undo() {
        let mut session = small_session();
        session.grayscale().unwrap();
        assert_eq!(session.current().color(), image::ColorType::L8);

        session.undo().unwrap();
        assert_eq!(session.current().color(), image::ColorType::Rgb8);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_equalize_filters_return_rgb() {
        let mut session = small_session();
        session.grayscale().unwrap();
        session.equalize_histogram().unwrap();
        assert_eq!(session.current().color(), image::ColorType::Rgb8);

        session.clahe(ClaheParams::default()).unwrap();
        assert_eq!(session.current().color(), image::ColorType::Rgb8);
        assert_eq!(session.history().len(), 4);
    }

    #[test]
    fn test_failed_filter_leaves_history_untouched() {
        let mut session = small_session();
        session.negative().unwrap();

        let err = session.clahe(ClaheParams::new(0, 0, 2.0)).unwrap_err();

        assert!(matches!(err, EditorError::Filter(FilterError::InvalidParameter { .. })));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_scale_contrast_forwards_parameters() {
        let mut session = small_session();
        session.scale_contrast(ScaleParams::new(0.5, -200.0)).unwrap();
        // |0.5 * 255 - 200| = 72.5, rounded half away from zero
        assert!(session.current().as_bytes().iter().all(|&v| v == 73));
    }

    #[test]
    fn test_apply_by_name() {
        let mut session = small_session();
        let settings = FilterSettings {
            scale: ScaleParams::new(0.0, 12.0),
            ..FilterSettings::default()
        };

        session.apply("scale_contrast", &settings).unwrap();
        assert!(session.current().as_bytes().iter().all(|&v| v == 12));

        session.apply_configured("negative").unwrap();
        assert!(session.current().as_bytes().iter().all(|&v| v == 243));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_apply_unknown_filter() {
        let mut session = small_session();
        let err = session.apply("sharpen", &FilterSettings::default()).unwrap_err();

        assert!(matches!(err, EditorError::UnknownFilter(ref name) if name == "sharpen"));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_undo_on_fresh_session_is_an_error() {
        let mut session = small_session();
        let err = session.undo().unwrap_err();
        assert!(err.is_usage_error());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_overlay_scenario() {
        let mut session = small_session();
        session.record_line(0, 0, 10, 10, 2, "#FF0000");
        session.record_line(0, 0, 10, 10, 2, Rgb::new(0, 255, 0));
        assert_eq!(session.pending_lines().len(), 2);

        session.commit_overlay().unwrap();

        assert!(session.overlay().is_empty());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.current().to_rgb8().get_pixel(5, 5).0, [0, 255, 0]);

        session.undo().unwrap();
        assert!(session.current().as_bytes().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_empty_overlay_commit_duplicates_top() {
        let mut session = small_session();
        session.negative().unwrap();
        let top = session.current().clone();

        session.commit_overlay().unwrap();

        assert_eq!(session.history().len(), 3);
        assert_eq!(session.current(), &top);
    }

    #[test]
    fn test_overlay_on_gray_image() {
        let mut session = small_session();
        session.grayscale().unwrap();
        session.record_line(0, 5, 31, 5, 1, "#000000");
        session.commit_overlay().unwrap();

        assert_eq!(session.current().color(), image::ColorType::L8);
        assert_eq!(session.current().to_luma8().get_pixel(7, 5)[0], 0);
    }

    #[test]
    fn test_load_image_replaces_history_and_overlay() {
        let mut session = small_session();
        session.negative().unwrap();
        session.grayscale().unwrap();
        session.negative().unwrap();
        session.record_line(1, 1, 4, 4, 1, "#123456");

        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 60, Luma([80])));
        session.load_image(gray).unwrap();

        let current = session.current();
        assert_eq!((current.width(), current.height()), (32, 32));
        assert_eq!(current.color(), image::ColorType::Rgb8);
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
        assert!(session.overlay().is_empty());
    }

    #[test]
    fn test_load_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        RgbImage::from_pixel(32, 32, image::Rgb([10, 200, 30]))
            .save(&source)
            .unwrap();

        let mut session = small_session();
        session.negative().unwrap();
        session.load(&source).unwrap();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current().to_rgb8().get_pixel(16, 16).0, [10, 200, 30]);

        let written = session.save(dir.path().join("result")).unwrap();
        assert_eq!(written, dir.path().join("result.jpg"));
        assert!(written.exists());

        let png = session.save(dir.path().join("result.png")).unwrap();
        let reread = image::open(&png).unwrap();
        assert_eq!(&reread, session.current());
    }

    #[test]
    fn test_save_grayscale_as_gif() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = small_session();
        session.grayscale().unwrap();

        let written = session.save(dir.path().join("out.gif")).unwrap();

        assert_eq!(written, dir.path().join("out.gif"));
        let reread = image::open(&written).unwrap();
        assert_eq!((reread.width(), reread.height()), (32, 32));
        assert!(reread.to_rgb8().get_pixel(5, 5).0.iter().all(|&v| v > 250));
    }

    #[test]
    fn test_load_missing_file_keeps_state() {
        let mut session = small_session();
        session.negative().unwrap();
        session.record_line(0, 0, 1, 1, 1, "#000000");

        let err = session.load("/no/such/file.png").unwrap_err();

        assert!(matches!(err, EditorError::Decode { .. }));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.pending_lines().len(), 1);
    }

    #[test]
    fn test_shared_session() {
        let shared = small_session().into_shared();
        let worker = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                shared.lock().negative().map(|_| ()).unwrap();
            })
        };
        worker.join().unwrap();

        assert_eq!(shared.lock().history().len(), 2);
    }
}
