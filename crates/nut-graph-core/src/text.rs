//! Content-box measurement for labels.
//!
//! Nodes without an explicit size take the size of their rendered label, and
//! edge labels carry their own measured box. [`TextMeasure`] is the seam for
//! that measurement:
//!
//! - [`FontMeasure`] shapes text with real font metrics via `cosmic-text`.
//! - [`FixedMeasure`] uses a fixed advance per character and a fixed line
//!   height. Its results do not depend on the fonts installed on the machine,
//!   which makes it the measure of choice for tests.

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};

use crate::geometry::Size;

/// Measures the box a piece of label text occupies.
pub trait TextMeasure {
    /// Returns the unpadded size of `text`. Empty text measures as zero.
    fn measure(&self, text: &str) -> Size;
}

/// Font family and size used for label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    font_family: String,
    font_size: u16,
}

impl TextStyle {
    pub fn new(font_family: impl Into<String>, font_size: u16) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
        }
    }

}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("sans-serif", 12)
    }
}

/// Shared font database; loading system fonts is expensive so it happens once.
static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

fn font_system() -> &'static Mutex<FontSystem> {
    FONT_SYSTEM.get_or_init(|| {
        info!("Initializing FontSystem");
        Mutex::new(FontSystem::new())
    })
}

/// Measures text by shaping it with `cosmic-text`.
#[derive(Debug, Clone, Default)]
pub struct FontMeasure {
    style: TextStyle,
}

impl FontMeasure {
    pub fn new(style: TextStyle) -> Self {
        Self { style }
    }
}

impl TextMeasure for FontMeasure {
    fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = font_system()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Points to pixels at standard DPI.
        let font_size_px = self.style.font_size as f32 * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(&self.style.font_family));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let mut runs = 0usize;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
            runs += 1;
        }

        if runs == 0 {
            // No usable font; estimate from the character count.
            debug!(text; "No layout runs for label, estimating size");
            max_width = text.chars().count() as f32 * (font_size_px * 0.55);
            total_height = metrics.line_height;
        }

        Size::new(max_width, total_height)
    }
}

/// Deterministic measure: `advance` per character of the longest line,
/// `line_height` per line.
///
/// # Examples
///
/// ```
/// # use nut_graph_core::text::{FixedMeasure, TextMeasure};
/// let measure = FixedMeasure::new(8.0, 16.0);
///
/// let size = measure.measure("UPS\nonline");
/// assert_eq!(size.width(), 48.0);
/// assert_eq!(size.height(), 32.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasure {
    advance: f32,
    line_height: f32,
}

impl FixedMeasure {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self::new(7.0, 16.0)
    }
}

impl TextMeasure for FixedMeasure {
    fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let (lines, longest) = text
            .lines()
            .fold((0usize, 0usize), |(lines, longest), line| {
                (lines + 1, longest.max(line.chars().count()))
            });

        Size::new(
            longest as f32 * self.advance,
            lines.max(1) as f32 * self.line_height,
        )
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(&self, text: &str) -> Size {
        (**self).measure(text)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn measure(&self, text: &str) -> Size {
        (**self).measure(text)
    }
}
