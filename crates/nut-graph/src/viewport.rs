//! Viewport state and pointer interaction.
//!
//! [`ViewportState`] holds pan offset, scale, orientation and the last known
//! diagram size. Its transform operations are pure: each returns a new state.
//! [`ViewportController`] owns the state and drives it from pointer and
//! wheel events through a small `Idle`/`Panning` state machine.
//!
//! Screen and world coordinates are related by
//!
//! ```text
//! world = (position + screen) / scale
//! ```

use log::trace;

use nut_graph_core::{
    direction::{Align, RankDir},
    geometry::{Point, Size},
};

/// Smallest allowed scale.
pub const MIN_SCALE: f32 = 0.1;

/// Clamps a scale to [`MIN_SCALE`]. NaN becomes [`MIN_SCALE`].
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        MIN_SCALE
    } else {
        scale.max(MIN_SCALE)
    }
}

/// Pan/zoom/orientation state of one widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    position: Point,
    scale: f32,
    rankdir: RankDir,
    align: Option<Align>,
    size: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            position: Point::default(),
            scale: 1.0,
            rankdir: RankDir::default(),
            align: None,
            size: Size::default(),
        }
    }
}

impl ViewportState {
    pub fn new(position: Point, scale: f32, rankdir: RankDir, align: Option<Align>) -> Self {
        Self {
            position,
            scale: clamp_scale(scale),
            rankdir,
            align,
            size: Size::default(),
        }
    }

    /// Pan offset in world units.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rankdir(&self) -> RankDir {
        self.rankdir
    }

    pub fn align(&self) -> Option<Align> {
        self.align
    }

    /// Last known diagram bounding box.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Moves the pan offset by `(dx, dy)`. Scale is unchanged.
    pub fn pan(self, dx: f32, dy: f32) -> Self {
        Self {
            position: self.position.add_point(Point::new(dx, dy)),
            ..self
        }
    }

    /// Changes the scale to `new_scale` (clamped) while keeping the world
    /// point under `pivot` fixed on screen.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nut_graph::viewport::ViewportState;
    /// # use nut_graph_core::geometry::Point;
    /// let state = ViewportState::default();
    /// let pivot = Point::new(100.0, 50.0);
    ///
    /// let zoomed = state.zoom(2.0, pivot);
    /// assert_eq!(zoomed.position(), Point::new(100.0, 50.0));
    /// assert_eq!(zoomed.screen_to_world(pivot), state.screen_to_world(pivot));
    /// ```
    pub fn zoom(self, new_scale: f32, pivot: Point) -> Self {
        let scale = clamp_scale(new_scale);
        let world = self.screen_to_world(pivot);
        Self {
            position: world.scale(scale).sub_point(pivot),
            scale,
            ..self
        }
    }

    /// Sets orientation. Pan and zoom are kept.
    pub fn with_orientation(self, rankdir: RankDir, align: Option<Align>) -> Self {
        Self {
            rankdir,
            align,
            ..self
        }
    }

    pub fn with_position(self, position: Point) -> Self {
        Self { position, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        Self { size, ..self }
    }

    /// World point shown at `screen`.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.position.add_point(screen).scale(1.0 / self.scale)
    }

    /// Screen point at which `world` is shown.
    pub fn world_to_screen(&self, world: Point) -> Point {
        world.scale(self.scale).sub_point(self.position)
    }

    /// SVG transform of the diagram group, `translate(-x -y) scale(s)`.
    pub fn transform(&self) -> String {
        format!(
            "translate({} {}) scale({})",
            negate(self.position.x()),
            negate(self.position.y()),
            self.scale
        )
    }
}

/// Negation that never yields `-0`.
fn negate(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { -value }
}

/// Kind of pointing device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

/// Button bit flags of a pointer event.
pub mod buttons {
    /// Left mouse button, pen contact, touch contact.
    pub const PRIMARY: u16 = 1;
    /// Right mouse button.
    pub const SECONDARY: u16 = 2;
    /// Middle mouse button or wheel press.
    pub const AUXILIARY: u16 = 4;
}

/// Pointer sample: device, pressed buttons and screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub buttons: u16,
    pub screen: Point,
}

impl PointerInput {
    pub fn new(kind: PointerKind, buttons: u16, screen: Point) -> Self {
        Self {
            kind,
            buttons,
            screen,
        }
    }

    /// The button mask that must be held for this device to drag the view.
    fn drag_buttons(&self) -> u16 {
        match self.kind {
            PointerKind::Mouse => buttons::AUXILIARY,
            PointerKind::Pen | PointerKind::Touch => buttons::PRIMARY,
        }
    }

    /// Mice start a drag only with the auxiliary button; every other device
    /// starts one on contact.
    fn starts_drag(&self) -> bool {
        self.kind != PointerKind::Mouse || self.buttons == buttons::AUXILIARY
    }
}

/// Input events the viewport reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp,
    PointerCancel,
    Wheel { delta_y: f32 },
}

/// Transient state of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDragState {
    pub last_screen: Point,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PanState {
    #[default]
    Idle,
    Panning(PointerDragState),
}

/// Owns a [`ViewportState`] and applies input to it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    pan: PanState,
    zoom_step: f32,
    client_size: Size,
}

impl ViewportController {
    pub fn new(state: ViewportState, zoom_step: f32) -> Self {
        Self {
            state,
            pan: PanState::Idle,
            zoom_step,
            client_size: Size::default(),
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Replaces the whole state. Any drag in progress is kept.
    pub fn set_state(&mut self, state: ViewportState) {
        self.state = state;
    }

    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning(_))
    }

    pub fn client_size(&self) -> Size {
        self.client_size
    }

    pub fn set_client_size(&mut self, size: Size) {
        self.client_size = size;
    }

    /// Center of the visible client area, the pivot of wheel and attribute
    /// driven zoom.
    pub fn client_center(&self) -> Point {
        Point::new(self.client_size.width() / 2.0, self.client_size.height() / 2.0)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.state = self.state.pan(dx, dy);
    }

    pub fn zoom(&mut self, new_scale: f32, pivot: Point) {
        self.state = self.state.zoom(new_scale, pivot);
    }

    /// Sets orientation without touching pan or zoom. The caller schedules
    /// the re-layout.
    pub fn set_orientation(&mut self, rankdir: RankDir, align: Option<Align>) {
        self.state = self.state.with_orientation(rankdir, align);
    }

    pub fn set_size(&mut self, size: Size) {
        self.state = self.state.with_size(size);
    }

    /// Applies an input event. Returns `true` if the transform changed.
    pub fn handle(&mut self, event: ViewportEvent) -> bool {
        let before = self.state;

        match event {
            ViewportEvent::PointerDown(input) => {
                if input.starts_drag() {
                    trace!(kind:? = input.kind, buttons = input.buttons; "Drag start");
                    self.pan = PanState::Panning(PointerDragState {
                        last_screen: input.screen,
                    });
                }
            }
            ViewportEvent::PointerMove(input) => {
                if let PanState::Panning(drag) = self.pan {
                    if input.buttons == input.drag_buttons() {
                        let delta = drag.last_screen.sub_point(input.screen);
                        self.pan(delta.x(), delta.y());
                    }
                    self.pan = PanState::Panning(PointerDragState {
                        last_screen: input.screen,
                    });
                }
            }
            ViewportEvent::PointerUp | ViewportEvent::PointerCancel => {
                if self.is_panning() {
                    trace!("Drag end");
                }
                self.pan = PanState::Idle;
            }
            ViewportEvent::Wheel { delta_y } => {
                if delta_y != 0.0 && !delta_y.is_nan() {
                    let scale = self.state.scale() - delta_y.signum() * self.zoom_step;
                    self.zoom(scale, self.client_center());
                }
            }
        }

        self.state.position() != before.position() || self.state.scale() != before.scale()
    }
}
