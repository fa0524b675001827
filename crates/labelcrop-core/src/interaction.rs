//! Crop box interaction state machine.
//!
//! [`CropEditor`] turns pointer events in screen space into a single crop
//! box in logical page space. It has three states:
//!
//! - **Idle**: no box, no drag
//! - **Selected**: a box exists, no drag
//! - **Dragging**: creating, moving, or resizing the box by one of eight handles
//!
//! Every change to the box during a drag is reported immediately through the
//! change callback, not only when the pointer is released.
//!
//! # Listener scoping
//!
//! [`CropEditor::pointer_down`] returns `true` only when a drag started. A
//! host that routes move/up events from a global (window-level) source should
//! subscribe at that point and unsubscribe after [`CropEditor::pointer_up`]
//! or [`CropEditor::pointer_cancel`], both of which always end the drag.
//!
//! # Example
//!
//! ```
//! use labelcrop_core::{CropEditor, EditorState, Point, Size};
//!
//! let mut editor = CropEditor::new(Size::new(800.0, 1000.0));
//! assert!(editor.pointer_down(Point::new(100.0, 100.0)));
//! editor.pointer_move(Point::new(300.0, 400.0));
//! editor.pointer_up();
//!
//! assert_eq!(editor.state(), EditorState::Selected);
//! let b = editor.crop_box().unwrap();
//! assert_eq!((b.width, b.height), (200.0, 300.0));
//! ```

use std::fmt;

use crate::error::CropError;
use crate::geometry::{CropBox, MIN_BOX_SIZE, Point, Size, clamp};
use crate::mapping::screen_to_logical;

/// Side length of a handle's square hit area, in screen pixels.
pub const HANDLE_HIT_SIZE: f64 = 10.0;

/// One of the eight resize handles, named by compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Handle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Handle {
    /// Hit-test order: corners before edges.
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::NorthEast,
        Handle::SouthWest,
        Handle::SouthEast,
        Handle::North,
        Handle::South,
        Handle::East,
        Handle::West,
    ];

    /// Short compass code ("n", "se", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::North => "n",
            Handle::South => "s",
            Handle::East => "e",
            Handle::West => "w",
            Handle::NorthEast => "ne",
            Handle::NorthWest => "nw",
            Handle::SouthEast => "se",
            Handle::SouthWest => "sw",
        }
    }

    /// Parse a compass code as produced by [`Handle::as_str`].
    pub fn from_code(code: &str) -> Option<Self> {
        Handle::ALL.into_iter().find(|h| h.as_str() == code)
    }

    fn moves_north(&self) -> bool {
        matches!(self, Handle::North | Handle::NorthEast | Handle::NorthWest)
    }

    fn moves_south(&self) -> bool {
        matches!(self, Handle::South | Handle::SouthEast | Handle::SouthWest)
    }

    fn moves_east(&self) -> bool {
        matches!(self, Handle::East | Handle::NorthEast | Handle::SouthEast)
    }

    fn moves_west(&self) -> bool {
        matches!(self, Handle::West | Handle::NorthWest | Handle::SouthWest)
    }

    /// Center of this handle on `b`, in logical units.
    pub fn position(&self, b: &CropBox) -> Point {
        let x = if self.moves_west() {
            b.x
        } else if self.moves_east() {
            b.right()
        } else {
            b.x + b.width / 2.0
        };
        let y = if self.moves_north() {
            b.y
        } else if self.moves_south() {
            b.bottom()
        } else {
            b.y + b.height / 2.0
        };
        Point::new(x, y)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Empty page area outside the box (or no box).
    Canvas,
    /// Inside the box, away from handles.
    Body,
    /// One of the resize handles.
    Handle(Handle),
}

/// The kind of drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DragKind {
    Create,
    Move,
    Resize(Handle),
}

/// Observable editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Selected,
    Dragging(DragKind),
}

/// Transient state of one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    kind: DragKind,
    /// Pointer position at drag start (logical; clamped for create drags).
    start: Point,
    /// Box geometry before the drag began.
    origin: CropBox,
}

/// Callback receiving the box after every mutation (`None` when removed).
pub type ChangeCallback = Box<dyn FnMut(Option<CropBox>)>;

/// Interactive crop box editor for one page.
pub struct CropEditor {
    page: Size,
    container_origin: Point,
    zoom: f64,
    crop: Option<CropBox>,
    drag: Option<DragSession>,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for CropEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropEditor")
            .field("page", &self.page)
            .field("zoom", &self.zoom)
            .field("crop", &self.crop)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl CropEditor {
    /// Create an idle editor for a page of the given logical size, at zoom 1
    /// with the container at the screen origin.
    pub fn new(page: Size) -> Self {
        Self {
            page,
            container_origin: Point::default(),
            zoom: 1.0,
            crop: None,
            drag: None,
            on_change: None,
        }
    }

    /// Register the change callback, replacing any previous one.
    pub fn on_change(&mut self, callback: impl FnMut(Option<CropBox>) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Logical page size.
    pub fn page_size(&self) -> Size {
        self.page
    }

    /// Switch to a page of a different size. Clears the box and any drag.
    pub fn set_page_size(&mut self, page: Size) {
        self.page = page;
        self.drag = None;
        if self.crop.take().is_some() {
            self.notify();
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the display zoom factor.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), CropError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(CropError::InvalidGeometry(format!("zoom {zoom}")));
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Set the screen position of the page container's top-left corner.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.container_origin = origin;
    }

    /// Current box, if any.
    pub fn crop_box(&self) -> Option<CropBox> {
        self.crop
    }

    pub fn state(&self) -> EditorState {
        match (&self.drag, &self.crop) {
            (Some(session), _) => EditorState::Dragging(session.kind),
            (None, Some(_)) => EditorState::Selected,
            (None, None) => EditorState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Replace the box programmatically (e.g. from AI detection).
    ///
    /// The box is clipped to the page. A box smaller than the minimum size
    /// after clipping is rejected and the editor is left unchanged.
    pub fn set_box(&mut self, crop: CropBox) -> Result<CropBox, CropError> {
        let clipped = crop.clamp_to(self.page);
        if !clipped.is_finalizable() {
            return Err(CropError::InvalidGeometry(format!(
                "box {:.1}x{:.1} is below the {MIN_BOX_SIZE} unit minimum",
                clipped.width, clipped.height
            )));
        }
        self.drag = None;
        self.crop = Some(clipped);
        self.notify();
        Ok(clipped)
    }

    /// Remove the box and return to Idle.
    pub fn clear(&mut self) {
        self.drag = None;
        if self.crop.take().is_some() {
            self.notify();
        }
    }

    /// Classify a screen position against the current box.
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        let Some(crop) = self.crop else {
            return HitTarget::Canvas;
        };
        let p = self.to_logical(screen);
        let half = HANDLE_HIT_SIZE / 2.0 / self.zoom;
        for handle in Handle::ALL {
            let c = handle.position(&crop);
            if (p.x - c.x).abs() <= half && (p.y - c.y).abs() <= half {
                return HitTarget::Handle(handle);
            }
        }
        if crop.contains(p) {
            HitTarget::Body
        } else {
            HitTarget::Canvas
        }
    }

    /// Start a drag at a screen position, hit-testing to pick its kind.
    ///
    /// Returns `true` when a drag started.
    pub fn pointer_down(&mut self, screen: Point) -> bool {
        let target = self.hit_test(screen);
        self.pointer_down_on(target, screen)
    }

    /// Start a drag on an explicitly known target.
    ///
    /// Hosts that already know which element was pressed (box body, a handle
    /// element, the bare canvas) use this instead of [`pointer_down`](Self::pointer_down).
    /// Returns `false` if a drag is already in progress.
    pub fn pointer_down_on(&mut self, target: HitTarget, screen: Point) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let p = self.to_logical(screen);
        match (target, self.crop) {
            (HitTarget::Body, Some(crop)) => {
                self.drag = Some(DragSession {
                    kind: DragKind::Move,
                    start: p,
                    origin: crop,
                });
            }
            (HitTarget::Handle(handle), Some(crop)) => {
                self.drag = Some(DragSession {
                    kind: DragKind::Resize(handle),
                    start: p,
                    origin: crop,
                });
            }
            _ => {
                let start = self.clamp_point(p);
                let fresh = CropBox::new(start.x, start.y, 0.0, 0.0);
                self.drag = Some(DragSession {
                    kind: DragKind::Create,
                    start,
                    origin: fresh,
                });
                self.crop = Some(fresh);
                self.notify();
            }
        }
        true
    }

    /// Continue the active drag. Returns the current box.
    pub fn pointer_move(&mut self, screen: Point) -> Option<CropBox> {
        let Some(session) = self.drag else {
            return self.crop;
        };
        let p = self.to_logical(screen);
        let next = match session.kind {
            DragKind::Create => CropBox::from_corners(session.start, self.clamp_point(p)),
            DragKind::Move => self.moved(&session, p),
            DragKind::Resize(handle) => self.resized(&session, handle, p),
        };
        if self.crop != Some(next) {
            self.crop = Some(next);
            self.notify();
        }
        self.crop
    }

    /// Finish the active drag. Returns `true` if a drag was ended.
    ///
    /// A create drag that produced a box under the minimum size discards the
    /// box and returns the editor to Idle.
    pub fn pointer_up(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        if session.kind == DragKind::Create
            && !self.crop.is_some_and(|crop| crop.is_finalizable())
        {
            self.crop = None;
            self.notify();
        }
        true
    }

    /// Abnormal drag termination (lost capture, window blur).
    ///
    /// Ends the drag exactly like [`pointer_up`](Self::pointer_up).
    pub fn pointer_cancel(&mut self) -> bool {
        self.pointer_up()
    }

    fn to_logical(&self, screen: Point) -> Point {
        screen_to_logical(screen, self.container_origin, self.zoom)
    }

    fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            clamp(p.x, 0.0, self.page.width),
            clamp(p.y, 0.0, self.page.height),
        )
    }

    fn moved(&self, session: &DragSession, p: Point) -> CropBox {
        let o = session.origin;
        let dx = p.x - session.start.x;
        let dy = p.y - session.start.y;
        CropBox::new(
            clamp(o.x + dx, 0.0, (self.page.width - o.width).max(0.0)),
            clamp(o.y + dy, 0.0, (self.page.height - o.height).max(0.0)),
            o.width,
            o.height,
        )
    }

    fn resized(&self, session: &DragSession, handle: Handle, p: Point) -> CropBox {
        let o = session.origin;
        let dx = p.x - session.start.x;
        let dy = p.y - session.start.y;

        let mut left = o.x;
        let mut top = o.y;
        let mut right = o.right();
        let mut bottom = o.bottom();

        if handle.moves_west() {
            left = clamp(o.x + dx, 0.0, (right - MIN_BOX_SIZE).max(0.0));
        }
        if handle.moves_east() {
            right = clamp(
                o.right() + dx,
                (left + MIN_BOX_SIZE).min(self.page.width),
                self.page.width,
            );
        }
        if handle.moves_north() {
            top = clamp(o.y + dy, 0.0, (bottom - MIN_BOX_SIZE).max(0.0));
        }
        if handle.moves_south() {
            bottom = clamp(
                o.bottom() + dy,
                (top + MIN_BOX_SIZE).min(self.page.height),
                self.page.height,
            );
        }

        CropBox::new(left, top, right - left, bottom - top)
    }

    fn notify(&mut self) {
        let crop = self.crop;
        if let Some(callback) = self.on_change.as_mut() {
            callback(crop);
        }
    }
}
