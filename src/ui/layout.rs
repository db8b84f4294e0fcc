// ── Chrome geometry ───────────────────────────────────────────────────────────
//
// Pure Rust layout for the hand-drawn chrome: title bar, caption buttons,
// menu bar, status line, editor area, and the resize hit zones.  No Win32
// calls here; `platform::win32::window` feeds in the client size and DPI and
// draws/moves controls from the returned rects.
//
// All metric constants are in 96-DPI units and scale linearly.

/// Title bar height.
const TITLE_BAR_HEIGHT: i32 = 40;

/// Caption buttons are square: width == title bar height.
const CAPTION_BUTTON_WIDTH: i32 = 40;

/// Menu bar strip height.
const MENU_BAR_HEIGHT: i32 = 28;

/// Status line height.
const STATUS_BAR_HEIGHT: i32 = 25;

/// Width of the invisible resize band along every edge.  The editor is
/// inset by the same amount so the band stays under the main window.
pub(crate) const RESIZE_BORDER: i32 = 8;

/// Left offset of the first menu bar item.
const MENU_BAR_PADDING: i32 = 6;

/// Fixed width of one menu bar item ("File", "Edit").
const MENU_ITEM_WIDTH: i32 = 56;

const BASE_DPI: i32 = 96;

fn scale(px: i32, dpi: u32) -> i32 {
    px * dpi as i32 / BASE_DPI
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in client coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Rect {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) w: i32,
    pub(crate) h: i32,
}

impl Rect {
    pub(crate) const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub(crate) fn right(&self) -> i32 {
        self.x + self.w
    }

    pub(crate) fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Half-open containment: `[x, x+w) × [y, y+h)`.
    pub(crate) fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// The three hand-drawn caption buttons, left to right.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum CaptionButton {
    Minimize,
    Maximize,
    Close,
}

/// Glyph drawn on a caption button.  The maximize button swaps to the
/// restore glyph while the window is maximized.
pub(crate) fn caption_glyph(button: CaptionButton, maximized: bool) -> &'static str {
    match button {
        CaptionButton::Minimize => "\u{2014}",
        CaptionButton::Maximize => {
            if maximized {
                "\u{2750}"
            } else {
                "\u{25A1}"
            }
        }
        CaptionButton::Close => "\u{2715}",
    }
}

/// Menu bar items.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum MenuId {
    File,
    Edit,
}

/// Window edge or corner under the cursor, for resize hit-testing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Every rect the orchestrator paints or positions, computed from the
/// client size.  Rebuilt on each WM_SIZE / WM_DPICHANGED.
pub(crate) struct ChromeLayout {
    pub(crate) title_bar: Rect,
    pub(crate) btn_min: Rect,
    pub(crate) btn_max: Rect,
    pub(crate) btn_close: Rect,
    pub(crate) menu_bar: Rect,
    pub(crate) menu_file: Rect,
    pub(crate) menu_edit: Rect,
    pub(crate) status_bar: Rect,
    pub(crate) editor: Rect,
}

impl ChromeLayout {
    pub(crate) fn compute(width: i32, height: i32, dpi: u32) -> Self {
        let tb = scale(TITLE_BAR_HEIGHT, dpi);
        let bw = scale(CAPTION_BUTTON_WIDTH, dpi);
        let mb = scale(MENU_BAR_HEIGHT, dpi);
        let sb = scale(STATUS_BAR_HEIGHT, dpi);
        let margin = scale(RESIZE_BORDER, dpi);
        let pad = scale(MENU_BAR_PADDING, dpi);
        let item = scale(MENU_ITEM_WIDTH, dpi);

        Self {
            title_bar: Rect::new(0, 0, width, tb),
            btn_min: Rect::new(width - 3 * bw, 0, bw, tb),
            btn_max: Rect::new(width - 2 * bw, 0, bw, tb),
            btn_close: Rect::new(width - bw, 0, bw, tb),
            menu_bar: Rect::new(0, tb, width, mb),
            menu_file: Rect::new(pad, tb, item, mb),
            menu_edit: Rect::new(pad + item, tb, item, mb),
            status_bar: Rect::new(0, height - sb, width, sb),
            editor: Rect::new(
                margin,
                tb + mb,
                (width - 2 * margin).max(0),
                (height - tb - mb - sb).max(0),
            ),
        }
    }

    /// Which caption button, if any, is under the point.
    pub(crate) fn caption_button_at(&self, x: i32, y: i32) -> Option<CaptionButton> {
        if self.btn_min.contains(x, y) {
            Some(CaptionButton::Minimize)
        } else if self.btn_max.contains(x, y) {
            Some(CaptionButton::Maximize)
        } else if self.btn_close.contains(x, y) {
            Some(CaptionButton::Close)
        } else {
            None
        }
    }

    /// Which menu bar item, if any, is under the point.
    pub(crate) fn menu_item_at(&self, x: i32, y: i32) -> Option<MenuId> {
        if self.menu_file.contains(x, y) {
            Some(MenuId::File)
        } else if self.menu_edit.contains(x, y) {
            Some(MenuId::Edit)
        } else {
            None
        }
    }

    /// True when the point is on empty title-bar surface (a press there
    /// starts a window drag, not a button action).
    pub(crate) fn title_drag_zone(&self, x: i32, y: i32) -> bool {
        self.title_bar.contains(x, y) && self.caption_button_at(x, y).is_none()
    }

    pub(crate) fn button_rect(&self, button: CaptionButton) -> Rect {
        match button {
            CaptionButton::Minimize => self.btn_min,
            CaptionButton::Maximize => self.btn_max,
            CaptionButton::Close => self.btn_close,
        }
    }

    pub(crate) fn menu_rect(&self, item: MenuId) -> Rect {
        match item {
            MenuId::File => self.menu_file,
            MenuId::Edit => self.menu_edit,
        }
    }
}

/// Resize hit zone for a point in client coordinates, or `None` for the
/// interior.  Corners win over plain edges.  Callers suppress this entirely
/// while the window is maximized.
pub(crate) fn resize_edge_at(
    width: i32,
    height: i32,
    x: i32,
    y: i32,
    border: i32,
) -> Option<ResizeEdge> {
    let left = x < border;
    let right = x >= width - border;
    let top = y < border;
    let bottom = y >= height - border;

    match (left, right, top, bottom) {
        (true, _, true, _) => Some(ResizeEdge::TopLeft),
        (_, true, true, _) => Some(ResizeEdge::TopRight),
        (true, _, _, true) => Some(ResizeEdge::BottomLeft),
        (_, true, _, true) => Some(ResizeEdge::BottomRight),
        (true, _, _, _) => Some(ResizeEdge::Left),
        (_, true, _, _) => Some(ResizeEdge::Right),
        (_, _, true, _) => Some(ResizeEdge::Top),
        (_, _, _, true) => Some(ResizeEdge::Bottom),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const W: i32 = 1000;
    const H: i32 = 600;

    fn layout() -> ChromeLayout {
        ChromeLayout::compute(W, H, 96)
    }

    #[test]
    fn caption_buttons_are_flush_right_and_adjacent() {
        let l = layout();
        assert_eq!(l.btn_close.right(), W);
        assert_eq!(l.btn_max.right(), l.btn_close.x);
        assert_eq!(l.btn_min.right(), l.btn_max.x);
        assert_eq!(l.btn_min.w, l.btn_max.w);
        assert_eq!(l.btn_max.w, l.btn_close.w);
    }

    #[test]
    fn caption_buttons_fill_title_bar_height() {
        let l = layout();
        for r in [l.btn_min, l.btn_max, l.btn_close] {
            assert_eq!(r.y, 0);
            assert_eq!(r.h, l.title_bar.h);
        }
    }

    #[test]
    fn bands_stack_without_gaps() {
        let l = layout();
        assert_eq!(l.menu_bar.y, l.title_bar.bottom());
        assert_eq!(l.editor.y, l.menu_bar.bottom());
        assert_eq!(l.editor.bottom(), l.status_bar.y);
        assert_eq!(l.status_bar.bottom(), H);
    }

    #[test]
    fn editor_is_inset_by_the_resize_border() {
        let l = layout();
        assert_eq!(l.editor.x, RESIZE_BORDER);
        assert_eq!(l.editor.right(), W - RESIZE_BORDER);
    }

    #[test]
    fn metrics_scale_with_dpi() {
        let l = ChromeLayout::compute(W, H, 144);
        assert_eq!(l.title_bar.h, 60); // 40 × 1.5
        assert_eq!(l.btn_close.w, 60);
        assert_eq!(l.status_bar.h, 37); // 25 × 1.5, truncated
        assert_eq!(l.editor.x, 12);
    }

    #[test]
    fn degenerate_sizes_clamp_editor_to_zero() {
        let l = ChromeLayout::compute(10, 10, 96);
        assert_eq!(l.editor.w, 0);
        assert_eq!(l.editor.h, 0);
    }

    #[test]
    fn caption_button_lookup() {
        let l = layout();
        assert_eq!(l.caption_button_at(W - 20, 20), Some(CaptionButton::Close));
        assert_eq!(l.caption_button_at(W - 60, 20), Some(CaptionButton::Maximize));
        assert_eq!(l.caption_button_at(W - 100, 20), Some(CaptionButton::Minimize));
        assert_eq!(l.caption_button_at(W - 121, 20), None);
        assert_eq!(l.caption_button_at(10, 20), None);
    }

    #[test]
    fn menu_item_lookup() {
        let l = layout();
        let y = l.menu_bar.y + 5;
        assert_eq!(l.menu_item_at(10, y), Some(MenuId::File));
        assert_eq!(l.menu_item_at(70, y), Some(MenuId::Edit));
        assert_eq!(l.menu_item_at(200, y), None);
        assert_eq!(l.menu_item_at(10, 10), None);
    }

    #[test]
    fn drag_zone_excludes_buttons_and_menu_bar() {
        let l = layout();
        assert!(l.title_drag_zone(300, 20));
        assert!(!l.title_drag_zone(W - 20, 20));
        assert!(!l.title_drag_zone(10, l.menu_bar.y + 2));
    }

    #[test]
    fn maximize_glyph_swaps_with_state() {
        assert_eq!(caption_glyph(CaptionButton::Maximize, false), "\u{25A1}");
        assert_eq!(caption_glyph(CaptionButton::Maximize, true), "\u{2750}");
        assert_eq!(caption_glyph(CaptionButton::Close, false), "\u{2715}");
        assert_eq!(
            caption_glyph(CaptionButton::Minimize, true),
            caption_glyph(CaptionButton::Minimize, false),
        );
    }

    #[test]
    fn resize_corners_win_over_edges() {
        assert_eq!(resize_edge_at(W, H, 2, 2, 8), Some(ResizeEdge::TopLeft));
        assert_eq!(resize_edge_at(W, H, W - 1, 2, 8), Some(ResizeEdge::TopRight));
        assert_eq!(resize_edge_at(W, H, 2, H - 1, 8), Some(ResizeEdge::BottomLeft));
        assert_eq!(resize_edge_at(W, H, W - 1, H - 1, 8), Some(ResizeEdge::BottomRight));
    }

    #[test]
    fn resize_edges_and_interior() {
        assert_eq!(resize_edge_at(W, H, 2, 300, 8), Some(ResizeEdge::Left));
        assert_eq!(resize_edge_at(W, H, W - 3, 300, 8), Some(ResizeEdge::Right));
        assert_eq!(resize_edge_at(W, H, 500, 2, 8), Some(ResizeEdge::Top));
        assert_eq!(resize_edge_at(W, H, 500, H - 2, 8), Some(ResizeEdge::Bottom));
        assert_eq!(resize_edge_at(W, H, 500, 300, 8), None);
        // The band is half-open: x == border is already interior.
        assert_eq!(resize_edge_at(W, H, 8, 300, 8), None);
    }
}
