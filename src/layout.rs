//! Layout engine: `Node` tree → `Scene`.
//!
//! Two algorithms share one pre-order placement pass:
//!
//! - **List** (default): nodes flow down the page, indented by depth, with a
//!   vertical backbone per parent and a horizontal connector per child.
//! - **Columns** (`LayoutMode::Vertical`): one column per node from right to
//!   left, depth pushes text down, and glyphs stack vertically.
//!
//! All arithmetic is plain `f64` on fixed formulas evaluated in a fixed
//! order, so laying out the same tree twice yields identical coordinates.

use log::debug;

use crate::config::{LayoutMode, Theme};
use crate::parser::Node;
use crate::scene::{FontStyle, LineItem, Scene, TextItem};

/// Page margins of the list layout.
const X_MARGIN: f64 = 40.0;
const Y_MARGIN: f64 = 40.0;
/// Margin on every side of the column layout.
const COLUMN_MARGIN: f64 = 60.0;

const LINE_HEIGHT_FACTOR: f64 = 1.8;
const COLUMN_WIDTH_FACTOR: f64 = 1.8;
const INDENT_FACTOR: f64 = 2.0;
/// The title row gets extra breathing room below it.
const ROOT_ADVANCE_FACTOR: f64 = 1.5;
const ROOT_SIZE_FACTOR: f64 = 1.5;
/// Connector centre below a row's anchor, in font sizes.
const CONNECTOR_CENTER_FACTOR: f64 = 0.5;
/// Gap between a connector's end and the child text, in font sizes.
const CONNECTOR_GAP_FACTOR: f64 = 0.2;

const LIST_ROOT_SPACING: f64 = 4.0;
const LIST_SPACING: f64 = 0.0;
const COLUMN_ROOT_SPACING: f64 = 8.0;
const COLUMN_SPACING: f64 = 4.0;

/// Lay out `root` for a canvas `canvas_width` units wide.
///
/// `theme.layout_mode` picks the algorithm; colors and line style come from
/// the theme as well.
pub fn layout(root: &Node, canvas_width: u32, font_size: u32, theme: &Theme) -> Scene {
    let scene = match theme.layout_mode {
        LayoutMode::Vertical => layout_columns(root, canvas_width, font_size, theme),
        LayoutMode::Horizontal => layout_list(root, canvas_width, font_size, theme),
    };
    debug!(
        "{:?} layout: {} texts, {} lines, {}x{}",
        theme.layout_mode,
        scene.texts.len(),
        scene.lines.len(),
        scene.width,
        scene.height
    );
    scene
}

// ============================================================================
// Pre-order placement
// ============================================================================

/// One visited node: its depth, the slot indices of its children, and the
/// position assigned along the layout's primary axis.
struct Slot<'a> {
    node: &'a Node,
    depth: usize,
    children: Vec<usize>,
    pos: f64,
}

/// Visit the tree in pre-order; slot order is visitation order.
fn collect_slots(root: &Node) -> Vec<Slot<'_>> {
    fn visit<'a>(node: &'a Node, depth: usize, slots: &mut Vec<Slot<'a>>) -> usize {
        let idx = slots.len();
        slots.push(Slot {
            node,
            depth,
            children: Vec::with_capacity(node.children.len()),
            pos: 0.0,
        });
        for child in &node.children {
            let child_idx = visit(child, depth + 1, slots);
            slots[idx].children.push(child_idx);
        }
        idx
    }

    let mut slots = Vec::with_capacity(root.len());
    visit(root, 0, &mut slots);
    slots
}

/// Root text is larger, serif, and letter-spaced.
fn text_item(
    slot: &Slot<'_>,
    x: f64,
    y: f64,
    font_size: f64,
    spacing: (f64, f64),
    theme: &Theme,
) -> TextItem {
    let is_root = slot.depth == 0;
    TextItem {
        content: slot.node.label.clone(),
        x,
        y,
        size: if is_root {
            font_size * ROOT_SIZE_FACTOR
        } else {
            font_size
        },
        color: theme.text,
        font_style: if is_root {
            FontStyle::Serif
        } else {
            FontStyle::Sans
        },
        spacing: if is_root { spacing.0 } else { spacing.1 },
    }
}

fn line_item(x1: f64, y1: f64, x2: f64, y2: f64, width: f64, theme: &Theme) -> LineItem {
    LineItem {
        x1,
        y1,
        x2,
        y2,
        width,
        color: theme.line,
        style: theme.line_style,
    }
}

// ============================================================================
// List layout
// ============================================================================

fn layout_list(root: &Node, canvas_width: u32, font_size: u32, theme: &Theme) -> Scene {
    let fs = font_size as f64;
    let line_height = fs * LINE_HEIGHT_FACTOR;
    let indent_step = fs * INDENT_FACTOR;
    let stroke = (font_size / 12).max(2) as f64;
    let half_font = fs * CONNECTOR_CENTER_FACTOR;

    let mut slots = collect_slots(root);
    let mut cursor = Y_MARGIN;
    for slot in &mut slots {
        slot.pos = cursor;
        cursor += if slot.depth == 0 {
            line_height * ROOT_ADVANCE_FACTOR
        } else {
            line_height
        };
    }

    let text_x = |depth: usize| X_MARGIN + depth as f64 * indent_step;
    let deepest = slots.iter().map(|s| s.depth).max().unwrap_or(0);
    let width = (canvas_width as f64).max((text_x(deepest) + X_MARGIN).ceil()) as u32;
    let height = (cursor + Y_MARGIN).ceil() as u32;

    let mut scene = Scene::new(width, height, theme);
    for slot in &slots {
        scene.texts.push(text_item(
            slot,
            text_x(slot.depth),
            slot.pos,
            fs,
            (LIST_ROOT_SPACING, LIST_SPACING),
            theme,
        ));

        let (Some(&first), Some(&last)) = (slot.children.first(), slot.children.last()) else {
            continue;
        };
        let child_x = text_x(slot.depth + 1);
        let backbone_x = child_x - indent_step / 2.0;
        scene.lines.push(line_item(
            backbone_x,
            slots[first].pos + half_font,
            backbone_x,
            slots[last].pos + half_font,
            stroke,
            theme,
        ));
        for &child in &slot.children {
            let cy = slots[child].pos + half_font;
            scene.lines.push(line_item(
                backbone_x,
                cy,
                child_x - fs * CONNECTOR_GAP_FACTOR,
                cy,
                stroke,
                theme,
            ));
        }
    }
    scene
}

// ============================================================================
// Column layout
// ============================================================================

fn layout_columns(root: &Node, canvas_width: u32, font_size: u32, theme: &Theme) -> Scene {
    let fs = font_size as f64;
    let col_width = fs * COLUMN_WIDTH_FACTOR;
    let indent_step = fs * INDENT_FACTOR;
    let stroke = (font_size / 10).max(2) as f64;

    let mut slots = collect_slots(root);
    let mut cursor = canvas_width as f64 - COLUMN_MARGIN;
    for slot in &mut slots {
        slot.pos = cursor;
        cursor -= col_width;
    }

    // Shift everything right when the leftmost column would be clipped.
    let min_x = slots.iter().map(|s| s.pos).fold(f64::INFINITY, f64::min);
    let shift = if min_x < COLUMN_MARGIN {
        COLUMN_MARGIN - min_x
    } else {
        0.0
    };
    let width = if shift > 0.0 {
        (canvas_width as f64 + shift).ceil() as u32
    } else {
        canvas_width
    };

    let row_y = |depth: usize| COLUMN_MARGIN + depth as f64 * indent_step;
    let mut scene = Scene::new(width, 0, theme);
    let mut max_y = 0.0_f64;
    for slot in &slots {
        let x = slot.pos + shift;
        let y_start = row_y(slot.depth);
        let text = text_item(
            slot,
            x,
            y_start,
            fs,
            (COLUMN_ROOT_SPACING, COLUMN_SPACING),
            theme,
        );
        // Each character advances one glyph cell plus spacing downwards.
        let extent = text.content.chars().count() as f64 * (text.size + text.spacing);
        max_y = max_y.max(y_start + extent);
        scene.texts.push(text);

        let Some(&last) = slot.children.last() else {
            continue;
        };
        let backbone_y = y_start + indent_step / 2.0;
        scene.lines.push(line_item(
            x,
            backbone_y,
            slots[last].pos + shift,
            backbone_y,
            stroke,
            theme,
        ));
        for &child in &slot.children {
            let cx = slots[child].pos + shift;
            scene.lines.push(line_item(
                cx,
                backbone_y,
                cx,
                y_start + indent_step,
                stroke,
                theme,
            ));
        }
        scene
            .lines
            .push(line_item(x, y_start, x, backbone_y, stroke, theme));
    }
    scene.height = (max_y + COLUMN_MARGIN).ceil() as u32;
    scene
}

// ============================================================================
// Tests
// ============================================================================
