//! Structure parser: ASCII tree or indented outline → `Node` tree.
//!
//! Two input styles are recognised. Connector-style input draws hierarchy
//! with box-drawing or ASCII branch glyphs (`├──`, `└──`, `│`, `|-`, `+-`);
//! indent-style input uses leading spaces only. Both attach nodes through the
//! same depth stack, which tolerates irregular indentation by reparenting a
//! node to its nearest shallower ancestor instead of rejecting the input.

use log::debug;

use crate::error::{Error, Result};

/// Box-drawing glyphs that mark connector-style input.
const BOX_DRAWING: [char; 7] = ['├', '└', '│', '─', '┴', '┬', '┼'];

/// Glyphs stripped from the front of a label.
const LABEL_NOISE: [char; 6] = ['|', '-', '+', '│', '├', '└'];

/// Branch markers consumed after the indent run, longest first.
const BRANCH_MARKERS: [&str; 6] = ["├──", "└──", "|-", "+-", "-", "+"];

// ============================================================================
// Node
// ============================================================================

/// A tree node. Children are kept in document order and owned exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub label: String,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a leaf node; the label is trimmed.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.trim().to_string(),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    /// A node always counts itself, so a subtree is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pre-order traversal yielding `(depth, node)` with the root at depth 0.
    pub fn depth_first(&self) -> Vec<(usize, &Node)> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_depth_first(0, &mut out);
        out
    }

    fn collect_depth_first<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Node)>) {
        out.push((depth, self));
        for child in &self.children {
            child.collect_depth_first(depth + 1, out);
        }
    }

    /// Rebuild an indent-style outline: two spaces per depth level, one line
    /// per node, pre-order.
    pub fn outline(&self) -> Vec<String> {
        self.depth_first()
            .into_iter()
            .map(|(depth, node)| format!("{}{}", "  ".repeat(depth), node.label))
            .collect()
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse ASCII-art text into a tree.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] when the text has no non-blank lines.
pub fn parse(text: &str) -> Result<Node> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim_end_matches(['\n', '\r']))
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err(Error::EmptyInput);
    }

    if is_connector_style(&lines) {
        debug!("parsing {} lines as connector-style tree", lines.len());
        Ok(parse_connector_style(&lines))
    } else {
        debug!("parsing {} lines as indent-style outline", lines.len());
        Ok(parse_indent_style(&lines))
    }
}

/// Classify the input: any box-drawing glyph, a double dash, or a line
/// starting with a pipe/plus/dash run marks connector style.
fn is_connector_style(lines: &[&str]) -> bool {
    lines.iter().any(|l| {
        l.contains(BOX_DRAWING) || l.contains("──") || l.trim_start().starts_with(['|', '+', '-'])
    })
}

// ============================================================================
// Depth stack
// ============================================================================

/// Builds the tree from `(depth, label)` entries in document order.
///
/// Entries live in an arena until the stack pops them, at which point they
/// are moved into their parent. The stack holds arena indices ordered by
/// increasing depth.
struct TreeBuilder {
    root: Node,
    arena: Vec<Option<Node>>,
    parents: Vec<Option<usize>>,
    stack: Vec<(usize, usize)>,
    attached: usize,
}

impl TreeBuilder {
    fn new(root_label: &str) -> Self {
        Self {
            root: Node::new(root_label),
            arena: Vec::new(),
            parents: Vec::new(),
            stack: Vec::new(),
            attached: 0,
        }
    }

    /// Attach a node at `depth`: pop every stack entry at the same depth or
    /// deeper, then hang the node under the new top, or the root when the
    /// stack is empty.
    fn push(&mut self, depth: usize, label: &str) {
        while matches!(self.stack.last(), Some(&(d, _)) if d >= depth) {
            self.stack.pop();
        }
        let idx = self.arena.len();
        self.arena.push(Some(Node::new(label)));
        self.parents.push(self.stack.last().map(|&(_, parent)| parent));
        self.stack.push((depth, idx));
        self.attached += 1;
    }

    fn finish(mut self) -> Node {
        // Parents always precede their children in the arena, so folding in
        // reverse order completes every subtree before its parent takes it.
        // Children therefore arrive last-first and are reversed once.
        for idx in (0..self.arena.len()).rev() {
            let Some(mut node) = self.arena[idx].take() else {
                continue;
            };
            node.children.reverse();
            match self.parents[idx] {
                Some(parent) => {
                    if let Some(p) = self.arena[parent].as_mut() {
                        p.children.push(node);
                    }
                }
                None => self.root.children.push(node),
            }
        }
        self.root.children.reverse();
        self.root
    }
}

// ============================================================================
// Connector style
// ============================================================================

fn parse_connector_style(lines: &[&str]) -> Node {
    let mut builder = TreeBuilder::new(&extract_root_label(lines));

    // The root-label line is read again here and attaches like any other.
    for line in lines {
        let (depth, content) = split_connector_line(line);
        let label = clean_line(content);
        if label.is_empty() {
            continue;
        }
        builder.push(depth, &label);
    }

    if builder.attached == 0 && lines.len() > 1 {
        debug!("no node attached under connector-style root, re-parsing as outline");
        return parse_indent_style(lines);
    }
    builder.finish()
}

/// The root label comes from the first line that is not made solely of
/// connector glyphs and whitespace; falls back to the first line.
fn extract_root_label(lines: &[&str]) -> String {
    let line = lines
        .iter()
        .find(|l| !l.trim().chars().all(is_connector_or_space))
        .unwrap_or(&lines[0]);
    clean_line(line)
}

fn is_connector_or_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '|' | '-' | '+' | '│' | '├' | '└' | '─')
}

/// Split a connector-style line into its depth and the text after the
/// indent run and branch marker.
///
/// The indent run is any leading whitespace followed by units of either
/// `│` plus three whitespace characters or four whitespace characters.
fn split_connector_line(line: &str) -> (usize, &str) {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = chars
        .iter()
        .position(|&(_, c)| !c.is_whitespace())
        .unwrap_or(chars.len());
    loop {
        let unit = &chars[i..chars.len().min(i + 4)];
        let is_unit = unit.len() == 4
            && (unit[0].1 == '│' || unit[0].1.is_whitespace())
            && unit[1..].iter().all(|&(_, c)| c.is_whitespace());
        if !is_unit {
            break;
        }
        i += 4;
    }
    let split = chars.get(i).map_or(line.len(), |&(b, _)| b);
    let (indent, rest) = line.split_at(split);

    let rest = BRANCH_MARKERS
        .iter()
        .find_map(|m| rest.strip_prefix(m))
        .unwrap_or(rest);
    (depth_from_indent(indent), rest.trim_start())
}

/// Depth 1 for an empty or unit-less indent, plus one per `│   ` or
/// four-space unit.
fn depth_from_indent(indent: &str) -> usize {
    let chars: Vec<char> = indent.chars().collect();
    let mut count = 0;
    let mut i = 0;
    while i < chars.len() {
        let unit = &chars[i..chars.len().min(i + 4)];
        if unit == ['│', ' ', ' ', ' '] || unit == [' ', ' ', ' ', ' '] {
            count += 1;
            i += 4;
        } else {
            i += 1;
        }
    }
    count + 1
}

// ============================================================================
// Indent style
// ============================================================================

fn parse_indent_style(lines: &[&str]) -> Node {
    let mut builder = TreeBuilder::new(&clean_line(lines[0]));
    for line in &lines[1..] {
        let label = clean_line(line);
        if label.is_empty() {
            continue;
        }
        builder.push(indent_depth(line), &label);
    }
    builder.finish()
}

/// Depth from leading spaces: `indent / 2` from two spaces up, 1 for a
/// single space, 0 otherwise.
fn indent_depth(line: &str) -> usize {
    let indent = line.chars().take_while(|&c| c == ' ').count();
    match indent {
        0 => 0,
        1 => 1,
        n => n / 2,
    }
}

/// Strip a leading run of pipe/dash/plus/whitespace/box-drawing glyphs.
fn clean_line(line: &str) -> String {
    line.trim_start_matches(|c: char| c.is_whitespace() || LABEL_NOISE.contains(&c) || c == '─')
        .trim()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================
