//! Line-oriented flowchart parser.
//!
//! # Responsibility
//! - Extract node declarations (`id[label]`, `id(label)`, `id((label))`,
//!   `id{label}`) and directed edges (`a --> b`, `a -.-> b`, `a ==> b`,
//!   `a --- b`, optionally labeled) from diagram source.
//!
//! # Invariants
//! - Parsing is total: unknown lines and tokens are skipped silently.
//! - The first declaration of an id decides its label and shape.
//! - Reserved words never become node ids.
//! - Edges are resolved after the whole source is read; edges touching
//!   undeclared ids are dropped and duplicates collapse to the first.

use super::{Diagram, DiagramEdge, DiagramNode, NodeShape};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static EDGE_OPERATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:--\s+(?P<inline>[^|>]+?)\s+-{2,}>|-\.+->|={2,}>|-{2,}>|-\.+-|-{3,})(?:\s*\|(?P<pipe>[^|]*)\|)?",
    )
    .expect("valid edge operator regex")
});
static NUMBERED_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)+\.?|\d+\.)(?:\s+|$)").expect("valid numbered prefix regex")
});
static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static CLASS_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":::[\w-]+$").expect("valid class suffix regex"));

/// Words that are never node ids.
const RESERVED_IDS: &[&str] = &["subgraph", "direction", "flowchart", "end", "start", "finish"];

/// Leading words of lines that carry structure or styling only.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "subgraph",
    "direction",
    "flowchart",
    "graph",
    "end",
    "classdef",
    "class",
    "style",
    "click",
    "linkstyle",
];

/// Bracket pairs in match priority order (longer delimiters first).
const SHAPE_DELIMITERS: &[(&str, &str, NodeShape)] = &[
    ("((", "))", NodeShape::Circle),
    ("([", "])", NodeShape::Round),
    ("[(", ")]", NodeShape::Rect),
    ("[[", "]]", NodeShape::Rect),
    ("{{", "}}", NodeShape::Diamond),
    ("[", "]", NodeShape::Rect),
    ("(", ")", NodeShape::Round),
    ("{", "}", NodeShape::Diamond),
];

/// Parses flowchart source into declared nodes and resolvable edges.
pub fn parse_diagram(source: &str) -> Diagram {
    let mut builder = DiagramBuilder::default();
    let mut skipped_lines = 0usize;

    for raw_line in source.lines() {
        let line = raw_line.trim().trim_end_matches(';').trim();
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }
        if is_structural_line(line) {
            skipped_lines += 1;
            continue;
        }
        builder.push_statement(line);
    }

    let diagram = builder.finish();
    debug!(
        "event=diagram_parse module=diagram status=ok nodes={} edges={} structural_lines={}",
        diagram.nodes.len(),
        diagram.edges.len(),
        skipped_lines
    );
    diagram
}

#[derive(Default)]
struct DiagramBuilder {
    nodes: Vec<DiagramNode>,
    index: HashMap<String, usize>,
    pending_edges: Vec<DiagramEdge>,
}

impl DiagramBuilder {
    fn push_statement(&mut self, line: &str) {
        let (segments, operators) = split_statement(line);

        let refs = segments
            .iter()
            .map(|segment| self.resolve_segment(segment))
            .collect::<Vec<_>>();

        for (position, label) in operators.into_iter().enumerate() {
            let (Some(sources), Some(targets)) = (&refs[position], &refs[position + 1]) else {
                continue;
            };
            for from in sources {
                for to in targets {
                    self.pending_edges.push(DiagramEdge {
                        from: from.clone(),
                        to: to.clone(),
                        label: label.clone(),
                    });
                }
            }
        }
    }

    /// Declares nodes found in one segment and returns the ids it names.
    ///
    /// `None` marks a segment that is not a valid node reference.
    fn resolve_segment(&mut self, segment: &str) -> Option<Vec<String>> {
        let mut ids = Vec::new();
        for part in split_top_level(segment, b'&') {
            let node_ref = parse_node_ref(part.trim())?;
            if let Some((shape, label)) = node_ref.declaration {
                self.declare(node_ref.id, shape, label);
            }
            ids.push(node_ref.id.to_string());
        }
        if ids.is_empty() {
            None
        } else {
            Some(ids)
        }
    }

    fn declare(&mut self, id: &str, shape: NodeShape, raw_label: &str) {
        if self.index.contains_key(id) {
            return;
        }
        self.index.insert(id.to_string(), self.nodes.len());
        self.nodes.push(DiagramNode {
            id: id.to_string(),
            label: clean_label(raw_label, id),
            shape,
        });
    }

    fn finish(self) -> Diagram {
        let mut seen = HashSet::new();
        let edges = self
            .pending_edges
            .into_iter()
            .filter(|edge| self.index.contains_key(&edge.from) && self.index.contains_key(&edge.to))
            .filter(|edge| seen.insert((edge.from.clone(), edge.to.clone())))
            .collect();
        Diagram {
            nodes: self.nodes,
            edges,
        }
    }
}

struct NodeRef<'a> {
    id: &'a str,
    declaration: Option<(NodeShape, &'a str)>,
}

fn parse_node_ref(text: &str) -> Option<NodeRef<'_>> {
    let id_len = text
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(index, _)| index);
    if id_len == 0 {
        return None;
    }

    let (id, rest) = text.split_at(id_len);
    if is_reserved_id(id) {
        return None;
    }

    let rest = match CLASS_SUFFIX_RE.find(rest) {
        Some(suffix) => &rest[..suffix.start()],
        None => rest,
    };
    if rest.is_empty() {
        return Some(NodeRef {
            id,
            declaration: None,
        });
    }

    let declaration = SHAPE_DELIMITERS.iter().find_map(|(open, close, shape)| {
        rest.strip_prefix(open)
            .and_then(|inner| inner.strip_suffix(close))
            .map(|inner| (*shape, inner))
    })?;

    Some(NodeRef {
        id,
        declaration: Some(declaration),
    })
}

/// Splits one statement at top-level edge operators.
///
/// Returns `n` segments and the `n - 1` operator labels between them.
fn split_statement(line: &str) -> (Vec<&str>, Vec<Option<String>>) {
    let bytes = line.as_bytes();
    let mut segments = Vec::new();
    let mut labels = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    let mut cursor = 0;

    while cursor < bytes.len() {
        match bytes[cursor] {
            b'"' => in_quote = !in_quote,
            b'[' | b'(' | b'{' if !in_quote => depth += 1,
            b']' | b')' | b'}' if !in_quote => depth = depth.saturating_sub(1),
            b'-' | b'=' if !in_quote && depth == 0 => {
                if let Some(captures) = EDGE_OPERATOR_RE.captures(&line[cursor..]) {
                    let matched_len = captures.get(0).map_or(0, |m| m.end());
                    if matched_len > 0 {
                        let label = captures
                            .name("pipe")
                            .or_else(|| captures.name("inline"))
                            .map(|m| m.as_str().trim().trim_matches('"').to_string())
                            .filter(|text| !text.is_empty());
                        segments.push(&line[start..cursor]);
                        labels.push(label);
                        cursor += matched_len;
                        start = cursor;
                        continue;
                    }
                }
            }
            _ => {}
        }
        cursor += 1;
    }
    segments.push(&line[start..]);

    (segments, labels)
}

/// Splits on `separator` outside brackets and quotes.
fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'"' => in_quote = !in_quote,
            b'[' | b'(' | b'{' if !in_quote => depth += 1,
            b']' | b')' | b'}' if !in_quote => depth = depth.saturating_sub(1),
            _ if byte == separator && !in_quote && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn is_structural_line(line: &str) -> bool {
    let keyword = line
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !STRUCTURAL_KEYWORDS.contains(&keyword.as_str()) {
        return false;
    }
    // `style[Style] --> x` is a node statement, not a style line.
    let rest = &line[keyword.len()..];
    rest.is_empty() || rest.starts_with(char::is_whitespace)
}

fn is_reserved_id(id: &str) -> bool {
    RESERVED_IDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(id))
}

fn clean_label(raw: &str, id: &str) -> String {
    let unquoted = raw.trim().trim_matches('"').trim();
    let flattened = LINE_BREAK_RE.replace_all(unquoted, " ");
    let collapsed = WHITESPACE_RE.replace_all(flattened.trim(), " ").to_string();

    let stripped = NUMBERED_PREFIX_RE.replace(&collapsed, "").trim().to_string();
    let label = if stripped.is_empty() {
        collapsed
    } else {
        stripped
    };

    if label.is_empty() {
        id.to_string()
    } else {
        label
    }
}
