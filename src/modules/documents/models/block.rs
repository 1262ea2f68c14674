//! Flat block model for free-form body markup.
//!
//! The editor produces a flat sequence of top-level elements (headings,
//! paragraphs, tables, lists). Body content is split into those top-level
//! spans so operations like "remove the Summary section" work on typed blocks
//! instead of pattern matching over the raw string. Each block keeps its exact
//! source text, so an untouched [`BodyContent`] renders back byte for byte.

use std::fmt;

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// `<h1>`..`<h6>` with its plain text content
    Heading { level: u8, text: String },
    Table,
    Paragraph,
    /// Inter-block whitespace
    Whitespace,
    /// Any other element, bare text, comment or unbalanced markup
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    raw: String,
}

impl Block {
    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn is_whitespace(&self) -> bool {
        matches!(self.kind, BlockKind::Whitespace)
    }

    fn is_summary_heading(&self) -> bool {
        matches!(&self.kind, BlockKind::Heading { text, .. } if text.eq_ignore_ascii_case("summary"))
    }
}

/// Body markup as an ordered list of top-level blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyContent {
    blocks: Vec<Block>,
}

impl BodyContent {
    pub fn parse(markup: &str) -> Self {
        Self {
            blocks: Parser::new(markup).collect(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Appends parsed markup after the existing blocks
    pub fn append(&mut self, markup: &str) {
        self.blocks.extend(Parser::new(markup));
    }

    /// Number of Summary sections (heading + table + optional paragraph)
    pub fn summary_count(&self) -> usize {
        let mut count = 0;
        let mut index = 0;
        while index < self.blocks.len() {
            match self.summary_span(index) {
                Some(end) => {
                    count += 1;
                    index = end + 1;
                }
                None => index += 1,
            }
        }
        count
    }

    /// Removes every Summary section as one unit each: a heading reading
    /// "Summary", the table right after it, and an optional paragraph after
    /// the table. Returns how many sections were removed.
    pub fn strip_summary(&mut self) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.blocks.len() {
            match self.summary_span(index) {
                Some(end) => {
                    self.blocks.drain(index..=end);
                    removed += 1;
                }
                None => index += 1,
            }
        }
        removed
    }

    /// End index (inclusive) of a Summary section starting at `start`
    fn summary_span(&self, start: usize) -> Option<usize> {
        if !self.blocks.get(start)?.is_summary_heading() {
            return None;
        }

        let table = self.next_content_block(start + 1)?;
        if self.blocks[table].kind != BlockKind::Table {
            return None;
        }

        match self.next_content_block(table + 1) {
            Some(paragraph) if self.blocks[paragraph].kind == BlockKind::Paragraph => Some(paragraph),
            _ => Some(table),
        }
    }

    fn next_content_block(&self, from: usize) -> Option<usize> {
        (from..self.blocks.len()).find(|&index| !self.blocks[index].is_whitespace())
    }
}

impl fmt::Display for BodyContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.blocks.iter().try_for_each(|block| f.write_str(&block.raw))
    }
}

/// Splits markup into top-level blocks.
///
/// Tag names are matched case-insensitively on an ASCII-lowercased copy of the
/// source; every index the parser produces sits on an ASCII byte, so slices of
/// the original string stay on character boundaries.
struct Parser<'a> {
    source: &'a str,
    lower: String,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            lower: source.to_ascii_lowercase(),
            pos: 0,
        }
    }

    fn block(&mut self, kind: BlockKind, end: usize) -> Block {
        let raw = self.source[self.pos..end].to_string();
        self.pos = end;
        Block { kind, raw }
    }

    fn element(&mut self) -> Block {
        let start = self.pos;
        let rest = &self.lower[start..];

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map_or(self.source.len(), |i| start + i + 3);
            return self.block(BlockKind::Other, end);
        }

        if !opens_markup(rest) {
            // A bare `<` in text, e.g. `1 < 2`
            return self.block(BlockKind::Other, start + 1);
        }

        let name: String = rest[1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();

        let open_end = if name.is_empty() {
            // Declarations and stray closing tags carry no attribute values
            rest.find('>').map(|i| start + i + 1)
        } else {
            tag_end(&self.lower, start)
        };
        let Some(open_end) = open_end else {
            return self.block(BlockKind::Other, start + 1);
        };

        if name.is_empty()
            || VOID_ELEMENTS.contains(&name.as_str())
            || self.lower[..open_end].ends_with("/>")
        {
            return self.block(BlockKind::Other, open_end);
        }

        let Some(close_end) = find_closing(&self.lower, &name, open_end) else {
            // Unclosed element: keep the opening tag alone and parse on.
            return self.block(BlockKind::Other, open_end);
        };

        let kind = match name.as_str() {
            "table" => BlockKind::Table,
            "p" => BlockKind::Paragraph,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let inner_end = self.lower[..close_end].rfind("</").unwrap_or(close_end);
                BlockKind::Heading {
                    level: name.as_bytes()[1] - b'0',
                    text: plain_text(&self.source[open_end..inner_end]),
                }
            }
            _ => BlockKind::Other,
        };

        self.block(kind, close_end)
    }
}

impl Iterator for Parser<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        let rest = self.source.get(self.pos..)?;
        if rest.is_empty() {
            return None;
        }

        let trimmed = rest.trim_start();
        if trimmed.len() < rest.len() {
            let end = self.pos + (rest.len() - trimmed.len());
            return Some(self.block(BlockKind::Whitespace, end));
        }

        if rest.starts_with('<') {
            return Some(self.element());
        }

        let end = rest.find('<').map_or(self.source.len(), |i| self.pos + i);
        Some(self.block(BlockKind::Other, end))
    }
}

/// Whether `<` at the head of `rest` starts a tag, declaration or closing tag
fn opens_markup(rest: &str) -> bool {
    match rest.as_bytes().get(1) {
        Some(byte) if byte.is_ascii_alphabetic() || *byte == b'!' => true,
        Some(b'/') => rest
            .as_bytes()
            .get(2)
            .is_some_and(|byte| byte.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Index just past the `>` closing the tag that opens at `start`, skipping
/// `>` inside quoted attribute values. A quote only opens a value right after
/// `=`. An unquoted `<` means the tag never closed.
fn tag_end(lower: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_equals = false;
    for (offset, &byte) in lower.as_bytes()[start + 1..].iter().enumerate() {
        match (quote, byte) {
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') if after_equals => quote = Some(byte),
            (None, b'>') => return Some(start + 1 + offset + 1),
            (None, b'<') => return None,
            (None, _) => {}
        }
        if !byte.is_ascii_whitespace() {
            after_equals = byte == b'=';
        }
    }
    None
}

/// Index just past the close tag matching an element `name` whose opening tag
/// ends at `from`. Nested elements of the same name are balanced.
fn find_closing(lower: &str, name: &str, from: usize) -> Option<usize> {
    let open = format!("<{}", name);
    let close = format!("</{}", name);
    let mut depth = 1usize;
    let mut cursor = from;

    while cursor < lower.len() {
        let lt = cursor + lower[cursor..].find('<')?;
        let rest = &lower[lt..];

        if rest.starts_with(&close) && name_ends(rest, close.len()) {
            let end = tag_end(lower, lt)?;
            depth -= 1;
            if depth == 0 {
                return Some(end);
            }
            cursor = end;
        } else if rest.starts_with(&open) && name_ends(rest, open.len()) {
            let end = tag_end(lower, lt)?;
            if !lower[..end].ends_with("/>") {
                depth += 1;
            }
            cursor = end;
        } else {
            cursor = lt + 1;
        }
    }

    None
}

fn name_ends(rest: &str, at: usize) -> bool {
    rest.as_bytes()
        .get(at)
        .map_or(true, |byte| !byte.is_ascii_alphanumeric())
}

/// Text content of a fragment: tags dropped, `&nbsp;` as space, whitespace
/// collapsed.
fn plain_text(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    text.replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
