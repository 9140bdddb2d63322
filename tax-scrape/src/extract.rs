//! Table-only extraction from arbitrary HTML.
//!
//! [`TableExtractor`] is an `html5ever` token sink. It re-emits the tags and
//! text that sit inside `<table>` regions and drops everything else, producing
//! a small document that a strict XML parser accepts no matter how broken the
//! surrounding page was:
//!
//! - void and self-closing elements are written as `<x/>`;
//! - omitted `</td>`, `</tr>` and row-group end tags are implied;
//! - stray end tags are dropped and mis-nested ones close what is open above
//!   their match;
//! - elements still open at `</table>` or end of input are closed;
//! - tags and attributes without a valid XML name are dropped;
//! - `<script>` and `<style>` bodies are read as raw text and never captured.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use tracing::{debug, trace};

use crate::entities::EntityTable;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const DOCUMENT_EPILOGUE: &str = "</body></html>";

const VOID_ELEMENTS: [&str; 10] = [
    "area", "br", "col", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Extracts every table of `html` into a well-formed
/// `<html><body>…</body></html>` document whose doctype declares the
/// entities of `entities`.
pub fn extract_tables(
    html: &str,
    entities: &EntityTable,
) -> String {
    let mut input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));

    let mut tokenizer = Tokenizer::new(TableExtractor::new(entities), TokenizerOpts::default());
    match tokenizer.feed(&mut input) {
        TokenizerResult::Done => {}
        // The sink never yields a script handle, so feeding cannot pause.
        TokenizerResult::Script(()) => {}
    }
    tokenizer.end();

    tokenizer.sink.into_document()
}

/// Token sink that keeps only table markup.
pub struct TableExtractor<'e> {
    entities: &'e EntityTable,
    /// Elements open inside the current table region, outermost first.
    /// Empty means "outside any table".
    open: Vec<String>,
    /// Text gathered since the last tag, emitted as one stripped run.
    pending_text: String,
    /// Set while inside `<script>`/`<style>`; holds the element name.
    raw_element: Option<String>,
    tables: usize,
    out: String,
}

impl<'e> TableExtractor<'e> {
    pub fn new(entities: &'e EntityTable) -> Self {
        Self {
            entities,
            open: Vec::new(),
            pending_text: String::new(),
            raw_element: None,
            tables: 0,
            out: String::new(),
        }
    }

    fn in_table(&self) -> bool {
        !self.open.is_empty()
    }

    /// Finishes any open table and wraps the captured markup in a document.
    pub fn into_document(mut self) -> String {
        self.flush_text();
        self.close_until(0);
        debug!(tables = self.tables, bytes = self.out.len(), "extracted table markup");

        let mut document = prologue(self.entities);
        document.push_str(&self.out);
        document.push_str(DOCUMENT_EPILOGUE);
        document
    }

    fn handle_tag(
        &mut self,
        tag: Tag,
    ) -> TokenSinkResult<()> {
        self.flush_text();
        let name: &str = &tag.name;

        match tag.kind {
            TagKind::StartTag => {
                if self.raw_element.is_some() {
                    return TokenSinkResult::Continue;
                }
                if let Some(kind) = raw_text_kind(name) {
                    self.raw_element = Some(name.to_string());
                    return TokenSinkResult::RawData(kind);
                }
                self.start_tag(&tag);
            }
            TagKind::EndTag => {
                if let Some(raw) = &self.raw_element {
                    if raw == name {
                        self.raw_element = None;
                    }
                    return TokenSinkResult::Continue;
                }
                self.end_tag(name);
            }
        }

        TokenSinkResult::Continue
    }

    fn start_tag(
        &mut self,
        tag: &Tag,
    ) {
        let name: &str = &tag.name;
        if !(self.in_table() || name == "table") || !is_xml_name(name) {
            return;
        }
        if name == "table" && !self.in_table() {
            self.tables += 1;
        }
        self.close_implied(name);

        self.out.push('<');
        self.out.push_str(name);
        for attr in &tag.attrs {
            let key: &str = &attr.name.local;
            if !is_xml_name(key) {
                trace!(element = name, attribute = key, "dropping attribute without an XML name");
                continue;
            }
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.out.push_str(&self.entities.sanitize(&attr.value));
            self.out.push('"');
        }

        if tag.self_closing || VOID_ELEMENTS.contains(&name) {
            self.out.push_str("/>");
        } else {
            self.out.push('>');
            self.open.push(name.to_string());
        }
    }

    fn end_tag(
        &mut self,
        name: &str,
    ) {
        if !self.in_table() || VOID_ELEMENTS.contains(&name) {
            return;
        }
        match self.open.iter().rposition(|open| open == name) {
            Some(depth) => self.close_until(depth),
            None => trace!(element = name, "dropping stray end tag"),
        }
    }

    /// Closes the cell, row or row group that a new `name` element
    /// implicitly ends, as browsers do for `<td>a<td>b`.
    fn close_implied(
        &mut self,
        name: &str,
    ) {
        let (closes, scope): (&[&str], &[&str]) = match name {
            "td" | "th" => (&["td", "th"], &["tr", "table"]),
            "tr" => (&["tr"], &["thead", "tbody", "tfoot", "table"]),
            "thead" | "tbody" | "tfoot" => (&["thead", "tbody", "tfoot"], &["table"]),
            _ => return,
        };

        for depth in (0..self.open.len()).rev() {
            let open = self.open[depth].as_str();
            if closes.contains(&open) {
                self.close_until(depth);
                return;
            }
            if scope.contains(&open) {
                return;
            }
        }
    }

    /// Closes open elements until only `depth` remain.
    fn close_until(
        &mut self,
        depth: usize,
    ) {
        while self.open.len() > depth {
            if let Some(name) = self.open.pop() {
                self.out.push_str("</");
                self.out.push_str(&name);
                self.out.push('>');
            }
        }
    }

    fn handle_text(
        &mut self,
        text: &str,
    ) {
        if self.in_table() && self.raw_element.is_none() {
            self.pending_text.push_str(text);
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        let stripped = text.trim();
        if !stripped.is_empty() {
            let sanitized = self.entities.sanitize(stripped);
            self.out.push_str(&sanitized);
        }
    }
}

impl TokenSink for TableExtractor<'_> {
    type Handle = ();

    fn process_token(
        &mut self,
        token: Token,
        line_number: u64,
    ) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => return self.handle_tag(tag),
            Token::CharacterTokens(text) => self.handle_text(&text),
            Token::ParseError(error) => trace!(line = line_number, %error, "tolerated markup error"),
            Token::EOFToken => self.flush_text(),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// XML declaration, entity declarations and the opening `<html><body>`.
fn prologue(entities: &EntityTable) -> String {
    let mut prologue = String::from(XML_DECLARATION);
    prologue.push_str(&entities.doctype());
    prologue.push_str("<html><body>");
    prologue
}

fn raw_text_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        _ => None,
    }
}

/// Conservative XML name check: ASCII letter or `_` first, then letters,
/// digits, `-`, `_`, `.` or `:`.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}
