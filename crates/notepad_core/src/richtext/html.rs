//! HTML-subset markup for persisted note bodies.
//!
//! Output shape:
//! - `<p>` per paragraph, `<ul>`/`<ol>` groups with `<li>` for list items.
//! - `style="text-align: ..."` only for non-left alignment.
//! - Span nesting order: color `<span>`, `<b>`, `<i>`, `<u>`, `<s>`.
//! - Empty paragraphs are written as `<p><br></p>`.

use super::{
    ListKind, Paragraph, ParagraphStyle, RichTextDocument, SpanStyle, TextAlign, TextColor,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>|[^<]+|<"#)
        .expect("valid markup token regex")
});
static STYLE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid style attribute regex")
});
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z]+);").expect("valid entity regex")
});

pub(super) fn serialize(document: &RichTextDocument) -> String {
    let mut out = String::new();
    let mut open_list: Option<ListKind> = None;

    for paragraph in document.paragraphs() {
        let list = paragraph.style.list;
        if open_list != list {
            if let Some(kind) = open_list {
                out.push_str(list_close_tag(kind));
            }
            if let Some(kind) = list {
                out.push_str(list_open_tag(kind));
            }
            open_list = list;
        }

        let tag = if list.is_some() { "li" } else { "p" };
        out.push('<');
        out.push_str(tag);
        if paragraph.style.align != TextAlign::Left {
            out.push_str(&format!(
                " style=\"text-align: {};\"",
                paragraph.style.align.css_value()
            ));
        }
        out.push('>');

        if paragraph.is_empty() {
            out.push_str("<br>");
        } else {
            for run in &paragraph.runs {
                write_run(&mut out, &run.text, run.style);
            }
        }

        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    if let Some(kind) = open_list {
        out.push_str(list_close_tag(kind));
    }
    out
}

fn write_run(out: &mut String, text: &str, style: SpanStyle) {
    if let Some(color) = style.color {
        out.push_str(&format!("<span style=\"color: {};\">", color.to_hex()));
    }
    let flags = [
        (style.bold, "b"),
        (style.italic, "i"),
        (style.underline, "u"),
        (style.strikethrough, "s"),
    ];
    for (active, tag) in flags {
        if active {
            out.push_str(&format!("<{tag}>"));
        }
    }
    out.push_str(&escape(text));
    for (active, tag) in flags.iter().rev() {
        if *active {
            out.push_str(&format!("</{tag}>"));
        }
    }
    if style.color.is_some() {
        out.push_str("</span>");
    }
}

fn list_open_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Unordered => "<ul>",
        ListKind::Ordered => "<ol>",
    }
}

fn list_close_tag(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Unordered => "</ul>",
        ListKind::Ordered => "</ol>",
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub(super) fn parse(markup: &str) -> RichTextDocument {
    let mut parser = MarkupParser::default();
    for caps in TOKEN_RE.captures_iter(markup) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        if token.as_str().starts_with("<!--") {
            continue;
        }
        match caps.get(2) {
            Some(name) => {
                let closing = caps.get(1).is_some_and(|slash| !slash.as_str().is_empty());
                let attrs = caps.get(3).map_or("", |attrs| attrs.as_str());
                let name = name.as_str().to_ascii_lowercase();
                if closing {
                    parser.close_tag(&name);
                } else {
                    parser.open_tag(&name, attrs);
                }
            }
            None => parser.text(&decode_entities(token.as_str())),
        }
    }
    RichTextDocument::from_parts(parser.paragraphs)
}

#[derive(Default)]
struct MarkupParser {
    paragraphs: Vec<Paragraph>,
    /// Open inline tags with the effective style inside each.
    spans: Vec<(String, SpanStyle)>,
    lists: Vec<ListKind>,
    in_block: bool,
}

impl MarkupParser {
    fn current_style(&self) -> SpanStyle {
        self.spans
            .last()
            .map(|(_, style)| *style)
            .unwrap_or_default()
    }

    fn open_tag(&mut self, name: &str, attrs: &str) {
        match name {
            "p" | "div" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let mut style = ParagraphStyle::default();
                apply_paragraph_css(&mut style, attrs);
                self.open_block(style, attrs);
            }
            "li" => {
                let mut style = ParagraphStyle {
                    list: Some(self.lists.last().copied().unwrap_or(ListKind::Unordered)),
                    ..ParagraphStyle::default()
                };
                apply_paragraph_css(&mut style, attrs);
                self.open_block(style, attrs);
            }
            "ul" => {
                self.lists.push(ListKind::Unordered);
                self.in_block = false;
            }
            "ol" => {
                self.lists.push(ListKind::Ordered);
                self.in_block = false;
            }
            "br" => self.line_break(),
            _ => {
                if let Some(style) = inline_style(name, attrs, self.current_style()) {
                    self.spans.push((name.to_string(), style));
                }
            }
        }
    }

    fn close_tag(&mut self, name: &str) {
        match name {
            "p" | "div" | "blockquote" | "pre" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
            | "li" => self.in_block = false,
            "ul" | "ol" => {
                self.lists.pop();
                self.in_block = false;
            }
            _ => {
                if let Some(index) = self.spans.iter().rposition(|(open, _)| open == name) {
                    self.spans.truncate(index);
                }
            }
        }
    }

    /// Opens a paragraph; an empty paragraph that is still open (e.g. `<li>`
    /// directly wrapping `<p>`) is reused instead of leaving a blank line.
    fn open_block(&mut self, style: ParagraphStyle, attrs: &str) {
        if self.in_block {
            if let Some(last) = self.paragraphs.last_mut() {
                if last.is_empty() {
                    if has_text_align(attrs) {
                        last.style.align = style.align;
                    }
                    return;
                }
            }
        }
        self.paragraphs.push(Paragraph::new(style));
        self.in_block = true;
    }

    fn line_break(&mut self) {
        if !self.in_block {
            self.paragraphs.push(Paragraph::new(self.loose_style()));
            return;
        }
        let carried = match self.paragraphs.last() {
            Some(last) if !last.is_empty() => last.style,
            _ => return,
        };
        self.paragraphs.push(Paragraph::new(carried));
    }

    fn text(&mut self, raw: &str) {
        let text = raw.replace(['\r', '\n', '\t'], " ");
        if !self.in_block {
            if text.trim().is_empty() {
                return;
            }
            self.paragraphs.push(Paragraph::new(self.loose_style()));
            self.in_block = true;
        }
        let style = self.current_style();
        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.push_text(&text, style);
        }
    }

    fn loose_style(&self) -> ParagraphStyle {
        ParagraphStyle {
            list: self.lists.last().copied(),
            ..ParagraphStyle::default()
        }
    }
}

fn inline_style(name: &str, attrs: &str, parent: SpanStyle) -> Option<SpanStyle> {
    let mut style = parent;
    match name {
        "b" | "strong" => style.bold = true,
        "i" | "em" => style.italic = true,
        "u" | "ins" => style.underline = true,
        "s" | "strike" | "del" => style.strikethrough = true,
        "span" | "font" => {}
        _ => return None,
    }
    for (property, value) in css_declarations(attrs) {
        match property.as_str() {
            "color" => {
                if let Some(color) = TextColor::parse_css(&value) {
                    style.color = Some(color);
                }
            }
            "font-weight" => style.bold = is_bold_weight(&value),
            "font-style" => style.italic = value.eq_ignore_ascii_case("italic"),
            "text-decoration" | "text-decoration-line" => {
                let lowered = value.to_ascii_lowercase();
                style.underline = lowered.contains("underline");
                style.strikethrough = lowered.contains("line-through");
            }
            _ => {}
        }
    }
    Some(style)
}

fn is_bold_weight(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "bold" | "bolder" => true,
        numeric => numeric.parse::<u16>().is_ok_and(|weight| weight >= 600),
    }
}

fn apply_paragraph_css(style: &mut ParagraphStyle, attrs: &str) {
    for (property, value) in css_declarations(attrs) {
        if property == "text-align" {
            if let Some(align) = TextAlign::parse_css(&value) {
                style.align = align;
            }
        }
    }
}

fn has_text_align(attrs: &str) -> bool {
    css_declarations(attrs)
        .iter()
        .any(|(property, _)| property == "text-align")
}

fn css_declarations(attrs: &str) -> Vec<(String, String)> {
    let Some(caps) = STYLE_ATTR_RE.captures(attrs) else {
        return Vec::new();
    };
    let body = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map_or("", |body| body.as_str());
    body.split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(property, value)| {
            (
                property.trim().to_ascii_lowercase(),
                value.trim().to_string(),
            )
        })
        .collect()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let entity = &caps[1];
            decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    let code_point = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(decimal) = entity.strip_prefix('#') {
        decimal.parse::<u32>().ok()
    } else {
        let named = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => ' ',
            _ => return None,
        };
        return Some(named.to_string());
    };
    code_point.and_then(char::from_u32).map(String::from)
}
