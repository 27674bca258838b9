//! Rich-text body model.
//!
//! # Responsibility
//! - Hold a note body as paragraphs of styled text runs.
//! - Apply editor toolbar toggles (span styles, color, alignment, lists).
//! - Convert between the in-memory document and persisted HTML markup.
//!
//! # Invariants
//! - A document always holds at least one paragraph.
//! - Adjacent runs inside a paragraph never share the same style.
//! - Text runs never contain line breaks; `\n` separates paragraphs.

mod html;
mod style;

pub use style::{
    ColorChoice, ListKind, ParagraphStyle, SpanStyle, SpanToggle, TextAlign, TextColor,
    COLOR_PALETTE,
};

/// Contiguous text sharing one span style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub style: SpanStyle,
}

/// One block of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn new(style: ParagraphStyle) -> Self {
        Self {
            style,
            runs: Vec::new(),
        }
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    fn push_text(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(TextRun {
                text: text.to_string(),
                style,
            }),
        }
    }
}

/// Editable rich-text document.
///
/// Editing happens at the end of the document, the way a compose field
/// with a collapsed cursor behaves: toggles change the *typing style*
/// used by the next `insert_text`, and paragraph toggles act on the last
/// paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextDocument {
    paragraphs: Vec<Paragraph>,
    typing_style: SpanStyle,
}

impl Default for RichTextDocument {
    fn default() -> Self {
        Self {
            paragraphs: vec![Paragraph::default()],
            typing_style: SpanStyle::default(),
        }
    }
}

impl RichTextDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an unstyled document, one paragraph per line.
    pub fn from_plain_text(text: &str) -> Self {
        let mut document = Self::new();
        document.insert_text(text);
        document
    }

    /// Parses HTML markup leniently. Unknown tags are skipped and
    /// malformed input degrades to plain text, so this never fails.
    pub fn parse_html(markup: &str) -> Self {
        html::parse(markup)
    }

    /// Serializes the document to HTML markup.
    pub fn to_html(&self) -> String {
        html::serialize(self)
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Paragraph texts joined with `\n`.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True when the document has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.paragraphs
            .iter()
            .flat_map(|paragraph| paragraph.runs.iter())
            .all(|run| run.text.trim().is_empty())
    }

    pub fn typing_style(&self) -> SpanStyle {
        self.typing_style
    }

    /// Style of the paragraph being edited.
    pub fn paragraph_style(&self) -> ParagraphStyle {
        self.paragraphs
            .last()
            .map(|paragraph| paragraph.style)
            .unwrap_or_default()
    }

    /// Appends text with the current typing style.
    ///
    /// Each `\n` starts a new paragraph carrying the previous paragraph's
    /// style, so list and alignment settings continue on the next line.
    pub fn insert_text(&mut self, text: &str) {
        let style = self.typing_style;
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                let carried = self.current_paragraph_mut().style;
                self.paragraphs.push(Paragraph::new(carried));
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            self.current_paragraph_mut().push_text(line, style);
        }
    }

    pub fn toggle_span(&mut self, toggle: SpanToggle) {
        self.typing_style = self.typing_style.toggled(toggle);
    }

    /// Applies `color` to the typing style, or clears it when already set.
    pub fn toggle_color(&mut self, color: TextColor) {
        self.typing_style.color = if self.typing_style.color == Some(color) {
            None
        } else {
            Some(color)
        };
    }

    pub fn set_alignment(&mut self, align: TextAlign) {
        self.current_paragraph_mut().style.align = align;
    }

    pub fn toggle_unordered_list(&mut self) {
        self.toggle_list(ListKind::Unordered);
    }

    pub fn toggle_ordered_list(&mut self) {
        self.toggle_list(ListKind::Ordered);
    }

    fn toggle_list(&mut self, kind: ListKind) {
        let paragraph = self.current_paragraph_mut();
        paragraph.style.list = if paragraph.style.list == Some(kind) {
            None
        } else {
            Some(kind)
        };
    }

    fn current_paragraph_mut(&mut self) -> &mut Paragraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(Paragraph::default());
        }
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    fn from_parts(paragraphs: Vec<Paragraph>) -> Self {
        let mut paragraphs = paragraphs;
        if paragraphs.is_empty() {
            paragraphs.push(Paragraph::default());
        }
        let typing_style = paragraphs
            .last()
            .and_then(|paragraph| paragraph.runs.last())
            .map(|run| run.style)
            .unwrap_or_default();
        Self {
            paragraphs,
            typing_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListKind, RichTextDocument, SpanToggle, TextAlign, TextColor};

    #[test]
    fn new_document_is_blank_with_one_paragraph() {
        let document = RichTextDocument::new();
        assert!(document.is_blank());
        assert_eq!(document.paragraphs().len(), 1);
        assert_eq!(document.plain_text(), "");
    }

    #[test]
    fn insert_text_splits_paragraphs_on_newlines() {
        let document = RichTextDocument::from_plain_text("one\r\ntwo\nthree");
        assert_eq!(document.paragraphs().len(), 3);
        assert_eq!(document.plain_text(), "one\ntwo\nthree");
    }

    #[test]
    fn toggles_apply_to_text_typed_afterwards() {
        let mut document = RichTextDocument::new();
        document.insert_text("plain ");
        document.toggle_span(SpanToggle::Bold);
        document.insert_text("bold");
        document.toggle_span(SpanToggle::Bold);
        document.insert_text(" plain");

        let runs = &document.paragraphs()[0].runs;
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].style.bold);
        assert!(runs[1].style.bold);
        assert_eq!(runs[1].text, "bold");
        assert!(!runs[2].style.bold);
    }

    #[test]
    fn toggle_color_clears_when_same_color_is_picked_twice() {
        let mut document = RichTextDocument::new();
        document.toggle_color(TextColor::RED);
        assert_eq!(document.typing_style().color, Some(TextColor::RED));
        document.toggle_color(TextColor::BLUE);
        assert_eq!(document.typing_style().color, Some(TextColor::BLUE));
        document.toggle_color(TextColor::BLUE);
        assert_eq!(document.typing_style().color, None);
    }

    #[test]
    fn list_style_carries_to_new_lines_and_toggles_off() {
        let mut document = RichTextDocument::new();
        document.toggle_ordered_list();
        document.insert_text("first\nsecond");
        assert_eq!(document.paragraphs()[1].style.list, Some(ListKind::Ordered));

        document.toggle_ordered_list();
        assert_eq!(document.paragraph_style().list, None);
        document.toggle_unordered_list();
        assert_eq!(document.paragraph_style().list, Some(ListKind::Unordered));
    }

    #[test]
    fn set_alignment_changes_only_current_paragraph() {
        let mut document = RichTextDocument::from_plain_text("a\nb");
        document.set_alignment(TextAlign::Center);
        assert_eq!(document.paragraphs()[0].style.align, TextAlign::Left);
        assert_eq!(document.paragraphs()[1].style.align, TextAlign::Center);
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        assert!(RichTextDocument::from_plain_text("  \n\t").is_blank());
    }
}
