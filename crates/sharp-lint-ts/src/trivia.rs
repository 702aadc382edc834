//! Trivia reconstruction.
//!
//! Tree-sitter keeps whitespace out of the tree and surfaces comments and
//! some directives as "extra" nodes. The converter instead lexes the text
//! between two tokens into [`Trivia`] and splits it the way the C# compiler
//! does: trivia up to and including the first line break trails the previous
//! token, the rest leads the next one.

use sharp_lint_core::syntax::{LinePosition, LineSpan, TextRange};
use sharp_lint_core::{Trivia, TriviaKind};

/// Line starts of a source text, for offset to line/column mapping.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    starts: Vec<usize>,
    directive: Vec<bool>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));

        let directive = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(source.len());
                source[start..end].trim_start().starts_with('#')
            })
            .collect();

        Self { starts, directive }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// 0-based line and byte column of `offset`.
    pub(crate) fn position(&self, offset: usize) -> LinePosition {
        let line = self.line_of(offset);
        LinePosition::new(line, offset - self.starts[line])
    }

    pub(crate) fn span(&self, range: TextRange) -> LineSpan {
        LineSpan::new(self.position(range.start), self.position(range.end))
    }

    /// Returns true if `offset` lies on a preprocessor directive line.
    pub(crate) fn is_directive_line(&self, offset: usize) -> bool {
        self.directive[self.line_of(offset)]
    }

    /// Returns true if only whitespace precedes `offset` on its line.
    pub(crate) fn at_line_start(&self, source: &str, offset: usize) -> bool {
        let start = self.starts[self.line_of(offset)];
        source[start..offset].trim().is_empty()
    }
}

/// Lexes `source[start..end]`, which holds no tokens, into trivia.
pub(crate) fn lex(source: &str, start: usize, end: usize, index: &LineIndex) -> Vec<Trivia> {
    let mut trivia = Vec::new();
    let mut pos = start;

    while pos < end {
        let rest = &source[pos..end];
        let (kind, len) = next_trivia(rest, index.at_line_start(source, pos));
        let range = TextRange::new(pos, pos + len);
        trivia.push(Trivia::new(kind, &rest[..len], range, index.span(range)));
        pos += len;
    }

    trivia
}

fn next_trivia(rest: &str, at_line_start: bool) -> (TriviaKind, usize) {
    if rest.starts_with("\r\n") {
        return (TriviaKind::EndOfLine, 2);
    }
    if rest.starts_with(['\n', '\r']) {
        return (TriviaKind::EndOfLine, 1);
    }
    if rest.starts_with(|c: char| c.is_whitespace()) {
        let len = rest
            .find(|c: char| !c.is_whitespace() || c == '\n' || c == '\r')
            .unwrap_or(rest.len());
        return (TriviaKind::Whitespace, len);
    }
    if rest.starts_with("///") && !rest.starts_with("////") {
        return (TriviaKind::DocumentationComment, line_len(rest));
    }
    if rest.starts_with("//") {
        return (TriviaKind::SingleLineComment, line_len(rest));
    }
    if rest.starts_with("/*") {
        let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
        return (TriviaKind::MultiLineComment, len);
    }
    if at_line_start && rest.starts_with('#') {
        return (directive_kind(rest), line_len(rest));
    }

    let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (TriviaKind::Skipped, len)
}

fn line_len(rest: &str) -> usize {
    rest.find(['\r', '\n']).unwrap_or(rest.len())
}

fn directive_kind(line: &str) -> TriviaKind {
    let name: String = line[1..]
        .trim_start()
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    match name.as_str() {
        "region" => TriviaKind::RegionDirective,
        "endregion" => TriviaKind::EndRegionDirective,
        _ => TriviaKind::PreprocessorDirective,
    }
}

/// Splits the trivia following a token into its trailing trivia and the
/// leading trivia of the next token.
pub(crate) fn split_trailing(mut trivia: Vec<Trivia>) -> (Vec<Trivia>, Vec<Trivia>) {
    let cut = trivia
        .iter()
        .position(|t| t.kind() == TriviaKind::EndOfLine)
        .map_or(trivia.len(), |i| i + 1);
    let leading = trivia.split_off(cut);
    (trivia, leading)
}
