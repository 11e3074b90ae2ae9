use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB: &str = "    ";

/// Hard-wrap raw process output without touching its whitespace.
///
/// Every source line yields at least one row, so blank lines survive.
pub fn wrap_literal(text: &str, style: Style, max_width: usize, lines: &mut Vec<Line<'static>>) {
    if max_width == 0 {
        return;
    }

    let text = text.strip_suffix('\n').unwrap_or(text);
    for source_line in text.split('\n') {
        let source_line = source_line.trim_end_matches('\r').replace('\t', TAB);
        if source_line.is_empty() {
            lines.push(Line::default());
            continue;
        }

        if source_line.width() <= max_width {
            lines.push(Line::from(Span::styled(source_line, style)));
            continue;
        }

        let mut chunk = String::new();
        let mut chunk_width = 0;
        for ch in source_line.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if chunk_width + ch_width > max_width && !chunk.is_empty() {
                lines.push(Line::from(Span::styled(std::mem::take(&mut chunk), style)));
                chunk_width = 0;
            }
            chunk.push(ch);
            chunk_width += ch_width;
        }

        if !chunk.is_empty() {
            lines.push(Line::from(Span::styled(chunk, style)));
        }
    }
}

/// Word-wrap prose, indenting continuation rows by `indent` columns.
pub fn wrap_words(text: &str, style: Style, max_width: usize, indent: usize, lines: &mut Vec<Line<'static>>) {
    if max_width <= indent {
        return;
    }

    let pad = " ".repeat(indent);
    for source_line in text.lines() {
        if source_line.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }

        let options = textwrap::Options::new(max_width).initial_indent(&pad).subsequent_indent(&pad);
        for row in textwrap::wrap(source_line, options) {
            lines.push(Line::from(Span::styled(row.into_owned(), style)));
        }
    }
}
