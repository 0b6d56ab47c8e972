//! Here-document headers and bodies.
//!
//! A `<<TAG` header only records what to look for. Bodies are read once
//! the scan reaches the end of the header's line, in header order, each
//! body starting where the previous one ended.

use super::ident::{is_ident_char, is_ident_start};

/// How the terminator line may be indented, and whether the body is
/// dedented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Indent {
    /// `<<TAG`: the terminator starts at column 0.
    None,
    /// `<<-TAG`: the terminator may be indented.
    Dash,
    /// `<<~TAG`: like `Dash`, and the body is dedented.
    Squiggly,
}

/// A header that has been scanned but whose body is not read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingHeredoc {
    pub(crate) tag: String,
    pub(crate) indent: Indent,
    pub(crate) interpolate: bool,
    /// Offset of the `<<`.
    pub(crate) start: usize,
    /// Offset just past the header.
    pub(crate) end: usize,
}

impl PendingHeredoc {
    /// Header text as written (`<<-"EOS"`).
    pub(crate) fn marker<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.end]
    }
}

/// Parse a heredoc header at `start`, which must point at `<<`.
pub(crate) fn parse_header(src: &str, start: usize) -> Option<PendingHeredoc> {
    let after = src.get(start..)?.strip_prefix("<<")?;
    let (indent, rest) = match after.as_bytes().first() {
        Some(b'-') => (Indent::Dash, &after[1..]),
        Some(b'~') => (Indent::Squiggly, &after[1..]),
        _ => (Indent::None, after),
    };

    let (tag, interpolate, len) = match rest.chars().next()? {
        quote @ ('\'' | '"' | '`') => {
            let body = &rest[1..];
            let close = body.find([quote, '\n'])?;
            if body[close..].starts_with('\n') {
                return None;
            }
            (&body[..close], quote != '\'', close + 2)
        }
        c if is_ident_start(c) => {
            let len = rest.find(|c| !is_ident_char(c)).unwrap_or(rest.len());
            (&rest[..len], true, len)
        }
        _ => return None,
    };

    Some(PendingHeredoc {
        tag: tag.to_owned(),
        indent,
        interpolate,
        start,
        end: src.len() - rest.len() + len,
    })
}

/// A body read from the lines after its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeredocBody {
    /// Body lines, carriage returns stripped, without line breaks.
    pub(crate) lines: Vec<String>,
    /// Terminator line as written, carriage return stripped.
    pub(crate) terminator: String,
    /// Offset of the first body line.
    pub(crate) start: usize,
    /// Offset of the line break ending the terminator line.
    pub(crate) end: usize,
}

impl HeredocBody {
    /// Source length this heredoc accounts for: header, one line break,
    /// then body and terminator.
    pub(crate) const fn consumed(&self, header: &PendingHeredoc) -> usize {
        (header.end - header.start) + self.moved_len()
    }

    /// Source length of the header's line break, body and terminator.
    pub(crate) const fn moved_len(&self) -> usize {
        1 + (self.end - self.start)
    }

    /// No interpolation or escapes can change the body text.
    pub(crate) fn is_plain(&self, header: &PendingHeredoc) -> bool {
        !header.interpolate
            || self.lines.iter().all(|line| {
                !line.contains('\\')
                    && !line.contains("#{")
                    && !line.contains("#@")
                    && !line.contains("#$")
            })
    }

    /// Header, body and terminator joined with `\n`. An empty marker
    /// gives the text of a body whose header sits inside another token.
    pub(crate) fn verbatim(&self, marker: &str) -> String {
        let mut text = String::with_capacity(marker.len() + self.end - self.start + 1);
        text.push_str(marker);
        text.push('\n');
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&self.terminator);
        text
    }

    /// The body value as a double-quoted string literal.
    pub(crate) fn folded(&self, indent: Indent) -> String {
        let lines: Vec<&str> = if indent == Indent::Squiggly {
            dedent(&self.lines)
        } else {
            self.lines.iter().map(String::as_str).collect()
        };
        let mut text = String::from("\"");
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push('"');
        text
    }
}

/// Read a body for `header` starting at offset `from`.
///
/// Returns `None` when no terminator line is found.
pub(crate) fn read_body(src: &str, from: usize, header: &PendingHeredoc) -> Option<HeredocBody> {
    let bytes = src.as_bytes();
    let mut lines = Vec::new();
    let mut line_start = from;
    while line_start < src.len() {
        let line_end =
            memchr::memchr(b'\n', &bytes[line_start..]).map_or(src.len(), |i| line_start + i);
        let raw = &src[line_start..line_end];
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if is_terminator(line, header) {
            return Some(HeredocBody {
                lines,
                terminator: line.to_owned(),
                start: from,
                end: line_end,
            });
        }
        lines.push(line.to_owned());
        line_start = line_end + 1;
    }
    None
}

fn is_terminator(line: &str, header: &PendingHeredoc) -> bool {
    match header.indent {
        Indent::None => line == header.tag,
        Indent::Dash | Indent::Squiggly => line.trim_start_matches([' ', '\t']) == header.tag,
    }
}

/// Remove the common leading whitespace of all non-blank lines.
fn dedent(lines: &[String]) -> Vec<&str> {
    let width = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| {
            line.get(width..)
                .unwrap_or_else(|| line.trim_start_matches([' ', '\t']))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(src: &str) -> PendingHeredoc {
        parse_header(src, 0).expect("should parse header")
    }

    #[test]
    fn plain_header() {
        let h = header("<<EOS\n");
        assert_eq!(h.tag, "EOS");
        assert_eq!(h.indent, Indent::None);
        assert!(h.interpolate);
        assert_eq!(h.end, 5);
    }

    #[test]
    fn dash_and_squiggly_headers() {
        assert_eq!(header("<<-EOS").indent, Indent::Dash);
        assert_eq!(header("<<~EOS").indent, Indent::Squiggly);
        assert_eq!(header("<<~EOS.strip").end, 6);
    }

    #[test]
    fn quoted_headers() {
        let h = header("<<-'EOS' x");
        assert_eq!(h.tag, "EOS");
        assert!(!h.interpolate);
        assert_eq!(h.end, 8);

        let h = header("<<\"END OF TEXT\"");
        assert_eq!(h.tag, "END OF TEXT");
        assert!(h.interpolate);
    }

    #[test]
    fn not_a_header() {
        assert!(parse_header("<< x", 0).is_none());
        assert!(parse_header("<<1", 0).is_none());
        assert!(parse_header("<<'open\n'", 0).is_none());
        assert!(parse_header("< x", 0).is_none());
    }

    #[test]
    fn header_offset_is_absolute() {
        let h = parse_header("x = <<A\n", 4).expect("should parse");
        assert_eq!((h.start, h.end), (4, 7));
        assert_eq!(h.marker("x = <<A\n"), "<<A");
    }

    #[test]
    fn body_lines_and_terminator() {
        let src = "<<E\nLine 1\nLine 2\nE\n";
        let h = header(src);
        let body = read_body(src, 4, &h).expect("should find terminator");
        assert_eq!(body.lines, vec!["Line 1", "Line 2"]);
        assert_eq!(body.terminator, "E");
        assert_eq!(body.end, 19);
        assert_eq!(body.consumed(&h), 19);
        assert_eq!(body.moved_len(), 16);
        assert_eq!(body.verbatim(""), "\nLine 1\nLine 2\nE");
        assert_eq!(body.verbatim("<<E"), "<<E\nLine 1\nLine 2\nE");
    }

    #[test]
    fn plain_terminator_must_start_the_line() {
        let src = "<<E\nx\n  E\n";
        assert!(read_body(src, 4, &header(src)).is_none());
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let src = "<<-E\r\na\r\n  E\r\n";
        let h = header(src);
        let body = read_body(src, 6, &h).expect("should find terminator");
        assert_eq!(body.lines, vec!["a"]);
        assert_eq!(body.terminator, "  E");
        assert_eq!(body.verbatim("<<-E"), "<<-E\na\n  E");
    }

    #[test]
    fn squiggly_fold_dedents() {
        let src = "<<~E\n    a\n      b\n\n    c\n  E\n";
        let h = header(src);
        let body = read_body(src, 5, &h).expect("should find terminator");
        assert_eq!(body.folded(h.indent), "\"a\n  b\n\nc\n\"");
        assert_eq!(body.folded(Indent::Dash), "\"    a\n      b\n\n    c\n\"");
    }

    #[test]
    fn plain_bodies() {
        let src = "<<E\n#{x}\nE\n";
        let h = header(src);
        let body = read_body(src, 4, &h).expect("should find terminator");
        assert!(!body.is_plain(&h));

        let src = "<<'E'\n#{x}\nE\n";
        let h = header(src);
        let body = read_body(src, 6, &h).expect("should find terminator");
        assert!(body.is_plain(&h));
    }
}
