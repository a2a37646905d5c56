//! HTML markup removal.
//!
//! Training descriptions are stored as HTML. Before they join a search string
//! the markup is removed and only the text between tags survives, concatenated
//! as is: `<p><b>a</b>b</p>` becomes `ab`. No whitespace is inserted where tags
//! were and entities are left encoded.
//!
//! A `<` only opens a tag when followed by a letter, `/`, `!` or `?`; anything
//! else (`a < b`, a trailing `<`) is kept as text. Quoted attribute values may
//! contain `>`. Comments are dropped whole. A tag that never closes swallows
//! the rest of the input.

use memchr::{memchr, memmem};

enum TagEnd {
    /// Not a tag, keep the `<`.
    Literal,
    /// Byte index just past the closing `>`.
    At(usize),
    Unterminated,
}

/// Strips markup from `input` into an existing buffer.
///
/// Clears the buffer before writing.
pub fn strip_html_into(input: &str, out: &mut String) {
    out.clear();
    out.reserve(input.len());

    let bytes = input.as_bytes();
    let mut i = 0usize;

    while let Some(off) = memchr(b'<', &bytes[i..]) {
        let lt = i + off;
        out.push_str(&input[i..lt]);

        match tag_end(bytes, lt) {
            TagEnd::Literal => {
                out.push('<');
                i = lt + 1;
            }
            TagEnd::At(end) => i = end,
            TagEnd::Unterminated => return,
        }
    }

    out.push_str(&input[i..]);
}

/// Strips markup from `input`.
#[inline]
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    strip_html_into(input, &mut out);
    out
}

fn tag_end(bytes: &[u8], lt: usize) -> TagEnd {
    let rest = &bytes[lt + 1..];

    if rest.starts_with(b"!--") {
        let body = lt + 4;
        return match memmem::find(&bytes[body..], b"-->") {
            Some(p) => TagEnd::At(body + p + 3),
            None => TagEnd::Unterminated,
        };
    }

    match rest.first() {
        Some(b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?') => {}
        _ => return TagEnd::Literal,
    }

    let mut quote: Option<u8> = None;
    for (j, &b) in rest.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return TagEnd::At(lt + 1 + j + 1),
                _ => {}
            },
        }
    }

    TagEnd::Unterminated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inter_tag_text_concatenated() {
        assert_eq!(
            strip_html("<p><span>zéz èzà</span><i id='test'>ù</i></p>"),
            "zéz èzàù"
        );
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(strip_html("no markup here"), "no markup here");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn closing_and_self_closing_tags() {
        assert_eq!(strip_html("line<br/>next<br />end</div>"), "linenextend");
    }

    #[test]
    fn quoted_attribute_may_contain_gt() {
        assert_eq!(strip_html(r#"<a title="a > b">link</a>"#), "link");
        assert_eq!(strip_html("<a title='x>y'>t</a>"), "t");
    }

    #[test]
    fn comments_removed() {
        assert_eq!(strip_html("a<!-- <b>hidden</b> -->b"), "ab");
        assert_eq!(strip_html("a<!-- never closed"), "a");
    }

    #[test]
    fn doctype_and_processing_instructions() {
        assert_eq!(strip_html("<!DOCTYPE html><?xml version='1.0'?>x"), "x");
    }

    #[test]
    fn lone_lt_is_text() {
        assert_eq!(strip_html("a < b"), "a < b");
        assert_eq!(strip_html("1<2"), "1<2");
        assert_eq!(strip_html("end<"), "end<");
    }

    #[test]
    fn unterminated_tag_drops_rest() {
        assert_eq!(strip_html("text<span class='x"), "text");
        assert_eq!(strip_html("a<b"), "a");
    }

    #[test]
    fn entities_left_encoded() {
        assert_eq!(strip_html("<p>Tom &amp; Jerry</p>"), "Tom &amp; Jerry");
    }

    #[test]
    fn whitespace_between_tags_kept() {
        assert_eq!(strip_html("<li>one</li>\n<li>two</li>"), "one\ntwo");
    }

    #[test]
    fn strip_into_reuses_buffer() {
        let mut buf = String::with_capacity(32);
        strip_html_into("<b>first</b>", &mut buf);
        assert_eq!(buf, "first");
        strip_html_into("<i>second</i>", &mut buf);
        assert_eq!(buf, "second");
    }
}
