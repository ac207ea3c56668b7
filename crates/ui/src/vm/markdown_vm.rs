use std::collections::HashSet;

use pulldown_cmark::{Options, Parser, html};

/// Tags a note body may keep after rendering.
const NOTE_TAGS: [&str; 27] = [
    "p", "br", "hr", "em", "strong", "del", "code", "pre", "blockquote", "ul", "ol", "li", "a",
    "h1", "h2", "h3", "h4", "h5", "h6", "table", "thead", "tbody", "tr", "th", "td", "span",
    "div",
];

/// Render a note body to HTML that is safe to inject into the view.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new_ext(input, options));
    sanitize_html(&rendered)
}

#[must_use]
pub fn sanitize_html(raw: &str) -> String {
    let schemes: HashSet<&str> = ["http", "https", "mailto"].into_iter().collect();
    ammonia::Builder::empty()
        .add_tags(NOTE_TAGS)
        .add_tag_attributes("a", ["href"])
        .url_schemes(schemes)
        .link_rel(Some("noopener noreferrer"))
        .clean(raw)
        .to_string()
}

/// Unify line endings, drop trailing blanks and keep at most one empty line
/// in a row. Non-empty output ends with a newline.
#[must_use]
pub fn normalize_markdown(input: &str) -> String {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(unified.len());
    let mut previous_blank = false;

    for line in unified.lines().map(|l| l.trim_end_matches([' ', '\t'])) {
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        out.push_str(line);
        out.push('\n');
        previous_blank = blank;
    }

    if out.trim().is_empty() {
        return String::new();
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{markdown_to_html, normalize_markdown};

    #[test]
    fn normalize_markdown_trims_and_collapses_blank_lines() {
        let input = "Line one  \r\n\r\n\r\nLine two\t\r\n\r\n";
        let output = normalize_markdown(input);
        assert_eq!(output, "Line one\n\nLine two\n");
        assert_eq!(normalize_markdown(" \r\n\t\n"), "");
    }

    #[test]
    fn markdown_to_html_sanitizes_links() {
        let html = markdown_to_html("[Link](javascript:alert(1))");
        assert!(html.contains("Link"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn markdown_to_html_strips_scripts_keeps_emphasis() {
        let html = markdown_to_html("**pumping lemma** <script>alert(1)</script>");
        assert!(html.contains("<strong>pumping lemma</strong>"));
        assert!(!html.contains("<script"));
    }
}
