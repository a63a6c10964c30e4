use crate::error::ParseError;
use crate::parsers::html::{self, ExtractOptions};
use crate::results::NO_TITLE_FOUND;
use scraper::Html;

#[cfg(test)]
mod title_tests {
    use super::*;

    #[test]
    fn test_title_is_exact_text() {
        let doc = Html::parse_document(
            "<html><head><title>Rust  Programming Language</title></head><body></body></html>",
        );
        assert_eq!(html::extract_title(&doc), "Rust  Programming Language");
    }

    #[test]
    fn test_missing_title_uses_fallback() {
        let doc = Html::parse_document("<html><body><h1>Hello</h1></body></html>");
        assert_eq!(html::extract_title(&doc), NO_TITLE_FOUND);
        assert_eq!(html::extract_title(&doc), "no title found");
    }

    #[test]
    fn test_empty_title_uses_fallback() {
        let doc = Html::parse_document("<html><head><title></title></head><body></body></html>");
        assert_eq!(html::extract_title(&doc), NO_TITLE_FOUND);
    }

    #[test]
    fn test_first_title_wins() {
        let doc = Html::parse_document(
            "<html><head><title>First</title></head><body><svg><title>Icon</title></svg></body></html>",
        );
        assert_eq!(html::extract_title(&doc), "First");
    }
}

#[cfg(test)]
mod text_tests {
    use super::*;

    #[test]
    fn test_block_text_is_newline_separated() {
        let result = html::extract(
            "<html><body><h1>Hello</h1><p>World</p></body></html>",
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(result.title, NO_TITLE_FOUND);
        assert_eq!(result.text, "Hello\nWorld");
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_text_is_trimmed() {
        let result = html::extract(
            "<html><body>\n\n   <div>\n  Padded  \n</div>\n\n</body></html>",
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(result.text, "Padded");
    }

    #[test]
    fn test_head_text_is_not_body_text() {
        let result = html::extract(
            "<html><head><title>Only title</title></head><body><p>Body</p></body></html>",
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(result.title, "Only title");
        assert_eq!(result.text, "Body");
    }

    #[test]
    fn test_long_body_truncated_to_limit() {
        let body = "a".repeat(3500);
        let page = format!("<html><body><p>{}</p></body></html>", body);
        let result = html::extract(&page, &ExtractOptions::default()).unwrap();
        assert_eq!(result.text.chars().count(), 2000);
        assert_eq!(result.text, "a".repeat(2000));
    }

    #[test]
    fn test_short_body_not_truncated() {
        let result = html::extract(
            "<html><body><p>short</p></body></html>",
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(result.text, "short");
    }

    #[test]
    fn test_custom_limit() {
        let options = ExtractOptions {
            max_text_chars: 7,
            ..ExtractOptions::default()
        };
        let result =
            html::extract("<html><body><p>Hello</p><p>World</p></body></html>", &options).unwrap();
        assert_eq!(result.text, "Hello\nW");
    }

    #[test]
    fn test_frameset_has_no_body() {
        let err = html::extract(
            "<html><head><title>Frames</title></head><frameset><frame src=\"a.html\"></frameset></html>",
            &ExtractOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingBody));
    }
}

#[cfg(test)]
mod link_tests {
    use super::*;

    #[test]
    fn test_hrefless_and_empty_links_dropped() {
        let result = html::extract(
            r#"<html><body><a href="/a">A</a><a>B</a><a href="">C</a></body></html>"#,
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(result.links, vec!["/a"]);
    }

    #[test]
    fn test_links_keep_order_and_duplicates() {
        let doc = Html::parse_document(
            r##"<html><body>
                <a href="https://example.com/z">z</a>
                <div><a href="/b">b</a></div>
                <a href="https://example.com/z">z again</a>
                <a href="#top">top</a>
            </body></html>"##,
        );
        assert_eq!(
            html::extract_links(&doc),
            vec!["https://example.com/z", "/b", "https://example.com/z", "#top"]
        );
    }

    #[test]
    fn test_links_never_empty() {
        let doc = Html::parse_document(
            r#"<html><body><a href="">x</a><a name="anchor">y</a><a href="/ok">z</a></body></html>"#,
        );
        let links = html::extract_links(&doc);
        assert!(links.iter().all(|l| !l.is_empty()));
        assert_eq!(links, vec!["/ok"]);
    }
}
