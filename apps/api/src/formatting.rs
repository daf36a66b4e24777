//! Post-processing for model output.
//!
//! `format_recommendation_text` is a narrow heuristic for `*`-bulleted text,
//! not a markdown parser: nested lists and multi-line items are not handled.

use std::sync::OnceLock;

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

/// `* **Heading**` or `**Heading**` style emphasised bullets.
fn bold_bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*{1,2}\s*\*{1,2}(.*?)\*{1,2}").unwrap())
}

/// Any remaining `*` bullet, up to the end of its line.
fn plain_bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\s*(.*?)(?:\n|$)").unwrap())
}

/// Rewrites `*` bullets into `<li>` items and wraps the result in `<ul>`
/// when at least one bullet was rewritten. Text without bullets is returned
/// unchanged.
pub fn format_recommendation_text(text: &str) -> String {
    let bold = bold_bullet_regex();
    let plain = plain_bullet_regex();

    let mut matched = bold.is_match(text);
    let text = bold.replace_all(text, "<li><b>$1</b></li>");

    matched |= plain.is_match(&text);
    let text = plain.replace_all(&text, "<li>$1</li>");

    if matched {
        format!("<ul>{text}</ul>")
    } else {
        text.into_owned()
    }
}

/// Renders CommonMark (plus tables and strikethrough) to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Escapes text for interpolation into HTML bodies and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_without_asterisks_is_unchanged() {
        let input = "Consider moving into platform engineering.\nLearn Terraform.";
        assert_eq!(format_recommendation_text(input), input);
    }

    #[test]
    fn test_literal_list_markup_without_bullets_is_not_wrapped() {
        let input = "Already <li>formatted</li>";
        assert_eq!(format_recommendation_text(input), input);
    }

    #[test]
    fn test_plain_bullets_become_list_items() {
        let out = format_recommendation_text("* Learn Docker\n* Learn Kubernetes");
        assert_eq!(out, "<ul><li>Learn Docker</li><li>Learn Kubernetes</li></ul>");
    }

    #[test]
    fn test_bold_bullets_become_bold_items() {
        let out = format_recommendation_text("* **Cloud Engineer**");
        assert_eq!(out, "<ul><li><b>Cloud Engineer</b></li></ul>");
    }

    #[test]
    fn test_output_is_wrapped_once() {
        let out = format_recommendation_text("Intro\n* one\n* two\n");
        assert!(out.starts_with("<ul>"));
        assert!(out.ends_with("</ul>"));
        assert_eq!(out.matches("<ul>").count(), 1);
    }

    #[test]
    fn test_markdown_headings_and_lists_render() {
        let html = markdown_to_html("### Month 1: Foundation\n\n- Learn Rust\n- Build a CLI\n");
        assert!(html.contains("<h3>Month 1: Foundation</h3>"));
        assert!(html.contains("<li>Learn Rust</li>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
