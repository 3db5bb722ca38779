//! Doxygen-style documentation blocks and their tag structure.
//!
//! A documentation block is either a run of consecutive `///` / `//!`
//! lines or a single `/** ... */` / `/*! ... */` comment. Tags are words
//! introduced by `@` or `\` at a word boundary, such as `@brief` or
//! `\param`; everything up to the next tag is the tag's body.

use std::collections::HashMap;

use crate::model::DeclId;

/// One parsed tag of a documentation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name without the sigil, e.g. `brief` or `param`.
    pub name: String,
    /// Whitespace-normalized body text up to the next tag.
    pub body: String,
}

/// A documentation comment attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    /// Comment content with markers (`///`, `*`, `/**`, `*/`) stripped.
    pub text: String,
    /// Tags in order of appearance. Duplicates are preserved.
    pub tags: Vec<DocTag>,
    /// First source line of the comment.
    pub start_line: usize,
    /// Last source line of the comment.
    pub end_line: usize,
}

impl DocBlock {
    /// Parses raw comment text. `raw` is the comment exactly as lexed;
    /// runs of line comments are joined with `\n` before parsing.
    pub fn parse(raw: &str, start_line: usize) -> Self {
        let end_line = start_line + raw.matches('\n').count();
        let lines: Vec<String> = raw.lines().map(strip_markers).collect();
        let text = lines.join("\n").trim().to_string();
        let tags = scan_tags(&lines);
        Self {
            text,
            tags,
            start_line,
            end_line,
        }
    }

    /// Whether a tag with `name` is present.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Bodies of every tag named `name`, in order.
    pub fn tag_bodies<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.tags
            .iter()
            .filter(move |t| t.name == name)
            .map(|t| t.body.as_str())
    }

    /// First word of each body of the tags named `name`. For `param` and
    /// `tparam` this is the documented parameter name.
    pub fn documented_names<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        self.tag_bodies(name)
            .filter_map(|body| body.split_whitespace().next())
            .collect()
    }
}

/// Removes comment markers from one line of a doc comment.
fn strip_markers(line: &str) -> String {
    let mut s = line.trim();
    for opener in ["/**", "/*!", "///", "//!", "/*"] {
        if let Some(rest) = s.strip_prefix(opener) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = s.strip_suffix("*/") {
        s = rest;
    }
    let s = s.trim_start();
    // A bare `*` gutter from block-comment continuation lines.
    let s = s.strip_prefix('*').map_or(s, |rest| rest);
    s.trim().to_string()
}

/// Scans stripped content lines for `@tag` / `\tag` structure.
fn scan_tags(lines: &[String]) -> Vec<DocTag> {
    let mut tags: Vec<DocTag> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for line in lines {
        for word in line.split_whitespace() {
            match parse_tag_word(word) {
                Some((name, remainder)) => {
                    if let Some((tag, body)) = current.take() {
                        tags.push(DocTag {
                            name: tag,
                            body: body.join(" "),
                        });
                    }
                    let mut body = Vec::new();
                    if !remainder.is_empty() {
                        body.push(remainder.to_string());
                    }
                    current = Some((name, body));
                }
                None => {
                    if let Some((_, body)) = current.as_mut() {
                        body.push(word.to_string());
                    }
                }
            }
        }
    }
    if let Some((tag, body)) = current.take() {
        tags.push(DocTag {
            name: tag,
            body: body.join(" "),
        });
    }
    tags
}

/// Splits a word into a tag name and trailing remainder, if the word
/// introduces a tag. `@param[in]` yields `("param", "")`; the direction
/// marker is dropped.
fn parse_tag_word(word: &str) -> Option<(String, &str)> {
    let rest = word.strip_prefix('@').or_else(|| word.strip_prefix('\\'))?;
    let name_len = rest.chars().take_while(char::is_ascii_alphabetic).count();
    if name_len == 0 {
        return None;
    }
    let (name, mut remainder) = rest.split_at(name_len);
    if let Some(after) = remainder.strip_prefix('[') {
        remainder = after.split_once(']').map_or("", |(_, tail)| tail);
    }
    Some((name.to_string(), remainder))
}

/// Doc comments of a translation unit, keyed by declaration id.
#[derive(Debug, Clone, Default)]
pub struct DocIndex {
    map: HashMap<DeclId, DocBlock>,
}

impl DocIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `block` with `id`.
    pub fn insert(&mut self, id: DeclId, block: DocBlock) {
        self.map.insert(id, block);
    }

    /// Doc block for `id`, if one precedes the declaration.
    pub fn get(&self, id: DeclId) -> Option<&DocBlock> {
        self.map.get(&id)
    }

    /// Number of documented declarations.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no declaration is documented.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_slash_run() {
        let raw = "/// @brief Frobnicates the input.\n/// @param count how many\n/// @return the result";
        let block = DocBlock::parse(raw, 10);
        assert_eq!(block.start_line, 10);
        assert_eq!(block.end_line, 12);
        assert!(block.has_tag("brief"));
        assert!(block.has_tag("param"));
        assert!(block.has_tag("return"));
        assert_eq!(block.documented_names("param"), vec!["count"]);
    }

    #[test]
    fn block_comment_with_star_gutter() {
        let raw = "/**\n * @brief Does things.\n * @tparam T element type\n */";
        let block = DocBlock::parse(raw, 1);
        assert!(block.has_tag("brief"));
        assert_eq!(block.documented_names("tparam"), vec!["T"]);
        assert_eq!(block.end_line, 4);
    }

    #[test]
    fn backslash_sigil_is_recognized() {
        let block = DocBlock::parse("/// \\brief Short.", 1);
        assert!(block.has_tag("brief"));
        assert_eq!(block.tags[0].body, "Short.");
    }

    #[test]
    fn direction_marker_is_dropped() {
        let block = DocBlock::parse("/// @param[in] count number of items", 1);
        assert_eq!(block.documented_names("param"), vec!["count"]);
    }

    #[test]
    fn body_accumulates_across_lines() {
        let raw = "/// @brief A very long\n/// explanation.";
        let block = DocBlock::parse(raw, 1);
        assert_eq!(block.tags[0].body, "A very long explanation.");
    }

    #[test]
    fn duplicate_tags_are_preserved() {
        let raw = "/// @param a first\n/// @param b second";
        let block = DocBlock::parse(raw, 1);
        assert_eq!(block.documented_names("param"), vec!["a", "b"]);
    }

    #[test]
    fn email_address_is_not_a_tag() {
        let block = DocBlock::parse("/// Contact dev@example.com for help.", 1);
        assert!(block.tags.is_empty());
        assert!(block.text.contains("dev@example.com"));
    }

    #[test]
    fn untagged_text_is_kept_but_not_a_tag() {
        let block = DocBlock::parse("/// Just a note.", 1);
        assert!(block.tags.is_empty());
        assert_eq!(block.text, "Just a note.");
    }
}
