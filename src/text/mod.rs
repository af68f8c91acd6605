//! Submission text cleanup
//!
//! Fetched submissions arrive as markdown. Output files are meant for corpus
//! building, so formatting is stripped and whitespace is conflated before the
//! blacklist filter sees the lines.

use regex::Regex;

/// Placeholder author for submissions whose author account was deleted
pub const DEFAULT_NO_AUTHOR: &str = "[ DELETED_AUTHOR ]";

/// Separator between the author prefix and the line text
pub const AUTHOR_SEP: &str = " : ";

/// Compiled markdown-stripping and whitespace regexes
///
/// Built once at startup and shared read-only across workers.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    link: Regex,
    star: Regex,
    underscore: Regex,
    code: Regex,
    strikethrough: Regex,
    spoiler: Regex,
    spaces: Regex,
}

impl TextCleaner {
    pub fn new() -> Self {
        // The patterns are fixed, so compilation cannot fail at runtime.
        Self {
            link: Regex::new(r"\[([^\]]+)\] ?\(([^)]+)\)").unwrap(),
            star: Regex::new(r"\*([^*]+)\*").unwrap(),
            underscore: Regex::new(r"_([^_]+)_").unwrap(),
            code: Regex::new(r"`([^`]+)`").unwrap(),
            strikethrough: Regex::new(r"~~([^~]+)~~").unwrap(),
            spoiler: Regex::new(r">!([^!]+)!<").unwrap(),
            spaces: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Removes markdown formatting, keeping the visible text
    pub fn remove_markdown(&self, text: &str) -> String {
        let text = self.link.replace_all(text, "$1");

        // Star and underscore emphasis nest up to three deep
        // (*em*, **bold**, ***both***), so the same pattern is applied
        // three times.
        let mut text = text.into_owned();
        for _ in 0..3 {
            text = self.star.replace_all(&text, "$1").into_owned();
        }
        for _ in 0..3 {
            text = self.underscore.replace_all(&text, "$1").into_owned();
        }

        let text = self.code.replace_all(&text, "$1");
        let text = self.strikethrough.replace_all(&text, "$1");
        let text = self.spoiler.replace_all(&text, "$1");

        text.into_owned()
    }

    /// Conflates runs of whitespace into a single space
    pub fn conflate_spaces(&self, text: &str) -> String {
        self.spaces.replace_all(text, " ").trim().to_string()
    }

    /// Turns one submission into cleaned output lines
    ///
    /// Title and body each become zero or more lines (one per source line,
    /// blank lines dropped). When `print_users` is set, each line is prefixed
    /// with the author name; a missing author renders as
    /// [`DEFAULT_NO_AUTHOR`].
    pub fn clean(
        &self,
        title: Option<&str>,
        body: Option<&str>,
        author: Option<&str>,
        print_users: bool,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        for block in [title, body].into_iter().flatten() {
            for raw_line in block.lines() {
                let cleaned = self.conflate_spaces(&self.remove_markdown(raw_line));
                if cleaned.is_empty() {
                    continue;
                }
                if print_users {
                    let author = author.unwrap_or(DEFAULT_NO_AUTHOR);
                    lines.push(format!("{}{}{}", author, AUTHOR_SEP, cleaned));
                } else {
                    lines.push(cleaned);
                }
            }
        }

        lines
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_links() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.remove_markdown("see [the docs](https://example.com) here"),
            "see the docs here"
        );
    }

    #[test]
    fn test_strip_emphasis() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.remove_markdown("*em* and **bold**"), "em and bold");
        assert_eq!(cleaner.remove_markdown("***both***"), "both");
        assert_eq!(cleaner.remove_markdown("_under_"), "under");
    }

    #[test]
    fn test_strip_code_strike_spoiler() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.remove_markdown("`code`"), "code");
        assert_eq!(cleaner.remove_markdown("~~gone~~"), "gone");
        assert_eq!(cleaner.remove_markdown(">!secret!<"), "secret");
    }

    #[test]
    fn test_conflate_spaces() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.conflate_spaces("  a \t b  ? \n"), "a b ?");
        assert_eq!(cleaner.conflate_spaces("a \t\t b"), "a b");
    }

    #[test]
    fn test_clean_splits_and_prefixes() {
        let cleaner = TextCleaner::new();
        let lines = cleaner.clean(
            Some("A *title*"),
            Some("first line\n\nsecond line"),
            Some("someone"),
            true,
        );
        assert_eq!(
            lines,
            vec![
                "someone : A title",
                "someone : first line",
                "someone : second line",
            ]
        );
    }

    #[test]
    fn test_clean_without_users() {
        let cleaner = TextCleaner::new();
        let lines = cleaner.clean(Some("Title"), None, None, false);
        assert_eq!(lines, vec!["Title"]);
    }

    #[test]
    fn test_clean_deleted_author_placeholder() {
        let cleaner = TextCleaner::new();
        let lines = cleaner.clean(Some("Title"), None, None, true);
        assert_eq!(lines, vec![format!("{}{}Title", DEFAULT_NO_AUTHOR, AUTHOR_SEP)]);
    }
}
