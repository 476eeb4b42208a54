use std::sync::OnceLock;

use regex::Regex;

/// Page text shorter than this is treated as "no content".
pub const MIN_PAGE_CHARS: usize = 50;
/// Page text is capped to this many characters before summarisation.
pub const MAX_PAGE_CHARS: usize = 5000;
/// Window inspected by the "already Chinese" heuristic.
pub const HAN_PROBE_CHARS: usize = 200;

pub const SUMMARY_MAX_TOKENS: u32 = 800;
pub const TRANSLATION_MAX_TOKENS: u32 = 1000;
pub const TEMPERATURE: f64 = 0.1;

pub const SUMMARISER_SYSTEM: &str = "You are a professional summariser. Output ONLY the final result. Do NOT show any thinking, reasoning, or explanation. Do NOT include any meta-commentary. Just give the answer directly.";

pub const TRANSLATOR_SYSTEM: &str = "You are a pure translator. Translate the following text to Chinese. Output ONLY the translated text. Do NOT re-analyse, re-summarise, or add any extra content. Do NOT reference any original article or source material. Just translate the exact text given to you word by word, preserving the original format and structure.";

pub const TRANSLATE_PREFIX: &str =
    "Translate the following text to Chinese. Do NOT add anything extra, just translate:\n\n";

fn think_block() -> &'static Regex {
    static THINK: OnceLock<Regex> = OnceLock::new();
    THINK.get_or_init(|| Regex::new(r"(?is)<think>.*?</think>").expect("static regex"))
}

/// Removes `<think>...</think>` reasoning blocks and trims the rest.
pub fn strip_think_blocks(text: &str) -> String {
    think_block().replace_all(text, "").trim().to_string()
}

/// Collapses every run of whitespace into one space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// True when the first 200 characters contain a CJK Han ideograph.
pub fn contains_han(text: &str) -> bool {
    text.chars()
        .take(HAN_PROBE_CHARS)
        .any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

pub fn has_enough_content(text: &str) -> bool {
    text.chars().count() >= MIN_PAGE_CHARS
}

pub fn summary_user_content(prompt: &str, page_text: &str) -> String {
    format!("{prompt}\n\n{page_text}")
}

pub fn translation_user_content(summary: &str) -> String {
    format!("{TRANSLATE_PREFIX}{summary}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn think_blocks_are_removed_across_lines_and_case() {
        let raw = "<THINK>step one\nstep two</think>\n  The answer.  <think>more</Think>";
        assert_eq!(strip_think_blocks(raw), "The answer.");
    }

    #[test]
    fn stripping_is_idempotent() {
        let raw = "a <think>x</think> b";
        let once = strip_think_blocks(raw);
        assert_eq!(strip_think_blocks(&once), once);
    }

    #[test]
    fn text_without_blocks_is_only_trimmed() {
        assert_eq!(strip_think_blocks("  plain summary \n"), "plain summary");
    }

    #[test]
    fn unterminated_block_is_left_alone() {
        assert_eq!(strip_think_blocks("<think>open"), "<think>open");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(collapse_whitespace("  a\n\n b\t\tc  "), "a b c");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn han_probe_only_looks_at_prefix() {
        assert!(contains_han("Summary: 这是摘要"));
        assert!(!contains_han("Plain English summary"));
        let late = format!("{}中文", "a".repeat(HAN_PROBE_CHARS));
        assert!(!contains_han(&late));
    }

    #[test]
    fn content_threshold_counts_chars() {
        assert!(!has_enough_content(&"x".repeat(MIN_PAGE_CHARS - 1)));
        assert!(has_enough_content(&"x".repeat(MIN_PAGE_CHARS)));
    }

    #[test]
    fn user_content_joins_prompt_and_page() {
        assert_eq!(summary_user_content("Sum up", "page"), "Sum up\n\npage");
        assert!(translation_user_content("hi").ends_with("just translate:\n\nhi"));
    }
}
