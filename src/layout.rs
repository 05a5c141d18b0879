//! Visual line counting for the status bar

use textwrap::{wrap, Options, WordSeparator};

/// Number of display rows `text` occupies when word-wrapped at
/// `chars_per_line` columns. Empty logical lines count as one row.
pub fn visual_line_count(text: &str, chars_per_line: usize) -> usize {
    let options =
        Options::new(chars_per_line.max(1)).word_separator(WordSeparator::UnicodeBreakProperties);

    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                1
            } else {
                wrap(line, &options).len().max(1)
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_line() {
        assert_eq!(visual_line_count("", 80), 1);
    }

    #[test]
    fn test_counts_logical_lines() {
        assert_eq!(visual_line_count("a\n\nb", 80), 3);
        assert_eq!(visual_line_count("a\n", 80), 2);
    }

    #[test]
    fn test_wraps_long_lines() {
        assert_eq!(visual_line_count("one two three four", 10), 2);
        assert_eq!(visual_line_count("one two three four\nfive", 10), 3);
    }

    #[test]
    fn test_zero_width_does_not_panic() {
        assert!(visual_line_count("abc def", 0) >= 2);
    }
}
