//! Text cleaning
//!
//! Normalizes raw input for synthesis and cue scanning:
//! - Whitespace runs collapse to single spaces
//! - Curly quotes become straight quotes
//! - Excessive punctuation runs collapse (`....` -> `...`, `!!` -> `!`)

/// Clean and normalize raw input text
pub fn clean_text(text: &str) -> String {
    let trimmed = text.trim();
    let mut result = String::with_capacity(trimmed.len());
    let mut prev_was_space = false;

    for c in trimmed.chars() {
        let c = normalize_quote(c);
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    collapse_punctuation_runs(&result)
}

fn normalize_quote(c: char) -> char {
    match c {
        '\u{201C}' | '\u{201D}' => '"', // curly double quotes
        '\u{2018}' | '\u{2019}' => '\'', // curly single quotes
        _ => c,
    }
}

/// Collapse runs of 3+ periods to `...` and 2+ `!`/`?` to a single mark
fn collapse_punctuation_runs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        match c {
            '.' if run >= 3 => result.push_str("..."),
            '.' => {
                for _ in 0..run {
                    result.push('.');
                }
            }
            '!' | '?' => result.push(c),
            _ => {
                for _ in 0..run {
                    result.push(c);
                }
            }
        }
        i += run;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(clean_text("  hello   world  "), "hello world");
        assert_eq!(clean_text("a\t\nb"), "a b");
    }

    #[test]
    fn test_curly_quotes() {
        assert_eq!(clean_text("\u{201C}hi\u{201D}"), "\"hi\"");
        assert_eq!(clean_text("it\u{2019}s"), "it's");
    }

    #[test]
    fn test_punctuation_runs() {
        assert_eq!(clean_text("wait....."), "wait...");
        assert_eq!(clean_text("wow!!!"), "wow!");
        assert_eq!(clean_text("really???"), "really?");
        // Two periods are left alone, only 3+ collapse
        assert_eq!(clean_text("a.."), "a..");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(clean_text("Hello, world!"), "Hello, world!");
    }
}
