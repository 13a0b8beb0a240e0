//! Low-level split helpers shared by the character splitters.

use regex::Regex;

use crate::traits::KeepSeparator;

/// Split `text` on a regex pattern, optionally keeping the separator.
///
/// An empty separator splits into individual characters. Only non-empty
/// pieces are returned. An invalid pattern falls back to returning the text
/// whole rather than erroring mid-split.
pub fn split_text_with_regex(
    text: &str,
    separator: &str,
    keep_separator: KeepSeparator,
) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(|c| c.to_string()).collect();
    }

    let Ok(regex) = Regex::new(separator) else {
        return vec![text.to_string()];
    };

    match keep_separator {
        KeepSeparator::False => regex
            .split(text)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        KeepSeparator::Start => {
            let matches: Vec<_> = regex.find_iter(text).collect();
            if matches.is_empty() {
                return if text.is_empty() {
                    Vec::new()
                } else {
                    vec![text.to_string()]
                };
            }

            let mut pieces = Vec::with_capacity(matches.len() + 1);
            if matches[0].start() > 0 {
                pieces.push(text[..matches[0].start()].to_string());
            }
            for (i, m) in matches.iter().enumerate() {
                let end = matches.get(i + 1).map_or(text.len(), |next| next.start());
                pieces.push(text[m.start()..end].to_string());
            }
            pieces.retain(|s| !s.is_empty());
            pieces
        }
        KeepSeparator::End => {
            let mut pieces = Vec::new();
            let mut last_end = 0;
            for m in regex.find_iter(text) {
                if m.end() > last_end {
                    pieces.push(text[last_end..m.end()].to_string());
                }
                last_end = m.end();
            }
            if last_end < text.len() {
                pieces.push(text[last_end..].to_string());
            }
            pieces
        }
    }
}
