//! Minimal punctuation-driven sentence splitter, used to break a tweet's
//! text into candidate claim sentences (§4.12). Deliberately crude: it
//! splits on `.`/`!`/`?` only when followed by whitespace or end-of-string,
//! so decimal numbers like `3.5` and abbreviations followed by more text on
//! the same "sentence" are left alone rather than chasing full NLP
//! sentence-boundary detection.

/// Splits `text` into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = i + 1 == chars.len() || chars[i + 1].is_whitespace();
            if at_boundary {
                let sentence: String = chars[start..=i].iter().collect();
                let trimmed = sentence.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                start = i + 1;
            }
        }
        i += 1;
    }
    if start < chars.len() {
        let rest: String = chars[start..].iter().collect();
        let trimmed = rest.trim();
        if !trimmed.is_empty() {
            sentences.push(trimmed.to_string());
        }
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_period_before_whitespace() {
        assert_eq!(
            split_sentences("The sky is blue. The grass is green."),
            vec!["The sky is blue.", "The grass is green."]
        );
    }

    #[test]
    fn test_does_not_split_decimal_numbers() {
        assert_eq!(split_sentences("It costs 3.5 dollars."), vec!["It costs 3.5 dollars."]);
    }

    #[test]
    fn test_splits_on_question_and_exclamation() {
        assert_eq!(
            split_sentences("Really? Yes! Indeed."),
            vec!["Really?", "Yes!", "Indeed."]
        );
    }

    #[test]
    fn test_trailing_text_without_terminal_punctuation_kept() {
        assert_eq!(split_sentences("One. Two"), vec!["One.", "Two"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_sentences(""), Vec::<String>::new());
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(split_sentences("   "), Vec::<String>::new());
    }
}
