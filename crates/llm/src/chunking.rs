/// Text segment sent to the completion API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// 1-based position in the sequence
    pub index: usize,

    /// Number of segments in the sequence
    pub total: usize,

    /// Segment text
    pub text: String,
}

/// Split text into segments of at most `max_chars` characters
///
/// Words are packed greedily and joined by a single space, so runs of
/// whitespace collapse. A word is only cut when it alone exceeds `max_chars`.
/// Hyphens are not treated as break points.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<Segment> {
    let max_chars = max_chars.max(1);
    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
            continue;
        }

        if current_len > 0 {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if word_len <= max_chars {
            current.push_str(word);
            current_len = word_len;
        } else {
            // No break point inside the word; cut it at the limit
            let mut parts = split_long_word(word, max_chars);
            if let Some(tail) = parts.pop() {
                pieces.extend(parts);
                current_len = tail.chars().count();
                current = tail;
            }
        }
    }

    if current_len > 0 {
        pieces.push(current);
    }

    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| Segment {
            index: i + 1,
            total,
            text,
        })
        .collect()
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars)
        .map(|part| part.iter().collect())
        .collect()
}
