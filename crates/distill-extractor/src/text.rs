//! Surface-level text helpers shared by the pipeline stages
//!
//! Everything here works on byte ranges into the original text so callers
//! can slice verbatim statements out of chunks.

use std::collections::{BTreeSet, HashSet};
use std::ops::Range;

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "inc", "ltd", "llc", "co", "corp", "no", "nos", "mr", "mrs", "ms", "dr", "st", "sec",
    "art", "para", "vs", "etc", "e.g", "i.e", "u.s", "approx", "jan", "feb", "mar", "apr",
    "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

/// Closing characters allowed between terminal punctuation and whitespace
fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// Split text into trimmed, non-empty sentence ranges
///
/// A sentence ends after `.`, `!` or `?` (plus any closing quotes or
/// brackets) when followed by whitespace or the end of text, and at blank
/// lines. Periods inside numbers (`$1,000.50`) and after common
/// abbreviations (`Inc.`, `Sec.`) do not end a sentence.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        let mut end = None;

        if matches!(ch, '.' | '!' | '?') {
            let mut boundary = idx + ch.len_utf8();
            while let Some(&(j, c)) = iter.peek() {
                if !is_closer(c) {
                    break;
                }
                boundary = j + c.len_utf8();
                iter.next();
            }
            let at_break = match iter.peek() {
                None => true,
                Some(&(_, c)) => c.is_whitespace(),
            };
            if at_break && !(ch == '.' && ends_with_abbreviation(&text[start..idx])) {
                end = Some(boundary);
            }
        } else if ch == '\n' && starts_with_blank_line(&text[idx + 1..]) {
            end = Some(idx);
        }

        if let Some(end) = end {
            push_trimmed(&mut spans, text, start, end);
            start = end;
        }
    }

    push_trimmed(&mut spans, text, start, text.len());
    spans
}

fn ends_with_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if word.is_empty() {
        return false;
    }
    // Single-letter initials ("J. Smith")
    if word.chars().count() == 1 && word.chars().all(|c| c.is_alphabetic()) {
        return true;
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

fn starts_with_blank_line(rest: &str) -> bool {
    rest.trim_start_matches([' ', '\t', '\r']).starts_with('\n')
}

fn push_trimmed(spans: &mut Vec<Range<usize>>, text: &str, start: usize, end: usize) {
    let slice = &text[start..end];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead + trail < slice.len() {
        spans.push(start + lead..end - trail);
    }
}

/// The sentence range containing a byte offset
///
/// Offsets that fall between sentences resolve to the following sentence.
pub fn span_containing(spans: &[Range<usize>], offset: usize) -> Option<Range<usize>> {
    spans
        .iter()
        .find(|s| offset < s.end)
        .or_else(|| spans.last())
        .cloned()
}

/// Range of `text` with surrounding whitespace removed
pub fn trimmed_range(text: &str) -> Range<usize> {
    let lead = text.len() - text.trim_start().len();
    let trail = text.len() - text.trim_end().len();
    lead..(text.len() - trail).max(lead)
}

/// Dedup key for a statement: case-folded, whitespace-collapsed, with
/// terminal punctuation dropped
///
/// # Examples
///
/// ```
/// use distill_extractor::text::normalize_statement;
///
/// assert_eq!(
///     normalize_statement("  Payment is\n DUE  in 30 days. "),
///     "payment is due in 30 days"
/// );
/// ```
pub fn normalize_statement(statement: &str) -> String {
    let collapsed = statement
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    collapsed
        .trim_end_matches(['.', '!', '?'])
        .trim_end()
        .to_string()
}

/// Whether `phrase` occurs in `text` as whole words
///
/// Both sides are expected in the same case. "section" matches in
/// "see section 4" but not in "intersection".
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    text.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether the text contains an ASCII digit
pub fn has_numeral(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Whether a capitalized word appears anywhere but the first position
pub fn has_proper_noun(text: &str) -> bool {
    text.split_whitespace().skip(1).any(|word| {
        let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
        let mut chars = word.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => chars.any(|c| c.is_lowercase()),
            _ => false,
        }
    })
}

/// Numeric values appearing in text, normalized for comparison
///
/// Thousands separators are dropped and trailing decimal zeros removed, so
/// `$1,000.00` and `1000` compare equal.
pub fn numeric_values(text: &str) -> BTreeSet<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut values = BTreeSet::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut raw = String::new();
        while i < chars.len() {
            let c = chars[i];
            let joins_digits = (c == ',' || c == '.')
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_digit() || joins_digits {
                raw.push(c);
                i += 1;
            } else {
                break;
            }
        }
        values.insert(normalize_number(&raw));
    }

    values
}

fn normalize_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|&c| c != ',').collect();
    if digits.contains('.') {
        let trimmed = digits.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Significant alphabetic terms: case-folded, crudely singularized, at least
/// three characters, and not a stopword
pub fn significant_terms(text: &str, stopwords: &HashSet<String>) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 3 && w.chars().all(|c| c.is_alphabetic()))
        .map(|w| w.to_lowercase())
        .filter(|w| !stopwords.contains(w))
        .map(|w| singularize(&w))
        .filter(|w| w.len() >= 3 && !stopwords.contains(w))
        .collect()
}

fn singularize(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    let keeps_s = word.ends_with("ss") || word.ends_with("us") || word.ends_with("is");
    if word.len() > 3 && word.ends_with('s') && !keeps_s {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        sentence_spans(text).into_iter().map(|r| &text[r]).collect()
    }

    #[test]
    fn test_basic_sentences() {
        assert_eq!(
            sentences("First one. Second one!  Third one?"),
            vec!["First one.", "Second one!", "Third one?"]
        );
    }

    #[test]
    fn test_decimal_is_not_a_boundary() {
        assert_eq!(
            sentences("The fee is $1,000.50 per month. Next."),
            vec!["The fee is $1,000.50 per month.", "Next."]
        );
    }

    #[test]
    fn test_abbreviation_is_not_a_boundary() {
        assert_eq!(
            sentences("Acme Inc. shall pay. See Sec. 4 below."),
            vec!["Acme Inc. shall pay.", "See Sec. 4 below."]
        );
    }

    #[test]
    fn test_blank_line_is_a_boundary() {
        assert_eq!(
            sentences("ARTICLE 1\n\nThe term is two years."),
            vec!["ARTICLE 1", "The term is two years."]
        );
    }

    #[test]
    fn test_closing_quote_kept_with_sentence() {
        assert_eq!(
            sentences("He said \"stop.\" Then left."),
            vec!["He said \"stop.\"", "Then left."]
        );
    }

    #[test]
    fn test_whitespace_only() {
        assert!(sentence_spans("   \n\n  ").is_empty());
        assert!(sentence_spans("").is_empty());
    }

    #[test]
    fn test_span_containing() {
        let text = "One. Two.";
        let spans = sentence_spans(text);
        assert_eq!(&text[span_containing(&spans, 0).unwrap()], "One.");
        assert_eq!(&text[span_containing(&spans, 4).unwrap()], "Two.");
        assert_eq!(&text[span_containing(&spans, 6).unwrap()], "Two.");
    }

    #[test]
    fn test_numeric_values() {
        let values = numeric_values("Pay $1,000.00 within 30 days, i.e. by 12/31/2025.");
        let expected: BTreeSet<String> = ["1000", "30", "12", "31", "2025"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_numeric_value_normalization() {
        assert_eq!(numeric_values("0.50"), numeric_values("0.5"));
        assert_eq!(numeric_values("$150,000"), numeric_values("150000"));
        assert_ne!(numeric_values("25%"), numeric_values("4 years"));
    }

    #[test]
    fn test_significant_terms() {
        let stopwords: HashSet<String> = ["the", "after", "first", "over"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let a = significant_terms("Options vest over 4 years.", &stopwords);
        let b = significant_terms("25% vest after the first year.", &stopwords);
        assert!(a.contains("vest"));
        assert!(a.contains("year"));
        assert!(a.contains("option"));
        assert_eq!(a.intersection(&b).count(), 2);
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("penalties"), "penalty");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("business"), "business");
        assert_eq!(singularize("days"), "day");
    }

    #[test]
    fn test_proper_noun() {
        assert!(has_proper_noun("The Company shall pay Employee."));
        assert!(!has_proper_noun("The fee is due monthly."));
        assert!(!has_proper_noun("Payment is due in USD."));
    }

    #[test]
    fn test_normalize_statement() {
        assert_eq!(normalize_statement("Fees  are DUE now."), "fees are due now");
        assert_eq!(normalize_statement("Is it due?! "), "is it due");
        assert_eq!(normalize_statement("Pay $5 ."), "pay $5");
        assert_eq!(normalize_statement("..."), "");
        assert_eq!(normalize_statement("Fees apply"), normalize_statement("fees apply."));
    }

    #[test]
    fn test_contains_phrase() {
        assert!(contains_phrase("see section 4 above", "section"));
        assert!(contains_phrase("section 4 governs", "section"));
        assert!(contains_phrase("as set forth herein", "as set forth"));
        assert!(contains_phrase("the intersection, per section 2", "section"));
        assert!(!contains_phrase("at the intersection of roads", "section"));
        assert!(!contains_phrase("each particle counts", "article"));
        assert!(!contains_phrase("anything", ""));
    }

    #[test]
    fn test_trimmed_range() {
        let text = "  abc \n";
        assert_eq!(&text[trimmed_range(text)], "abc");
        assert_eq!(trimmed_range("   "), 3..3);
    }
}
