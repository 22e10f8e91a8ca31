//! # Raw Triplet Reader
//!
//! Reads the line-oriented triplet format used by the ASTE/ASOTE datasets:
//!
//! ```text
//! The food was great####[([1], [3], 'POS')]
//! Nothing to complain about####[]
//! ```
//!
//! Each tuple is `(target indices, opinion indices, polarity)`. An empty list
//! marks a sentence without relations.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{AsoteError, Result};
use crate::types::{Polarity, Sentence, SentimentTriple, Span};

/// Separator between the sentence text and its triple list.
pub const SEPARATOR: &str = "####";

/// One `([target], [opinion], 'POL')` tuple, without capture groups.
const TUPLE: &str = r#"\(\s*\[[\d,\s]*\]\s*,\s*\[[\d,\s]*\]\s*,\s*['"]\w+['"]\s*\)"#;

/// Parser for raw triplet lines with pre-compiled tuple and list patterns.
pub struct RawReader {
    re_triple: Regex,
    re_list: Regex,
}

impl RawReader {
    /// Constructs a new `RawReader`.
    ///
    /// # Errors
    ///
    /// Returns `AsoteError::RegexError` if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_triple: Regex::new(
                r#"\(\s*\[([\d,\s]*)\]\s*,\s*\[([\d,\s]*)\]\s*,\s*['"](\w+)['"]\s*\)"#,
            )?,
            re_list: Regex::new(&format!(
                r"^\[\s*(?:{TUPLE}(?:\s*,\s*{TUPLE})*\s*,?)?\s*\]$"
            ))?,
        })
    }

    /// Parses a single line into a sentence.
    ///
    /// `line_no` is only used for error messages; `id` becomes the sentence id.
    pub fn parse_line(&self, line: &str, line_no: usize, id: usize) -> Result<Sentence> {
        let malformed = |reason: &str| AsoteError::MalformedLine {
            line: line_no,
            reason: reason.to_string(),
        };

        let (text, labels) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| malformed("missing '####' separator"))?;

        let tokens: Vec<String> = text.split_whitespace().map(String::from).collect();
        if tokens.is_empty() {
            return Err(malformed("no tokens"));
        }

        let labels = labels.trim();
        if !(labels.starts_with('[') && labels.ends_with(']')) {
            return Err(malformed("triple list must be enclosed in brackets"));
        }
        if !self.re_list.is_match(labels) {
            return Err(malformed("unparseable triple list"));
        }

        let mut triples = Vec::new();
        for caps in self.re_triple.captures_iter(labels) {
            let target = parse_indices(&caps[1])
                .and_then(|idx| Span::from_indices(&idx))
                .ok_or_else(|| malformed("empty or invalid target indices"))?;
            let opinion = parse_indices(&caps[2])
                .and_then(|idx| Span::from_indices(&idx))
                .ok_or_else(|| malformed("empty or invalid opinion indices"))?;
            let polarity: Polarity = caps[3].parse()?;
            triples.push(SentimentTriple::new(opinion, target, polarity));
        }

        let sentence = Sentence::new(id, tokens, triples);
        sentence.validate()?;
        Ok(sentence)
    }

    /// Reads up to `num_instances` sentences (all when `None`) from a file.
    pub fn read<P: AsRef<Path>>(&self, path: P, num_instances: Option<usize>) -> Result<Vec<Sentence>> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let limit = num_instances.unwrap_or(usize::MAX);

        let mut sentences = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            if sentences.len() >= limit {
                break;
            }
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let sentence = self.parse_line(line, idx + 1, sentences.len())?;
            if !sentence.has_relations() {
                debug!(id = sentence.id, "sentence without relations");
            }
            sentences.push(sentence);
        }

        info!(
            path = %path.display(),
            sentences = sentences.len(),
            "read raw triplet file"
        );
        Ok(sentences)
    }
}

fn parse_indices(list: &str) -> Option<Vec<usize>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}

fn format_indices(span: Span) -> String {
    let indices: Vec<String> = (span.start..=span.end).map(|i| i.to_string()).collect();
    format!("[{}]", indices.join(", "))
}

/// Formats a sentence back into a raw triplet line.
pub fn format_line(sentence: &Sentence) -> String {
    let triples: Vec<String> = sentence
        .triples
        .iter()
        .map(|t| {
            format!(
                "({}, {}, '{}')",
                format_indices(t.target),
                format_indices(t.opinion),
                t.polarity
            )
        })
        .collect();
    format!(
        "{}{SEPARATOR}[{}]",
        sentence.tokens.join(" "),
        triples.join(", ")
    )
}

/// Writes sentences in the raw triplet format, one per line.
pub fn write_raw<P: AsRef<Path>>(path: P, sentences: &[Sentence]) -> Result<()> {
    let mut file = File::create(path)?;
    for sentence in sentences {
        writeln!(file, "{}", format_line(sentence))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader() -> RawReader {
        RawReader::new().unwrap()
    }

    #[test]
    fn parses_single_triple() {
        let s = reader()
            .parse_line("The food was great####[([1], [3], 'POS')]", 1, 0)
            .unwrap();
        assert_eq!(s.tokens, vec!["The", "food", "was", "great"]);
        assert_eq!(
            s.triples,
            vec![SentimentTriple::new(
                Span::new(3, 3),
                Span::new(1, 1),
                Polarity::Positive
            )]
        );
        assert_eq!(s.entities.len(), 2);
    }

    #[test]
    fn parses_multi_token_spans_and_many_triples() {
        let line = "The battery life is long but the screen is dim####\
                    [([1, 2], [4], 'POS'), ([7], [9], 'NEG')]";
        let s = reader().parse_line(line, 1, 5).unwrap();
        assert_eq!(s.id, 5);
        assert_eq!(s.triples.len(), 2);
        assert_eq!(s.triples[0].target, Span::new(1, 2));
        assert_eq!(s.triples[1].polarity, Polarity::Negative);
    }

    #[test]
    fn empty_triple_list_yields_sentence_without_relations() {
        let s = reader()
            .parse_line("Nothing to complain about####[]", 1, 0)
            .unwrap();
        assert_eq!(s.tokens.len(), 4);
        assert!(s.triples.is_empty());
        assert!(s.entities.is_empty());
    }

    #[test]
    fn rejects_missing_separator() {
        let err = reader().parse_line("no labels here", 4, 0).unwrap_err();
        assert!(matches!(err, AsoteError::MalformedLine { line: 4, .. }));
    }

    #[test]
    fn rejects_garbage_triples() {
        assert!(reader().parse_line("a b####[(oops)]", 1, 0).is_err());
        assert!(reader().parse_line("a b####([0], [1], 'POS')", 1, 0).is_err());
    }

    #[test]
    fn rejects_malformed_list_punctuation() {
        let r = reader();
        assert!(r.parse_line("a b####[[]]", 1, 0).is_err());
        assert!(r.parse_line("a b####[,]", 1, 0).is_err());
        assert!(r
            .parse_line("a b####[([0], [1], 'POS') ([1], [0], 'NEG')]", 1, 0)
            .is_err());
        assert!(r
            .parse_line("a b####[([0], [1], 'POS'),, ([1], [0], 'NEG')]", 1, 0)
            .is_err());

        let s = r
            .parse_line("a b####[ ([0], [1], 'POS') , ([1], [0], 'NEG'), ]", 1, 0)
            .unwrap();
        assert_eq!(s.triples.len(), 2);
        assert!(r.parse_line("a b####[ ]", 1, 0).unwrap().triples.is_empty());
    }

    #[test]
    fn rejects_unknown_polarity() {
        let err = reader()
            .parse_line("a b####[([0], [1], 'MIX')]", 1, 0)
            .unwrap_err();
        assert!(matches!(err, AsoteError::UnknownLabel(_)));
    }

    #[test]
    fn rejects_empty_indices() {
        assert!(reader().parse_line("a b####[([], [1], 'POS')]", 1, 0).is_err());
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        let err = reader()
            .parse_line("a b####[([0], [5], 'POS')]", 1, 0)
            .unwrap_err();
        assert!(matches!(err, AsoteError::SpanOutOfRange { .. }));
    }

    #[test]
    fn format_line_matches_source_format() {
        let line = "The battery life is great####[([1, 2], [4], 'POS')]";
        let s = reader().parse_line(line, 1, 0).unwrap();
        assert_eq!(format_line(&s), line);

        let empty = reader().parse_line("just text####[]", 1, 0).unwrap();
        assert_eq!(format_line(&empty), "just text####[]");
    }

    #[test]
    fn read_skips_blank_lines_and_honors_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.txt");
        std::fs::write(
            &path,
            "good food####[([1], [0], 'POS')]\n\nplain text####[]\nbad service####[([1], [0], 'NEG')]\n",
        )
        .unwrap();

        let all = reader().read(&path, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].id, 1);
        assert!(!all[1].has_relations());

        let limited = reader().read(&path, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }
}
