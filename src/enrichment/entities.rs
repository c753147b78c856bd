//! Rule-based named-entity baseline
//!
//! Cheap, deterministic stand-in for a statistical NER model: capitalized
//! token runs plus date and quantity patterns. Kept alongside the API
//! extractors for comparison; the agent never reads these rows.

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::types::EntityMention;

const TITLES: &[&str] = &[
    "Mr", "Mrs", "Ms", "Dr", "Sir", "Dame", "Lord", "Lady", "Prof", "Professor",
];

const FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "on", "in", "at", "by", "it", "he", "she", "they", "we", "but", "and",
    "or", "if", "as", "after", "before", "when", "while", "his", "her", "their", "this",
    "that", "these", "those", "from", "with", "for", "to", "of", "now", "however",
];

const ORG_KEYWORDS: &[&str] = &[
    "Council", "Ltd", "Inc", "Corporation", "Company", "University", "College", "Hospital",
    "Police", "Government", "Ministry", "Department", "Bank", "Association", "Federation",
    "Committee", "Club", "Trust", "Airways", "Railways",
];

const DATE_PATTERN: &str = r"\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b|\b\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)(?:\s+\d{4})?\b|\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:,\s*\d{4})?\b|\b(?:19|20)\d{2}\b";

const MONEY_PATTERN: &str = r"[£$€]\s?\d[\d,]*(?:\.\d+)?\s?(?:m|bn|k|million|billion|trillion)?\b|\b\d[\d,]*(?:\.\d+)?\s?(?:pounds|euros|dollars|pence)\b";

const PERCENT_PATTERN: &str = r"\b\d[\d,]*(?:\.\d+)?%|\b\d[\d,]*(?:\.\d+)?\s?(?:per\s?cent|percent)\b";

const CARDINAL_PATTERN: &str = r"\b\d[\d,]*(?:\.\d+)?\b";

/// Rule-based entity extractor
pub struct RuleBasedNer {
    date: Regex,
    money: Regex,
    percent: Regex,
    cardinal: Regex,
}

struct Span {
    start: usize,
    end: usize,
    priority: u8,
    label: &'static str,
    text: String,
}

impl Default for RuleBasedNer {
    fn default() -> Self {
        Self {
            date: Regex::new(DATE_PATTERN).expect("Invalid regex"),
            money: Regex::new(MONEY_PATTERN).expect("Invalid regex"),
            percent: Regex::new(PERCENT_PATTERN).expect("Invalid regex"),
            cardinal: Regex::new(CARDINAL_PATTERN).expect("Invalid regex"),
        }
    }
}

impl RuleBasedNer {
    /// Extract entity mentions in order of occurrence.
    ///
    /// Overlapping candidates resolve by span start, then rule priority
    /// (dates and quantities beat bare numbers and name runs).
    pub fn extract(&self, text: &str) -> Vec<EntityMention> {
        let mut spans = Vec::new();

        for (regex, label, priority) in [
            (&self.date, "DATE", 0u8),
            (&self.money, "MONEY", 1),
            (&self.percent, "PERCENT", 2),
        ] {
            for m in regex.find_iter(text) {
                spans.push(Span {
                    start: m.start(),
                    end: m.end(),
                    priority,
                    label,
                    text: m.as_str().to_string(),
                });
            }
        }

        self.collect_name_runs(text, &mut spans);

        for m in self.cardinal.find_iter(text) {
            spans.push(Span {
                start: m.start(),
                end: m.end(),
                priority: 4,
                label: "CARDINAL",
                text: m.as_str().to_string(),
            });
        }

        spans.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(a.priority.cmp(&b.priority))
                .then(b.end.cmp(&a.end))
        });

        let mut mentions = Vec::new();
        let mut last_end = 0usize;
        for span in spans {
            if span.start >= last_end {
                last_end = span.end;
                mentions.push(EntityMention {
                    text: span.text,
                    label: span.label.to_string(),
                });
            }
        }
        mentions
    }

    /// Collect runs of adjacent capitalized tokens as PERSON/ORG/PROPN spans
    fn collect_name_runs(&self, text: &str, spans: &mut Vec<Span>) {
        let words: Vec<(usize, &str)> = text
            .split_word_bound_indices()
            .filter(|(_, w)| w.chars().next().is_some_and(char::is_alphanumeric))
            .collect();

        let mut i = 0;
        while i < words.len() {
            let (run_start, first) = words[i];
            if !is_capitalized(first) {
                i += 1;
                continue;
            }

            let mut j = i;
            let mut end = run_start + first.len();
            while j + 1 < words.len() {
                let (next_start, next_word) = words[j + 1];
                let adjacent = next_start - end == 1 && &text[end..next_start] == " ";
                if adjacent && is_capitalized(next_word) {
                    j += 1;
                    end = next_start + next_word.len();
                } else {
                    break;
                }
            }

            if let Some(span) = classify_run(text, &words[i..=j], run_start, end) {
                spans.push(span);
            }
            i = j + 1;
        }
    }
}

fn classify_run(text: &str, run: &[(usize, &str)], run_start: usize, end: usize) -> Option<Span> {
    let mut first_token = 0;
    let mut person = false;
    while first_token < run.len() && TITLES.contains(&run[first_token].1) {
        person = true;
        first_token += 1;
    }
    // A sentence-opening function word capitalizes without naming anything
    if first_token < run.len()
        && is_sentence_initial(text, run_start)
        && FUNCTION_WORDS.contains(&run[first_token].1.to_lowercase().as_str())
    {
        first_token += 1;
    }
    if first_token == run.len() {
        return None;
    }

    let tokens: Vec<&str> = run[first_token..].iter().map(|(_, w)| *w).collect();
    let start = run[first_token].0;
    let all_caps = tokens.len() == 1 && is_all_caps(tokens[0]);

    // Lone sentence-initial words are usually just sentence case
    if tokens.len() == 1 && !person && !all_caps && is_sentence_initial(text, run_start) {
        return None;
    }

    let label = if person {
        "PERSON"
    } else if tokens.iter().any(|t| is_all_caps(t) || ORG_KEYWORDS.contains(t)) {
        "ORG"
    } else {
        "PROPN"
    };

    Some(Span {
        start,
        end,
        priority: 3,
        label,
        text: text[start..end].to_string(),
    })
}

fn is_capitalized(word: &str) -> bool {
    if word.len() < 2 {
        return false;
    }
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() && c.is_uppercase())
        && word.chars().all(|c| c.is_alphanumeric() || c == '\'' || c == '\u{2019}')
}

fn is_all_caps(word: &str) -> bool {
    word.len() >= 2 && word.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
}

fn is_sentence_initial(text: &str, offset: usize) -> bool {
    for c in text[..offset].chars().rev() {
        if c.is_whitespace() || c == '"' || c == '\u{201c}' || c == '\'' {
            continue;
        }
        return matches!(c, '.' | '!' | '?');
    }
    true
}
