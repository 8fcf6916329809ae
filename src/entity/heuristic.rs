//! Heuristic English tagger.
//!
//! Person names come from capitalization anchored by a person cue: an
//! honorific followed by capitalized words (`Dr. Jane Doe`, `Professor
//! Smith's`), or a run of at least two capitalized words opening with a
//! known given name (`John Smith`). Capitalized runs without such a cue are
//! usually course titles (`Data Structures`, `Linear Algebra`) and are not
//! reported. Temporal expressions and numerals are pattern based.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::entity::tagger::{LinguisticTagger, TemporalExpression, TemporalKind};

// Titles that introduce a person name. Not part of the reported mention.
const PERSON_PREFIX: &[&str] = &["mr", "mrs", "ms", "mx", "dr", "doctor", "prof", "professor"];

// Capitalized words that start sentences or name things other than people.
const NON_NAME_WORDS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "it", "he", "she", "we", "they", "you",
    "in", "on", "at", "to", "for", "from", "by", "with", "and", "but", "or", "so", "if",
    "because", "contact", "call", "email", "visit", "please", "see", "note", "today",
    "yesterday", "tomorrow", "now", "then", "what", "where", "when", "who", "why", "how",
    "which", "ask", "find", "give", "help", "need", "want", "my", "our", "your", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does",
    "did", "can", "could", "will", "would", "should", "may", "might", "tell", "show", "list",
    "hi", "hello", "hey", "thanks", "thank", "good", "morning", "afternoon", "evening",
    "greetings", "bye", "goodbye", "yes", "no", "ok", "okay", "monday", "tuesday",
    "wednesday", "thursday", "friday", "saturday", "sunday", "january", "february", "march",
    "april", "june", "july", "august", "september", "october", "november", "december",
    "spring", "summer", "fall", "winter", "computer", "science", "mathematics", "math",
    "english", "physics", "business", "chemistry", "biology", "office", "hours", "room",
    "hall", "building", "course", "courses", "class", "classes", "lab", "lecture", "section",
    "department", "semester", "university", "college", "introduction", "intro",
];

// Given names that open an un-titled name (`Grace Hopper`).
const GIVEN_NAMES: &[&str] = &[
    "aaron", "adam", "ada", "alan", "albert", "alex", "alexander", "alice", "amanda", "amy",
    "andrew", "angela", "anna", "anne", "anthony", "barbara", "ben", "benjamin", "brian",
    "carlos", "carol", "catherine", "charles", "chris", "christina", "christopher", "daniel",
    "david", "deborah", "donald", "donna", "edward", "elizabeth", "emily", "emma", "eric",
    "frank", "gary", "george", "grace", "hannah", "helen", "henry", "jack", "james", "jane",
    "jason", "jeff", "jennifer", "jessica", "john", "jose", "joseph", "joshua", "juan",
    "julia", "karen", "kevin", "kim", "laura", "linda", "lisa", "maria", "mark", "mary",
    "matthew", "michael", "michelle", "mohammed", "nancy", "nicole", "olivia", "patricia",
    "paul", "peter", "priya", "rachel", "raj", "rebecca", "richard", "robert", "ryan",
    "samuel", "sandra", "sarah", "scott", "sophia", "stephen", "steven", "susan", "thomas",
    "timothy", "wei", "william", "yuki",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand", "million",
];

lazy_static! {
    /// Clock times: `3pm`, `10:30`, `4 p.m.`, `noon`.
    static ref TIME_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:\d{1,2}(?::[0-5]\d)?\s?(?:[ap]\.m\.|[ap]m\b)|\d{1,2}:[0-5]\d\b|noon\b|midnight\b)"
    )
    .expect("Time pattern should be valid");
    /// Weekdays, relative days and calendar dates.
    static ref DATE_PATTERN: Regex = Regex::new(concat!(
        r"(?i)\b(?:",
        r"(?:next|this|last|coming)\s+(?:week|weekend|month|semester|year|monday|tuesday|wednesday|thursday|friday|saturday|sunday)",
        r"|(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?",
        r"|\d{1,2}/\d{1,2}(?:/\d{2,4})?",
        r"|(?:mon|tues|wednes|thurs|fri|satur|sun)days?",
        r"|today|tomorrow|tonight|yesterday|weekends?",
        r")\b",
    ))
    .expect("Date pattern should be valid");
    static ref DIGITS: Regex =
        Regex::new(r"^\d+(?:[.,]\d+)*$").expect("Digit pattern should be valid");
    static ref ORDINAL: Regex =
        Regex::new(r"(?i)^\d+(?:st|nd|rd|th)$").expect("Ordinal pattern should be valid");
}

/// A word with its byte span in the source text.
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

/// Alphanumeric words of `text` with their byte spans.
fn words(text: &str) -> Vec<Word<'_>> {
    text.split_word_bound_indices()
        .filter(|(_, w)| w.chars().any(char::is_alphanumeric))
        .map(|(start, w)| Word {
            text: w,
            start,
            end: start + w.len(),
        })
        .collect()
}

/// `Smith's` → `Smith`; other words unchanged.
fn strip_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix("\u{2019}s"))
        .unwrap_or(word)
}

/// Capitalized, mixed-case, purely alphabetic word.
fn is_name_word(word: &str) -> bool {
    let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
    starts_upper
        && word.chars().any(char::is_lowercase)
        && word
            .chars()
            .all(|c| c.is_alphabetic() || c == '\'' || c == '\u{2019}')
}

/// Common sentence words and titles never start or extend a name.
fn is_excluded(word: &str) -> bool {
    let lower = strip_possessive(word).to_lowercase();
    NON_NAME_WORDS.contains(&lower.as_str()) || PERSON_PREFIX.contains(&lower.as_str())
}

/// Whether `word` is a known given name, case-insensitively.
fn is_given_name(word: &str) -> bool {
    GIVEN_NAMES.contains(&word.to_lowercase().as_str())
}

/// Whether `gap` separates two words of one name. A title may end in a period.
fn only_spacing(gap: &str, allow_period: bool) -> bool {
    let gap = if allow_period {
        gap.strip_prefix('.').unwrap_or(gap)
    } else {
        gap
    };
    gap.chars().all(char::is_whitespace)
}

/// End (exclusive) of the run of name words starting at `start`.
fn name_span(text: &str, words: &[Word<'_>], start: usize, prefix: Option<&Word<'_>>) -> usize {
    let mut end = start;
    let mut prev_end = prefix.map(|w| w.end);

    while let Some(word) = words.get(end) {
        if !is_name_word(word.text) || is_excluded(word.text) {
            break;
        }
        if let Some(prev) = prev_end {
            let allow_period = end == start && prefix.is_some();
            if !only_spacing(&text[prev..word.start], allow_period) {
                break;
            }
        }
        prev_end = Some(word.end);
        end += 1;
        // A possessive closes the name.
        if strip_possessive(word.text).len() != word.text.len() {
            break;
        }
    }
    end
}

/// Space-joined mention text without possessives.
fn join_name(words: &[Word<'_>]) -> String {
    words
        .iter()
        .map(|w| strip_possessive(w.text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rule-of-thumb English tagger with no model files.
///
/// Favors precision on people: a mention needs an honorific or a known
/// given name, so capitalized course titles stay out of `instructor_names`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    /// Create a tagger.
    pub fn new() -> Self {
        HeuristicTagger
    }
}

impl LinguisticTagger for HeuristicTagger {
    fn find_person_mentions(&self, text: &str) -> Vec<String> {
        let words = words(text);
        let mut mentions = Vec::new();

        let mut i = 0;
        while i < words.len() {
            let lower = words[i].text.to_lowercase();
            if PERSON_PREFIX.contains(&lower.as_str()) {
                let end = name_span(text, &words, i + 1, Some(&words[i]));
                if end > i + 1 {
                    mentions.push(join_name(&words[i + 1..end]));
                    i = end;
                    continue;
                }
            } else if is_given_name(words[i].text) {
                let end = name_span(text, &words, i, None);
                if end >= i + 2 {
                    mentions.push(join_name(&words[i..end]));
                    i = end;
                    continue;
                }
            }
            i += 1;
        }

        mentions
    }

    fn find_temporal_expressions(&self, text: &str) -> Vec<TemporalExpression> {
        let times = TIME_PATTERN.find_iter(text).map(|m| (m, TemporalKind::Time));
        let dates = DATE_PATTERN.find_iter(text).map(|m| (m, TemporalKind::Date));

        let mut expressions: Vec<TemporalExpression> = times
            .chain(dates)
            .map(|(m, kind)| TemporalExpression {
                text: m.as_str().to_string(),
                kind,
                start: m.start(),
                end: m.end(),
            })
            .collect();
        expressions.sort_by_key(|e| e.start);
        expressions
    }

    fn find_numerals(&self, text: &str) -> Vec<String> {
        let temporal = self.find_temporal_expressions(text);

        words(text)
            .into_iter()
            .filter(|w| !temporal.iter().any(|t| w.start < t.end && t.start < w.end))
            .filter(|w| {
                DIGITS.is_match(w.text)
                    || ORDINAL.is_match(w.text)
                    || NUMBER_WORDS.contains(&w.text.to_lowercase().as_str())
            })
            .map(|w| w.text.to_string())
            .collect()
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}
