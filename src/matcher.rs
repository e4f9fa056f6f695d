//! Complaint-to-procedure matching.
//!
//! Scoring is plain substring containment over normalized text; there is no
//! word-boundary handling and no deduplication of repeated query tokens.
use crate::procedures::Procedure;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const TOKEN_SCORE: u32 = 2;
const TITLE_PHRASE_BONUS: u32 = 5;
const MIN_TOKEN_CHARS: usize = 2;

/// A procedure paired with its position in the loaded collection and score.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub index: usize,
    pub procedure: &'a Procedure,
    pub score: u32,
}

/// Lower-case, strip diacritics (NFD minus combining marks) and trim.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect();
    stripped.trim().to_string()
}

fn tokens(normalized_query: &str) -> impl Iterator<Item = &str> {
    normalized_query
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}

fn haystack(procedure: &Procedure) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(1 + procedure.keywords.len());
    parts.push(procedure.title.as_str());
    parts.extend(procedure.keywords.iter().map(String::as_str));
    parts.extend(procedure.causes.iter().map(|cause| cause.name.as_str()));
    normalize(&parts.join(" "))
}

/// Score one procedure against a raw query.
pub fn score_procedure(procedure: &Procedure, query: &str) -> u32 {
    let query = normalize(query);
    if query.is_empty() {
        return 0;
    }
    let hay = haystack(procedure);
    let mut score = tokens(&query)
        .filter(|token| hay.contains(token))
        .map(|_| TOKEN_SCORE)
        .sum();
    if normalize(&procedure.title).contains(&query) {
        score += TITLE_PHRASE_BONUS;
    }
    score
}

/// Rank procedures for a query, best first.
///
/// Procedures scoring zero are dropped. When nothing scores, the whole
/// collection is returned in its original order with zero scores so callers
/// can always take the first entry as a best guess.
pub fn rank_candidates<'a>(procedures: &'a [Procedure], query: &str) -> Vec<Candidate<'a>> {
    let query = normalize(query);
    let mut ranked: Vec<Candidate<'a>> = procedures
        .iter()
        .enumerate()
        .map(|(index, procedure)| Candidate {
            index,
            procedure,
            score: score_procedure(procedure, &query),
        })
        .filter(|candidate| candidate.score > 0)
        .collect();
    if ranked.is_empty() {
        return procedures
            .iter()
            .enumerate()
            .map(|(index, procedure)| Candidate {
                index,
                procedure,
                score: 0,
            })
            .collect();
    }
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

pub fn rank<'a>(procedures: &'a [Procedure], query: &str) -> Vec<&'a Procedure> {
    rank_candidates(procedures, query)
        .into_iter()
        .map(|candidate| candidate.procedure)
        .collect()
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
