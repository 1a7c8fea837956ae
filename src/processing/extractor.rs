//! Skill extraction from free text: exact synonym matching plus fuzzy
//! recovery of misspellings

use crate::error::{Result, SkillMatcherError};
use crate::processing::knowledge_base::{Category, SkillKnowledgeBase};
use crate::processing::thresholds::{FUZZY_MATCH_THRESHOLD, FUZZY_MIN_LENGTH, SHORT_SYNONYM_LENGTH};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use strsim::normalized_levenshtein;
use unicode_segmentation::UnicodeSegmentation;

/// Set of canonical skills found in one text. Iterates in sorted order.
pub type SkillSet = BTreeSet<String>;

/// A token recovered by the fuzzy pass
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit {
    pub token: String,
    pub synonym: String,
    pub canonical: String,
    pub similarity: f64,
}

pub struct SkillExtractor {
    knowledge_base: Arc<SkillKnowledgeBase>,
    exact_matcher: AhoCorasick,
    /// `(synonym, canonical)` in pattern-id order
    patterns: Vec<(String, String)>,
    /// Synonyms long enough for the fuzzy pass
    fuzzy_candidates: Vec<(String, String)>,
}

impl SkillExtractor {
    pub fn new(knowledge_base: Arc<SkillKnowledgeBase>) -> Result<Self> {
        let patterns: Vec<(String, String)> = knowledge_base.all_synonyms().to_vec();

        // Overlapping search needs the standard match kind; boundary checks
        // below reject hits embedded in longer words.
        let exact_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(patterns.iter().map(|(synonym, _)| synonym.as_str()))
            .map_err(|e| {
                SkillMatcherError::Processing(format!("Failed to build skill matcher: {}", e))
            })?;

        let fuzzy_candidates = patterns
            .iter()
            .filter(|(synonym, _)| synonym.chars().count() >= FUZZY_MIN_LENGTH)
            .cloned()
            .collect();

        Ok(Self {
            knowledge_base,
            exact_matcher,
            patterns,
            fuzzy_candidates,
        })
    }

    pub fn knowledge_base(&self) -> &SkillKnowledgeBase {
        &self.knowledge_base
    }

    /// Extract the canonical skills mentioned in `text`
    pub fn extract(&self, text: &str) -> SkillSet {
        if text.trim().is_empty() {
            return SkillSet::new();
        }

        let lowered = text.to_lowercase();
        let mut skills = self.exact_skills(&lowered);

        for hit in self.fuzzy_hits(&lowered) {
            if skills.insert(hit.canonical.clone()) {
                log::debug!(
                    "Fuzzy match: '{}' ~ '{}' ({:.2}) -> {}",
                    hit.token,
                    hit.synonym,
                    hit.similarity,
                    hit.canonical
                );
            }
        }

        skills
    }

    /// Whole-word synonym occurrences. `text` must already be lowercase.
    pub fn exact_skills(&self, text: &str) -> SkillSet {
        let mut skills = SkillSet::new();

        for mat in self.exact_matcher.find_overlapping_iter(text) {
            let (synonym, canonical) = &self.patterns[mat.pattern().as_usize()];
            if !is_word_bounded(text, mat.start(), mat.end()) {
                continue;
            }
            if synonym.chars().count() <= SHORT_SYNONYM_LENGTH
                && is_dotted_suffix(text, mat.start())
            {
                continue;
            }
            skills.insert(canonical.clone());
        }

        skills
    }

    /// Best fuzzy synonym per token, for tokens scoring at or above the
    /// fuzzy threshold. `text` must already be lowercase.
    pub fn fuzzy_hits(&self, text: &str) -> Vec<FuzzyHit> {
        let mut hits = Vec::new();

        for token in text.unicode_words() {
            if token.chars().count() < FUZZY_MIN_LENGTH {
                continue;
            }

            let mut best: Option<(&String, &String, f64)> = None;
            for (synonym, canonical) in &self.fuzzy_candidates {
                let similarity = normalized_levenshtein(token, synonym);
                // Strictly greater: the first synonym in sorted order wins ties
                if best.map_or(true, |(_, _, score)| similarity > score) {
                    best = Some((synonym, canonical, similarity));
                }
            }

            if let Some((synonym, canonical, similarity)) = best {
                if similarity >= FUZZY_MATCH_THRESHOLD {
                    hits.push(FuzzyHit {
                        token: token.to_string(),
                        synonym: synonym.clone(),
                        canonical: canonical.clone(),
                        similarity,
                    });
                }
            }
        }

        hits
    }

    /// Group skills by category, omitting empty categories. Skill lists are
    /// sorted.
    pub fn categorize(&self, skills: &SkillSet) -> BTreeMap<Category, Vec<String>> {
        let mut grouped: BTreeMap<Category, Vec<String>> = BTreeMap::new();

        for skill in skills {
            grouped
                .entry(self.knowledge_base.category_of(skill))
                .or_default()
                .push(skill.clone());
        }

        for list in grouped.values_mut() {
            list.sort();
        }

        grouped
    }

    pub fn synonym_count(&self) -> usize {
        self.patterns.len()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// True when `start` directly follows a dot glued to a word, as in "node.js"
fn is_dotted_suffix(text: &str, start: usize) -> bool {
    let mut preceding = text[..start].chars().rev();
    matches!(
        (preceding.next(), preceding.next()),
        (Some('.'), Some(c)) if is_word_char(c)
    )
}
