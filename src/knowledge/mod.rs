//! Static knowledge base
//!
//! A typed subject → category → fact tree searched by keyword overlap.
//! Facts that answered earlier questions get a small boost through the
//! success-pattern table.

mod seed;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Weight of a key match relative to a content match
const KEY_WEIGHT: f64 = 2.0;

/// Score added per recorded success of a fact
const SUCCESS_BOOST: f64 = 0.5;

/// Other facts listed alongside a hit
const MAX_RELATED: usize = 2;

/// Successes kept per fact, oldest dropped first
pub const MAX_SUCCESSES_PER_FACT: usize = 50;

/// One question answered from a knowledge-base fact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub question: String,
    pub keywords: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Successes keyed by `<subject>_<key>`
pub type SuccessPatterns = BTreeMap<String, Vec<SuccessPattern>>;

/// Key under which a fact's successes are recorded
pub fn success_key(subject: &str, key: &str) -> String {
    format!("{}_{}", subject, key)
}

/// Append a success for a fact
pub fn record_success(
    patterns: &mut SuccessPatterns,
    subject: &str,
    key: &str,
    question: &str,
    keywords: &[String],
) {
    let successes = patterns.entry(success_key(subject, key)).or_default();
    successes.push(SuccessPattern {
        question: question.to_string(),
        keywords: keywords.to_vec(),
        timestamp: Utc::now(),
    });
    if successes.len() > MAX_SUCCESSES_PER_FACT {
        successes.remove(0);
    }
}

/// A node in the knowledge tree. Children keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeNode {
    Leaf(String),
    Category(Vec<(String, KnowledgeNode)>),
}

/// Best-scoring fact for a query
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeHit {
    pub key: String,
    pub value: String,
    /// Slash-joined category path to the fact
    pub path: String,
    pub score: f64,
}

impl KnowledgeHit {
    /// Fact key with underscores shown as spaces
    pub fn display_key(&self) -> String {
        self.key.replace('_', " ")
    }
}

/// The seed fact tree, one root category per subject
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    subjects: Vec<(String, KnowledgeNode)>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::seeded()
    }
}

impl KnowledgeBase {
    pub fn new(subjects: Vec<(String, KnowledgeNode)>) -> Self {
        Self { subjects }
    }

    /// The built-in facts
    pub fn seeded() -> Self {
        Self::new(seed::knowledge())
    }

    pub fn subject(&self, name: &str) -> Option<&KnowledgeNode> {
        self.subjects
            .iter()
            .find(|(subject, _)| subject == name)
            .map(|(_, node)| node)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.subjects.iter().map(|(name, _)| name.as_str())
    }

    /// Highest-scoring fact of `subject` for the keywords.
    ///
    /// Ties keep the first fact in traversal order. Returns `None` when the
    /// subject has no facts or nothing scores above zero.
    pub fn search(
        &self,
        subject: &str,
        keywords: &[String],
        successes: &SuccessPatterns,
    ) -> Option<KnowledgeHit> {
        let root = self.subject(subject)?;
        let mut best: Option<KnowledgeHit> = None;
        search_node(subject, root, "", keywords, successes, &mut best);
        if let Some(hit) = &best {
            debug!("Knowledge hit {}/{} (score {:.1})", hit.path, hit.key, hit.score);
        }
        best
    }

    /// Up to two other facts from the subject's categories, formatted
    /// `key: value` and joined with ` | `.
    pub fn related(&self, subject: &str, key: &str) -> Option<String> {
        let KnowledgeNode::Category(categories) = self.subject(subject)? else {
            return None;
        };

        let related: Vec<String> = categories
            .iter()
            .filter_map(|(_, node)| match node {
                KnowledgeNode::Category(items) => Some(items),
                KnowledgeNode::Leaf(_) => None,
            })
            .flatten()
            .filter_map(|(item_key, node)| match node {
                KnowledgeNode::Leaf(value) if item_key != key => {
                    Some(format!("{}: {}", item_key.replace('_', " "), value))
                }
                _ => None,
            })
            .take(MAX_RELATED)
            .collect();

        (!related.is_empty()).then(|| related.join(" | "))
    }
}

fn search_node(
    subject: &str,
    node: &KnowledgeNode,
    path: &str,
    keywords: &[String],
    successes: &SuccessPatterns,
    best: &mut Option<KnowledgeHit>,
) {
    let KnowledgeNode::Category(children) = node else {
        return;
    };

    for (key, child) in children {
        match child {
            KnowledgeNode::Leaf(value) => {
                let score = score_leaf(subject, key, value, keywords, successes);
                if score > best.as_ref().map_or(0.0, |hit| hit.score) {
                    *best = Some(KnowledgeHit {
                        key: key.clone(),
                        value: value.clone(),
                        path: path.to_string(),
                        score,
                    });
                }
            }
            KnowledgeNode::Category(_) => {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}/{}", path, key)
                };
                search_node(subject, child, &child_path, keywords, successes, best);
            }
        }
    }
}

fn score_leaf(
    subject: &str,
    key: &str,
    value: &str,
    keywords: &[String],
    successes: &SuccessPatterns,
) -> f64 {
    let lower_key = key.to_lowercase();
    let lower_value = value.to_lowercase();

    let key_score = keywords
        .iter()
        .filter(|kw| lower_key.contains(kw.as_str()) || kw.contains(lower_key.as_str()))
        .count() as f64;
    let content_score = keywords
        .iter()
        .filter(|kw| lower_value.contains(kw.as_str()))
        .count() as f64;
    let success_score = successes
        .get(&success_key(subject, key))
        .map_or(0.0, |records| records.len() as f64 * SUCCESS_BOOST);

    key_score * KEY_WEIGHT + content_score + success_score
}
