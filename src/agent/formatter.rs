//! Final answer formatting

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::learning::confidence::{self, ConfidenceTier};
use crate::types::{title_case, ConfidenceFactors};

const MATHEMATICS_TEMPLATES: &[&str] = &[
    "I can help with math problems! I've been learning from our conversations about calculations, formulas, and mathematical concepts.",
    "For math questions, I can solve equations, explain concepts, or help with calculations. What specific math topic interests you?",
    "Mathematics is a vast field. Based on our previous discussions, I can help with {keywords} and related topics.",
];

const SCIENCE_TEMPLATES: &[&str] = &[
    "Science covers many areas like physics, chemistry, and biology. I've been learning about {keywords} from our conversations.",
    "I'd be happy to explain scientific concepts! My knowledge grows with each question you ask.",
    "Science is fascinating! I've noticed you're interested in {keywords}. What would you like to explore further?",
];

const GENERAL_TEMPLATES: &[&str] = &[
    "I'm continuously learning from our conversations! I can help with questions across many subjects.",
    "That's an interesting question about {keywords}! Let me think about what I've learned that might help.",
    "I'm here to help with information across various subjects. My knowledge base grows with each interaction!",
];

/// Keywords shown in a filled template
const TEMPLATE_KEYWORDS: usize = 3;

/// Built-in fallback templates for a subject
fn canned_templates(subject: &str) -> &'static [&'static str] {
    match subject {
        "mathematics" => MATHEMATICS_TEMPLATES,
        "science" => SCIENCE_TEMPLATES,
        _ => GENERAL_TEMPLATES,
    }
}

/// Pick a fallback template (learned ones first) and fill it in
pub fn fallback_response<R: Rng + ?Sized>(
    subject: &str,
    learned_templates: &[String],
    keywords: &[String],
    rng: &mut R,
) -> String {
    let template = match learned_templates.choose(rng) {
        Some(template) => template.as_str(),
        None => canned_templates(subject).choose(rng).copied().unwrap_or(GENERAL_TEMPLATES[0]),
    };
    fill_template(template, keywords)
}

/// Substitute `{keywords}`, `{proper_noun}` and `{number}` placeholders
pub fn fill_template(template: &str, keywords: &[String]) -> String {
    let mut text = if keywords.is_empty() {
        template
            .replace(" {keywords}", "")
            .replace("{keywords}", "various topics")
    } else {
        let shown: Vec<&str> = keywords.iter().take(TEMPLATE_KEYWORDS).map(String::as_str).collect();
        template.replace("{keywords}", &shown.join(", "))
    };

    let nouns: Vec<String> = keywords.iter().map(|kw| title_case(kw)).collect();
    let mut next = 0;
    while let Some(pos) = text.find("{proper_noun}") {
        let noun = nouns
            .get(next % nouns.len().max(1))
            .map(String::as_str)
            .unwrap_or("this topic");
        text.replace_range(pos..pos + "{proper_noun}".len(), noun);
        next += 1;
    }

    text.replace("{number}", "several")
}

/// Compose the user-facing answer with subject tag and confidence line
pub fn format_answer(response: &str, subject: &str, factors: &ConfidenceFactors, learned: bool) -> String {
    let overall = confidence::overall(factors);
    let indicator = if learned { "🧠 Learned" } else { "📚 Knowledge" };

    let mut formatted = format!(
        "[{}] {}\n\n💡 {} | Confidence: {:.0}% - {}",
        title_case(subject),
        response,
        indicator,
        overall,
        ConfidenceTier::from_score(overall).message()
    );
    if learned {
        formatted.push_str("\n🎯 I remembered this from our previous conversations!");
    }
    formatted
}
