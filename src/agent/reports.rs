//! Text reports over the learning state

use crate::learning::LearningState;
use crate::types::title_case;

/// Turns considered for "recent performance"
const RECENT_TURNS: usize = 10;

/// Keywords listed under "Most Common Keywords"
const TOP_KEYWORDS: usize = 5;

/// Learned responses listed per subject
const TOP_LEARNED: usize = 3;

/// Question prefix shown in the learned listing
const TOPIC_PREVIEW_CHARS: usize = 50;

/// Longest expertise bar
const MAX_BAR: u32 = 20;

/// Neutral feedback used for subjects without ratings
const NEUTRAL_FEEDBACK: f64 = 3.0;

/// Count occurrences, most common first; ties keep first-seen order
fn most_common<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Learning statistics
pub fn stats(state: &LearningState) -> String {
    let total_questions = state.history.len();
    if total_questions == 0 {
        return "No questions answered yet!".to_string();
    }

    let total_learned = state.total_learned();
    let ratings: Vec<f64> = state
        .history
        .iter()
        .filter_map(|turn| turn.feedback.map(|r| r.value() as f64))
        .collect();
    let recent: Vec<f64> = state.history[total_questions.saturating_sub(RECENT_TURNS)..]
        .iter()
        .filter_map(|turn| turn.feedback.map(|r| r.value() as f64))
        .collect();
    let learning_rate = total_learned as f64 / total_questions as f64 * 100.0;

    let subject_counts = most_common(state.history.iter().map(|turn| turn.subject.as_str()));
    let keyword_counts = most_common(
        state
            .history
            .iter()
            .flat_map(|turn| turn.keywords.iter().map(String::as_str)),
    );

    let mut expertise: Vec<(&str, u32)> = state
        .subjects
        .iter()
        .filter(|s| s.expertise > 0)
        .map(|s| (s.name.as_str(), s.expertise))
        .collect();
    expertise.sort_by(|a, b| b.1.cmp(&a.1));

    let distribution: Vec<String> = subject_counts
        .iter()
        .map(|(subject, count)| format!("  {}: {} questions", title_case(subject), count))
        .collect();
    let keywords: Vec<String> = keyword_counts
        .iter()
        .take(TOP_KEYWORDS)
        .map(|(keyword, count)| format!("  {}: {} times", keyword, count))
        .collect();
    let levels: Vec<String> = expertise
        .iter()
        .map(|(subject, level)| format!("  {}: Level {}", title_case(subject), level))
        .collect();
    let quality: Vec<String> = state
        .subjects
        .iter()
        .filter_map(|s| {
            s.average_feedback()
                .map(|avg| format!("  {}: {:.1}/5.0 avg rating", title_case(&s.name), avg))
        })
        .collect();

    format!(
        "
🧠 Enhanced Learning Bot Statistics:
━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
📊 BASIC METRICS:
  📝 Total Questions Answered: {}
  ⭐ Average Rating: {:.1}/5.0
  📈 Recent Performance: {:.1}/5.0 (last {} responses)
  🧠 Knowledge Areas: {}
  📚 Vocabulary Size: {}

🎓 LEARNING METRICS:
  🧠 Learned Responses: {}
  📈 Learning Rate: {:.1}% (responses that became learned)
  🔄 Corrections Stored: {}
  🎯 Dynamic Keywords: {}
  💭 Context Memory: {} recent interactions

📈 Subject Distribution:
{}

🔤 Most Common Keywords:
{}

🎯 Expertise Levels:
{}

📊 Learning Quality:
{}
",
        total_questions,
        mean(&ratings),
        mean(&recent),
        RECENT_TURNS,
        subject_counts.len(),
        state.word_frequencies.len(),
        total_learned,
        learning_rate,
        state.total_corrections(),
        state.total_dynamic_keywords(),
        state.context.len(),
        distribution.join("\n"),
        keywords.join("\n"),
        levels.join("\n"),
        quality.join("\n"),
    )
}

/// Expertise bars per subject, highest first
pub fn expertise(state: &LearningState) -> String {
    let mut subjects: Vec<_> = state.subjects.iter().filter(|s| s.expertise > 0).collect();
    if subjects.is_empty() {
        return "I haven't answered any questions yet!".to_string();
    }
    subjects.sort_by(|a, b| b.expertise.cmp(&a.expertise));

    let mut report = format!("🧠 My Current Learning Progress:\n{}\n", "=".repeat(50));
    for subject in subjects {
        let bars = "█".repeat(subject.expertise.min(MAX_BAR) as usize);
        report.push_str(&format!("{}: {} ({})\n", title_case(&subject.name), bars, subject.expertise));
        report.push_str(&format!("  📚 Learned responses: {}\n", subject.learned.len()));
        report.push_str(&format!(
            "  ⭐ Average feedback: {:.1}/5.0\n",
            subject.average_feedback().unwrap_or(NEUTRAL_FEEDBACK)
        ));
        report.push_str(&format!("  🎯 Dynamic keywords: {}\n\n", subject.dynamic_keywords.len()));
    }
    report
}

/// Best learned responses per subject
pub fn learned(state: &LearningState) -> String {
    if state.total_learned() == 0 {
        return "I haven't learned any specific responses yet!".to_string();
    }

    let mut summary = format!("🎓 My Learned Knowledge:\n{}\n", "=".repeat(40));
    for subject in state.subjects.iter().filter(|s| !s.learned.is_empty()) {
        summary.push_str(&format!(
            "\n📖 {} ({} learned responses):\n",
            title_case(&subject.name),
            subject.learned.len()
        ));

        let mut best: Vec<_> = subject.learned.iter().collect();
        best.sort_by(|a, b| b.avg_feedback().total_cmp(&a.avg_feedback()));
        for (i, entry) in best.iter().take(TOP_LEARNED).enumerate() {
            let topic: String = entry.question.chars().take(TOPIC_PREVIEW_CHARS).collect();
            summary.push_str(&format!("  {}. Topic: {}...\n", i + 1, topic));
            summary.push_str(&format!(
                "     Rating: {:.1}/5.0 | Used: {} times\n",
                entry.avg_feedback(),
                entry.usage_count
            ));
            if entry.user_taught {
                summary.push_str("     👨‍🏫 User taught\n");
            }
            summary.push('\n');
        }
    }
    summary
}

/// Every keyword seen so far, sorted
pub fn keywords(state: &LearningState) -> String {
    let all: Vec<&str> = state.all_keywords.iter().map(String::as_str).collect();
    format!("Stored keywords ({}):\n{}", all.len(), all.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::store::{upsert, LearnOrigin};
    use crate::types::Rating;

    #[test]
    fn test_empty_reports() {
        let state = LearningState::new();
        assert_eq!(stats(&state), "No questions answered yet!");
        assert_eq!(expertise(&state), "I haven't answered any questions yet!");
        assert_eq!(learned(&state), "I haven't learned any specific responses yet!");
        assert_eq!(keywords(&state), "Stored keywords (0):\n");
    }

    #[test]
    fn test_most_common_keeps_first_seen_on_ties() {
        let counts = most_common(["b", "a", "a", "b", "c"]);
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_expertise_bars_are_capped() {
        let mut state = LearningState::new();
        state.subjects.get_or_create("science").expertise = 25;
        state.subjects.get_or_create("history").expertise = 2;
        let report = expertise(&state);
        assert!(report.contains(&format!("Science: {} (25)", "█".repeat(20))));
        assert!(report.find("Science").unwrap() < report.find("History").unwrap());
        assert!(report.contains("⭐ Average feedback: 3.0/5.0"));
    }

    #[test]
    fn test_learned_listing() {
        let mut state = LearningState::new();
        let geography = state.subjects.get_or_create("geography");
        upsert(
            geography,
            "capital of France",
            "Paris",
            Rating::new(5).unwrap(),
            LearnOrigin::Taught,
            vec![],
        );
        let report = learned(&state);
        assert!(report.contains("📖 Geography (1 learned responses):"));
        assert!(report.contains("1. Topic: capital of France..."));
        assert!(report.contains("Rating: 5.0/5.0 | Used: 0 times"));
        assert!(report.contains("👨‍🏫 User taught"));
    }

    #[test]
    fn test_keywords_sorted() {
        let mut state = LearningState::new();
        state.all_keywords.extend(["zebra".to_string(), "apple".to_string()]);
        assert_eq!(keywords(&state), "Stored keywords (2):\napple, zebra");
    }
}
