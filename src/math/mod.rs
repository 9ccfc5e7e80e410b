//! Arithmetic answers for free-text questions
//!
//! Detects arithmetic in a question and answers it, either through the
//! keyword/operator shortcuts ("The sum is ...") or by evaluating the first
//! arithmetic-looking substring with [`expr::evaluate`].

pub mod expr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DETECTORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d+(?:\.\d+)?)\s*([+\-*/])\s*(\d+(?:\.\d+)?)",
        r"(\d+)\s*\^\s*(\d+)",
        r"sqrt\((\d+)\)",
        r"(\d+)!",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));
static SQRT: Lazy<Regex> = Lazy::new(|| Regex::new(r"sqrt\((\d+)\)").expect("valid regex"));
static FACTORIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)!").expect("valid regex"));
static EXPRESSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d+\-*/().^\s]+").expect("valid regex"));

/// Largest n whose factorial is a finite f64
const MAX_FACTORIAL: u64 = 170;

/// Answer an arithmetic question, or `None` when there is nothing to compute
pub fn answer(question: &str) -> Option<String> {
    let lowered = question.to_lowercase();

    if DETECTORS.iter().any(|re| re.is_match(&lowered)) {
        if let Some(answer) = operator_shortcut(&lowered) {
            return Some(answer);
        }
        if let Some(answer) = sqrt_or_factorial(&lowered) {
            return Some(answer);
        }
    }

    let candidate = EXPRESSION
        .find_iter(&lowered)
        .map(|m| m.as_str().trim())
        .find(|s| s.chars().any(|c| c.is_ascii_digit()))?;

    match expr::evaluate(candidate) {
        Ok(value) => Some(format!("The answer is {}", format_number(value))),
        Err(e) => {
            debug!("No numeric answer for '{}': {}", candidate, e);
            None
        }
    }
}

/// First branch whose operator or keyword appears in the question
fn operator_shortcut(question: &str) -> Option<String> {
    let numbers: Vec<f64> = NUMBER
        .find_iter(question)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    let pair = match numbers.as_slice() {
        [a, b, ..] => Some((*a, *b)),
        _ => None,
    };

    if question.contains('+') || question.contains("add") {
        (numbers.len() >= 2).then(|| format!("The sum is {}", format_number(numbers.iter().sum())))
    } else if question.contains('-') || question.contains("subtract") {
        pair.map(|(a, b)| format!("The difference is {}", format_number(a - b)))
    } else if question.contains('*') || question.contains("multiply") {
        pair.map(|(a, b)| format!("The product is {}", format_number(a * b)))
    } else if question.contains('/') || question.contains("divide") {
        pair.filter(|(_, b)| *b != 0.0)
            .map(|(a, b)| format!("The quotient is {}", format_number(a / b)))
    } else {
        None
    }
}

fn sqrt_or_factorial(question: &str) -> Option<String> {
    if let Some(caps) = SQRT.captures(question) {
        let n: f64 = caps[1].parse().ok()?;
        return Some(format!("The square root of {} is {}", &caps[1], format_number(n.sqrt())));
    }
    if let Some(caps) = FACTORIAL.captures(question) {
        let n: u64 = caps[1].parse().ok()?;
        if n > MAX_FACTORIAL {
            return None;
        }
        let value: f64 = (1..=n).map(|i| i as f64).product();
        return Some(format!("The factorial of {} is {}", n, format_number(value)));
    }
    None
}

/// Whole numbers keep one decimal place ("4.0"); very large values use
/// exponent notation.
pub fn format_number(value: f64) -> String {
    if value.abs() >= 1e16 {
        format!("{:e}", value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_all_numbers() {
        assert_eq!(answer("What is 2 + 2?").as_deref(), Some("The sum is 4.0"));
        assert_eq!(answer("please add 1+2+3").as_deref(), Some("The sum is 6.0"));
    }

    #[test]
    fn test_operator_branches() {
        assert_eq!(answer("what is 10 - 4").as_deref(), Some("The difference is 6.0"));
        assert_eq!(answer("what is 2.5 * 4").as_deref(), Some("The product is 10.0"));
        assert_eq!(answer("what is 7 / 2").as_deref(), Some("The quotient is 3.5"));
    }

    #[test]
    fn test_zero_divisor_falls_through() {
        assert_eq!(answer("what is 5 / 0"), None);
    }

    #[test]
    fn test_expression_fallback() {
        assert_eq!(answer("what is 2 ^ 10").as_deref(), Some("The answer is 1024.0"));
        assert_eq!(answer("3").as_deref(), Some("The answer is 3.0"));
    }

    #[test]
    fn test_sqrt_and_factorial() {
        assert_eq!(answer("sqrt(16)").as_deref(), Some("The square root of 16 is 4.0"));
        assert_eq!(answer("what is 5!").as_deref(), Some("The factorial of 5 is 120.0"));
    }

    #[test]
    fn test_no_numbers() {
        assert_eq!(answer("what is calculus"), None);
        assert_eq!(answer(""), None);
    }

    #[test]
    fn test_deeply_nested_expression_has_no_answer() {
        let question = format!("calculate {}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(answer(&question), None);
        assert_eq!(answer("Calculate 3 + 3").as_deref(), Some("The sum is 6.0"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4.0");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(1e20), "1e20");
    }
}
