//! Expression extraction from free-text calculation narratives
//!
//! Matchers are tried in a fixed order and the first hit wins:
//! 1. the operand bound to an `=` sign (`2 + 3 = 5`, `Total = 4 * sqrt(9)`)
//! 2. a bare binary fragment (`120 * 12`)
//! 3. a bare square root (`sqrt(16)`)

use once_cell::sync::Lazy;
use regex::Regex;

/// A single extraction strategy
pub type Matcher = fn(&str) -> Option<String>;

/// Extraction strategies in precedence order
pub const MATCHERS: [(&str, Matcher); 3] = [
    ("equals", equals_form),
    ("binary", binary_arithmetic),
    ("sqrt", sqrt_call),
];

static LEFT_OF_EQUALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9+\-*/().\s%sqrt]+)\s*=").expect("left-of-equals pattern is valid")
});

static RIGHT_OF_EQUALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"=\s*((?:sqrt|[0-9+\-*/().%\s])+)").expect("right-of-equals pattern is valid")
});

static BINARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]+(?:\.[0-9]+)?\s*[+\-*/]\s*[0-9]+(?:\.[0-9]+)?")
        .expect("binary pattern is valid")
});

static SQRT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sqrt\([0-9]+(?:\.[0-9]+)?\)").expect("sqrt pattern is valid"));

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("number pattern is valid"));

/// Extract a computable expression from `line`, if any
pub fn extract(line: &str) -> Option<String> {
    MATCHERS.iter().find_map(|(_, matcher)| matcher(line))
}

/// Whether a line is worth running through [`extract`]
pub fn has_arithmetic_marker(line: &str) -> bool {
    line.contains(['+', '-', '*', '/']) || line.contains("sqrt")
}

/// Operand of an `=` sign
///
/// Left-hand operands are preferred (`2 + 3 = 5` yields `2 + 3`); the
/// right-hand operand is used for labelled forms such as `Total = 4 * 2`.
pub fn equals_form(line: &str) -> Option<String> {
    let left = LEFT_OF_EQUALS
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|candidate| is_expression(candidate));
    if let Some(expr) = left {
        return Some(expr.to_string());
    }

    RIGHT_OF_EQUALS
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|candidate| is_expression(candidate))
        .map(str::to_string)
}

/// First `<number> <op> <number>` fragment
pub fn binary_arithmetic(line: &str) -> Option<String> {
    BINARY.find(line).map(|m| m.as_str().trim().to_string())
}

/// First `sqrt(<number>)` call
pub fn sqrt_call(line: &str) -> Option<String> {
    SQRT.find(line).map(|m| m.as_str().to_string())
}

/// Last signed decimal number in `text`
///
/// Calculator replies read `<expression> = <value>`, so the trailing number
/// is the computed value.
pub fn parse_last_number(text: &str) -> Option<f64> {
    NUMBER
        .find_iter(text)
        .last()
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

// A bare `-` does not qualify: list bullets and ranges use it too.
fn is_expression(candidate: &str) -> bool {
    candidate.len() > 1 && (candidate.contains(['+', '*', '/']) || candidate.contains("sqrt"))
}
