// Model output cleanup
use once_cell::sync::Lazy;
use regex::Regex;

/// A single rewrite applied to the whole response.
struct CleanRule {
    pattern: &'static Lazy<Regex>,
    /// Replace every match instead of only the first
    all: bool,
}

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think regex"));

static BRACKET_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]:").expect("valid label regex"));

static PREAMBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Output:|.*says?:?)\s*").expect("valid preamble regex"));

// Order matters: labels are removed before the preamble check.
static RULES: [CleanRule; 3] = [
    CleanRule {
        pattern: &THINK_BLOCK,
        all: true,
    },
    CleanRule {
        pattern: &BRACKET_LABEL,
        all: true,
    },
    CleanRule {
        pattern: &PREAMBLE,
        all: false,
    },
];

/// Strip reasoning blocks, speaker labels and "X says:" preambles from a response.
///
/// Each rule runs once over the whole trimmed string, and the result is
/// trimmed again after every rule.
pub fn clean_model_output(content: &str) -> String {
    RULES.iter().fold(content.trim().to_string(), |text, rule| {
        let replaced = if rule.all {
            rule.pattern.replace_all(&text, "")
        } else {
            rule.pattern.replace(&text, "")
        };
        replaced.trim().to_string()
    })
}
