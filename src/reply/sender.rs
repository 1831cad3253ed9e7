//! Best-effort sender display name from free text.
//!
//! Heuristic, first match wins:
//! 1. The last short "signature-looking" line.
//! 2. A name following a closing phrase ("atenciosamente", "from:", ...).
//! 3. The fixed default.
//!
//! It can return a plausible but wrong name (a short closing line such as
//! "Obrigado!" passes the signature test). That imprecision is accepted.

use std::sync::LazyLock;

use regex::Regex;

/// Returned when no name can be found. Never empty.
pub const DEFAULT_SENDER: &str = "Cliente";

const MIN_SIGNATURE_CHARS: usize = 3;
const MAX_SIGNATURE_CHARS: usize = 39;
const MAX_NAME_WORDS: usize = 3;

/// Closing phrases followed by a name, tried in order.
static CLOSER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"atenciosamente,?\s*([a-záàâãéêíóôõúç][a-záàâãéêíóôõúç \t]*)",
        r"cordialmente,?\s*([a-záàâãéêíóôõúç][a-záàâãéêíóôõúç \t]*)",
        r"abraços,?\s*([a-záàâãéêíóôõúç][a-záàâãéêíóôõúç \t]*)",
        r"de:\s*([a-záàâãéêíóôõúç][a-záàâãéêíóôõúç \t]*)",
        r"from:\s*([a-záàâãéêíóôõúç][a-záàâãéêíóôõúç \t]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Resolve the sender's display name from raw email text.
pub fn resolve_sender(raw: &str) -> String {
    signature_line(raw)
        .or_else(|| closing_phrase_name(raw))
        .unwrap_or_else(|| DEFAULT_SENDER.to_string())
}

/// Last non-empty line that looks like a signature.
fn signature_line(raw: &str) -> Option<String> {
    raw.lines()
        .rev()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| looks_like_signature(line))
        .map(title_case)
}

fn looks_like_signature(line: &str) -> bool {
    let chars = line.chars().count();
    (MIN_SIGNATURE_CHARS..=MAX_SIGNATURE_CHARS).contains(&chars)
        && !line.contains('@')
        && line.split_whitespace().count() <= MAX_NAME_WORDS
        && !line.chars().any(|c| c.is_ascii_digit())
}

fn closing_phrase_name(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    CLOSER_PATTERNS.iter().find_map(|re| {
        let captured = re.captures(&lowered)?.get(1)?.as_str();
        let words: Vec<&str> = captured.split_whitespace().take(MAX_NAME_WORDS).collect();
        if words.is_empty() {
            None
        } else {
            Some(title_case(&words.join(" ")))
        }
    })
}

/// Capitalize the first letter of every word and lower-case the rest.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
