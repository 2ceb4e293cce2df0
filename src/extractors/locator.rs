use regex::Regex;
use std::sync::OnceLock;

static GREEDY_OBJECT: OnceLock<Regex> = OnceLock::new();

/// Isolates the JSON object inside a marker-bearing text node.
pub trait FragmentLocator: Send + Sync {
    fn locate<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// Leftmost-greedy `\{.*\}`: from the first `{` to the last `}` on the same
/// line.
///
/// Several objects on that line come back as one span. Trailing code such as
/// `{...}; init({})` after the payload is swallowed, which then either fails
/// to parse or, if it still happens to be valid JSON, yields the wrong
/// structure. See [`BalancedBraces`] for a stricter alternative.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyBraces;

impl FragmentLocator for GreedyBraces {
    fn locate<'a>(&self, text: &'a str) -> Option<&'a str> {
        let re = GREEDY_OBJECT.get_or_init(|| Regex::new(r"\{.*\}").unwrap());
        re.find(text).map(|m| m.as_str())
    }
}

/// Returns the first complete top-level object, tracking string literals and
/// escapes so braces inside strings do not count.
#[derive(Debug, Default, Clone, Copy)]
pub struct BalancedBraces;

impl FragmentLocator for BalancedBraces {
    fn locate<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
            if in_string {
                match byte {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match byte {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..=start + offset]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}
