//! Small helpers to build English error messages.

/// `word` followed by "s" unless `n` is 1.
pub(crate) fn pluralize(word: &str, n: usize) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

/// `word` preceded by "a" or "an".
pub(crate) fn with_article(word: &str) -> String {
    let vowel = word
        .chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
    if vowel {
        format!("an {word}")
    } else {
        format!("a {word}")
    }
}

/// "a", "a or b", "a, b or c".
pub(crate) fn enumeration_or<S: AsRef<str>>(words: &[S]) -> String {
    enumeration(words, "or")
}

/// "a", "a and b", "a, b and c".
pub(crate) fn enumeration_and<S: AsRef<str>>(words: &[S]) -> String {
    enumeration(words, "and")
}

fn enumeration<S: AsRef<str>>(words: &[S], conjunction: &str) -> String {
    match words {
        [] => String::new(),
        [word] => word.as_ref().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} {conjunction} {}", init.join(", "), last.as_ref())
        }
    }
}

/// Quote every name, e.g. `["a", "b"]` to `["\"a\"", "\"b\""]`.
pub(crate) fn quoted<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names.iter().map(|name| format!("{:?}", name.as_ref())).collect()
}
