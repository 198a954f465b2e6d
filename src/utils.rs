use regex::Regex;

pub trait LetChain {
    fn let_<F, R>(self, f: F) -> R
    where
        Self: Sized,
        F: FnOnce(Self) -> R;
}
impl<T> LetChain for T {
    #[inline]
    fn let_<F, R>(self, f: F) -> R
    where
        Self: Sized,
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

pub trait AlsoChain {
    fn also_<F, R>(self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> R;
}
impl<T> AlsoChain for T {
    #[inline]
    fn also_<F, R>(mut self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> R,
    {
        f(&mut self);
        self
    }
}

/// Case-insensitive literal match of `text`; `None` for blank input.
///
/// The flag is inlined so that `Regex::as_str` can be handed to MongoDB as is.
pub fn search_regex(text: &str) -> Option<Regex> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Regex::new(&format!("(?i){}", regex::escape(text))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_literal_and_case_insensitive() {
        let r = search_regex(" Lake (North) ").unwrap();
        assert!(r.is_match("big lake (north) camp"));
        assert!(!r.is_match("Lake North"));
        assert!(r.as_str().starts_with("(?i)"));
        assert!(search_regex("   ").is_none());
    }

    #[test]
    fn also_runs_side_effect_and_returns_self() {
        let v = vec![1].also_(|v| v.push(2)).let_(|v| v.len());
        assert_eq!(v, 2);
    }
}
