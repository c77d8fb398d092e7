//! `$name` substitution in reply templates

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::environment::Environment;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid")
    })
}

/// Replace every `$name` with the variable's current value
///
/// One left-to-right pass; substituted text is not scanned again. Unset
/// variables become the empty string.
pub fn interpolate(template: &str, env: &Environment) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures| {
            env.get(&caps[1]).map(|v| v.to_string()).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let mut env = Environment::new();
        env.set("name", "Bob");

        assert_eq!(interpolate("$name and $name", &env), "Bob and Bob");
    }

    #[test]
    fn test_unset_is_empty() {
        let env = Environment::new();
        assert_eq!(interpolate("Hi $who!", &env), "Hi !");
    }

    #[test]
    fn test_longest_name_wins() {
        let mut env = Environment::new();
        env.set("a", "short");
        env.set("ab", "long");

        assert_eq!(interpolate("$ab $a", &env), "long short");
    }

    #[test]
    fn test_not_recursive() {
        let mut env = Environment::new();
        env.set("outer", "$inner");
        env.set("inner", "boom");

        assert_eq!(interpolate("<$outer>", &env), "<$inner>");
    }

    #[test]
    fn test_lone_dollar_is_kept() {
        let env = Environment::new();
        assert_eq!(interpolate("costs 10$ or $5", &env), "costs 10$ or $5");
    }
}
