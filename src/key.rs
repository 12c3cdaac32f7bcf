//! Cache-key derivation helpers.
//!
//! The manager only ever sees a finished string key; these helpers build one
//! from a call site's method name and arguments so that callers composing
//! "get, compute on miss, put" by hand derive keys consistently. Two
//! logically distinct calls must not derive the same key unless the caller
//! intends them to collide.

/// Default key form: `method(arg1,arg2,...)`
pub fn default_key(method: &str, args: &[&str]) -> String {
    format!("{}({})", method, args.join(","))
}

/// Substitute `#method` and `#<param>` placeholders in a caller-supplied
/// pattern. An empty pattern falls back to [`default_key`].
pub fn pattern_key(pattern: &str, method: &str, named_args: &[(&str, &str)]) -> String {
    if pattern.is_empty() {
        let args: Vec<&str> = named_args.iter().map(|(_, value)| *value).collect();
        return default_key(method, &args);
    }

    let mut key = pattern.replace("#method", method);
    for (name, value) in named_args {
        key = key.replace(&format!("#{name}"), value);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key() {
        assert_eq!(default_key("find_user", &["42", "eu"]), "find_user(42,eu)");
    }

    #[test]
    fn test_default_key_no_args() {
        assert_eq!(default_key("list_all", &[]), "list_all()");
    }

    #[test]
    fn test_pattern_key() {
        let key = pattern_key(
            "#method:user:#id:region:#region",
            "find_user",
            &[("id", "42"), ("region", "eu")],
        );
        assert_eq!(key, "find_user:user:42:region:eu");
    }

    #[test]
    fn test_empty_pattern_falls_back_to_default() {
        let key = pattern_key("", "find_user", &[("id", "42")]);
        assert_eq!(key, "find_user(42)");
    }

    #[test]
    fn test_distinct_args_derive_distinct_keys() {
        assert_ne!(
            default_key("find_user", &["1"]),
            default_key("find_user", &["2"])
        );
    }
}
