//! Identifier casing for controller and action names.
//!
//! Conversions are ASCII-only: hyphens and spaces separate words, and only
//! the first character of each word changes case.

/// Convert a hyphenated name to PascalCase, e.g. `post-authors` → `PostAuthors`.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if c == '-' || c == ' ' {
            word_start = true;
            continue;
        }
        if word_start {
            out.push(c.to_ascii_uppercase());
            word_start = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Convert a hyphenated name to camelCase, e.g. `add-new` → `addNew`.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => pascal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("post-authors"), "PostAuthors");
        assert_eq!(to_pascal_case("home"), "Home");
        assert_eq!(to_pascal_case("Home"), "Home");
        assert_eq!(to_pascal_case("a--b"), "AB");
        assert_eq!(to_pascal_case("-leading"), "Leading");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_pascal_case_keeps_inner_case() {
        assert_eq!(to_pascal_case("postAuthors"), "PostAuthors");
        assert_eq!(to_pascal_case("mIxed-CASE"), "MIxedCASE");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("add-new"), "addNew");
        assert_eq!(to_camel_case("index"), "index");
        assert_eq!(to_camel_case("login"), "login");
        assert_eq!(to_camel_case("Show"), "show");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_camel_is_lowered_pascal() {
        for s in ["add-new", "view", "post-authors", "a-b-c", "x", "trailing-"] {
            let pascal = to_pascal_case(s);
            let camel = to_camel_case(s);
            let mut expected = pascal[..1].to_ascii_lowercase();
            expected.push_str(&pascal[1..]);
            assert_eq!(camel, expected, "input {s:?}");
        }
    }
}
