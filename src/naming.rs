//! Maps raw JSON keys (and discriminator values) to capitalized identifiers.
use std::collections::BTreeSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of characters that cannot appear in an identifier; they separate words.
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_]+").unwrap());

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*$").unwrap());

/// Fallback for keys with no usable characters (`"@"`, `""`, `"--"`, `"_"`).
const EMPTY_IDENTIFIER: &str = "Field";

/// Resolve a raw key to a capitalized identifier.
///
/// - `@` is stripped: `@id` → `Id`
/// - the first character is uppercased: `givenName` → `GivenName`
/// - other separators start a new capitalized word: `foo-bar` → `FooBar`
/// - a leading digit gets a `_` prefix: `2fa` → `_2fa`
pub fn resolve(raw: &str) -> String {
    let stripped = raw.replace('@', "");
    let mut out = String::with_capacity(stripped.len());
    for segment in SEPARATORS.split(&stripped) {
        out.push_str(&capitalize(segment));
    }
    // a lone `_` is a wildcard, not a name
    if out.is_empty() || out == "_" {
        return EMPTY_IDENTIFIER.to_string();
    }
    if out.starts_with(|c: char| c.is_numeric()) {
        out.insert(0, '_');
    }
    out
}

pub fn is_identifier(s: &str) -> bool {
    s != "_" && IDENTIFIER.is_match(s)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `GivenName` → `given_name`, `UserID` → `user_id`, `HTTPServer` → `http_server`.
pub fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                None | Some('_') => false,
                Some(p) if p.is_lowercase() || p.is_numeric() => true,
                Some(p) => p.is_uppercase() && next.is_some_and(|n| n.is_lowercase()),
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// A set of identifiers already taken in one declaration (or one output unit).
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    taken: BTreeSet<String>,
}

impl NameScope {
    pub fn new() -> Self { Self::default() }

    /// Pre-claim names that must never be handed out.
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(names.into_iter().map(Into::into));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Return `base` if free, else the first free `base2`, `base3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_and_capitalizes() {
        assert_eq!(resolve("@id"), "Id");
        assert_eq!(resolve("@type"), "Type");
        assert_eq!(resolve("givenName"), "GivenName");
        assert_eq!(resolve("Name"), "Name");
        assert_eq!(resolve("first_name"), "First_name");
    }

    #[test]
    fn separators_start_words() {
        assert_eq!(resolve("foo-bar"), "FooBar");
        assert_eq!(resolve("schema:name"), "SchemaName");
        assert_eq!(resolve("a b.c"), "ABC");
    }

    #[test]
    fn never_empty_never_leading_digit() {
        assert_eq!(resolve("@"), "Field");
        assert_eq!(resolve(""), "Field");
        assert_eq!(resolve("--"), "Field");
        assert_eq!(resolve("_"), "Field");
        assert_eq!(resolve("@_"), "Field");
        assert_eq!(resolve("__"), "__");
        assert!(!is_identifier("_"));
        assert_eq!(resolve("2fa"), "_2fa");
        for raw in ["@", "_", "2fa", "foo-bar", "über", "@context", "x.y.z"] {
            assert!(is_identifier(&resolve(raw)), "{raw}");
        }
    }

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("GivenName"), "given_name");
        assert_eq!(to_snake_case("UserID"), "user_id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("Id"), "id");
        assert_eq!(to_snake_case("First_name"), "first_name");
        assert_eq!(to_snake_case("_2fa"), "_2fa");
        assert_eq!(to_snake_case("Page2Title"), "page2_title");
    }

    #[test]
    fn scope_suffixes_duplicates() {
        let mut scope = NameScope::new();
        scope.reserve(["String"]);
        assert_eq!(scope.claim("Id"), "Id");
        assert_eq!(scope.claim("Id"), "Id2");
        assert_eq!(scope.claim("Id"), "Id3");
        assert_eq!(scope.claim("String"), "String2");
    }
}
