// src/utils.rs
use crate::error::Result;
use crate::types::SubbruteError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Separator between DNS labels.
pub const LABEL_SEPARATOR: char = '.';

/// Reads lines from a file into a vector of strings.
pub fn read_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

/// Number of labels `name` splits into. The empty string counts as one label.
pub fn label_count(name: &str) -> usize {
    name.split(LABEL_SEPARATOR).count()
}

/// Check if a string is a valid domain
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }

    let parts: Vec<&str> = domain.split(LABEL_SEPARATOR).collect();
    if parts.len() < 2 {
        return false;
    }

    for part in parts {
        if part.is_empty() || part.len() > 63 {
            return false;
        }

        if !part.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return false;
        }

        if part.starts_with('-') || part.ends_with('-') {
            return false;
        }
    }

    true
}

/// Trim, lowercase and drop trailing dots from a domain name.
pub fn clean_domain(domain: &str) -> String {
    let mut cleaned = domain.trim().to_lowercase();

    while cleaned.ends_with(LABEL_SEPARATOR) {
        cleaned.pop();
    }

    cleaned
}

/// Clean `raw` and check it is usable as a root domain.
pub fn parse_root_domain(raw: &str) -> Result<String> {
    let domain = clean_domain(raw);
    if !is_valid_domain(&domain) {
        return Err(SubbruteError::InvalidDomain(raw.trim().to_string()));
    }
    Ok(domain)
}

/// Pick the longest root domain that `name` sits under (or equals).
pub fn matching_root<'a>(name: &str, roots: &'a [String]) -> Option<&'a str> {
    roots
        .iter()
        .filter(|root| {
            name == root.as_str()
                || (name.len() > root.len()
                    && name.ends_with(root.as_str())
                    && name[..name.len() - root.len()].ends_with(LABEL_SEPARATOR))
        })
        .max_by_key(|root| root.len())
        .map(|root| root.as_str())
}

/// Normalize raw wordlist lines.
///
/// Blank lines, `#` comments and entries with inner whitespace are dropped.
/// Words are lowercased and duplicates removed, keeping the first occurrence
/// so the configured order survives.
pub fn clean_wordlist<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for line in lines {
        let word = line.as_ref().trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        if word.chars().any(char::is_whitespace) {
            continue;
        }

        let lower = word.to_lowercase();
        if seen.insert(lower.clone()) {
            words.push(lower);
        }
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_domain() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example.com"));
        assert!(!is_valid_domain("example"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("-example.com"));
        assert!(!is_valid_domain("example-.com"));
        assert!(!is_valid_domain("a..com"));
    }

    #[test]
    fn test_label_count() {
        assert_eq!(label_count("example.com"), 2);
        assert_eq!(label_count("a.b.example.com"), 4);
        assert_eq!(label_count("localhost"), 1);
        assert_eq!(label_count(""), 1);
    }

    #[test]
    fn test_clean_domain() {
        assert_eq!(clean_domain(" Example.COM. "), "example.com");
        assert_eq!(clean_domain("sub.example.com.."), "sub.example.com");
    }

    #[test]
    fn test_parse_root_domain() {
        assert_eq!(parse_root_domain(" Example.COM. ").unwrap(), "example.com");

        let err = parse_root_domain("not a domain").unwrap_err();
        assert!(matches!(err, SubbruteError::InvalidDomain(ref d) if d == "not a domain"));
        assert!(matches!(
            parse_root_domain("localhost"),
            Err(SubbruteError::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_matching_root_prefers_longest() {
        let roots = vec!["example.com".to_string(), "corp.example.com".to_string()];
        assert_eq!(matching_root("a.corp.example.com", &roots), Some("corp.example.com"));
        assert_eq!(matching_root("a.example.com", &roots), Some("example.com"));
        assert_eq!(matching_root("example.com", &roots), Some("example.com"));
        assert_eq!(matching_root("badexample.com", &roots), None);
        assert_eq!(matching_root("other.org", &roots), None);
    }

    #[test]
    fn test_clean_wordlist() {
        let raw = vec!["www", "  Mail ", "", "# comment", "www", "dev ops", "api"];
        assert_eq!(clean_wordlist(raw), vec!["www", "mail", "api"]);
    }
}
