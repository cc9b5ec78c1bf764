// src/producer.rs

use crate::generator::Target;
use crate::types::{Request, RequestTag, BRUTE_FORCE_SOURCE};
use std::iter::FusedIterator;
use std::slice;

/// Lazy single pass over the wordlist, yielding one [`Request`] per word.
///
/// Each candidate is `word + "." + subdomain` under the target's root domain.
#[derive(Debug)]
pub struct Candidates<'a> {
    words: slice::Iter<'a, String>,
    subdomain: &'a str,
    root: &'a str,
}

impl<'a> Candidates<'a> {
    pub fn new(target: &'a Target, wordlist: &'a [String]) -> Self {
        Self {
            words: wordlist.iter(),
            subdomain: &target.subdomain,
            root: &target.root,
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = Request;

    fn next(&mut self) -> Option<Request> {
        let word = self.words.next()?;
        Some(Request::new(
            format!("{}.{}", word, self.subdomain),
            self.root,
            RequestTag::Brute,
            BRUTE_FORCE_SOURCE,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl ExactSizeIterator for Candidates<'_> {}

impl FusedIterator for Candidates<'_> {}

pub fn produce<'a>(target: &'a Target, wordlist: &'a [String]) -> Candidates<'a> {
    Candidates::new(target, wordlist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_one_request_per_word() {
        let wordlist = words(&["www", "mail", "dev"]);
        let target = Target::new("b.example.com", "example.com");

        let produced: Vec<Request> = produce(&target, &wordlist).collect();

        assert_eq!(produced.len(), 3);
        let names: Vec<&str> = produced.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["www.b.example.com", "mail.b.example.com", "dev.b.example.com"]);
        for req in &produced {
            assert_eq!(req.domain(), "example.com");
            assert_eq!(req.tag(), RequestTag::Brute);
            assert_eq!(req.source(), BRUTE_FORCE_SOURCE);
        }
    }

    #[test]
    fn test_empty_wordlist() {
        let target = Target::new("example.com", "example.com");
        let mut candidates = produce(&target, &[]);
        assert_eq!(candidates.len(), 0);
        assert!(candidates.next().is_none());
    }

    #[test]
    fn test_single_pass() {
        let wordlist = words(&["a", "b"]);
        let target = Target::new("example.com", "example.com");
        let mut candidates = produce(&target, &wordlist);

        assert_eq!(candidates.len(), 2);
        assert!(candidates.next().is_some());
        assert_eq!(candidates.len(), 1);
        assert!(candidates.next().is_some());
        assert!(candidates.next().is_none());
        assert!(candidates.next().is_none());
    }
}
