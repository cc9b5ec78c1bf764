// src/generator.rs

use crate::filter::DedupFilter;
use crate::types::Request;
use crate::utils::{label_count, LABEL_SEPARATOR};

/// A subdomain admitted for brute forcing, along with the root domain it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub subdomain: String,
    pub root: String,
}

impl Target {
    pub fn new(subdomain: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            root: root.into(),
        }
    }
}

/// Outcome of running one request through the admission rules.
///
/// The root kickoff and the recursive branch are independent, so both may
/// be present for the same request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Admission {
    pub root: Option<Target>,
    pub recursive: Option<Target>,
}

impl Admission {
    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.recursive.is_none()
    }

    pub fn targets(self) -> impl Iterator<Item = Target> {
        self.root.into_iter().chain(self.recursive)
    }
}

/// Drop the leftmost label of `name`, if it has at least three.
///
/// Names with fewer labels have no strict-subdomain remainder worth
/// recursing into.
pub fn parent_subdomain(name: &str) -> Option<&str> {
    if label_count(name) < 3 {
        return None;
    }
    name.split_once(LABEL_SEPARATOR).map(|(_, rest)| rest)
}

pub struct CandidateGenerator<'a> {
    filter: &'a DedupFilter,
    recursive: bool,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(filter: &'a DedupFilter, recursive: bool) -> Self {
        Self { filter, recursive }
    }

    /// Apply the admission rules to `req`, recording every key it claims in
    /// the filter.
    ///
    /// Checks run in a fixed order: root kickoff, then name and flag, then
    /// label count, then the filter, then depth. A parent that is claimed in
    /// the filter but turns out too shallow stays claimed.
    pub fn admit(&self, req: &Request) -> Admission {
        let mut admission = Admission::default();

        if !self.filter.duplicate(req.domain()) {
            admission.root = Some(Target::new(req.domain(), req.domain()));
        }

        if req.is_root() || !self.recursive {
            return admission;
        }

        let Some(sub) = parent_subdomain(req.name()) else {
            return admission;
        };
        if self.filter.duplicate(sub) {
            return admission;
        }
        if label_count(sub) <= label_count(req.domain()) {
            return admission;
        }

        admission.recursive = Some(Target::new(sub, req.domain()));
        admission
    }
}
