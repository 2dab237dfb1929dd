use std::collections::BTreeSet;

use pipecheck_common::{DiagnosticBag, Range};

use crate::ast::Document;

/// Checks that an executor name designates something that exists.
///
/// An executor is known when it is defined in the document, comes from an
/// imported orb (`alias/executor`), or is listed as external in the
/// configuration.
#[derive(Debug)]
pub struct ExecutorCheck<'doc> {
    document: &'doc Document,
    external: BTreeSet<String>,
}

impl<'doc> ExecutorCheck<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        Self {
            document,
            external: BTreeSet::new(),
        }
    }

    /// Register executor names provided outside the document.
    pub fn with_external<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_known(&self, name: &str) -> bool {
        if self.document.executors.contains_key(name) || self.external.contains(name) {
            return true;
        }
        match name.split_once('/') {
            Some((orb, executor)) => !executor.is_empty() && self.document.orbs.contains(orb),
            None => false,
        }
    }

    pub fn check(&self, name: &str, range: Range, diagnostics: &mut DiagnosticBag) {
        if !self.is_known(name) {
            diagnostics.error(format!("Executor {} is not defined", name), range);
        }
    }
}
