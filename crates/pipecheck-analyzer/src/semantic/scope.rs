use std::collections::BTreeMap;

use pipecheck_common::Position;

use crate::ast::{DeclaredParam, Document, ParamBlock};
use crate::lexer::{Qualifier, Reference};

/// Parameters visible at one point of the document, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Scope<'doc> {
    params: BTreeMap<&'doc str, &'doc DeclaredParam>,
}

impl<'doc> Scope<'doc> {
    fn from_map(map: &'doc BTreeMap<String, DeclaredParam>) -> Self {
        let mut scope = Self::default();
        scope.overlay(map);
        scope
    }

    /// Add every parameter of `map`, replacing same-named entries.
    fn overlay(&mut self, map: &'doc BTreeMap<String, DeclaredParam>) {
        for (name, param) in map {
            self.params.insert(name.as_str(), param);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'doc DeclaredParam> {
        self.params.get(name).copied()
    }
}

/// Position-indexed view of every parameter scope in a document.
///
/// Built once per pass. Block extents are kept sorted by start position so
/// the innermost block around a position is the last one that contains it.
#[derive(Debug)]
pub struct ScopeIndex<'doc> {
    pipeline: Scope<'doc>,
    blocks: Vec<ParamBlock<'doc>>,
}

impl<'doc> ScopeIndex<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        let mut blocks: Vec<_> = document.param_blocks().collect();
        blocks.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(b.range.end.cmp(&a.range.end))
        });
        Self {
            pipeline: Scope::from_map(&document.pipeline_parameters),
            blocks,
        }
    }

    /// Parameters usable at `pos`: pipeline parameters overlaid by the local
    /// parameters of the innermost enclosing block.
    pub fn params_at(&self, pos: Position) -> Scope<'doc> {
        let mut scope = self.pipeline.clone();
        if let Some(block) = self.blocks.iter().rev().find(|b| b.range.contains(pos)) {
            scope.overlay(block.parameters);
        }
        scope
    }

    /// Resolve a reference: pipeline-qualified names only see the pipeline
    /// scope, local names see `usable`.
    pub fn resolve(
        &self,
        reference: &Reference,
        usable: &Scope<'doc>,
    ) -> Option<&'doc DeclaredParam> {
        let scope = match reference.qualifier {
            Qualifier::Pipeline => &self.pipeline,
            Qualifier::Local => usable,
        };
        let found = scope.lookup(&reference.name);
        tracing::trace!(
            name = %reference.full_name,
            found = found.is_some(),
            "resolved parameter reference"
        );
        found
    }
}
