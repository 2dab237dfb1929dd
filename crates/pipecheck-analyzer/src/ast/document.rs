use std::collections::{BTreeMap, BTreeSet};

use pipecheck_common::Range;
use serde::Deserialize;

use super::params::DeclaredParam;
use super::value::Value;

// ============================================================================
// Document model
// ============================================================================

/// The already-parsed configuration document.
///
/// Built by the parser, read-only for the whole analysis pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub pipeline_parameters: BTreeMap<String, DeclaredParam>,
    /// Range of the top-level `parameters:` block; default when absent.
    #[serde(default)]
    pub pipeline_parameters_range: Range,
    #[serde(default)]
    pub commands: BTreeMap<String, Definition>,
    #[serde(default)]
    pub jobs: BTreeMap<String, Definition>,
    #[serde(default)]
    pub executors: BTreeMap<String, Definition>,
    /// Aliases of imported orbs (`orbs: { node: circleci/node@5 }` gives `node`).
    #[serde(default)]
    pub orbs: BTreeSet<String>,
    /// Every call site that supplies parameters.
    #[serde(default)]
    pub invocations: Vec<Invocation>,
}

/// A command, job, or executor definition with its own parameter block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Definition {
    pub name: String,
    /// Textual extent of the whole definition.
    pub range: Range,
    #[serde(default)]
    pub parameters: BTreeMap<String, DeclaredParam>,
}

/// Which registry an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Command,
    Job,
    Executor,
}

/// A call site: a command step, a workflow job entry, or an executor use.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    pub entity: String,
    pub target: EntityKind,
    pub range: Range,
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
}

/// Textual extent of a definition together with its local parameters.
#[derive(Debug, Clone, Copy)]
pub struct ParamBlock<'doc> {
    pub range: Range,
    pub parameters: &'doc BTreeMap<String, DeclaredParam>,
}

impl Definition {
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self {
            name: name.into(),
            range,
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, param: DeclaredParam) -> Self {
        self.parameters.insert(param.name.clone(), param);
        self
    }
}

impl Document {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Registry holding definitions of the given entity kind.
    pub fn registry(&self, kind: EntityKind) -> &BTreeMap<String, Definition> {
        match kind {
            EntityKind::Command => &self.commands,
            EntityKind::Job => &self.jobs,
            EntityKind::Executor => &self.executors,
        }
    }

    pub fn definition(&self, kind: EntityKind, name: &str) -> Option<&Definition> {
        self.registry(kind).get(name)
    }

    /// Every definition extent that declares local parameters.
    pub fn param_blocks(&self) -> impl Iterator<Item = ParamBlock<'_>> {
        self.commands
            .values()
            .chain(self.jobs.values())
            .chain(self.executors.values())
            .map(|def| ParamBlock {
                range: def.range,
                parameters: &def.parameters,
            })
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}
