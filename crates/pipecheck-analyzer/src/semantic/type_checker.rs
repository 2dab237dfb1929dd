use pipecheck_common::{Diagnostic, DiagnosticBag, Range};

use crate::ast::{DeclaredParam, Document, ParamKind, ParamType, Value, ValueKind, ValueTag};
use crate::lexer::lone_reference;

use super::executor::ExecutorCheck;
use super::scope::{Scope, ScopeIndex};

/// Shared constructor for "value does not have the declared type" errors.
fn parameter_type_error(
    param: &str,
    expected: ParamKind,
    entity: &str,
    range: Range,
) -> Diagnostic {
    Diagnostic::error(format!(
        "Parameter {} is not of type {} for {}",
        param, expected, entity
    ))
    .with_range(range)
}

/// The declared kind a literal of this tag satisfies, for scalar kinds.
fn scalar_kind(tag: ValueTag) -> Option<ParamKind> {
    match tag {
        ValueTag::String => Some(ParamKind::String),
        ValueTag::Boolean => Some(ParamKind::Boolean),
        ValueTag::Integer => Some(ParamKind::Integer),
        ValueTag::Map | ValueTag::Sequence => None,
    }
}

/// Checks one supplied value against the declared parameter it is bound to.
pub struct TypeChecker<'a, 'doc> {
    document: &'doc Document,
    scopes: &'a ScopeIndex<'doc>,
    /// Scope usable at the call site being checked.
    usable: &'a Scope<'doc>,
    executors: &'a ExecutorCheck<'doc>,
    diagnostics: &'a mut DiagnosticBag,
}

impl<'a, 'doc> TypeChecker<'a, 'doc> {
    pub fn new(
        document: &'doc Document,
        scopes: &'a ScopeIndex<'doc>,
        usable: &'a Scope<'doc>,
        executors: &'a ExecutorCheck<'doc>,
        diagnostics: &'a mut DiagnosticBag,
    ) -> Self {
        Self {
            document,
            scopes,
            usable,
            executors,
            diagnostics,
        }
    }

    pub fn check(&mut self, value: &Value, declared: &DeclaredParam, entity: &str) {
        if self.check_lone_reference(value, declared, entity) {
            return;
        }
        match &declared.ty {
            ParamType::String | ParamType::Boolean | ParamType::Integer => {
                self.check_scalar(value, declared, entity)
            }
            ParamType::Enum { values } => self.check_enum(value, declared, values, entity),
            ParamType::Executor => self.check_executor(value, declared, entity),
            ParamType::Steps => self.check_steps(value, declared, entity),
            ParamType::EnvVarName => {
                // TODO: validate POSIX environment variable name syntax.
                if !matches!(value.tag(), ValueTag::String | ValueTag::Integer) {
                    self.type_error(declared, declared.kind(), entity, value.range);
                }
            }
        }
    }

    fn type_error(
        &mut self,
        declared: &DeclaredParam,
        expected: ParamKind,
        entity: &str,
        range: Range,
    ) {
        self.diagnostics
            .report(parameter_type_error(&declared.name, expected, entity, range));
    }

    /// A value written as a single reference takes the kind of the parameter
    /// it names. Returns false when `value` is not a lone reference.
    fn check_lone_reference(
        &mut self,
        value: &Value,
        declared: &DeclaredParam,
        entity: &str,
    ) -> bool {
        let Some(reference) = value.as_str().and_then(lone_reference) else {
            return false;
        };
        // Unresolved references are reported by the reference sweep.
        if let Some(resolved) = self.scopes.resolve(&reference, self.usable) {
            if resolved.kind() != declared.kind() {
                self.type_error(declared, declared.kind(), entity, value.range);
            }
        }
        true
    }

    fn check_scalar(&mut self, value: &Value, declared: &DeclaredParam, entity: &str) {
        let expected = declared.kind();
        if scalar_kind(value.tag()) != Some(expected) {
            self.type_error(declared, expected, entity, value.range);
        }
    }

    fn check_enum(
        &mut self,
        value: &Value,
        declared: &DeclaredParam,
        allowed: &[String],
        entity: &str,
    ) {
        let Some(text) = value.as_str() else {
            self.type_error(declared, ParamKind::String, entity, value.range);
            return;
        };
        if !allowed.iter().any(|v| v == text) {
            self.diagnostics.report(
                Diagnostic::error(format!(
                    "Parameter {} is not a valid value for {}",
                    text, declared.name
                ))
                .with_range(value.range)
                .with_suggestion(format!("expected one of: {}", allowed.join(", "))),
            );
        }
    }

    fn check_executor(&mut self, value: &Value, declared: &DeclaredParam, entity: &str) {
        let (name, range) = match &value.value {
            ValueKind::String(name) => (name.as_str(), value.range),
            ValueKind::Map(map) => match map
                .get("name")
                .and_then(|n| Some((n.as_str()?, n.range)))
            {
                Some(found) => found,
                None => {
                    self.missing_executor_name(value.range);
                    return;
                }
            },
            _ => {
                self.type_error(declared, ParamKind::Executor, entity, value.range);
                return;
            }
        };
        if name.is_empty() {
            self.missing_executor_name(value.range);
            return;
        }
        // Substituted names are only known at run time.
        if name.contains("<<") {
            return;
        }
        self.executors.check(name, range, self.diagnostics);
    }

    fn missing_executor_name(&mut self, range: Range) {
        self.diagnostics.error("Missing executor name", range);
    }

    fn check_steps(&mut self, value: &Value, declared: &DeclaredParam, entity: &str) {
        let Some(steps) = value.as_sequence() else {
            self.type_error(declared, ParamKind::Steps, entity, value.range);
            return;
        };
        for step in steps {
            match &step.value {
                // Substituted step names are only known at run time.
                ValueKind::String(command) if command.contains("<<") => {}
                ValueKind::String(command) => {
                    if !self.command_exists(command) {
                        self.diagnostics.error(
                            format!("Cannot find a definition for command named {}", command),
                            step.range,
                        );
                    }
                }
                // Inline step definitions and nested step lists.
                ValueKind::Map(_) | ValueKind::Sequence(_) => {}
                ValueKind::Boolean(_) | ValueKind::Integer(_) => {
                    self.type_error(declared, ParamKind::Steps, entity, step.range);
                }
            }
        }
    }

    fn command_exists(&self, name: &str) -> bool {
        if self.document.has_command(name) {
            return true;
        }
        match name.split_once('/') {
            Some((orb, command)) => !command.is_empty() && self.document.orbs.contains(orb),
            None => false,
        }
    }
}
