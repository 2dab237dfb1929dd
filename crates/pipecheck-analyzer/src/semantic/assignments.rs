use std::collections::BTreeMap;

use pipecheck_common::{DiagnosticBag, Range};

use crate::ast::{DeclaredParam, Document, Invocation, Value};

use super::executor::ExecutorCheck;
use super::scope::{Scope, ScopeIndex};
use super::type_checker::TypeChecker;

/// Call-site validation pass.
///
/// For every invocation of a command, job, or executor, checks:
///  - enum declarations carry at least one allowed value,
///  - required parameters are supplied,
///  - supplied values match the declared types (directly or through a
///    lone parameter reference),
///  - no argument is supplied for an undeclared parameter.
pub struct AssignmentValidator<'doc> {
    document: &'doc Document,
    scopes: ScopeIndex<'doc>,
    executors: ExecutorCheck<'doc>,
    diagnostics: DiagnosticBag,
}

impl<'doc> AssignmentValidator<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        Self {
            document,
            scopes: ScopeIndex::new(document),
            executors: ExecutorCheck::new(document),
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Register executor names defined outside the document.
    pub fn with_external_executors(mut self, names: &[String]) -> Self {
        self.executors = self.executors.with_external(names.iter().cloned());
        self
    }

    /// Validate every invocation of the document and return diagnostics.
    #[tracing::instrument(level = "debug", skip_all, fields(
        file = %self.document.file,
        invocations = self.document.invocations.len(),
    ))]
    pub fn validate(mut self) -> DiagnosticBag {
        let document = self.document;
        for invocation in &document.invocations {
            self.validate_invocation(invocation);
        }
        self.diagnostics
    }

    fn validate_invocation(&mut self, invocation: &Invocation) {
        let document = self.document;
        let Some(definition) = document.definition(invocation.target, &invocation.entity) else {
            tracing::debug!(
                entity = %invocation.entity,
                target = ?invocation.target,
                "skipping invocation of unknown entity"
            );
            return;
        };
        let usable = self.scopes.params_at(invocation.range.start);
        self.validate_parameters_value(
            &invocation.arguments,
            &invocation.entity,
            invocation.range,
            &definition.parameters,
            &usable,
        );
    }

    /// Check the arguments supplied at one call site against the parameters
    /// the called entity declares.
    pub fn validate_parameters_value(
        &mut self,
        arguments: &BTreeMap<String, Value>,
        entity: &str,
        entity_range: Range,
        declared_params: &BTreeMap<String, DeclaredParam>,
        usable: &Scope<'doc>,
    ) {
        for declared in declared_params.values() {
            if let Some(values) = declared.enum_values() {
                if values.is_empty() {
                    self.diagnostics.error(
                        format!(
                            "Enum parameter {} must declare at least one allowed value",
                            declared.name
                        ),
                        declared.range,
                    );
                }
            }

            let Some(value) = arguments.get(&declared.name) else {
                if !declared.optional {
                    self.diagnostics.error(
                        format!("Parameter {} is required for {}", declared.name, entity),
                        entity_range,
                    );
                }
                continue;
            };

            TypeChecker::new(
                self.document,
                &self.scopes,
                usable,
                &self.executors,
                &mut self.diagnostics,
            )
            .check(value, declared, entity);
        }

        for (name, value) in arguments {
            if !declared_params.contains_key(name) {
                self.diagnostics.error(
                    format!("Parameter {} is not defined for {}", name, entity),
                    value.range,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Definition, EntityKind, ParamType, ValueKind};
    use pipecheck_common::Severity;

    fn call(entity: &str, target: EntityKind, line: u32, args: Vec<Value>) -> Invocation {
        Invocation {
            entity: entity.into(),
            target,
            range: Range::from_coords(line, 6, line, 6 + entity.len() as u32),
            arguments: args.into_iter().map(|v| (v.name.clone(), v)).collect(),
        }
    }

    fn arg(name: &str, value: ValueKind, line: u32) -> Value {
        Value::new(name, value, Range::from_coords(line, 10, line, 20))
    }

    fn text(name: &str, value: &str, line: u32) -> Value {
        arg(name, ValueKind::String(value.into()), line)
    }

    fn document() -> Document {
        let mut doc = Document::new("config.yml");
        doc.pipeline_parameters.insert(
            "version".into(),
            DeclaredParam::new("version", ParamType::Integer),
        );
        doc.commands.insert(
            "greet".into(),
            Definition::new("greet", Range::from_coords(2, 2, 10, 0))
                .with_param(DeclaredParam::new("to", ParamType::String))
                .with_param(DeclaredParam::new("loud", ParamType::Boolean).optional()),
        );
        doc.jobs.insert(
            "build".into(),
            Definition::new("build", Range::from_coords(12, 2, 30, 0))
                .with_param(DeclaredParam::new("label", ParamType::String).optional())
                .with_param(DeclaredParam::new("retries", ParamType::Integer).optional()),
        );
        doc
    }

    fn run(doc: &Document) -> Vec<(Severity, String, Range)> {
        AssignmentValidator::new(doc)
            .validate()
            .into_diagnostics()
            .into_iter()
            .map(|d| (d.severity, d.message, d.range.unwrap_or_default()))
            .collect()
    }

    fn messages(doc: &Document) -> Vec<String> {
        run(doc).into_iter().map(|(_, m, _)| m).collect()
    }

    #[test]
    fn required_parameter_missing() {
        let mut doc = document();
        doc.invocations.push(call("greet", EntityKind::Command, 40, vec![]));
        let diags = run(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].0, Severity::Error);
        assert_eq!(diags[0].1, "Parameter to is required for greet");
        assert_eq!(diags[0].2, Range::from_coords(40, 6, 40, 11));
    }

    #[test]
    fn optional_parameter_missing_is_fine() {
        let mut doc = document();
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            40,
            vec![text("to", "world", 41)],
        ));
        assert!(messages(&doc).is_empty());
    }

    #[test]
    fn undeclared_argument_reported_at_argument() {
        let mut doc = document();
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            40,
            vec![text("to", "world", 41), text("colour", "red", 42)],
        ));
        let diags = run(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].1, "Parameter colour is not defined for greet");
        assert_eq!(diags[0].2, Range::from_coords(42, 10, 42, 20));
    }

    #[test]
    fn lone_pipeline_reference_type_mismatch() {
        let mut doc = document();
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            40,
            vec![text("to", "<< pipeline.parameters.version >>", 41)],
        ));
        assert_eq!(
            messages(&doc),
            vec!["Parameter to is not of type string for greet"]
        );
    }

    #[test]
    fn lone_reference_matching_kind_is_fine() {
        let mut doc = document();
        doc.invocations.push(call(
            "build",
            EntityKind::Job,
            40,
            vec![text("retries", "<< pipeline.parameters.version >>", 41)],
        ));
        assert!(messages(&doc).is_empty());
    }

    #[test]
    fn unresolved_lone_reference_is_silent() {
        let mut doc = document();
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            40,
            vec![text("to", "<< pipeline.parameters.missing >>", 41)],
        ));
        assert!(messages(&doc).is_empty());
    }

    #[test]
    fn local_reference_uses_call_site_scope() {
        let mut doc = document();
        // `greet` called from inside `build`, forwarding build's `retries`.
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            20,
            vec![text("to", "<< parameters.retries >>", 21)],
        ));
        assert_eq!(
            messages(&doc),
            vec!["Parameter to is not of type string for greet"]
        );

        // Forwarding `label` (a string) is fine.
        doc.invocations[0]
            .arguments
            .insert("to".into(), text("to", "<< parameters.label >>", 21));
        assert!(messages(&doc).is_empty());
    }

    #[test]
    fn literal_value_dispatches_to_type_checker() {
        let mut doc = document();
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            40,
            vec![
                text("to", "world", 41),
                arg("loud", ValueKind::String("yes".into()), 42),
            ],
        ));
        assert_eq!(
            messages(&doc),
            vec!["Parameter loud is not of type boolean for greet"]
        );
    }

    #[test]
    fn empty_enum_declaration_reported() {
        let mut doc = document();
        doc.executors.insert(
            "machine".into(),
            Definition::new("machine", Range::from_coords(32, 2, 36, 0)).with_param(
                DeclaredParam::new("size", ParamType::Enum { values: vec![] })
                    .optional()
                    .with_range(Range::from_coords(33, 6, 35, 0)),
            ),
        );
        doc.invocations.push(call("machine", EntityKind::Executor, 40, vec![]));
        let diags = run(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].1,
            "Enum parameter size must declare at least one allowed value"
        );
        assert_eq!(diags[0].2, Range::from_coords(33, 6, 35, 0));
    }

    #[test]
    fn unknown_entity_is_skipped() {
        let mut doc = document();
        doc.invocations.push(call(
            "deploy",
            EntityKind::Job,
            40,
            vec![text("anything", "x", 41)],
        ));
        // Registries are per kind: `greet` is not a job.
        doc.invocations.push(call("greet", EntityKind::Job, 42, vec![]));
        assert!(messages(&doc).is_empty());
    }

    #[test]
    fn diagnostics_follow_fixed_order() {
        let mut doc = document();
        doc.invocations.push(call(
            "greet",
            EntityKind::Command,
            40,
            vec![arg("loud", ValueKind::Integer(1), 41), text("extra", "x", 42)],
        ));
        assert_eq!(
            messages(&doc),
            vec![
                "Parameter loud is not of type boolean for greet",
                "Parameter to is required for greet",
                "Parameter extra is not defined for greet",
            ]
        );
    }

    #[test]
    fn external_executors_are_accepted() {
        let mut doc = document();
        doc.jobs.get_mut("build").unwrap().parameters.insert(
            "exec".into(),
            DeclaredParam::new("exec", ParamType::Executor),
        );
        doc.invocations.push(call(
            "build",
            EntityKind::Job,
            40,
            vec![text("exec", "docker-large", 41)],
        ));
        assert_eq!(messages(&doc), vec!["Executor docker-large is not defined"]);

        let diags = AssignmentValidator::new(&doc)
            .with_external_executors(&["docker-large".to_string()])
            .validate();
        assert!(diags.is_empty());
    }
}
