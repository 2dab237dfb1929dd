pub mod assignments;
pub mod executor;
pub mod range;
pub mod references;
pub mod scope;
pub mod type_checker;
pub mod validator;

use pipecheck_common::{DiagnosticBag, PipecheckConfig};

use crate::ast::{Document, SyntaxTree};

/// Run all parameter analysis passes on a parsed document.
///
/// Returns a `DiagnosticBag` containing any errors and warnings found.
/// The analysis performs, in this order:
///  1. Declaration-level validation (empty pipeline parameters block)
///  2. Call-site validation (required, typed, and undeclared arguments)
///  3. The reference sweep over every scalar of the syntax tree
///
/// Inputs are never modified, so re-running on the same document yields the
/// same diagnostics.
pub fn analyze(document: &Document, tree: &SyntaxTree) -> DiagnosticBag {
    analyze_with_external_executors(document, tree, &[])
}

/// Like [`analyze`], taking executor names known from the configuration.
pub fn analyze_with_config(
    document: &Document,
    tree: &SyntaxTree,
    config: &PipecheckConfig,
) -> DiagnosticBag {
    analyze_with_external_executors(document, tree, &config.executors.external)
}

#[tracing::instrument(level = "debug", skip_all, fields(file = %document.file))]
pub fn analyze_with_external_executors(
    document: &Document,
    tree: &SyntaxTree,
    external_executors: &[String],
) -> DiagnosticBag {
    let mut all_diagnostics = DiagnosticBag::new();

    // Pass 1: declaration-level structural validation.
    all_diagnostics.extend(validator::Validator::new().validate(document));

    // Pass 2: call sites.
    all_diagnostics.extend(
        assignments::AssignmentValidator::new(document)
            .with_external_executors(external_executors)
            .validate(),
    );

    // Pass 3: parameter references in scalars.
    all_diagnostics.extend(references::ReferenceSweep::new(document).check(tree));

    tracing::debug!(count = all_diagnostics.len(), "analysis finished");
    all_diagnostics
}
