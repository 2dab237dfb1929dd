use pipecheck_common::{Diagnostic, DiagnosticBag};

use crate::ast::Document;

/// Declaration-level validation pass.
///
/// Checks structural constraints on the document's own declarations that
/// don't depend on any call site:
///  - A written pipeline `parameters:` block should declare something.
pub struct Validator {
    diagnostics: DiagnosticBag,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Run validation on the whole document and return diagnostics.
    pub fn validate(mut self, document: &Document) -> DiagnosticBag {
        self.validate_pipeline_parameters(document);
        self.diagnostics
    }

    fn validate_pipeline_parameters(&mut self, document: &Document) {
        if document.pipeline_parameters.is_empty()
            && !document.pipeline_parameters_range.is_default()
        {
            self.diagnostics.report(
                Diagnostic::warning("Pipeline parameters are declared but empty")
                    .with_range(document.pipeline_parameters_range)
                    .with_suggestion("declare at least one parameter or remove the block"),
            );
        }
    }
}
