use pipecheck_common::DiagnosticBag;

use crate::ast::{Document, NodeKind, SyntaxNode, SyntaxTree};
use crate::lexer::{extract_references, Qualifier};

use super::range::compose_range;
use super::scope::ScopeIndex;

/// Document-wide reference sweep.
///
/// Every `<< parameters.X >>` / `<< pipeline.parameters.X >>` written in a
/// scalar must name a parameter visible where it is written.
pub struct ReferenceSweep<'doc> {
    scopes: ScopeIndex<'doc>,
    diagnostics: DiagnosticBag,
}

impl<'doc> ReferenceSweep<'doc> {
    pub fn new(document: &'doc Document) -> Self {
        Self {
            scopes: ScopeIndex::new(document),
            diagnostics: DiagnosticBag::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check(mut self, tree: &SyntaxTree) -> DiagnosticBag {
        for kind in [NodeKind::StringScalar, NodeKind::BlockScalar] {
            for node in tree.nodes_of_kind(kind) {
                self.check_node(node);
            }
        }
        self.diagnostics
    }

    fn check_node(&mut self, node: &SyntaxNode) {
        let references = match extract_references(&node.text) {
            Ok(references) => references,
            Err(err) => {
                // The syntax layer reports malformed substitutions itself.
                tracing::debug!(start = %node.start, %err, "skipping scalar");
                return;
            }
        };
        if references.is_empty() {
            return;
        }

        let usable = self.scopes.params_at(node.start);
        for reference in &references {
            if self.scopes.resolve(reference, &usable).is_some() {
                continue;
            }
            let range = compose_range(node.kind, node.start, reference.range);
            let message = match reference.qualifier {
                Qualifier::Pipeline => {
                    format!("Pipeline parameter {} is not defined", reference.name)
                }
                Qualifier::Local => format!("Parameter {} is not defined", reference.name),
            };
            self.diagnostics.error(message, range);
        }
    }
}
