pub mod document;
pub mod params;
pub mod syntax;
pub mod value;

pub use document::{Definition, Document, EntityKind, Invocation, ParamBlock};
pub use params::{DeclaredParam, ParamKind, ParamType};
pub use syntax::{NodeKind, SyntaxNode, SyntaxTree};
pub use value::{Value, ValueKind, ValueTag};
