//! Parameter type checking and scope resolution for pipeline configuration
//! documents.
//!
//! The parser builds a [`ast::Document`] and a [`ast::SyntaxTree`];
//! [`semantic::analyze`] turns them into positioned diagnostics.

pub mod ast;
pub mod lexer;
pub mod semantic;

pub use semantic::{analyze, analyze_with_config};
