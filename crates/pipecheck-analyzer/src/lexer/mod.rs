pub mod cursor;
pub mod reference;

pub use reference::{
    extract_references, is_lone_reference, is_pipeline_qualified, lone_reference, Qualifier,
    Reference, ReferenceError,
};
