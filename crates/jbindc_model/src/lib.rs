//! Java type model consumed by the jbind generator.
//!
//! This crate stands in for the compiler's reflection environment: a
//! declarative description of the classes under processing, with all
//! annotation arguments already resolved to their defaulted values, loaded
//! from a YAML or JSON document.

pub mod classes;
pub mod loader;
pub mod types;

pub use classes::{
    CalledByNativeArgs, ClassKind, ClassModel, ExposeArgs, MemberModel, Modifiers, Param,
    TypeModel,
};
pub use loader::{load_model, model_from_json, model_from_yaml};
pub use types::TypeRef;
