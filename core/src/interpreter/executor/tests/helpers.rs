//! Test helpers for executor tests
//!
//! Common utilities for loading scripts and building interpreters

use crate::interpreter::executor::{Environment, Interpreter};
use crate::interpreter::load;
use std::collections::HashMap;
use std::sync::Arc;

/// Load a script and build an interpreter with an empty environment
pub fn build_vm(source: &str) -> Interpreter {
    build_vm_with(source, HashMap::new())
}

/// Load a script and build an interpreter with some variables preset
pub fn build_vm_with(source: &str, vars: HashMap<&str, &str>) -> Interpreter {
    let script = load(source).expect("Load script failed");

    let mut env = Environment::new();
    for (name, value) in vars {
        env.set(name, value);
    }

    Interpreter::new(Arc::new(script), env).expect("Interpreter setup failed")
}
