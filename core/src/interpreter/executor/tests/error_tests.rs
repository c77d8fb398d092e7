//! Tests for runtime errors and how they leave the interpreter

use super::super::*;
use super::helpers::build_vm;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::load;
use std::sync::Arc;

#[test]
fn test_goto_undeclared_label_fails() {
    let mut vm = build_vm("goto nowhere");

    let err = run_turn(&mut vm).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UndefinedLabel {
            name: "nowhere".to_string()
        }
    );
    assert_eq!(vm.state(), &ExecState::Failed(err));
}

#[test]
fn test_goto_declared_but_undefined_label_fails() {
    let mut vm = build_vm("labels {ghost}\ngoto ghost");

    let err = run_turn(&mut vm).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UnlocatedLabel {
            name: "ghost".to_string()
        }
    );
}

#[test]
fn test_if_jump_to_undeclared_label_fails() {
    let mut vm = build_vm("set $intent = \"x\"\nif $intent == \"x\" then goto nowhere");
    assert!(matches!(
        run_turn(&mut vm),
        Err(RuntimeError::UndefinedLabel { .. })
    ));
}

#[test]
fn test_set_from_unset_variable_fails() {
    let mut vm = build_vm("set $a = \"kept\"\nset $b = $missing\nset $c = \"never\"");

    let err = run_turn(&mut vm).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::UndefinedVariable {
            name: "missing".to_string()
        }
    );

    // No rollback of what already ran, nothing after the failure
    assert_eq!(vm.env().get("a"), Some(&Val::from("kept")));
    assert!(vm.env().get("c").is_none());
    assert_eq!(vm.env().pc(), 1);
}

#[test]
fn test_goto_cycle_hits_step_cap() {
    let mut vm = build_vm("loop:\ngoto loop");

    let err = run_turn(&mut vm).unwrap_err();
    assert_eq!(err, RuntimeError::PossibleInfiniteLoop { limit: 1000 });
    assert!(matches!(vm.state(), ExecState::Failed(_)));
}

#[test]
fn test_step_cap_is_configurable() {
    let script = Arc::new(load("set $n = \"1\"\nset $n = \"2\"\nset $n = \"3\"\nexit").unwrap());

    let mut vm = Interpreter::new(Arc::clone(&script), Environment::new())
        .unwrap()
        .with_max_steps(2);
    assert_eq!(
        run_turn(&mut vm),
        Err(RuntimeError::PossibleInfiniteLoop { limit: 2 })
    );
    // Mutations before the abort are kept
    assert_eq!(vm.env().get("n"), Some(&Val::from("2")));

    let mut vm = Interpreter::new(script, Environment::new())
        .unwrap()
        .with_max_steps(4);
    assert!(run_turn(&mut vm).unwrap().is_exited());
}

#[test]
fn test_cycle_through_a_pause_is_not_a_loop() {
    let mut vm = build_vm("top:\nreply \"again\"\ngoto top").with_max_steps(5);

    for _ in 0..20 {
        assert_eq!(run_turn(&mut vm).unwrap().replies, vec!["again"]);
    }
}

#[test]
fn test_duplicate_label_rejected_at_setup() {
    let script = Arc::new(load("a:\nexit\na:").unwrap());

    let err = new_session(script).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::AmbiguousLabel {
            name: "a".to_string(),
            first: 0,
            second: 2,
        }
    );
}

#[test]
fn test_failed_turn_retries_failing_statement() {
    let mut vm = build_vm("set $b = $a\nreply \"b is $b\"");

    assert!(run_turn(&mut vm).is_err());

    vm.env_mut().set("a", "fixed");
    let turn = run_turn(&mut vm).unwrap();
    assert_eq!(turn.replies, vec!["b is fixed"]);
}
