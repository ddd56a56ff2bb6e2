//! Property-based tests for the quantified invariants over symmetry,
//! probability mass, and forgetting.

use proptest::prelude::*;
use qnv_core::{Driver, ProbabilisticConfiguration};
use qnv_test_support::TopologyBuilder;

fn assert_symmetric(pc: &ProbabilisticConfiguration) {
    for dc in pc.dcs() {
        let ent = dc.ent();
        for (i, row) in ent.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                assert_eq!(value, ent[j][i], "ent[{i}][{j}] != ent[{j}][{i}]");
            }
        }
    }
}

proptest! {
    /// Invariant 1 (symmetry) and invariant 3 (sub-probability) after a
    /// sequence of `cr` attempts over T2 with an arbitrary probability.
    #[test]
    fn cr_preserves_symmetry_and_sub_probability(p in 0.0_f64..=1.0) {
        let topo = TopologyBuilder::new(2).with_edge(1, 2, p).build();
        let program = qnv_ast::Program::new(vec![
            qnv_ast::Stmt::AssignCr {
                ident: "a".into(),
                lhs: qnv_ast::Expr::IntLit(1),
                rhs: qnv_ast::Expr::IntLit(2),
            },
            qnv_ast::Stmt::AssignCr {
                ident: "b".into(),
                lhs: qnv_ast::Expr::IntLit(1),
                rhs: qnv_ast::Expr::IntLit(2),
            },
        ]);

        let pc = Driver::new().run(&topo, &program).expect("program runs");
        assert_symmetric(&pc);
        prop_assert!(pc.total_probability() <= 1.0 + 1e-6);
    }

    /// Invariant 2 (mass conservation across a single fork): the success
    /// and failure siblings' probabilities sum to the pre-step probability.
    #[test]
    fn single_cr_conserves_total_probability(p in 0.0_f64..=1.0) {
        let topo = TopologyBuilder::new(2).with_edge(1, 2, p).build();
        let program = qnv_ast::Program::new(vec![qnv_ast::Stmt::AssignCr {
            ident: "a".into(),
            lhs: qnv_ast::Expr::IntLit(1),
            rhs: qnv_ast::Expr::IntLit(2),
        }]);

        let pc = Driver::new().run(&topo, &program).expect("program runs");
        prop_assert!((pc.total_probability() - 1.0).abs() < 1e-6);
    }
}

/// Invariant 4 (forget idempotence): forgetting a variable no DC holds is a
/// no-op on every DC's `mem`.
#[test]
fn forget_of_an_absent_variable_is_a_no_op() {
    let topo = TopologyBuilder::new(2).with_edge(1, 2, 0.5).build();
    let program = qnv_ast::Program::new(vec![
        qnv_ast::Stmt::AssignCr {
            ident: "a".into(),
            lhs: qnv_ast::Expr::IntLit(1),
            rhs: qnv_ast::Expr::IntLit(2),
        },
        qnv_ast::Stmt::Forget {
            idents: vec!["never_assigned".into()],
        },
    ]);

    let pc = Driver::new().run(&topo, &program).expect("program runs");
    assert_eq!(pc.len(), 2);
    for dc in pc.dcs() {
        assert!(dc.mem().contains_key("a"));
    }
}

/// Invariant 5 (forget merging): after `forget`, no two DCs share a
/// `merge_key`.
#[test]
fn forget_leaves_no_two_configurations_with_the_same_merge_key() {
    let topo = TopologyBuilder::new(2).with_edge(1, 2, 0.5).build();
    let program = qnv_ast::Program::new(vec![
        qnv_ast::Stmt::AssignCr {
            ident: "a".into(),
            lhs: qnv_ast::Expr::IntLit(1),
            rhs: qnv_ast::Expr::IntLit(2),
        },
        qnv_ast::Stmt::AssignCr {
            ident: "b".into(),
            lhs: qnv_ast::Expr::IntLit(1),
            rhs: qnv_ast::Expr::IntLit(2),
        },
        qnv_ast::Stmt::Forget {
            idents: vec!["a".into(), "b".into()],
        },
    ]);

    let pc = Driver::new().run(&topo, &program).expect("program runs");
    let keys: Vec<_> = pc.dcs().iter().map(qnv_core::DeterministicConfiguration::merge_key).collect();
    for (i, key_i) in keys.iter().enumerate() {
        for (j, key_j) in keys.iter().enumerate() {
            if i != j {
                assert_ne!(key_i, key_j, "DCs {i} and {j} share a merge key after forget");
            }
        }
    }
}

/// Invariant 6 (determinism): two runs on identical inputs produce PCs of
/// equal length with pairwise-equal `prob` (within epsilon).
#[test]
fn identical_runs_are_deterministic() {
    let topo = TopologyBuilder::new(2).with_edge(1, 2, 0.5).build();
    let program = qnv_ast::Program::new(vec![qnv_ast::Stmt::AssignCr {
        ident: "a".into(),
        lhs: qnv_ast::Expr::IntLit(1),
        rhs: qnv_ast::Expr::IntLit(2),
    }]);

    let driver = Driver::new();
    let first = driver.run(&topo, &program).expect("program runs");
    let second = driver.run(&topo, &program).expect("program runs");

    assert_eq!(first.len(), second.len());
    for (a, b) in first.dcs().iter().zip(second.dcs()) {
        assert!((a.prob() - b.prob()).abs() < 1e-9);
    }
}
