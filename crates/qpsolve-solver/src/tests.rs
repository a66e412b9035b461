// Adapter contract tests for the solver crate

#[cfg(test)]
mod tests {
    use crate::*;
    use nalgebra::{DMatrix, DVector};
    use proptest::prelude::*;
    use qpsolve_types::{QpError, QpProblem};
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Arguments of one runner invocation
    #[derive(Debug, Clone, PartialEq)]
    enum RecordedCall {
        Full {
            q: DVector<f64>,
            h: DVector<f64>,
            p: DMatrix<f64>,
            g: DMatrix<f64>,
            a: DMatrix<f64>,
            b: DVector<f64>,
            opts: QpSwiftOptions,
        },
        WithoutEquality {
            q: DVector<f64>,
            h: DVector<f64>,
            p: DMatrix<f64>,
            g: DMatrix<f64>,
            opts: QpSwiftOptions,
        },
    }

    impl RecordedCall {
        fn opts(&self) -> &QpSwiftOptions {
            match self {
                RecordedCall::Full { opts, .. } | RecordedCall::WithoutEquality { opts, .. } => opts,
            }
        }
    }

    /// Runner that records its arguments and returns a canned result
    struct RecordingRunner {
        exit_flag: i32,
        sol: DVector<f64>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl RecordingRunner {
        fn new(exit_flag: i32, sol: Vec<f64>) -> Self {
            RecordingRunner {
                exit_flag,
                sol: DVector::from_vec(sol),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        fn result(&self) -> RunResult {
            RunResult {
                sol: self.sol.clone(),
                basic_info: BasicInfo {
                    exit_flag: self.exit_flag,
                    iterations: 9,
                    setup_time: 0.0,
                    solve_time: 0.0,
                    fval: 0.0,
                },
            }
        }
    }

    impl QpSwiftRunner for RecordingRunner {
        fn run(
            &self,
            q: &DVector<f64>,
            h: &DVector<f64>,
            p: &DMatrix<f64>,
            g: &DMatrix<f64>,
            a: &DMatrix<f64>,
            b: &DVector<f64>,
            opts: &QpSwiftOptions,
        ) -> RunResult {
            self.calls.lock().unwrap().push(RecordedCall::Full {
                q: q.clone(),
                h: h.clone(),
                p: p.clone(),
                g: g.clone(),
                a: a.clone(),
                b: b.clone(),
                opts: opts.clone(),
            });
            self.result()
        }

        fn run_without_equality(
            &self,
            q: &DVector<f64>,
            h: &DVector<f64>,
            p: &DMatrix<f64>,
            g: &DMatrix<f64>,
            opts: &QpSwiftOptions,
        ) -> RunResult {
            self.calls.lock().unwrap().push(RecordedCall::WithoutEquality {
                q: q.clone(),
                h: h.clone(),
                p: p.clone(),
                g: g.clone(),
                opts: opts.clone(),
            });
            self.result()
        }
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a fmt subscriber writing into a buffer, return its output
    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
        (result, logs)
    }

    fn cost() -> (DMatrix<f64>, DVector<f64>) {
        (
            DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]),
            DVector::from_vec(vec![-2.0, -5.0]),
        )
    }

    fn inequality_problem() -> QpProblem {
        let (p, q) = cost();
        QpProblem::new(p, q)
            .unwrap()
            .with_inequality(DMatrix::from_row_slice(1, 2, &[1.0, 0.0]), DVector::from_vec(vec![1.0]))
            .unwrap()
    }

    fn full_problem() -> QpProblem {
        inequality_problem()
            .with_equality(DMatrix::from_row_slice(1, 2, &[1.0, 1.0]), DVector::from_vec(vec![3.5]))
            .unwrap()
    }

    fn expected_opts(verbose: i64) -> QpSwiftOptions {
        [(keys::OUTPUT, 1i64), (keys::VERBOSE, verbose)].into_iter().collect()
    }

    #[test]
    fn test_inequality_only_uses_short_form() {
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
        let problem = inequality_problem();

        let x = qpswift_solve_qp(&runner, &problem, None, false, None).unwrap();

        assert_eq!(x, Some(DVector::from_vec(vec![1.0, 2.5])));
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            RecordedCall::WithoutEquality {
                q: DVector::from_vec(vec![-2.0, -5.0]),
                h: DVector::from_vec(vec![1.0]),
                p: DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]),
                g: DMatrix::from_row_slice(1, 2, &[1.0, 0.0]),
                opts: expected_opts(0),
            }
        );
    }

    #[test]
    fn test_both_blocks_use_full_form() {
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
        let problem = full_problem();

        qpswift_solve_qp(&runner, &problem, None, true, None).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            RecordedCall::Full { a, b, h, opts, .. } => {
                assert_eq!(a, &DMatrix::from_row_slice(1, 2, &[1.0, 1.0]));
                assert_eq!(b, &DVector::from_vec(vec![3.5]));
                assert_eq!(h, &DVector::from_vec(vec![1.0]));
                assert_eq!(opts, &expected_opts(1));
            }
            other => panic!("expected full form, got {:?}", other),
        }
    }

    #[test]
    fn test_equality_only_not_implemented() {
        let (p, q) = cost();
        let problem = QpProblem::new(p, q)
            .unwrap()
            .with_equality(DMatrix::from_row_slice(1, 2, &[1.0, 1.0]), DVector::from_vec(vec![1.0]))
            .unwrap();
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![0.0, 0.0]);

        let err = qpswift_solve_qp(&runner, &problem, None, false, None).unwrap_err();

        assert!(matches!(err, QpError::NotImplemented(_)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_unconstrained_not_implemented() {
        let (p, q) = cost();
        let problem = QpProblem::new(p, q).unwrap();
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![0.0, 0.0]);
        let initvals = DVector::from_vec(vec![0.0, 0.0]);

        let err = qpswift_solve_qp(&runner, &problem, Some(&initvals), true, None).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Not implemented: QP without inequality constraints is still WIP for qpSWIFT"
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_nonzero_exit_flag_gives_none() {
        for flag in [QP_KKTFAIL, QP_MAXIT, QP_FATAL, -1] {
            let runner = RecordingRunner::new(flag, vec![1.0, 2.5]);
            let x = qpswift_solve_qp(&runner, &inequality_problem(), None, false, None).unwrap();
            assert_eq!(x, None, "exit flag {}", flag);
        }
    }

    #[test]
    fn test_caller_options_untouched_and_reserved_keys_overridden() {
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
        let mut caller_opts = QpSwiftOptions::new().with_max_iter(25).with_rel_tol(1e-9);
        caller_opts.insert(keys::OUTPUT, 2);
        caller_opts.insert(keys::VERBOSE, 1);
        let before = caller_opts.clone();

        qpswift_solve_qp(&runner, &inequality_problem(), None, false, Some(&caller_opts)).unwrap();

        assert_eq!(caller_opts, before);
        let calls = runner.calls();
        let sent = calls[0].opts();
        assert_eq!(sent.get(keys::OUTPUT), Some(OptionValue::Int(1)));
        assert_eq!(sent.get(keys::VERBOSE), Some(OptionValue::Int(0)));
        assert_eq!(sent.max_iter(), Some(25));
        assert_eq!(sent.rel_tol(), Some(1e-9));
        assert_eq!(sent.len(), 4);
    }

    #[test]
    fn test_warm_start_emits_notice() {
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
        let initvals = DVector::from_vec(vec![0.5, 0.5]);
        let problem = inequality_problem();

        let (x, logs) = with_captured_logs(|| qpswift_solve_qp(&runner, &problem, Some(&initvals), false, None));

        assert_eq!(x.unwrap(), Some(DVector::from_vec(vec![1.0, 2.5])));
        assert!(logs.contains(WARM_START_NOTICE), "logs: {}", logs);
    }

    #[test]
    fn test_no_notice_without_warm_start() {
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
        let problem = inequality_problem();

        let (_, logs) = with_captured_logs(|| qpswift_solve_qp(&runner, &problem, None, false, None));

        assert!(logs.is_empty(), "logs: {}", logs);
    }

    #[test]
    fn test_solver_struct_uses_stored_options() {
        let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
        let solver = QpSwiftSolver::with_runner(runner).with_options(QpSwiftOptions::new().with_sigma(80.0));

        assert_eq!(solver.solver_id(), SolverId::QpSwift);
        solver.solve_qp(&inequality_problem(), None, true).unwrap();

        let calls = solver.runner().calls();
        assert_eq!(calls[0].opts().sigma(), Some(80.0));
        assert!(calls[0].opts().verbose());
        assert_eq!(solver.options().unwrap().len(), 1);
    }

    #[test]
    fn test_registry_lists() {
        assert_eq!(available_solvers(), &[SolverId::Clarabel, SolverId::QpSwift]);
        assert_eq!(dense_solvers(), vec![SolverId::QpSwift]);
        assert_eq!(sparse_solvers(), vec![SolverId::Clarabel]);
    }

    #[test]
    fn test_solver_id_parsing() {
        assert_eq!("qpSWIFT".parse::<SolverId>().unwrap(), SolverId::QpSwift);
        assert_eq!("clarabel".parse::<SolverId>().unwrap(), SolverId::Clarabel);
        assert_eq!(SolverId::QpSwift.to_string(), "qpswift");

        let err = "quadprog".parse::<SolverId>().unwrap_err();
        assert!(matches!(err, QpError::UnknownSolver(name) if name == "quadprog"));
    }

    #[test]
    fn test_solve_function_ids() {
        for id in available_solvers() {
            assert_eq!(solve_function(*id).solver_id(), *id);
        }
    }

    #[test]
    fn test_solve_qp_unknown_solver() {
        let result = solve_qp(&inequality_problem(), "nope", None, false);
        assert!(matches!(result, Err(QpError::UnknownSolver(_))));
    }

    #[test]
    fn test_solve_qp_dispatch_matches_between_backends() {
        // Bound x <= 1 is strictly active: the unconstrained optimum is x = 2
        let problem = QpProblem::new(
            DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]),
            DVector::from_vec(vec![-4.0, -5.0]),
        )
        .unwrap()
        .with_inequality(DMatrix::from_row_slice(1, 2, &[1.0, 0.0]), DVector::from_vec(vec![1.0]))
        .unwrap();

        let swift = solve_qp(&problem, "qpswift", None, false).unwrap().unwrap();
        let clarabel = solve_qp(&problem, "clarabel", None, false).unwrap().unwrap();

        assert!((&swift - &clarabel).norm() < 1e-3, "qpswift {} vs clarabel {}", swift, clarabel);
        assert!((clarabel[0] - 1.0).abs() < 1e-4);
        assert!((clarabel[1] - 2.5).abs() < 1e-4);
        assert!((swift[0] - 1.0).abs() < 1e-4, "x[0] = {}", swift[0]);
    }

    fn small_vec(n: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-10.0f64..10.0, n)
    }

    proptest! {
        #[test]
        fn prop_solution_forwarded_unchanged(sol in small_vec(2)) {
            let runner = RecordingRunner::new(QP_OPTIMAL, sol.clone());
            let x = qpswift_solve_qp(&runner, &inequality_problem(), None, false, None).unwrap();
            prop_assert_eq!(x, Some(DVector::from_vec(sol)));
        }

        #[test]
        fn prop_nonzero_flag_never_returns_solution(flag in any::<i32>().prop_filter("non-zero", |f| *f != 0)) {
            let runner = RecordingRunner::new(flag, vec![1.0, 2.5]);
            let x = qpswift_solve_qp(&runner, &full_problem(), None, false, None).unwrap();
            prop_assert_eq!(x, None);
        }

        #[test]
        fn prop_warm_start_does_not_change_call(guess in small_vec(2), verbose in any::<bool>()) {
            let cold = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
            let warm = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
            let guess = DVector::from_vec(guess);
            let problem = full_problem();

            let cold_x = qpswift_solve_qp(&cold, &problem, None, verbose, None).unwrap();
            let warm_x = qpswift_solve_qp(&warm, &problem, Some(&guess), verbose, None).unwrap();

            prop_assert_eq!(cold_x, warm_x);
            prop_assert_eq!(cold.calls(), warm.calls());
        }

        #[test]
        fn prop_reserved_keys_always_forced(
            output in any::<i64>(),
            caller_verbose in -5i64..5,
            verbose in any::<bool>(),
        ) {
            let runner = RecordingRunner::new(QP_OPTIMAL, vec![1.0, 2.5]);
            let mut opts = QpSwiftOptions::new();
            opts.insert(keys::OUTPUT, output);
            opts.insert(keys::VERBOSE, caller_verbose);

            qpswift_solve_qp(&runner, &inequality_problem(), None, verbose, Some(&opts)).unwrap();

            let calls = runner.calls();
            prop_assert_eq!(calls[0].opts(), &expected_opts(i64::from(verbose)));
        }

        #[test]
        fn prop_no_inequality_always_rejected(n in 1usize..5, with_equality in any::<bool>(), verbose in any::<bool>()) {
            let mut problem = QpProblem::new(DMatrix::identity(n, n), DVector::zeros(n)).unwrap();
            if with_equality {
                problem = problem
                    .with_equality(DMatrix::from_element(1, n, 1.0), DVector::from_element(1, 1.0))
                    .unwrap();
            }
            let runner = RecordingRunner::new(QP_OPTIMAL, vec![0.0; n]);

            let result = qpswift_solve_qp(&runner, &problem, None, verbose, None);

            prop_assert!(matches!(result, Err(QpError::NotImplemented(_))));
            prop_assert!(runner.calls().is_empty());
        }
    }
}
