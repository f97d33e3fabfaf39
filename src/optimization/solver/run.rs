//! Execution helpers that run an `argmin` solver on a penalized problem and
//! return a crate-friendly [`SolveOutcome`].
use crate::optimization::{
    errors::OptResult,
    solver::{
        FnEvalMap, Grad, Objective, SolveOutcome, SolverOptions, Theta, adapter::PenalizedProblem,
        types::Simplex, validation::validate_solution,
    },
};
use argmin::core::{Executor, IterState, Solver, State, TerminationStatus};

/// Run an L-BFGS solver from `x0`.
///
/// Wires the problem, solver, initial point, optional `max_iters` and,
/// with the `obs_slog` feature and `opts.verbose`, a terminal observer.
///
/// # Errors
/// - Any `argmin` runtime error (line-search failures, cost errors raised
///   inside the solver) via `From<argmin::core::Error>`.
/// - Validation errors from building the [`SolveOutcome`].
pub fn run_lbfgs<'a, O, S>(
    x0: Theta, opts: &SolverOptions, problem: PenalizedProblem<'a, O>, solver: S,
) -> OptResult<SolveOutcome>
where
    O: Objective,
    S: Solver<PenalizedProblem<'a, O>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&x0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(x0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    finish(&problem, result.take_best_param(), termination, iterations, function_counts, grad)
}

/// Run a Nelder–Mead solver whose simplex already encodes the start.
///
/// `x0` is only used for the verbose initial-state line.
///
/// # Errors
/// Same as [`run_lbfgs`].
pub fn run_nelder_mead<'a, O>(
    x0: &Theta, opts: &SolverOptions, problem: PenalizedProblem<'a, O>, solver: Simplex,
) -> OptResult<SolveOutcome>
where
    O: Objective,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(x0, &problem)?;
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = x0;
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    finish(&problem, result.take_best_param(), termination, iterations, function_counts, None)
}

// ---- Helper Methods ----

/// Re-evaluate the best point so the outcome carries both `f(x̂)` and `c(x̂)`.
fn finish<O: Objective>(
    problem: &PenalizedProblem<'_, O>, best: Option<Theta>, termination: TerminationStatus,
    iterations: u64, function_counts: FnEvalMap, grad: Option<Grad>,
) -> OptResult<SolveOutcome> {
    let x_hat = validate_solution(best)?;
    let (objective, cost) = problem.evaluate(&x_hat)?;
    SolveOutcome::new(x_hat, objective, cost, termination, iterations, function_counts, grad)
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<O: Objective>(x0: &Theta, problem: &PenalizedProblem<'_, O>) -> OptResult<()> {
    let (f0, c0) = problem.evaluate(x0)?;
    eprintln!("init: f(x0) = {:.6}, c(x0) = {:.6}, dim = {}", f0, c0, x0.len());
    Ok(())
}
