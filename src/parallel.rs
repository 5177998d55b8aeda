//! Parallel evaluation and parallel algorithm runs on rayon.
//!
//! Only evaluation, which writes to each solution's own objective fields,
//! runs concurrently. Populations and archives are updated by the caller
//! after the parallel step has joined.

use crate::algorithm::Algorithm;
use crate::core::{evaluate_solution, Problem, Solution, SolutionSet};
use crate::error::{MoeaError, Result};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Evaluates batches of solutions concurrently.
///
/// Uses the global rayon pool unless built with
/// [`with_threads`](Self::with_threads).
///
/// # Examples
///
/// ```
/// use u_moea::core::{Problem, Solution, Variable};
/// use u_moea::parallel::MultithreadedEvaluator;
/// use u_moea::Result;
///
/// struct Square;
///
/// impl Problem for Square {
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 1 }
///     fn lower_limit(&self, _i: usize) -> f64 { -1.0 }
///     fn upper_limit(&self, _i: usize) -> f64 { 1.0 }
///     fn evaluate(&self, s: &mut Solution) -> Result<()> {
///         let x = s.real_value(0);
///         s.objectives[0] = x * x;
///         Ok(())
///     }
/// }
///
/// let batch: Vec<Solution> = (0..4)
///     .map(|i| Solution::new(vec![Variable::real(i as f64 / 4.0, -1.0, 1.0)], 1))
///     .collect();
/// let evaluated = MultithreadedEvaluator::new().evaluate(&Square, batch);
/// assert_eq!(evaluated.len(), 4);
/// assert_eq!(evaluated[2].objectives[0], 0.25);
/// ```
#[derive(Debug, Default)]
pub struct MultithreadedEvaluator {
    pool: Option<ThreadPool>,
}

impl MultithreadedEvaluator {
    /// An evaluator on the global rayon pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// An evaluator on a dedicated pool of `threads` workers.
    ///
    /// # Errors
    /// [`MoeaError::ThreadPool`] when the pool cannot be built.
    pub fn with_threads(threads: usize) -> Result<Self> {
        Ok(Self {
            pool: Some(build_pool(threads)?),
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
    }

    /// Evaluates every solution of `batch`, one task per solution.
    ///
    /// A solution whose evaluation fails or panics is logged and left out
    /// of the result; the others keep their input order.
    pub fn evaluate(&self, problem: &dyn Problem, mut batch: Vec<Solution>) -> Vec<Solution> {
        let submitted = batch.len();
        let succeeded = self.evaluate_marked(problem, &mut batch);
        retain_marked(&mut batch, &succeeded);
        debug!(submitted, evaluated = batch.len(), "batch evaluated");
        batch
    }

    /// Evaluates `solutions` in place and reports, position by position,
    /// which evaluations succeeded.
    ///
    /// Failures and panics are logged and marked `false`; the objectives of
    /// a failed solution are left in an unspecified state.
    pub fn evaluate_marked(&self, problem: &dyn Problem, solutions: &mut [Solution]) -> Vec<bool> {
        self.install(|| {
            solutions
                .par_iter_mut()
                .enumerate()
                .map(|(index, solution)| evaluate_logged(problem, index, solution))
                .collect()
        })
    }

    /// Evaluates `solutions` in place.
    ///
    /// Unlike [`evaluate`](Self::evaluate) nothing is dropped: the first
    /// failure is returned once every task has finished. Panics are not
    /// caught.
    pub fn evaluate_in_place(&self, problem: &dyn Problem, solutions: &mut [Solution]) -> Result<()> {
        self.install(|| {
            solutions
                .par_iter_mut()
                .map(|solution| evaluate_solution(problem, solution))
                .collect()
        })
    }

    fn install<R: Send>(&self, work: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}

/// Evaluates one solution, reporting a panic in `Problem::evaluate` as
/// [`MoeaError::Evaluation`].
pub(crate) fn evaluate_caught(problem: &dyn Problem, solution: &mut Solution) -> Result<()> {
    panic::catch_unwind(AssertUnwindSafe(|| evaluate_solution(problem, solution)))
        .unwrap_or_else(|_| Err(MoeaError::Evaluation("evaluation panicked".to_string())))
}

fn evaluate_logged(problem: &dyn Problem, index: usize, solution: &mut Solution) -> bool {
    match evaluate_caught(problem, solution) {
        Ok(()) => true,
        Err(e) => {
            warn!(index, error = %e, "evaluation failed, solution dropped");
            false
        }
    }
}

/// Evaluates `solutions` in place, on the global pool when `parallel` is
/// set and sequentially otherwise, and marks which ones succeeded.
pub(crate) fn evaluate_all(
    problem: &dyn Problem,
    solutions: &mut [Solution],
    parallel: bool,
) -> Vec<bool> {
    if parallel {
        MultithreadedEvaluator::new().evaluate_marked(problem, solutions)
    } else {
        solutions
            .iter_mut()
            .enumerate()
            .map(|(index, solution)| evaluate_logged(problem, index, solution))
            .collect()
    }
}

/// Keeps the items whose flag in `keep` is set. Items past the end of
/// `keep` are removed.
pub(crate) fn retain_marked<T>(items: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    items.retain(|_| flags.next().copied().unwrap_or(false));
}

/// The front returned by one successful run of
/// [`MultithreadedAlgorithmRunner`].
#[derive(Debug, Clone)]
pub struct CompletedRun {
    /// Position of the algorithm in submission order.
    pub index: usize,
    /// The algorithm's name.
    pub name: String,
    /// The returned solution set.
    pub result: SolutionSet,
}

/// Runs independent algorithms concurrently.
///
/// Runs that fail or panic are logged and omitted from the output.
pub struct MultithreadedAlgorithmRunner<'a> {
    tasks: Vec<Box<dyn Algorithm + 'a>>,
    pool: Option<ThreadPool>,
}

impl<'a> MultithreadedAlgorithmRunner<'a> {
    /// A runner on the global rayon pool.
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            pool: None,
        }
    }

    /// A runner on a dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> Result<Self> {
        Ok(Self {
            tasks: Vec::new(),
            pool: Some(build_pool(threads)?),
        })
    }

    /// Queues an algorithm.
    pub fn add(&mut self, algorithm: Box<dyn Algorithm + 'a>) {
        self.tasks.push(algorithm);
    }

    /// Number of queued algorithms.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs every queued algorithm, waits for all of them and drains the
    /// queue.
    pub fn execute(&mut self) -> Vec<CompletedRun> {
        let tasks = std::mem::take(&mut self.tasks);
        let work = move || {
            tasks
                .into_par_iter()
                .enumerate()
                .filter_map(|(index, mut algorithm)| {
                    let name = algorithm.name().to_string();
                    match panic::catch_unwind(AssertUnwindSafe(|| algorithm.execute())) {
                        Ok(Ok(result)) => Some(CompletedRun {
                            index,
                            name,
                            result,
                        }),
                        Ok(Err(e)) => {
                            warn!(index, algorithm = %name, error = %e, "run failed");
                            None
                        }
                        Err(_) => {
                            warn!(index, algorithm = %name, "run panicked");
                            None
                        }
                    }
                })
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }
}

impl Default for MultithreadedAlgorithmRunner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn build_pool(threads: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| MoeaError::ThreadPool(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Variable;

    /// Fails for negative inputs and panics at exactly 0.5.
    struct Picky;

    impl Problem for Picky {
        fn number_of_variables(&self) -> usize {
            1
        }
        fn number_of_objectives(&self) -> usize {
            2
        }
        fn lower_limit(&self, _i: usize) -> f64 {
            -1.0
        }
        fn upper_limit(&self, _i: usize) -> f64 {
            1.0
        }
        fn evaluate(&self, s: &mut Solution) -> Result<()> {
            let x = s.real_value(0);
            if x < 0.0 {
                return Err(MoeaError::Evaluation(format!("negative input {x}")));
            }
            if x == 0.5 {
                panic!("boom");
            }
            s.objectives = vec![x, 1.0 - x];
            Ok(())
        }
    }

    fn batch(xs: &[f64]) -> Vec<Solution> {
        xs.iter()
            .map(|&x| Solution::new(vec![Variable::real(x, -1.0, 1.0)], 2))
            .collect()
    }

    #[test]
    fn test_failures_are_dropped_order_kept() {
        let evaluator = MultithreadedEvaluator::with_threads(2).unwrap();
        assert_eq!(evaluator.threads(), 2);
        let out = evaluator.evaluate(&Picky, batch(&[0.1, -0.3, 0.5, 0.9, 0.2]));
        let xs: Vec<f64> = out.iter().map(|s| s.real_value(0)).collect();
        assert_eq!(xs, vec![0.1, 0.9, 0.2]);
        assert!(out.iter().all(|s| s.objectives[0] == s.real_value(0)));
    }

    #[test]
    fn test_in_place_reports_error() {
        let evaluator = MultithreadedEvaluator::new();
        let mut good = batch(&[0.1, 0.2]);
        evaluator.evaluate_in_place(&Picky, &mut good).unwrap();
        assert_eq!(good[1].objectives, vec![0.2, 0.8]);

        let mut bad = batch(&[0.1, -0.2]);
        assert!(matches!(
            evaluator.evaluate_in_place(&Picky, &mut bad),
            Err(MoeaError::Evaluation(_))
        ));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let mut a = batch(&[0.0, 0.25, 0.75, 1.0]);
        let mut b = a.clone();
        assert_eq!(evaluate_all(&Picky, &mut a, false), vec![true; 4]);
        assert_eq!(evaluate_all(&Picky, &mut b, true), vec![true; 4]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_failures_and_panics_marked_in_both_modes() {
        let xs = [0.1, -0.3, 0.5, 0.9];
        for parallel in [false, true] {
            let mut solutions = batch(&xs);
            let marks = evaluate_all(&Picky, &mut solutions, parallel);
            assert_eq!(marks, vec![true, false, false, true]);
            retain_marked(&mut solutions, &marks);
            let kept: Vec<f64> = solutions.iter().map(|s| s.real_value(0)).collect();
            assert_eq!(kept, vec![0.1, 0.9]);
        }
    }

    #[test]
    fn test_panic_reported_as_evaluation_error() {
        let mut solution = batch(&[0.5]).remove(0);
        assert!(matches!(
            evaluate_caught(&Picky, &mut solution),
            Err(MoeaError::Evaluation(_))
        ));
    }

    #[test]
    fn test_retain_marked_aligns_parallel_vectors() {
        let mut names = vec!["a", "b", "c", "d"];
        let mut speeds = vec![1, 2, 3, 4];
        let keep = [false, true, true, false];
        retain_marked(&mut names, &keep);
        retain_marked(&mut speeds, &keep);
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(speeds, vec![2, 3]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(MultithreadedEvaluator::new().evaluate(&Picky, Vec::new()).is_empty());
    }

    #[derive(Debug)]
    struct Fixed {
        fail: bool,
    }

    impl Algorithm for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn execute(&mut self) -> Result<SolutionSet> {
            if self.fail {
                return Err(MoeaError::InvalidConfig("failing on purpose".into()));
            }
            Ok(vec![Solution::from_objectives(vec![1.0, 2.0])].into())
        }
    }

    #[test]
    fn test_runner_drops_failed_runs() {
        let mut runner = MultithreadedAlgorithmRunner::new();
        runner.add(Box::new(Fixed { fail: false }));
        runner.add(Box::new(Fixed { fail: true }));
        runner.add(Box::new(Fixed { fail: false }));
        assert_eq!(runner.len(), 3);
        let done = runner.execute();
        assert!(runner.is_empty());
        let indices: Vec<usize> = done.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(done[0].result.len(), 1);
    }
}
