/*!
# Fixed-Width Sequential Stopping Rule

Grows a chain in fixed increments until the two-sided confidence interval
for the sample mean is narrower than a target half-width, or an iteration
ceiling is hit. Termination is itself a statistical decision: every round
recomputes the batch-means MCSE, the degrees of freedom implied by the
current batch count, and the matching Student-t critical value — the batch
count grows with the chain, so a fixed Normal z-value would be wrong early
on.

# Example

```rust
use fixed_width_mcmc::ar1::Ar1Process;
use fixed_width_mcmc::stopping::{StoppedReason, StoppingController, StoppingCriterion};

let process = Ar1Process::new(0.5, 1.0, 0.0).unwrap().set_seed(42);
let criterion = StoppingCriterion::new(0.05, 0.95, 500, 500).unwrap();
let (result, diagnostics) = StoppingController::new(process, criterion).run();

assert_eq!(result.stopped_reason, StoppedReason::TargetAchieved);
assert!(result.half_width <= 0.05);
assert_eq!(result.samples.len(), result.n_total);
assert!(!diagnostics.is_empty());
```
*/

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::{extend_chain, extend_chain_with_progress, ChainBuffer, MarkovChain};
use crate::error::ConfigError;
use crate::stats::{batch_means_mcse, effective_sample_size, DiagnosticsRecorder, RoundStats};
use crate::students_t::student_t_quantile;

/// Default iteration ceiling when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

/// Immutable run configuration for the fixed-width stopping rule.
///
/// Validated once at construction; a run can then never fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoppingCriterion {
    /// Target confidence-interval half-width, `> 0`.
    pub target_half_width: f64,
    /// Two-sided confidence level, in (0, 1).
    pub confidence_level: f64,
    /// Draws in the initial seeding run, `> 0`.
    pub initial_run_length: usize,
    /// Draws added per growth round, `> 0`.
    pub growth_increment: usize,
    /// Hard budget on total draws, `> 0`.
    pub max_iterations: usize,
}

impl StoppingCriterion {
    /// Creates a criterion with the default iteration ceiling
    /// ([`DEFAULT_MAX_ITERATIONS`]).
    pub fn new(
        target_half_width: f64,
        confidence_level: f64,
        initial_run_length: usize,
        growth_increment: usize,
    ) -> Result<Self, ConfigError> {
        if !(target_half_width.is_finite() && target_half_width > 0.0) {
            return Err(ConfigError::InvalidTargetHalfWidth(target_half_width));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ConfigError::InvalidConfidenceLevel(confidence_level));
        }
        if initial_run_length == 0 {
            return Err(ConfigError::ZeroRunLength("initial_run_length"));
        }
        if growth_increment == 0 {
            return Err(ConfigError::ZeroRunLength("growth_increment"));
        }
        Ok(Self {
            target_half_width,
            confidence_level,
            initial_run_length,
            growth_increment,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        })
    }

    /// Returns the criterion with a different iteration ceiling.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self, ConfigError> {
        if max_iterations == 0 {
            return Err(ConfigError::ZeroRunLength("max_iterations"));
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }
}

/// Why a run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppedReason {
    /// The half-width fell at or below the target: the reported estimate
    /// has the requested precision.
    TargetAchieved,
    /// The iteration ceiling was hit first: best effort under a budget.
    MaxIterationsReached,
}

/// Structured result of one completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// The full chain, in generation order.
    pub samples: Vec<f64>,
    /// Sample mean of the chain.
    pub mean_estimate: f64,
    /// Batch-means MCSE at termination.
    pub mcse: f64,
    /// Confidence-interval half-width at termination.
    pub half_width: f64,
    /// Total draws generated.
    pub n_total: usize,
    pub stopped_reason: StoppedReason,
    /// `N / tau`, with tau from the process model when available, else
    /// estimated from the batch means; `None` if no finite estimate exists.
    pub effective_sample_size: Option<f64>,
}

/// Orchestrates generator, chain buffer, and the batch-means estimator.
///
/// One controller owns one chain for the life of one run; `run` consumes
/// the controller and hands the chain back to the caller inside
/// [`RunResult`].
#[derive(Debug, Clone)]
pub struct StoppingController<M: MarkovChain<f64>> {
    generator: M,
    criterion: StoppingCriterion,
}

impl<M: MarkovChain<f64>> StoppingController<M> {
    pub fn new(generator: M, criterion: StoppingCriterion) -> Self {
        Self {
            generator,
            criterion,
        }
    }

    /// Runs to termination, returning the result and the per-round
    /// diagnostics history.
    pub fn run(self) -> (RunResult, DiagnosticsRecorder) {
        self.run_inner(None)
    }

    /// Like [`StoppingController::run`], with a progress bar tracking draws
    /// against the iteration ceiling.
    pub fn run_with_progress(self) -> (RunResult, DiagnosticsRecorder) {
        let pb = ProgressBar::new(self.criterion.max_iterations as u64);
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-");
        pb.set_style(pb_style);
        pb.set_prefix("Sampling");

        let out = self.run_inner(Some(&pb));

        let msg = match out.0.stopped_reason {
            StoppedReason::TargetAchieved => "Target half-width achieved",
            StoppedReason::MaxIterationsReached => "Iteration ceiling reached",
        };
        pb.finish_with_message(msg);
        out
    }

    fn run_inner(mut self, pb: Option<&ProgressBar>) -> (RunResult, DiagnosticsRecorder) {
        let crit = self.criterion;
        let alpha = 1.0 - crit.confidence_level;

        let mut chain = ChainBuffer::with_capacity(crit.initial_run_length);
        let mut recorder = DiagnosticsRecorder::new();

        // Seed run. The initial run length is capped by the ceiling so the
        // budget is honored even when it is smaller than the seed run.
        self.grow(&mut chain, crit.initial_run_length.min(crit.max_iterations), pb);

        let stopped_reason;
        let (mcse, half_width) = loop {
            let n = chain.len();
            let mcse = batch_means_mcse(chain.as_slice(), None);

            // Degrees of freedom: batch count minus one, recomputed every
            // round because the default batch count floor(sqrt(N)) grows
            // with the chain.
            let df = (((n as f64).sqrt().floor() as usize).saturating_sub(1)).max(1);
            let t_crit = student_t_quantile(1.0 - alpha / 2.0, df);
            let half_width = mcse * t_crit;

            recorder.record(RoundStats {
                n,
                mcse,
                mean_estimate: chain.mean(),
                half_width,
            });

            if half_width <= crit.target_half_width {
                stopped_reason = StoppedReason::TargetAchieved;
                break (mcse, half_width);
            }
            if n >= crit.max_iterations {
                stopped_reason = StoppedReason::MaxIterationsReached;
                break (mcse, half_width);
            }

            // Grow, never overshooting the ceiling.
            let increment = crit.growth_increment.min(crit.max_iterations - n);
            self.grow(&mut chain, increment, pb);
        };

        let ess = effective_sample_size(
            chain.as_slice(),
            self.generator.integrated_autocorr_time(),
        );
        let result = RunResult {
            mean_estimate: chain.mean(),
            mcse,
            half_width,
            n_total: chain.len(),
            stopped_reason,
            effective_sample_size: ess,
            samples: chain.into_samples(),
        };
        (result, recorder)
    }

    fn grow(&mut self, chain: &mut ChainBuffer, n_steps: usize, pb: Option<&ProgressBar>) {
        match pb {
            Some(pb) => extend_chain_with_progress(chain, &mut self.generator, n_steps, pb),
            None => extend_chain(chain, &mut self.generator, n_steps),
        }
    }
}
