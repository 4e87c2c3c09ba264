/*!
# Metropolis–Hastings Sampler

A random-walk Metropolis–Hastings sampler over a scalar unnormalized target
density. The proposal kernel is `N(x, step_size^2)`, which is symmetric in
`(x, x')`, so the proposal ratio cancels and the acceptance probability
reduces to `min(1, pi(x') / pi(x))`, evaluated in log-space for numerical
stability.

Every step appends exactly one state to the chain: the proposed candidate
when the move is accepted, the retained current state otherwise.

# Example

```rust
use fixed_width_mcmc::core::MarkovChain;
use fixed_width_mcmc::distributions::Exponential;
use fixed_width_mcmc::metropolis_hastings::MetropolisHastings;

let mut mh = MetropolisHastings::new(Exponential::new(1.0), 1.0, 2.0)
    .unwrap()
    .set_seed(42);
let x: f64 = mh.step();
assert!(x >= 0.0); // Exp(1) support
```
*/

use num_traits::Float;
use rand::prelude::*;

use crate::core::MarkovChain;
use crate::distributions::TargetDensity;
use crate::error::ConfigError;

/// A single scalar Metropolis–Hastings chain with a symmetric Normal
/// proposal.
#[derive(Debug, Clone)]
pub struct MetropolisHastings<T: Float, D: TargetDensity<T>> {
    /// The target distribution to sample from (unnormalized).
    pub target: D,
    /// Proposal standard deviation, `step_size > 0`.
    pub step_size: T,
    /// The chain-specific random seed.
    pub seed: u64,
    current: T,
    rng: SmallRng,
    n_steps: u64,
    n_accepted: u64,
}

impl<T, D> MetropolisHastings<T, D>
where
    T: Float,
    D: TargetDensity<T>,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// Creates a new chain at `initial_state`.
    ///
    /// Fails fast with [`ConfigError::InvalidStepSize`] if `step_size <= 0`
    /// or non-finite. The target density is *not* validated here; a zero
    /// density at the initial state is handled step by step (the chain only
    /// moves once a candidate with positive mass appears).
    pub fn new(target: D, step_size: T, initial_state: T) -> Result<Self, ConfigError> {
        let step_f64 = step_size.to_f64().unwrap_or(f64::NAN);
        if !(step_f64.is_finite() && step_f64 > 0.0) {
            return Err(ConfigError::InvalidStepSize(step_f64));
        }
        let seed = thread_rng().gen::<u64>();
        Ok(Self {
            target,
            step_size,
            seed,
            current: initial_state,
            rng: SmallRng::seed_from_u64(seed),
            n_steps: 0,
            n_accepted: 0,
        })
    }

    /// Returns the chain reseeded with `seed`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Fraction of proposed moves accepted so far; NaN before the first
    /// step.
    pub fn acceptance_rate(&self) -> f64 {
        self.n_accepted as f64 / self.n_steps as f64
    }
}

impl<T, D> MarkovChain<T> for MetropolisHastings<T, D>
where
    T: Float,
    D: TargetDensity<T>,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
    rand_distr::Standard: rand_distr::Distribution<T>,
{
    /// Performs one Metropolis–Hastings update.
    ///
    /// Draws `x' ~ N(x, step_size^2)`, computes
    /// `log alpha = min(0, ln pi(x') - ln pi(x))`, and accepts when
    /// `ln u < log alpha` for a fresh uniform `u`. A candidate with zero or
    /// negative density is always rejected; a zero density at the *current*
    /// state never poisons the chain, since any candidate with positive
    /// mass is then accepted outright.
    fn step(&mut self) -> T {
        let normal = rand_distr::Normal::new(self.current, self.step_size)
            .expect("Expecting creation of normal distribution to succeed.");
        let proposed = normal.sample(&mut self.rng);

        let p_current = self.target.unnorm_pdf(self.current);
        let p_proposed = self.target.unnorm_pdf(proposed);
        let log_ratio = if p_proposed <= T::zero() {
            T::neg_infinity()
        } else if p_current <= T::zero() {
            T::infinity()
        } else {
            p_proposed.ln() - p_current.ln()
        };
        let log_alpha = log_ratio.min(T::zero());

        let u: T = self.rng.gen();
        self.n_steps += 1;
        if u.ln() < log_alpha {
            self.current = proposed;
            self.n_accepted += 1;
        }
        self.current
    }

    fn current_state(&self) -> T {
        self.current
    }
}
