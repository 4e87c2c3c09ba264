/*!
First-order autoregressive process.

The AR(1) recursion `X_t = rho * X_{t-1} + eps_t` with `eps_t ~ N(0, tau^2)`
is stationary for `|rho| < 1`, with closed-form stationary variance
`tau^2 / (1 - rho^2)` and integrated autocorrelation time
`(1 + rho) / (1 - rho)`. Because these are exact, the process reports its
autocorrelation time through [`MarkovChain::integrated_autocorr_time`]
instead of requiring it to be estimated from data.

# Examples

```rust
use fixed_width_mcmc::ar1::Ar1Process;
use fixed_width_mcmc::core::MarkovChain;

let mut ar1 = Ar1Process::new(0.5, 1.0, 0.0).unwrap().set_seed(42);
let x1: f64 = ar1.step();
assert_eq!(ar1.current_state(), x1);
```
*/

use num_traits::Float;
use rand::prelude::*;

use crate::core::MarkovChain;
use crate::error::ConfigError;

/// A seeded AR(1) process.
#[derive(Debug, Clone)]
pub struct Ar1Process<T: Float> {
    /// Autoregressive coefficient, `|rho| < 1`.
    pub rho: T,
    /// Innovation standard deviation, `tau > 0`.
    pub tau: T,
    /// The process-specific random seed.
    pub seed: u64,
    state: T,
    rng: SmallRng,
}

impl<T> Ar1Process<T>
where
    T: Float,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
{
    /// Creates a new AR(1) process starting at `initial_state`.
    ///
    /// Fails fast with [`ConfigError`] if `|rho| >= 1` or `tau <= 0`
    /// (non-finite values are rejected too). The RNG is seeded from
    /// entropy; use [`Ar1Process::set_seed`] for reproducible runs.
    pub fn new(rho: T, tau: T, initial_state: T) -> Result<Self, ConfigError> {
        let rho_f64 = rho.to_f64().unwrap_or(f64::NAN);
        let tau_f64 = tau.to_f64().unwrap_or(f64::NAN);
        if !(rho_f64.is_finite() && rho_f64.abs() < 1.0) {
            return Err(ConfigError::NonStationaryRho(rho_f64));
        }
        if !(tau_f64.is_finite() && tau_f64 > 0.0) {
            return Err(ConfigError::InvalidInnovationStd(tau_f64));
        }
        let seed = thread_rng().gen::<u64>();
        Ok(Self {
            rho,
            tau,
            seed,
            state: initial_state,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Returns the process reseeded with `seed`. Seed once, before the run;
    /// reseeding mid-run breaks the batch-means estimator's assumptions.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Closed-form stationary variance `tau^2 / (1 - rho^2)`.
    pub fn stationary_variance(&self) -> T {
        self.tau * self.tau / (T::one() - self.rho * self.rho)
    }
}

impl<T> MarkovChain<T> for Ar1Process<T>
where
    T: Float,
    rand_distr::StandardNormal: rand_distr::Distribution<T>,
{
    fn step(&mut self) -> T {
        let normal = rand_distr::Normal::new(T::zero(), self.tau)
            .expect("Expecting creation of normal distribution to succeed.");
        self.state = self.rho * self.state + normal.sample(&mut self.rng);
        self.state
    }

    fn current_state(&self) -> T {
        self.state
    }

    /// Closed-form integrated autocorrelation time `(1 + rho) / (1 - rho)`.
    fn integrated_autocorr_time(&self) -> Option<T> {
        Some((T::one() + self.rho) / (T::one() - self.rho))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rejects_nonstationary_rho() {
        assert_eq!(
            Ar1Process::<f64>::new(1.0, 1.0, 0.0).unwrap_err(),
            ConfigError::NonStationaryRho(1.0)
        );
        assert!(Ar1Process::<f64>::new(-1.5, 1.0, 0.0).is_err());
        assert!(Ar1Process::<f64>::new(f64::NAN, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_rejects_bad_tau() {
        assert_eq!(
            Ar1Process::<f64>::new(0.5, 0.0, 0.0).unwrap_err(),
            ConfigError::InvalidInnovationStd(0.0)
        );
        assert!(Ar1Process::<f64>::new(0.5, -1.0, 0.0).is_err());
    }

    #[test]
    fn test_accepts_boundary_valid_parameters() {
        assert!(Ar1Process::<f64>::new(0.999, 1e-6, 3.0).is_ok());
        assert!(Ar1Process::<f64>::new(-0.999, 10.0, -3.0).is_ok());
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let mut a = Ar1Process::new(0.9, 1.0, 0.0).unwrap().set_seed(7);
        let mut b = Ar1Process::new(0.9, 1.0, 0.0).unwrap().set_seed(7);
        let xs: Vec<f64> = (0..100).map(|_| a.step()).collect();
        let ys: Vec<f64> = (0..100).map(|_| b.step()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_closed_forms() {
        let ar1 = Ar1Process::new(0.95, 1.0, 0.0).unwrap();
        assert_abs_diff_eq!(
            ar1.stationary_variance(),
            1.0 / (1.0 - 0.95 * 0.95),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            ar1.integrated_autocorr_time().unwrap(),
            1.95 / 0.05,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empirical_variance_matches_stationary_variance() {
        // rho=0.5, tau=1: stationary variance 4/3. With 100k draws the
        // estimate should land well within 10%.
        let mut ar1 = Ar1Process::new(0.5, 1.0, 0.0).unwrap().set_seed(42);
        let n = 100_000;
        let xs: Vec<f64> = (0..n).map(|_| ar1.step()).collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let expected = ar1.stationary_variance();
        assert!(
            (var - expected).abs() / expected < 0.1,
            "Empirical variance {var} too far from theoretical {expected}"
        );
    }
}
