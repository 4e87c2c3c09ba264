//! Batch-means Monte Carlo standard error, effective sample size, and the
//! per-round diagnostics recorder.
//!
//! A correlated chain violates the i.i.d. standard-error formula, so the
//! MCSE of the sample mean is estimated by partitioning the chain into
//! contiguous batches whose means are approximately independent. The
//! estimator assumes the chain is (at least approximately) stationary and
//! ergodic; detecting poor mixing is the caller's problem.

use ndarray::prelude::*;

/// Monte Carlo standard error of the sample mean via batch means.
///
/// With batch size `b` (default `floor(sqrt(N))`), the first
/// `K*b` samples (`K = floor(N/b)`) are split into `K` contiguous batches
/// and the MCSE is `sqrt(b * Var(batch means) / (K*b))`, with the batch-mean
/// variance taken with denominator `K-1`.
///
/// Edge-case policy, kept as documented behavior rather than redesigned:
/// - fewer than 2 batches: retry with `batch_size` halved, while it stays
///   above 1;
/// - `batch_size` of 1 with still fewer than 2 batches: fall back to the
///   naive i.i.d. standard error;
/// - fewer than 2 samples overall: `f64::INFINITY`, meaning "cannot
///   estimate yet, keep sampling".
pub fn batch_means_mcse(chain: &[f64], batch_size: Option<usize>) -> f64 {
    let n = chain.len();
    if n < 2 {
        return f64::INFINITY;
    }

    let b = batch_size
        .unwrap_or_else(|| (n as f64).sqrt().floor() as usize)
        .max(1);
    let k = n / b;
    if k < 2 {
        if b > 1 {
            return batch_means_mcse(chain, Some(b / 2));
        }
        return naive_standard_error(chain);
    }

    let truncated = ArrayView1::from(&chain[..k * b]);
    let batches = truncated
        .into_shape_with_order((k, b))
        .expect("Expecting (K, batch_size) reshape of the truncated chain to succeed.");
    let batch_means = batches
        .mean_axis(Axis(1))
        .expect("Expecting batch means to exist for batch_size >= 1.");
    let var_bm = batch_means.var(1.0);
    (var_bm / (k * b) as f64).sqrt() * (b as f64).sqrt()
}

/// Naive i.i.d. standard error `std(chain, ddof=1) / sqrt(N)`.
pub fn naive_standard_error(chain: &[f64]) -> f64 {
    let n = chain.len();
    if n < 2 {
        return f64::INFINITY;
    }
    (sample_variance(chain) / n as f64).sqrt()
}

/// Sample variance with denominator `N - 1`.
pub fn sample_variance(chain: &[f64]) -> f64 {
    ArrayView1::from(chain).var(1.0)
}

/// Effective sample size `N / tau`.
///
/// Uses the closed-form integrated autocorrelation time when the process
/// model supplies one; otherwise estimates
/// `tau_hat = N * mcse^2 / s^2` from the batch-means MCSE, clamped below at
/// 1 so the ESS never exceeds `N`. Returns `None` when no finite estimate
/// exists (degenerate or constant chain).
pub fn effective_sample_size(chain: &[f64], autocorr_time: Option<f64>) -> Option<f64> {
    let n = chain.len() as f64;
    if let Some(tau) = autocorr_time {
        return Some(n / tau);
    }
    if chain.len() < 2 {
        return None;
    }
    let mcse = batch_means_mcse(chain, None);
    let s2 = sample_variance(chain);
    if !mcse.is_finite() || !(s2 > 0.0) {
        return None;
    }
    let tau_hat = (n * mcse * mcse / s2).max(1.0);
    Some(n / tau_hat)
}

/// One row of stopping diagnostics, recorded once per round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundStats {
    /// Chain length at the time of the check.
    pub n: usize,
    /// Batch-means MCSE of the sample mean.
    pub mcse: f64,
    /// Running mean estimate.
    pub mean_estimate: f64,
    /// Confidence-interval half-width `mcse * t_crit`.
    pub half_width: f64,
}

/// Passive sink for per-round history. Recording has no influence on the
/// stopping decision; dropping the recorder changes nothing about a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticsRecorder {
    rounds: Vec<RoundStats>,
}

impl DiagnosticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: RoundStats) {
        self.rounds.push(stats);
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn rounds(&self) -> &[RoundStats] {
        &self.rounds
    }

    /// Half-width trace, one entry per round.
    pub fn half_widths(&self) -> Array1<f64> {
        self.rounds.iter().map(|r| r.half_width).collect()
    }

    /// Mean-estimate trace, one entry per round.
    pub fn mean_estimates(&self) -> Array1<f64> {
        self.rounds.iter().map(|r| r.mean_estimate).collect()
    }

    /// Chain-length trace, one entry per round.
    pub fn chain_lengths(&self) -> Array1<f64> {
        self.rounds.iter().map(|r| r.n as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ar1::Ar1Process;
    use crate::core::MarkovChain;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_chains_report_infinity() {
        assert!(batch_means_mcse(&[], None).is_infinite());
        assert!(batch_means_mcse(&[1.0], None).is_infinite());
        assert!(naive_standard_error(&[1.0]).is_infinite());
    }

    #[test]
    fn test_batch_size_one_reduces_to_naive() {
        let chain: Vec<f64> = (0..50).map(|i| (i as f64).sin()).collect();
        assert_relative_eq!(
            batch_means_mcse(&chain, Some(1)),
            naive_standard_error(&chain),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_oversized_batch_halves_until_usable() {
        let chain: Vec<f64> = (0..20).map(|i| i as f64).collect();
        // batch_size 20 gives a single batch; halving lands on 10 (K=2).
        assert_relative_eq!(
            batch_means_mcse(&chain, Some(20)),
            batch_means_mcse(&chain, Some(10)),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_shift_invariance() {
        let mut ar1 = Ar1Process::new(0.8, 1.0, 0.0).unwrap().set_seed(11);
        let chain: Vec<f64> = (0..5_000).map(|_| ar1.step()).collect();
        let shifted: Vec<f64> = chain.iter().map(|x| x + 1e4).collect();
        assert_relative_eq!(
            batch_means_mcse(&chain, None),
            batch_means_mcse(&shifted, None),
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_iid_chain_agrees_with_naive_se() {
        // rho=0 makes the draws i.i.d. N(0, 1); batching then estimates the
        // same quantity as the naive formula, up to batch-mean sampling
        // noise of order 1/sqrt(K).
        let mut iid = Ar1Process::new(0.0, 1.0, 0.0).unwrap().set_seed(42);
        let chain: Vec<f64> = (0..100_000).map(|_| iid.step()).collect();
        let batched = batch_means_mcse(&chain, None);
        let naive = naive_standard_error(&chain);
        assert_relative_eq!(batched, naive, max_relative = 0.2);
    }

    #[test]
    fn test_correlated_chain_inflates_mcse() {
        // Positive autocorrelation must push the batch-means MCSE well
        // above the naive i.i.d. figure.
        let mut ar1 = Ar1Process::new(0.95, 1.0, 0.0).unwrap().set_seed(42);
        let chain: Vec<f64> = (0..50_000).map(|_| ar1.step()).collect();
        let batched = batch_means_mcse(&chain, None);
        let naive = naive_standard_error(&chain);
        assert!(
            batched > 2.0 * naive,
            "Expected batched MCSE {batched} to exceed naive {naive} substantially"
        );
    }

    #[test]
    fn test_ess_closed_form_tau() {
        let chain = vec![0.0; 1_000];
        let ess = effective_sample_size(&chain, Some(39.0)).unwrap();
        assert_relative_eq!(ess, 1_000.0 / 39.0, max_relative = 1e-12);
    }

    #[test]
    fn test_ess_estimated_for_correlated_chain() {
        let mut ar1 = Ar1Process::new(0.95, 1.0, 0.0).unwrap().set_seed(7);
        let chain: Vec<f64> = (0..50_000).map(|_| ar1.step()).collect();
        let ess = effective_sample_size(&chain, None).unwrap();
        // True tau is 39, so the estimated ESS should be far below N but
        // in the right ballpark.
        assert!(ess < 10_000.0, "ESS {ess} implausibly high for rho=0.95");
        assert!(ess > 200.0, "ESS {ess} implausibly low for N=50000");
    }

    #[test]
    fn test_ess_none_for_constant_chain() {
        let chain = vec![2.0; 100];
        assert_eq!(effective_sample_size(&chain, None), None);
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut rec = DiagnosticsRecorder::new();
        assert!(rec.is_empty());
        for n in [100usize, 200, 300] {
            rec.record(RoundStats {
                n,
                mcse: 1.0 / n as f64,
                mean_estimate: 0.0,
                half_width: 2.0 / n as f64,
            });
        }
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.rounds()[2].n, 300);
        let lengths = rec.chain_lengths();
        assert!(lengths.windows(2).into_iter().all(|w| w[0] <= w[1]));
        assert_eq!(rec.half_widths().len(), 3);
        assert_eq!(rec.mean_estimates().len(), 3);
    }
}
