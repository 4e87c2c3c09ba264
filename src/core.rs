//! Scalar Markov chain interface and the append-only sample buffer.

use indicatif::ProgressBar;

/// A scalar-state Markov chain (or any stationary stochastic recursion).
///
/// Implementors own their random number generator; one `step` consumes
/// entropy from it and nothing else, so a seeded chain is reproducible.
pub trait MarkovChain<T> {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> T;

    /// Get the current state without stepping.
    fn current_state(&self) -> T;

    /// Integrated autocorrelation time, if the process model provides one
    /// in closed form. The default is `None`; general chains must have it
    /// estimated from simulated data instead.
    fn integrated_autocorr_time(&self) -> Option<T> {
        None
    }
}

/// Append-only buffer of draws with O(1) length and mean queries.
///
/// Samples are never removed or mutated after being appended; the running
/// sum keeps the mean query cheap for the stopping loop, which asks for it
/// every round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainBuffer {
    samples: Vec<f64>,
    sum: f64,
}

impl ChainBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            sum: 0.0,
        }
    }

    /// Appends one draw.
    pub fn push(&mut self, x: f64) {
        self.sum += x;
        self.samples.push(x);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample mean from the running sum. NaN for an empty buffer.
    pub fn mean(&self) -> f64 {
        self.sum / self.samples.len() as f64
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Hands the samples to the caller, consuming the buffer.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Extends `chain` by `n_steps` draws from `generator`, continuing from the
/// generator's current state.
pub fn extend_chain<M: MarkovChain<f64>>(chain: &mut ChainBuffer, generator: &mut M, n_steps: usize) {
    for _ in 0..n_steps {
        chain.push(generator.step());
    }
}

/// Like [`extend_chain`], but ticks a progress bar once per draw.
pub fn extend_chain_with_progress<M: MarkovChain<f64>>(
    chain: &mut ChainBuffer,
    generator: &mut M,
    n_steps: usize,
    pb: &ProgressBar,
) {
    for _ in 0..n_steps {
        chain.push(generator.step());
        pb.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    struct CountingChain {
        state: f64,
    }

    impl MarkovChain<f64> for CountingChain {
        fn step(&mut self) -> f64 {
            self.state += 1.0;
            self.state
        }

        fn current_state(&self) -> f64 {
            self.state
        }
    }

    #[test]
    fn test_buffer_running_mean() {
        let mut buf = ChainBuffer::new();
        assert!(buf.is_empty());
        for x in [1.0, 2.0, 3.0, 4.0] {
            buf.push(x);
        }
        assert_eq!(buf.len(), 4);
        assert_abs_diff_eq!(buf.mean(), 2.5, epsilon = 1e-12);
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_extend_appends_in_order() {
        let mut buf = ChainBuffer::with_capacity(5);
        let mut chain = CountingChain { state: 0.0 };
        extend_chain(&mut buf, &mut chain, 3);
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0]);
        // A second extension continues from the generator's current state.
        extend_chain(&mut buf, &mut chain, 2);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.into_samples(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_default_autocorr_time_is_none() {
        let chain = CountingChain { state: 0.0 };
        assert_eq!(chain.integrated_autocorr_time(), None);
    }
}
