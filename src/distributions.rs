/*!
Target densities for the Metropolis–Hastings sampler.

A target only needs to provide its *unnormalized* density; the acceptance
ratio cancels any normalizing constant. The [`TargetDensity`] trait has a
blanket implementation for closures, so a plain `|x: f64| (-x * x).exp()`
works as a target, and two concrete densities are provided for common cases.

# Examples

```rust
use fixed_width_mcmc::distributions::{Exponential, TargetDensity};

let expo = Exponential::new(1.0);
assert!(expo.unnorm_pdf(2.0) > 0.0);
assert_eq!(expo.unnorm_pdf(-1.0), 0.0);

// A closure is a target too.
let half_normal = |x: f64| if x < 0.0 { 0.0 } else { (-0.5 * x * x).exp() };
assert!(half_normal.unnorm_pdf(1.0) > 0.0);
```
*/

use num_traits::Float;

/// An unnormalized target density over a scalar state.
pub trait TargetDensity<T: Float> {
    /// Evaluates the unnormalized density at `x`. May return zero outside
    /// the support; must never be needed in normalized form.
    fn unnorm_pdf(&self, x: T) -> T;
}

impl<T: Float, F: Fn(T) -> T> TargetDensity<T> for F {
    fn unnorm_pdf(&self, x: T) -> T {
        self(x)
    }
}

/// Exponential density `rate * exp(-rate * x)` for `x >= 0`, zero below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential<T: Float> {
    pub rate: T,
}

impl<T: Float> Exponential<T> {
    pub fn new(rate: T) -> Self {
        Self { rate }
    }
}

impl<T: Float> TargetDensity<T> for Exponential<T> {
    fn unnorm_pdf(&self, x: T) -> T {
        if x < T::zero() {
            T::zero()
        } else {
            (-self.rate * x).exp()
        }
    }
}

/// Univariate Gaussian density with the normalizing constant dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian1D<T: Float> {
    pub mean: T,
    pub std: T,
}

impl<T: Float> Gaussian1D<T> {
    pub fn new(mean: T, std: T) -> Self {
        Self { mean, std }
    }
}

impl<T: Float> TargetDensity<T> for Gaussian1D<T> {
    fn unnorm_pdf(&self, x: T) -> T {
        let z = (x - self.mean) / self.std;
        (-z * z / (T::one() + T::one())).exp()
    }
}
