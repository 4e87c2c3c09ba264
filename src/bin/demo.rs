//! Fixed-width stopping demo: grows an AR(1) chain until the 95% confidence
//! interval for the mean is narrower than the target half-width, then
//! prints the run summary and the round-by-round history.

use std::error::Error;

use fixed_width_mcmc::ar1::Ar1Process;
use fixed_width_mcmc::stopping::{StoppedReason, StoppingController, StoppingCriterion};

fn main() -> Result<(), Box<dyn Error>> {
    const RHO: f64 = 0.95;
    const TAU: f64 = 1.0;
    const TARGET_HALF_WIDTH: f64 = 0.2;
    const CONFIDENCE: f64 = 0.95;
    const SEED: u64 = 42;

    let process = Ar1Process::new(RHO, TAU, 0.0)?.set_seed(SEED);
    println!(
        "AR(1) with rho={RHO}, tau={TAU}: stationary variance {:.3}, autocorrelation time {:.1}",
        process.stationary_variance(),
        (1.0 + RHO) / (1.0 - RHO),
    );
    println!("Target half-width {TARGET_HALF_WIDTH} at {:.0}% confidence\n", CONFIDENCE * 100.0);

    let criterion = StoppingCriterion::new(TARGET_HALF_WIDTH, CONFIDENCE, 1_000, 1_000)?;
    let (result, diagnostics) = StoppingController::new(process, criterion).run_with_progress();

    println!();
    for (i, round) in diagnostics.rounds().iter().enumerate() {
        println!(
            "Round {:>3}: N={:>7}  mcse={:.5}  mean={:+.5}  half-width={:.5}",
            i + 1,
            round.n,
            round.mcse,
            round.mean_estimate,
            round.half_width
        );
    }

    println!();
    match result.stopped_reason {
        StoppedReason::TargetAchieved => println!("Stopped: target half-width achieved."),
        StoppedReason::MaxIterationsReached => println!("Stopped: iteration ceiling reached."),
    }
    println!("Total samples:         {}", result.n_total);
    println!("Mean estimate:         {:+.5} (true stationary mean: 0)", result.mean_estimate);
    println!("MCSE:                  {:.5}", result.mcse);
    println!("Half-width:            {:.5}", result.half_width);
    if let Some(ess) = result.effective_sample_size {
        println!("Effective sample size: {:.0}", ess);
    }

    Ok(())
}
