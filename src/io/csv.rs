/*!
# CSV Export

Saves a completed run's samples and its round-by-round diagnostics history
to CSV files for offline inspection. Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;

use csv::Writer;

use crate::stats::DiagnosticsRecorder;

/// Saves a chain's samples as a two-column CSV (`sample`, `value`).
pub fn save_samples_csv(samples: &[f64], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["sample", "value"])?;
    for (i, x) in samples.iter().enumerate() {
        wtr.write_record([i.to_string(), x.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Saves the diagnostics history with one row per stopping round
/// (`round`, `n`, `mcse`, `mean_estimate`, `half_width`).
pub fn save_diagnostics_csv(
    recorder: &DiagnosticsRecorder,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["round", "n", "mcse", "mean_estimate", "half_width"])?;
    for (i, r) in recorder.rounds().iter().enumerate() {
        wtr.write_record([
            i.to_string(),
            r.n.to_string(),
            r.mcse.to_string(),
            r.mean_estimate.to_string(),
            r.half_width.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
