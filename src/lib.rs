pub mod ar1;
pub mod core;
pub mod distributions;
pub mod error;
pub mod io;
pub mod metropolis_hastings;
pub mod stats;
pub mod stopping;
pub mod students_t;
