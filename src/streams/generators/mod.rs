mod drifting_linear_generator;

pub use drifting_linear_generator::DriftingLinearGenerator;
