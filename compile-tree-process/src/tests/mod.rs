//! Unit tests for process execution and output analysis

pub mod test_output_pump;
