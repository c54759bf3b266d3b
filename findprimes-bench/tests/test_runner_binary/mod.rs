mod test_errors;
mod test_sweep;
