mod test_boundary;
mod test_nist_vectors;
mod test_tamper;
