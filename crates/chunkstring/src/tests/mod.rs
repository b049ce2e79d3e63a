mod arbitrary;

/// Property test iteration count.
fn iterations() -> u64 {
    #[cfg(not(any(miri, feature = "test-fast")))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(all(not(miri), feature = "test-fast"))]
    let tests = 100;
    #[cfg(miri)]
    let tests = 10;
    tests
}
