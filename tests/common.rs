#![allow(dead_code)]

use loquat::Dictionary;

// Run the test on different bucket configurations of a `Dictionary`.
pub fn with_dict<V>(mut test: impl FnMut(&dyn Fn() -> Dictionary<V>)) {
    // A single bucket forces every key into one chain.
    test(&(|| Dictionary::with_buckets(1).unwrap()));

    // An undersized table keeps several keys per chain.
    test(&(|| Dictionary::with_buckets(4).unwrap()));

    // A comfortably sized table keeps chains near length one.
    test(&(|| Dictionary::builder().buckets(256).build().unwrap()));
}

// Prints a log message if `RUST_LOG=debug` is set.
#[macro_export]
macro_rules! debug {
    ($($x:tt)*) => {
        if std::env::var("RUST_LOG").as_deref() == Ok("debug") {
            println!($($x)*);
        }
    };
}

// Returns the number of threads to use for stress testing.
pub fn threads() -> usize {
    num_cpus::get_physical().next_power_of_two().min(16)
}
