//! Example code for the `README.md` file.
//!
//! Demonstrates that a lookup which takes different amounts of time depending on whether the
//! key exists is indistinguishable by timing once normalized.

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use fixed_time::Normalizer;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut users: HashMap<&str, &'static str> = HashMap::new();
    users.insert("alice", "$argon2id$v=19$...");

    // A real lookup would hash the password on a hit and return early on a miss.
    let lookup = |name: &str| -> Result<&'static str, String> {
        match users.get(name) {
            Some(hash) => {
                thread::sleep(Duration::from_millis(8));
                Ok(*hash)
            }
            None => Err(format!("unknown user '{name}'")),
        }
    };

    let normalizer = Normalizer::from_millis(20);

    for name in ["alice", "mallory"] {
        let start = Instant::now();
        let result = normalizer.run_fallible(|| lookup(name));

        println!(
            "{name}: found={} in {:?}",
            result.is_ok(),
            start.elapsed()
        );
    }

    // A workload slower than the target cannot be hidden.
    let start = Instant::now();
    normalizer.run(|| thread::sleep(Duration::from_millis(35)));
    println!("slow workload took {:?}", start.elapsed());
}
