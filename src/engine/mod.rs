// Pure pricing logic: no I/O, no shared state
pub mod types;  // levels, snapshots, quote errors
pub mod walker; // greedy fill over a sorted side
