//! Whole-network integration suite.
//!
//! Exercises the public `tasknet` API end to end: generators, stores,
//! coordinators, ledger and dispatcher wired by `TaskNetwork`.

#[path = "../common/mod.rs"]
mod common;

mod capture_lookup;
mod dispatch;
mod ledger;
mod suspension;
