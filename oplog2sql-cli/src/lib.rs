//! File adapters and wiring for the `oplog2sql` binary.

pub mod file;
