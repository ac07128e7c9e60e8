
/// Command line interface functionality
pub mod cli;
/// Total ordering over contig names
pub mod contig_order;
/// Contains various shared data types
pub mod data_types;
/// Drives the per-contig merge across all inputs
pub mod merge_driver;
/// Tooling for opening inputs and pulling records out of them
pub mod parsing;
/// Single-record lookahead over one input for one contig
pub mod source_cursor;
/// Core k-way merge over the cursors of a contig
pub mod stream_merger;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
