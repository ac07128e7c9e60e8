/*!
# CLI module
Command line interface functionality that is specific to vcfweave.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The merge settings and their checks
pub mod merge;
