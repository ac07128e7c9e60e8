
/// Typed failures raised by the merge core
pub mod merge_error;
/// Contains the record ordering trait and the concrete VCF record wrapper
pub mod variant_record;
