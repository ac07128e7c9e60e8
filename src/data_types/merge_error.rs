
/// Conditions raised by the merge core itself, as opposed to I/O problems coming out of an input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("cursor for contig {contig:?} was advanced after it was exhausted")]
    CursorExhausted { contig: String },
    #[error("contig {contig:?} is in the contig union but no input reported it as present")]
    ContigAbsentEverywhere { contig: String },
}
