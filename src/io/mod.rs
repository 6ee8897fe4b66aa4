/*!
# IO utilities

Opening of (possibly gzipped) inputs and paired writing of the extracted sentences.
!*/
pub mod reader;
pub mod writer;

pub use reader::{open, open_document};
pub use writer::PairWriter;
