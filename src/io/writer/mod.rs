/*!
# Paired writing

Extracted sentences go to two files that have to stay line-aligned:
line `n` of the origin file is the translation of line `n` of the destination file.
[PairWriter] owns both sides so that one cannot be written without the other.
!*/
mod pair;

pub use pair::{suffixed, PairWriter};
