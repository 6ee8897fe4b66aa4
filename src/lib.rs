pub mod alignment;
pub mod error;
pub mod io;
pub mod text;
