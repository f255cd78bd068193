pub mod completions;
pub mod pick;
