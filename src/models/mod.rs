pub mod matching;
pub mod records;
