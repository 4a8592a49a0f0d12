pub mod export;
pub mod fs;
