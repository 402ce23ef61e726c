pub mod aliases;
pub mod matcher;
pub mod transcript;
