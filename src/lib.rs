pub mod arms;
pub mod config;
pub mod environment;
pub mod errors;
pub mod experiment;
pub mod history;
pub mod policies;

#[cfg(test)]
mod test_utils;
