#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod configuration;
pub mod container;
pub mod enumerator;

#[cfg(test)]
mod test_utils;
