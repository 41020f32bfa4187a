pub mod config;
pub mod pages;
pub mod simulate;
