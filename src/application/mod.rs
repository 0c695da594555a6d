pub mod cli;
pub mod markdown;
pub mod web;
