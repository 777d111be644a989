// src/utils/mod.rs

pub mod logbook;

pub use logbook::Logbook;
