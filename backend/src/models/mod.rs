// src/models/mod.rs

pub mod course;
pub mod exercise;
pub mod lesson;
pub mod progress;
pub mod user;
