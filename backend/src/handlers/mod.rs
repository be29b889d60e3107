// src/handlers/mod.rs

pub mod auth;
pub mod course;
pub mod dashboard;
pub mod exercise;
pub mod lesson;
