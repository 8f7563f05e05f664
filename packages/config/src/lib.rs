// ABOUTME: Configuration package for pagewise
// ABOUTME: Centralizes the environment variable names read at startup

pub mod constants;
