pub mod advisor;
pub mod app;
pub mod client;
pub mod config;
pub mod model;
pub mod prompts;
pub mod proxy;
pub mod render;
pub mod upstream;
pub mod web;
