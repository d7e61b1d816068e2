pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod jobs;
pub mod localtime;
pub mod state;
pub mod views;
