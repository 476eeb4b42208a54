mod app;
mod commands;
mod effects;
mod persistence;
mod ui;

pub(crate) use app::run_app;
