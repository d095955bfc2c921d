pub mod api;
pub mod chart;
pub mod chart_canvas;
pub mod controller;
pub mod filters;
pub mod upload;
pub mod ui;

#[cfg(test)]
pub(crate) mod fakes;
