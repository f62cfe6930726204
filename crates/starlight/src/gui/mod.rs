pub mod app;
pub mod canvas;
pub mod measure;
pub mod panels;
pub mod theme;
