// ABOUTME: Library side of the storyloom command line tool
// ABOUTME: Application wiring, user notices, paging, table rendering and log setup

pub mod app;
pub mod logging;
pub mod notice;
pub mod pager;
pub mod render;

pub use app::App;
pub use notice::{Notice, NoticeLevel};

#[cfg(test)]
mod tests;
