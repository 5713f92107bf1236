mod pager_tests;
mod render_tests;
