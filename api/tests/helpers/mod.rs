pub mod app;
pub mod ws;

pub use app::{make_test_app, post_json, seed_classroom};
pub use ws::{connect_presenter, next_event, spawn_server};
