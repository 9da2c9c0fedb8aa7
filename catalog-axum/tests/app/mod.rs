mod application;

pub use application::{TestApp, seeded_app};
