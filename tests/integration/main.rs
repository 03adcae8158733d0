//! Integration tests against mock HTTP servers

mod e2e_test;
mod health_test;
mod stream_test;
