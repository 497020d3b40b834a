//! HTTP surface and startup tests.

mod chat_tests;
mod jobs_tests;
mod startup_tests;
