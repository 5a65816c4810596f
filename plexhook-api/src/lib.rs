pub mod api;
pub mod config;
pub mod decode;
pub mod notifier;
pub mod parts;
pub mod prometheus;
pub mod router;
pub mod server;
pub mod webhook;

#[cfg(test)]
mod test_utils;
