mod common;
mod service;
mod sessions;
