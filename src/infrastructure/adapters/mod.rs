pub mod console;
pub mod webhook;
