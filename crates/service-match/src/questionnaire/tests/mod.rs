mod bank;
mod common;
