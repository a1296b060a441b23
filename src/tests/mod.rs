mod common;
mod core_flow;
