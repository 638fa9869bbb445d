pub mod lifecycle;
pub mod service;
pub mod transitions;
