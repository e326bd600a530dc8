pub mod changelog;
pub mod guide;
pub mod member;
pub mod server;
pub mod stats;
