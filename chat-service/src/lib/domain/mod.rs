pub mod account;
pub mod conversation;
pub mod user;
