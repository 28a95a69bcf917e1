pub mod admin;
pub mod auth;
pub mod files;
pub mod projects;
pub mod proposals;
pub mod users;
