pub mod admin_handler;
