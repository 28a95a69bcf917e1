pub mod upload_handler;

pub use upload_handler::upload_files;
