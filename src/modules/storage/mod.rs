//! Storage module for attachment files
//!
//! Provides a MinIO/S3-compatible storage client for proposal
//! attachment uploads.

mod minio_client;

pub use minio_client::MinIOClient;
