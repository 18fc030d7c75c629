//! Object storage for report photos (MinIO/S3-compatible).

mod minio_client;

pub use minio_client::MinIOClient;
