pub mod s3_service;
pub mod storage;

pub use s3_service::S3Service;
