pub mod health;
pub mod s3;
