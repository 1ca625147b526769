pub mod bucket;
pub mod object;
pub mod presign;
pub mod types;

pub use types::*;

pub use bucket::{create_bucket, does_bucket_exist, get_all_buckets};
pub use object::{download_file, upload_file};
pub use presign::{generate_presigned_download_url, generate_presigned_upload_url};
