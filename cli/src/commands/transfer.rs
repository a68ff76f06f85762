//! `ec2ops upload` / `ec2ops download`: move files between an instance and a bucket.

use clap::Args;
use ec2ops_common::ActionKind;
use serde_json::{Map, Value, json};

/// Arguments for the upload command.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Instance holding the file
    #[arg(long, short = 'i', value_name = "INSTANCE_ID")]
    pub instance: String,

    /// Destination bucket
    #[arg(long, short = 'b')]
    pub bucket: String,

    /// Object key (defaults to the file name)
    #[arg(long, short = 'k')]
    pub key: Option<String>,

    /// Path on the instance; relative paths resolve against its working directory
    pub local_path: String,
}

/// Arguments for the download command.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Instance receiving the file
    #[arg(long, short = 'i', value_name = "INSTANCE_ID")]
    pub instance: String,

    /// Source bucket
    #[arg(long, short = 'b')]
    pub bucket: String,

    /// Object key
    #[arg(long, short = 'k')]
    pub key: String,

    /// Destination path on the instance
    pub remote_path: String,
}

#[must_use]
pub fn upload_event(args: &UploadArgs) -> Value {
    let mut fields = Map::new();
    fields.insert("action".into(), json!(ActionKind::UploadFile.as_str()));
    fields.insert("instance_id".into(), json!(args.instance));
    fields.insert("local_file_path".into(), json!(args.local_path));
    fields.insert("s3_bucket".into(), json!(args.bucket));
    if let Some(key) = &args.key {
        fields.insert("s3_key".into(), json!(key));
    }
    Value::Object(fields)
}

#[must_use]
pub fn download_event(args: &DownloadArgs) -> Value {
    json!({
        "action": ActionKind::DownloadFile.as_str(),
        "instance_id": args.instance,
        "s3_bucket": args.bucket,
        "s3_key": args.key,
        "remote_file_path": args.remote_path,
    })
}
