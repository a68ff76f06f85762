//! Typed actions parsed from the raw inbound event.
//!
//! The event is an untyped JSON object. It is read exactly once here; after
//! that every handler works with an [`Action`] whose fields are known present.

use ec2ops_common::ActionKind;
use serde_json::{Map, Value};

use crate::domain::error::EventError;
use crate::domain::shell::default_object_key;

/// Upload a file that lives on the instance into a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub instance_id: String,
    /// Path on the instance; relative paths resolve against its working directory.
    pub local_file_path: String,
    pub s3_bucket: String,
    pub s3_key: String,
}

/// Download an object onto the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub instance_id: String,
    pub s3_bucket: String,
    pub s3_key: String,
    pub remote_file_path: String,
}

/// A validated request, one variant per supported action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartInstances { instance_ids: Vec<String> },
    StopInstances { instance_ids: Vec<String> },
    Upload(UploadRequest),
    Download(DownloadRequest),
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::StartInstances { .. } => ActionKind::StartEc2,
            Action::StopInstances { .. } => ActionKind::StopEc2,
            Action::Upload(_) => ActionKind::UploadFile,
            Action::Download(_) => ActionKind::DownloadFile,
        }
    }

    /// Parse and validate an inbound event.
    ///
    /// # Errors
    ///
    /// Returns the [`EventError`] whose text becomes the soft response message.
    pub fn from_event(event: &Value) -> Result<Self, EventError> {
        let Some(fields) = event.as_object() else {
            return Err(EventError::NotAnObject);
        };

        let kind = fields
            .get("action")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<ActionKind>().ok())
            .ok_or(EventError::InvalidAction)?;

        match kind {
            ActionKind::StartEc2 => Ok(Action::StartInstances {
                instance_ids: instance_ids(fields)?,
            }),
            ActionKind::StopEc2 => Ok(Action::StopInstances {
                instance_ids: instance_ids(fields)?,
            }),
            ActionKind::UploadFile => upload(fields).map(Action::Upload),
            ActionKind::DownloadFile => download(fields).map(Action::Download),
        }
    }
}

/// A present, non-empty string field.
fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn instance_ids(fields: &Map<String, Value>) -> Result<Vec<String>, EventError> {
    match fields.get("instance_ids") {
        Some(Value::Array(items)) if items.is_empty() => Err(EventError::MissingInstanceIds),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .ok_or(EventError::InvalidInstanceIds)
            })
            .collect(),
        Some(Value::String(id)) if !id.is_empty() => Ok(vec![id.clone()]),
        Some(Value::String(_)) => Err(EventError::MissingInstanceIds),
        Some(Value::Null) | None => text(fields, "instance_id")
            .map(|id| vec![id.to_string()])
            .ok_or(EventError::MissingInstanceIds),
        Some(_) => Err(EventError::InvalidInstanceIds),
    }
}

fn upload(fields: &Map<String, Value>) -> Result<UploadRequest, EventError> {
    let (Some(instance_id), Some(local_file_path), Some(s3_bucket)) = (
        text(fields, "instance_id"),
        text(fields, "local_file_path"),
        text(fields, "s3_bucket"),
    ) else {
        return Err(EventError::MissingUploadParameters);
    };

    let s3_key = text(fields, "s3_key").unwrap_or_else(|| default_object_key(local_file_path));
    if s3_key.is_empty() {
        return Err(EventError::MissingUploadParameters);
    }

    Ok(UploadRequest {
        instance_id: instance_id.to_string(),
        local_file_path: local_file_path.to_string(),
        s3_bucket: s3_bucket.to_string(),
        s3_key: s3_key.to_string(),
    })
}

fn download(fields: &Map<String, Value>) -> Result<DownloadRequest, EventError> {
    let (Some(instance_id), Some(s3_bucket), Some(s3_key), Some(remote_file_path)) = (
        text(fields, "instance_id"),
        text(fields, "s3_bucket"),
        text(fields, "s3_key"),
        text(fields, "remote_file_path"),
    ) else {
        return Err(EventError::MissingDownloadParameters);
    };

    Ok(DownloadRequest {
        instance_id: instance_id.to_string(),
        s3_bucket: s3_bucket.to_string(),
        s3_key: s3_key.to_string(),
        remote_file_path: remote_file_path.to_string(),
    })
}
