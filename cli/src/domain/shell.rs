//! Shell command construction for commands run on the instance.
//!
//! Pure functions only. Every value that comes from an event is quoted before
//! it is placed into a command line.

use std::borrow::Cow;

/// Prints the working directory of the remote agent's shell.
pub const PWD_COMMAND: &str = "pwd";

/// Quote `value` as a single POSIX shell word.
///
/// Words made only of characters with no shell meaning are returned as-is.
#[must_use]
pub fn quote(value: &str) -> Cow<'_, str> {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./:=@%+,-".contains(c));
    if plain {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}

/// Join `path` onto the remote working directory with POSIX rules.
///
/// An absolute `path` replaces `cwd`.
#[must_use]
pub fn join_remote_path(cwd: &str, path: &str) -> String {
    if path.starts_with('/') || cwd.is_empty() {
        path.to_string()
    } else if cwd.ends_with('/') {
        format!("{cwd}{path}")
    } else {
        format!("{cwd}/{path}")
    }
}

/// Object key used when an upload names none: the final path component.
#[must_use]
pub fn default_object_key(local_path: &str) -> &str {
    local_path
        .rsplit_once('/')
        .map_or(local_path, |(_, name)| name)
}

#[must_use]
pub fn s3_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// `<cli> s3 cp <local> s3://<bucket>/<key>`
#[must_use]
pub fn upload_command(storage_cli: &str, local_path: &str, bucket: &str, key: &str) -> String {
    format!(
        "{storage_cli} s3 cp {} {}",
        quote(local_path),
        quote(&s3_uri(bucket, key))
    )
}

/// `<cli> s3 cp s3://<bucket>/<key> <remote>`
#[must_use]
pub fn download_command(storage_cli: &str, bucket: &str, key: &str, remote_path: &str) -> String {
    format!(
        "{storage_cli} s3 cp {} {}",
        quote(&s3_uri(bucket, key)),
        quote(remote_path)
    )
}
