//! Static file serving module
//!
//! Resolves request paths under the serving root and builds full or
//! partial-content responses. File bytes are read fresh for every request.

use crate::error::ServeError;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, RangeResolution};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// A regular file under the serving root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: &'static str,
}

/// Serve a file, honoring the request's Range header
pub async fn serve_file(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    let file = match resolve_file(root, ctx.path).await {
        Ok(file) => file,
        Err(e) => return error_response(&e),
    };

    logger::log_file_request(&file.path, file.size, ctx.range_header.as_deref());

    match ctx.range_header.as_deref() {
        Some(range_header) => serve_range(ctx, &file, range_header).await,
        None => serve_full(ctx, &file).await,
    }
}

/// Map a decoded URL path to a regular file below `root`
///
/// `root` must already be canonical. Paths escaping it are reported as not
/// found.
pub async fn resolve_file(root: &Path, path: &str) -> Result<ServedFile, ServeError> {
    let relative = path.trim_start_matches('/');
    let candidate = root.join(relative);

    // Missing files are common (404), no need to log
    let Ok(canonical) = fs::canonicalize(&candidate).await else {
        return Err(ServeError::NotFound);
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            canonical.display()
        ));
        return Err(ServeError::NotFound);
    }

    let metadata = fs::metadata(&canonical)
        .await
        .map_err(|_| ServeError::NotFound)?;
    if !metadata.is_file() {
        return Err(ServeError::NotFound);
    }

    Ok(ServedFile {
        content_type: mime::get_content_type(path),
        path: canonical,
        size: metadata.len(),
    })
}

/// Read exactly `length` bytes starting at `start`, fewer if the file shrank
pub async fn read_range(path: &Path, start: u64, length: u64) -> std::io::Result<Vec<u8>> {
    let mut file = fs::File::open(path).await?;
    file.seek(SeekFrom::Start(start)).await?;

    let mut data = Vec::with_capacity(usize::try_from(length).unwrap_or(0));
    file.take(length).read_to_end(&mut data).await?;
    Ok(data)
}

async fn serve_range(
    ctx: &RequestContext<'_>,
    file: &ServedFile,
    range_header: &str,
) -> Response<Full<Bytes>> {
    let range = match http::resolve_range(range_header, file.size) {
        RangeResolution::Satisfiable(range) => range,
        RangeResolution::NotSatisfiable => {
            logger::log_warning(&format!(
                "Range not satisfiable: '{range_header}' for {} ({} bytes)",
                file.path.display(),
                file.size
            ));
            return http::build_416_response(file.size);
        }
    };

    if ctx.is_head {
        return http::build_partial_response(
            Bytes::new(),
            file.content_type,
            range.length(),
            range,
            file.size,
        );
    }

    match read_range(&file.path, range.start, range.length()).await {
        Ok(data) => {
            let content_length = data.len() as u64;
            if ctx.access_log {
                logger::log_response(206, content_length);
            }
            http::build_partial_response(
                Bytes::from(data),
                file.content_type,
                content_length,
                range,
                file.size,
            )
        }
        Err(e) => error_response(&ServeError::Io(e)),
    }
}

async fn serve_full(ctx: &RequestContext<'_>, file: &ServedFile) -> Response<Full<Bytes>> {
    if ctx.is_head {
        return http::build_full_response(Bytes::new(), file.content_type, file.size);
    }

    match fs::read(&file.path).await {
        Ok(data) => {
            if ctx.access_log {
                logger::log_response(200, file.size);
            }
            http::build_full_response(Bytes::from(data), file.content_type, file.size)
        }
        Err(e) => error_response(&ServeError::Io(e)),
    }
}

fn error_response(error: &ServeError) -> Response<Full<Bytes>> {
    match error {
        ServeError::NotFound => http::build_404_response(),
        ServeError::Io(e) => {
            logger::log_error(&format!("Failed to read file: {e}"));
            http::build_500_response()
        }
    }
}

/// Get the welcome page served at `/`
pub fn get_welcome_page(host: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>HAP Range Download Test Server</title>
</head>
<body>
    <h1>HAP Range Download Test Server</h1>
    <p>&#10004; HTTP Range requests supported</p>
    <p>&#10004; Answers 206 Partial Content for byte ranges</p>

    <h2>Files</h2>
    <ul>
        <li><a href="/hap/AppSigned.hap">HAP package</a></li>
        <li><a href="/hap/manifest-jsdelivr.json5">Manifest</a></li>
    </ul>

    <h2>Try it</h2>
    <pre>
# Whole file
curl -I "http://{host}/hap/AppSigned.hap"

# First kilobyte, expect 206 Partial Content
curl -I -H "Range: bytes=0-1023" "http://{host}/hap/AppSigned.hap"
    </pre>
</body>
</html>
"#
    )
}
