//! The HTTP surface: routing by path substring, and the upload/download/list
//! handlers. Built on `tiny_http`, a minimal synchronous server — the
//! calling thread blocks in accept/dispatch, matching the single
//! event-loop model the routing and error-handling rules below assume.

use super::range::{resolve_range, RangeOutcome};
use crate::config::StorageConfig;
use crate::log_error;
use crate::logging::Logger;
use crate::storage::{Compressor, FileOps, MetadataStore, StorageInfo};
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Header, Request, Response, Server};

const DEFAULT_LIST_TEMPLATE: &str = "<!doctype html><html><head><title>cratehold</title></head>\
<body><h1>cratehold @ {{BACKEND_URL}}</h1><ul>{{FILE_LIST}}</ul></body></html>";

enum Route {
    Download,
    Upload,
    List,
    NotFound,
}

/// Removes a decompressed deep-tier scratch file when dropped, so it's
/// cleaned up regardless of which reply path `handle_download` takes.
struct ScratchGuard(Option<PathBuf>);

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = fs::remove_file(path);
        }
    }
}

fn route(path: &str) -> Route {
    if path.starts_with("/download/") {
        Route::Download
    } else if path.contains("upload") {
        Route::Upload
    } else if path == "/" {
        Route::List
    } else {
        Route::NotFound
    }
}

pub struct HttpService {
    config: StorageConfig,
    metadata: Arc<MetadataStore>,
    compressor: Arc<dyn Compressor>,
    logger: Arc<Logger>,
}

impl HttpService {
    pub fn new(
        config: StorageConfig,
        metadata: Arc<MetadataStore>,
        compressor: Arc<dyn Compressor>,
        logger: Arc<Logger>,
    ) -> Self {
        HttpService { config, metadata, compressor, logger }
    }

    /// Blocks, accepting and fully handling one request at a time.
    pub fn run(&self, server: &Server) {
        for request in server.incoming_requests() {
            if let Err(err) = self.dispatch(request) {
                log_error!(self.logger, "failed to send response: {err}");
            }
        }
    }

    fn dispatch(&self, request: Request) -> std::io::Result<()> {
        let path = request.url().split('?').next().unwrap_or("").to_string();
        match route(&path) {
            Route::Download => self.handle_download(request, &path),
            Route::Upload => self.handle_upload(request),
            Route::List => self.handle_list(request),
            Route::NotFound => request.respond(Response::from_string("not found").with_status_code(404)),
        }
    }

    fn handle_upload(&self, mut request: Request) -> std::io::Result<()> {
        let filename_b64 = header_value(&request, "FileName");
        let storage_type = header_value(&request, "StorageType");

        let mut body = Vec::new();
        if request.as_reader().read_to_end(&mut body).is_err() || body.is_empty() {
            return request.respond(Response::from_string("empty body").with_status_code(400));
        }

        let (Some(filename_b64), Some(storage_type)) = (filename_b64, storage_type) else {
            return request.respond(Response::from_string("missing headers").with_status_code(400));
        };

        let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(filename_b64) else {
            return request.respond(Response::from_string("bad FileName header").with_status_code(400));
        };
        let Ok(filename) = String::from_utf8(decoded) else {
            return request.respond(Response::from_string("bad FileName header").with_status_code(400));
        };

        let is_deep = match storage_type.as_str() {
            "deep" => true,
            "low" => false,
            _ => {
                return request
                    .respond(Response::from_string("StorageType must be low or deep").with_status_code(400))
            }
        };

        let dir = if is_deep { &self.config.deep_storage_dir } else { &self.config.low_storage_dir };
        if !FileOps::new(dir).create_dir() {
            return request.respond(Response::from_string("storage directory unavailable").with_status_code(500));
        }

        let storage_path = Path::new(dir).join(&filename);
        let ops = FileOps::new(&storage_path);

        let wrote = if is_deep {
            ops.compress(&body, 3, self.compressor.as_ref())
        } else {
            ops.write_all(&body)
        };
        if !wrote {
            log_error!(self.logger, "failed to persist upload {}", storage_path.display());
            return request.respond(Response::from_string("failed to store file").with_status_code(500));
        }

        let info = StorageInfo::new(
            storage_path.to_string_lossy().into_owned(),
            ops.atime(),
            ops.mtime(),
            ops.size(),
            &self.config.download_prefix,
        );
        if self.metadata.insert(&info).is_err() {
            log_error!(self.logger, "failed to record metadata for {}", storage_path.display());
            return request.respond(Response::from_string("failed to record metadata").with_status_code(500));
        }

        request.respond(Response::from_string("Success").with_status_code(200))
    }

    fn handle_download(&self, request: Request, path: &str) -> std::io::Result<()> {
        let Ok(Some(info)) = self.metadata.get_by_url(path) else {
            return request.respond(Response::from_string("unknown url").with_status_code(400));
        };

        let is_deep = info.storage_path.starts_with(&self.config.deep_storage_dir);
        let (serve_path, scratch): (PathBuf, Option<PathBuf>) = if is_deep {
            let scratch_dir = Path::new("./temp_download");
            let _ = fs::create_dir_all(scratch_dir);
            let dest = scratch_dir.join(info.basename());
            let source = FileOps::new(&info.storage_path);
            if !source.decompress(&dest, self.compressor.as_ref()) {
                // Fixed: the original logs this and falls through into the
                // range/ETag code below, which can send a second reply on
                // the same connection. Returning here makes that impossible.
                return request.respond(Response::from_string("file unavailable").with_status_code(400));
            }
            (dest.clone(), Some(dest))
        } else {
            (PathBuf::from(&info.storage_path), None)
        };
        // Removes the decompressed scratch copy, if any, once this function
        // returns by any path — every arm below reads `serve_path` fully
        // into memory (or into the response body) before returning.
        let _scratch_guard = ScratchGuard(scratch);

        if !serve_path.exists() {
            return request.respond(Response::from_string("file unavailable").with_status_code(400));
        }

        let file_size = fs::metadata(&serve_path).map(|m| m.len()).unwrap_or(0);
        let etag = info.etag();
        let range_header = header_value(&request, "Range");
        let if_range_header = header_value(&request, "If-Range");

        let outcome = resolve_range(range_header.as_deref(), if_range_header.as_deref(), file_size, &etag);

        let base_headers = [
            Header::from_bytes(&b"Accept-Ranges"[..], &b"bytes"[..]).unwrap(),
            Header::from_bytes(&b"ETag"[..], etag.as_bytes()).unwrap(),
            Header::from_bytes(
                &b"Content-Disposition"[..],
                format!("attachment; filename=\"{}\"", info.basename()).into_bytes(),
            )
            .unwrap(),
        ];

        match outcome {
            RangeOutcome::Unsatisfiable => {
                let content_range =
                    Header::from_bytes(&b"Content-Range"[..], format!("bytes */{file_size}").into_bytes())
                        .unwrap();
                let response = base_headers.into_iter().chain(std::iter::once(content_range)).fold(
                    Response::from_string("range not satisfiable").with_status_code(416),
                    |r, h| r.with_header(h),
                );
                request.respond(response)
            }
            RangeOutcome::Full => {
                let Some(bytes) = fs::read(&serve_path).ok() else {
                    return request.respond(Response::from_string("read failed").with_status_code(500));
                };
                let response = base_headers
                    .into_iter()
                    .fold(Response::from_data(bytes).with_status_code(200), |r, h| r.with_header(h));
                request.respond(response)
            }
            RangeOutcome::Partial(range) => {
                let Ok(mut file) = fs::File::open(&serve_path) else {
                    return request.respond(Response::from_string("read failed").with_status_code(500));
                };
                let len = (range.end - range.start + 1) as usize;
                let Some(bytes) = FileOps::read_at(&mut file, range.start, len) else {
                    return request.respond(Response::from_string("read failed").with_status_code(500));
                };
                let content_range = Header::from_bytes(
                    &b"Content-Range"[..],
                    format!("bytes {}-{}/{}", range.start, range.end, file_size).into_bytes(),
                )
                .unwrap();
                let response = base_headers.into_iter().chain(std::iter::once(content_range)).fold(
                    Response::from_data(bytes).with_status_code(206),
                    |r, h| r.with_header(h),
                );
                request.respond(response)
            }
        }
    }

    fn handle_list(&self, request: Request) -> std::io::Result<()> {
        let Ok(entries) = self.metadata.get_all() else {
            return request.respond(Response::from_string("metadata unavailable").with_status_code(500));
        };

        let template = fs::read_to_string("./index.html").unwrap_or_else(|_| DEFAULT_LIST_TEMPLATE.to_string());

        let file_list: String = entries
            .iter()
            .map(|info| {
                let tier = if info.storage_path.starts_with(&self.config.deep_storage_dir) {
                    "deep"
                } else {
                    "low"
                };
                let mtime = chrono::DateTime::from_timestamp(info.mtime, 0)
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default();
                format!(
                    "<li>{name} [{tier}] {size} {mtime} <a href=\"{url}\">download</a></li>",
                    name = info.basename(),
                    tier = tier,
                    size = crate::storage::format_size(info.size),
                    mtime = mtime,
                    url = info.url,
                )
            })
            .collect();

        let backend_url = format!("{}:{}", self.config.server_ip, self.config.server_port);
        let body = template.replace("{{FILE_LIST}}", &file_list).replace("{{BACKEND_URL}}", &backend_url);

        let header = Header::from_bytes(&b"Content-Type"[..], &b"text/html;charset=utf-8"[..]).unwrap();
        request.respond(Response::from_string(body).with_status_code(200).with_header(header))
    }
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_path_substring() {
        assert!(matches!(route("/download/a.bin"), Route::Download));
        assert!(matches!(route("/upload"), Route::Upload));
        assert!(matches!(route("/some/upload/path"), Route::Upload));
        assert!(matches!(route("/"), Route::List));
        assert!(matches!(route("/other"), Route::NotFound));
    }
}
