use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use reqwest::header::USER_AGENT;
use tokio::io::AsyncWriteExt as _;
use url::Url;

use crate::error::ScrapeError;
use crate::extract::resolve_link;

pub const MAX_WIDTH: u32 = 500;
pub const MAX_HEIGHT: u32 = 500;
pub const JPEG_QUALITY: u8 = 95;
const WRITE_CHUNK_SIZE: usize = 1024;

/// Downloads gallery images into item folders and shrinks them in place.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    origin: Url,
}

impl ImageFetcher {
    pub fn new(origin: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build image http client")?;
        Ok(Self { client, origin })
    }

    /// Saves the image at `dest_dir/file_name` and resizes it.
    ///
    /// Returns `None` when the download fails. A resize failure keeps the
    /// downloaded file as-is and still returns its path.
    pub async fn fetch(&self, image_url: &str, dest_dir: &Path, file_name: &str) -> Option<PathBuf> {
        let path = match self.download(image_url, dest_dir, file_name).await {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(error = %err, "image skipped");
                return None;
            }
        };
        tracing::info!(path = %path.display(), "image saved");

        match resize_image(&path, MAX_WIDTH, MAX_HEIGHT) {
            Ok((width, height)) => {
                tracing::info!(path = %path.display(), width, height, "image resized");
            }
            Err(err) => tracing::warn!(error = %err, "image kept unresized"),
        }
        Some(path)
    }

    async fn download(
        &self,
        image_url: &str,
        dest_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ScrapeError> {
        let download_error = |reason: String| ScrapeError::Download {
            url: image_url.to_owned(),
            reason,
        };

        let url = resolve_link(&self.origin, image_url).map_err(|err| download_error(format!("{err:#}")))?;
        let mut response = self
            .client
            .get(url)
            .header(USER_AGENT, concat!("shopharvest/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|err| download_error(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("HTTP {status}")));
        }

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|err| download_error(format!("create {}: {err}", dest_dir.display())))?;

        let path = dest_dir.join(file_name);
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|err| download_error(format!("create {}: {err}", path.display())))?;

        if let Err(reason) = write_body(&mut response, file, &path).await {
            if let Err(err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %err, "partial image not removed");
            }
            return Err(download_error(reason));
        }

        Ok(path)
    }
}

async fn write_body(
    response: &mut reqwest::Response,
    mut file: tokio::fs::File,
    path: &Path,
) -> Result<(), String> {
    while let Some(chunk) = response.chunk().await.map_err(|err| err.to_string())? {
        for piece in chunk.chunks(WRITE_CHUNK_SIZE) {
            file.write_all(piece)
                .await
                .map_err(|err| format!("write {}: {err}", path.display()))?;
        }
    }
    file.flush()
        .await
        .map_err(|err| format!("flush {}: {err}", path.display()))
}

/// Shrinks the image at `path` to fit the box and rewrites it as JPEG.
/// Returns the final dimensions.
pub fn resize_image(path: &Path, max_width: u32, max_height: u32) -> Result<(u32, u32), ScrapeError> {
    reencode_within(path, max_width, max_height).map_err(|err| ScrapeError::Resize {
        path: path.to_path_buf(),
        reason: format!("{err:#}"),
    })
}

fn reencode_within(path: &Path, max_width: u32, max_height: u32) -> anyhow::Result<(u32, u32)> {
    // Saved files are always named .jpg, so sniff the real format.
    let img = ImageReader::open(path)
        .context("open image")?
        .with_guessed_format()
        .context("detect image format")?
        .decode()
        .context("decode image")?;

    let (width, height) = fit_within(img.width(), img.height(), max_width, max_height);
    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut encoded = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
    rgb.write_with_encoder(encoder).context("encode jpeg")?;

    std::fs::write(path, encoded.into_inner()).context("write resized image")?;
    Ok((width, height))
}

/// Largest size fitting `max_width` x `max_height` with the same aspect
/// ratio. Never upscales.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let scaled = |side: u32, max: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max);
    (scaled(width, max_width), scaled(height, max_height))
}
