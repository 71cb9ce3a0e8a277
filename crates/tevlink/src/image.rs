//! Synthetic test images and a minimal PFM writer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A tightly interleaved float image.
#[derive(Debug, Clone, PartialEq)]
pub struct TestImage {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub data: Vec<f32>,
}

impl TestImage {
    /// Single-channel checkerboard with 16-pixel squares.
    pub fn checkerboard(width: u32, height: u32) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(if ((x >> 4) ^ (y >> 4)) & 1 == 1 { 1.0 } else { 0.0 });
            }
        }
        Self {
            width,
            height,
            channels: 1,
            data,
        }
    }

    /// RGB image with u in red, v in green and zero blue.
    pub fn uv_gradient(width: u32, height: u32) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                data.push(x as f32 / width as f32);
                data.push(y as f32 / height as f32);
                data.push(0.0);
            }
        }
        Self {
            width,
            height,
            channels: 3,
            data,
        }
    }

    /// Write as PFM: `Pf` for one channel, `PF` for three, little-endian floats.
    pub fn write_pfm(&self, path: &Path) -> io::Result<()> {
        let tag = match self.channels {
            1 => 'f',
            3 => 'F',
            n => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("PFM holds 1 or 3 channels, not {n}"),
                ))
            }
        };
        let mut out = BufWriter::new(File::create(path)?);
        write!(out, "P{tag}\n{} {}\n-1.0\n", self.width, self.height)?;
        for value in &self.data {
            out.write_all(&value.to_le_bytes())?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_squares() {
        let img = TestImage::checkerboard(32, 32);
        assert_eq!(img.data.len(), 32 * 32);
        assert_eq!(img.data[0], 0.0);
        assert_eq!(img.data[16], 1.0);
        assert_eq!(img.data[16 * 32], 1.0);
        assert_eq!(img.data[16 * 32 + 16], 0.0);
    }

    #[test]
    fn gradient_is_interleaved_rgb() {
        let img = TestImage::uv_gradient(4, 2);
        assert_eq!(img.data.len(), 4 * 2 * 3);
        // Pixel (1, 1).
        assert_eq!(&img.data[15..18], &[0.25, 0.5, 0.0]);
        assert_eq!(img.channels, 3);
    }

    #[test]
    fn pfm_header_and_body() {
        let dir = std::env::temp_dir().join(format!("tevlink-pfm-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.pfm");

        TestImage::checkerboard(2, 1).write_pfm(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let header = b"Pf\n2 1\n-1.0\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(bytes.len(), header.len() + 8);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn pfm_rejects_two_channels() {
        let img = TestImage {
            width: 1,
            height: 1,
            channels: 2,
            data: vec![0.0, 0.0],
        };
        let err = img.write_pfm(Path::new("unused.pfm")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
