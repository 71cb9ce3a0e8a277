//! Channel layouts and the stride arithmetic that validates pixel buffers.
//!
//! Pixel data travels as one flat `f32` buffer. Channel `c` of pixel `i` (row-major
//! within the update region, x fastest) lives at `offset[c] + i * stride[c]`, both
//! counted in floats. The buffer must be exactly as long as the furthest sample any
//! channel addresses, plus one.

use crate::error::{FrameError, Result};

/// Names used when the caller does not supply any.
pub const DEFAULT_CHANNEL_NAMES: [&str; 4] = ["R", "G", "B", "A"];

/// Where one named channel lives inside a flat float buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelDescriptor {
    pub name: String,
    /// Index of the channel's first sample, in floats.
    pub offset: i64,
    /// Distance between consecutive samples of the channel, in floats.
    pub stride: i64,
}

impl ChannelDescriptor {
    pub fn new(name: impl Into<String>, offset: i64, stride: i64) -> Self {
        Self {
            name: name.into(),
            offset,
            stride,
        }
    }
}

/// A rectangle of an image's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ImageRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Reject empty regions and coordinates the 32-bit signed wire fields cannot carry.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        check_wire_u32("region x", self.x)?;
        check_wire_u32("region y", self.y)?;
        check_wire_u32("region width", self.width)?;
        check_wire_u32("region height", self.height)
    }
}

/// Reject values that do not fit a 32-bit signed wire field.
pub(crate) fn check_wire_u32(field: &'static str, value: u32) -> Result<()> {
    if value > i32::MAX as u32 {
        return Err(FrameError::DimensionOutOfRange {
            field,
            value: u64::from(value),
        });
    }
    Ok(())
}

/// R, G, B, A truncated to `count`.
pub fn default_channel_names(count: usize) -> Result<Vec<String>> {
    match count {
        0 => Err(FrameError::NoChannels),
        1..=4 => Ok(DEFAULT_CHANNEL_NAMES[..count]
            .iter()
            .map(|name| (*name).to_string())
            .collect()),
        _ => Err(FrameError::CannotInferChannels(count)),
    }
}

/// Use `names` if given (it must hold exactly `count` entries), otherwise the defaults.
pub fn resolve_channel_names<S: AsRef<str>>(
    count: usize,
    names: Option<&[S]>,
) -> Result<Vec<String>> {
    if count == 0 {
        return Err(FrameError::NoChannels);
    }
    match names {
        Some(names) if names.len() == count => {
            Ok(names.iter().map(|name| name.as_ref().to_string()).collect())
        }
        Some(names) => Err(FrameError::ChannelNameCount {
            count,
            names: names.len(),
        }),
        None => default_channel_names(count),
    }
}

/// Tightly interleaved layout: channel `i` at offset `i`, every channel strided by
/// the channel count.
pub fn interleaved_channels<S: AsRef<str>>(names: &[S]) -> Vec<ChannelDescriptor> {
    let stride = names.len() as i64;
    names
        .iter()
        .enumerate()
        .map(|(i, name)| ChannelDescriptor::new(name.as_ref(), i as i64, stride))
        .collect()
}

/// Build descriptors from optional parallel arrays.
///
/// Missing names default to R, G, B, A; missing offsets to `0, 1, 2, ...`; missing
/// strides to the channel count. Defaults only exist for up to four channels.
pub fn resolve_channels<S: AsRef<str>>(
    count: usize,
    names: Option<&[S]>,
    offsets: Option<&[i64]>,
    strides: Option<&[i64]>,
) -> Result<Vec<ChannelDescriptor>> {
    if count == 0 {
        return Err(FrameError::NoChannels);
    }
    if count > DEFAULT_CHANNEL_NAMES.len()
        && (names.is_none() || offsets.is_none() || strides.is_none())
    {
        return Err(FrameError::CannotInferChannels(count));
    }

    let lengths = (
        names.map_or(count, <[S]>::len),
        offsets.map_or(count, <[i64]>::len),
        strides.map_or(count, <[i64]>::len),
    );
    if lengths != (count, count, count) {
        return Err(FrameError::ChannelLayoutMismatch {
            count,
            names: lengths.0,
            offsets: lengths.1,
            strides: lengths.2,
        });
    }

    let names = resolve_channel_names(count, names)?;
    let default_stride = count as i64;
    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let offset = offsets.map_or(i as i64, |o| o[i]);
            let stride = strides.map_or(default_stride, |s| s[i]);
            ChannelDescriptor::new(name, offset, stride)
        })
        .collect())
}

/// Number of floats a buffer must hold for `channels` over `pixel_count` pixels:
/// `max over c of offset[c] + (pixel_count - 1) * stride[c] + 1`.
pub fn required_data_len(channels: &[ChannelDescriptor], pixel_count: u64) -> Result<usize> {
    if channels.is_empty() {
        return Err(FrameError::NoChannels);
    }
    let last_pixel = pixel_count.saturating_sub(1);

    let mut required = 0u64;
    for channel in channels {
        if channel.offset < 0 || channel.stride < 0 {
            return Err(FrameError::NegativeLayout {
                channel: channel.name.clone(),
                offset: channel.offset,
                stride: channel.stride,
            });
        }
        let end = (channel.stride as u64)
            .checked_mul(last_pixel)
            .and_then(|span| span.checked_add(channel.offset as u64))
            .and_then(|last| last.checked_add(1))
            .ok_or(FrameError::LayoutOverflow)?;
        required = required.max(end);
    }

    usize::try_from(required).map_err(|_| FrameError::LayoutOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_cover_one_to_four() {
        assert_eq!(default_channel_names(1).unwrap(), vec!["R"]);
        assert_eq!(default_channel_names(2).unwrap(), vec!["R", "G"]);
        assert_eq!(default_channel_names(3).unwrap(), vec!["R", "G", "B"]);
        assert_eq!(default_channel_names(4).unwrap(), vec!["R", "G", "B", "A"]);
        assert!(matches!(
            default_channel_names(0),
            Err(FrameError::NoChannels)
        ));
        assert!(matches!(
            default_channel_names(5),
            Err(FrameError::CannotInferChannels(5))
        ));
    }

    #[test]
    fn explicit_names_must_match_count() {
        assert_eq!(
            resolve_channel_names(2, Some(&["Y", "Z"][..])).unwrap(),
            vec!["Y", "Z"]
        );
        let err = resolve_channel_names(3, Some(&["Y", "Z"][..])).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChannelNameCount { count: 3, names: 2 }
        ));
        assert_eq!(
            err.to_string(),
            "channel count is 3 but 2 channel names were given"
        );
        assert!(err.is_argument_error());
    }

    #[test]
    fn interleaved_layout_uses_index_and_count() {
        for count in 1..=4usize {
            let names = default_channel_names(count).unwrap();
            let channels = interleaved_channels(&names);
            for (i, channel) in channels.iter().enumerate() {
                assert_eq!(channel.offset, i as i64);
                assert_eq!(channel.stride, count as i64);
            }
        }
    }

    #[test]
    fn resolve_channels_fills_defaults() {
        let channels = resolve_channels::<&str>(3, None, None, None).unwrap();
        assert_eq!(
            channels,
            vec![
                ChannelDescriptor::new("R", 0, 3),
                ChannelDescriptor::new("G", 1, 3),
                ChannelDescriptor::new("B", 2, 3),
            ]
        );
    }

    #[test]
    fn resolve_channels_mixes_explicit_and_default() {
        let channels = resolve_channels(2, Some(&["Y", "Z"][..]), Some(&[0, 16][..]), None)
            .unwrap();
        assert_eq!(channels[0], ChannelDescriptor::new("Y", 0, 2));
        assert_eq!(channels[1], ChannelDescriptor::new("Z", 16, 2));
    }

    #[test]
    fn resolve_channels_requires_explicit_layout_above_four() {
        let names = ["a", "b", "c", "d", "e"];
        let err = resolve_channels(5, Some(&names[..]), None, None).unwrap_err();
        assert!(matches!(err, FrameError::CannotInferChannels(5)));

        let offsets = [0, 1, 2, 3, 4];
        let strides = [5; 5];
        let channels =
            resolve_channels(5, Some(&names[..]), Some(&offsets[..]), Some(&strides[..]))
                .unwrap();
        assert_eq!(channels.len(), 5);
        assert_eq!(channels[4], ChannelDescriptor::new("e", 4, 5));
    }

    #[test]
    fn resolve_channels_rejects_length_mismatch() {
        let err = resolve_channels(3, Some(&["R", "G"][..]), None, None).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ChannelLayoutMismatch {
                count: 3,
                names: 2,
                offsets: 3,
                strides: 3
            }
        ));
    }

    #[test]
    fn required_len_interleaved() {
        let channels = interleaved_channels(&["R", "G", "B"]);
        // 2x2 RGB: last B sample is at 2 + 3 * 3 = 11.
        assert_eq!(required_data_len(&channels, 4).unwrap(), 12);
    }

    #[test]
    fn required_len_planar_takes_furthest_channel() {
        let channels = vec![
            ChannelDescriptor::new("R", 0, 1),
            ChannelDescriptor::new("G", 100, 1),
            ChannelDescriptor::new("B", 200, 1),
        ];
        assert_eq!(required_data_len(&channels, 100).unwrap(), 300);
    }

    #[test]
    fn required_len_single_pixel_ignores_stride() {
        let channels = vec![ChannelDescriptor::new("R", 7, 1000)];
        assert_eq!(required_data_len(&channels, 1).unwrap(), 8);
    }

    #[test]
    fn required_len_rejects_negative_and_overflowing_layouts() {
        let negative = vec![ChannelDescriptor::new("R", -1, 1)];
        assert!(matches!(
            required_data_len(&negative, 4),
            Err(FrameError::NegativeLayout { .. })
        ));

        let huge = vec![ChannelDescriptor::new("R", 0, i64::MAX)];
        assert!(matches!(
            required_data_len(&huge, 4),
            Err(FrameError::LayoutOverflow)
        ));
    }

    #[test]
    fn region_validation() {
        assert!(ImageRegion::full(2, 2).validate().is_ok());
        assert!(matches!(
            ImageRegion::new(0, 0, 0, 4).validate(),
            Err(FrameError::EmptyImage {
                width: 0,
                height: 4
            })
        ));
        assert!(matches!(
            ImageRegion::new(u32::MAX, 0, 1, 1).validate(),
            Err(FrameError::DimensionOutOfRange {
                field: "region x",
                ..
            })
        ));
        assert_eq!(ImageRegion::full(3, 5).pixel_count(), 15);
    }
}
