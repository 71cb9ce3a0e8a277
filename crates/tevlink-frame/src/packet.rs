//! The packet catalog: one encoder per current packet kind, plus an owned
//! [`Packet`] form that can be decoded back from a [`Frame`].

use tracing::trace;

use crate::codec::Frame;
use crate::error::{FrameError, Result};
use crate::kind::PacketKind;
use crate::layout::{check_wire_u32, required_data_len, ChannelDescriptor, ImageRegion};
use crate::reader::ByteReader;
use crate::vg::{VgCommand, VgKind};
use crate::writer::ByteWriter;

fn wire_count(field: &'static str, count: usize) -> Result<u32> {
    u32::try_from(count)
        .ok()
        .filter(|count| *count <= i32::MAX as u32)
        .ok_or(FrameError::DimensionOutOfRange {
            field,
            value: count as u64,
        })
}

/// Open an image file in the viewer. An empty `channel_selector` means none.
pub fn encode_open_image(path: &str, channel_selector: &str, grab_focus: bool) -> Result<Frame> {
    let mut w = ByteWriter::with_capacity(
        PacketKind::OpenImageWithSelector,
        1 + path.len() + 1 + channel_selector.len() + 1,
    );
    w.put_bool(grab_focus);
    w.put_str("image path", path)?;
    w.put_str("channel selector", channel_selector)?;
    w.finish()
}

pub fn encode_reload_image(name: &str, grab_focus: bool) -> Result<Frame> {
    let mut w = ByteWriter::with_capacity(PacketKind::ReloadImage, 1 + name.len() + 1);
    w.put_bool(grab_focus);
    w.put_str("image name", name)?;
    w.finish()
}

/// Close an image. This packet carries no grab-focus flag.
pub fn encode_close_image(name: &str) -> Result<Frame> {
    let mut w = ByteWriter::with_capacity(PacketKind::CloseImage, name.len() + 1);
    w.put_str("image name", name)?;
    w.finish()
}

/// Dimension and channel-count checks shared by the create encoder and decoder.
fn check_create(width: u32, height: u32, channels: usize) -> Result<u32> {
    if width == 0 || height == 0 {
        return Err(FrameError::EmptyImage { width, height });
    }
    check_wire_u32("image width", width)?;
    check_wire_u32("image height", height)?;
    if channels == 0 {
        return Err(FrameError::NoChannels);
    }
    wire_count("channel count", channels)
}

/// Create an empty `width` x `height` image with the given channels.
pub fn encode_create_image<S: AsRef<str>>(
    name: &str,
    width: u32,
    height: u32,
    channel_names: &[S],
    grab_focus: bool,
) -> Result<Frame> {
    let count = check_create(width, height, channel_names.len())?;

    let mut w = ByteWriter::new(PacketKind::CreateImage);
    w.put_bool(grab_focus);
    w.put_str("image name", name)?;
    w.put(width).put(height).put(count);
    w.put_strs("channel name", channel_names)?;
    w.finish()
}

/// Push pixel data for `region` of an existing image.
///
/// `data` is sent verbatim. It must be exactly as long as the channel layout
/// addresses; see [`required_data_len`].
pub fn encode_update_image(
    name: &str,
    region: ImageRegion,
    channels: &[ChannelDescriptor],
    data: &[f32],
    grab_focus: bool,
) -> Result<Frame> {
    region.validate()?;
    let count = wire_count("channel count", channels.len())?;
    let expected = required_data_len(channels, region.pixel_count())?;
    if data.len() != expected {
        return Err(FrameError::PixelDataSize {
            expected,
            actual: data.len(),
        });
    }

    let names_len: usize = channels.iter().map(|c| c.name.len() + 1).sum();
    let payload = 1
        + name.len()
        + 1
        + 4
        + names_len
        + 4 * 4
        + channels.len() * 16
        + std::mem::size_of_val(data);
    let mut w = ByteWriter::with_capacity(PacketKind::UpdateImageStrided, payload);
    w.put_bool(grab_focus);
    w.put_str("image name", name)?;
    w.put(count);
    for channel in channels {
        w.put_str("channel name", &channel.name)?;
    }
    w.put(region.x).put(region.y).put(region.width).put(region.height);
    for channel in channels {
        w.put(channel.offset);
    }
    for channel in channels {
        w.put(channel.stride);
    }
    w.put_f32_raw(data);

    trace!(
        image = name,
        channels = channels.len(),
        floats = data.len(),
        "encoded strided update"
    );
    w.finish()
}

/// Draw (or replace) the vector-graphics overlay of an image.
pub fn encode_vector_graphics(
    name: &str,
    commands: &[VgCommand],
    append: bool,
    grab_focus: bool,
) -> Result<Frame> {
    let count = wire_count("command count", commands.len())?;

    let floats: usize = commands.iter().map(|c| c.payload().len()).sum();
    let mut w = ByteWriter::with_capacity(
        PacketKind::VectorGraphics,
        1 + name.len() + 1 + 1 + 4 + commands.len() + floats * 4,
    );
    w.put_bool(grab_focus);
    w.put_str("image name", name)?;
    w.put_bool(append);
    w.put(count);
    for command in commands {
        w.put(command.kind().as_i8());
        w.put_seq(command.payload());
    }
    w.finish()
}

/// An owned, decoded form of every packet this crate emits.
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    OpenImage {
        path: String,
        channel_selector: String,
        grab_focus: bool,
    },
    ReloadImage {
        name: String,
        grab_focus: bool,
    },
    CloseImage {
        name: String,
    },
    CreateImage {
        name: String,
        width: u32,
        height: u32,
        channel_names: Vec<String>,
        grab_focus: bool,
    },
    UpdateImage {
        name: String,
        region: ImageRegion,
        channels: Vec<ChannelDescriptor>,
        data: Vec<f32>,
        grab_focus: bool,
    },
    VectorGraphics {
        name: String,
        append: bool,
        commands: Vec<VgCommand>,
        grab_focus: bool,
    },
}

impl Packet {
    /// The tag this packet is encoded under.
    pub fn kind(&self) -> PacketKind {
        match self {
            Packet::OpenImage { .. } => PacketKind::OpenImageWithSelector,
            Packet::ReloadImage { .. } => PacketKind::ReloadImage,
            Packet::CloseImage { .. } => PacketKind::CloseImage,
            Packet::CreateImage { .. } => PacketKind::CreateImage,
            Packet::UpdateImage { .. } => PacketKind::UpdateImageStrided,
            Packet::VectorGraphics { .. } => PacketKind::VectorGraphics,
        }
    }

    /// Name of the image this packet targets (the path, for opens).
    pub fn image_name(&self) -> &str {
        match self {
            Packet::OpenImage { path, .. } => path,
            Packet::ReloadImage { name, .. }
            | Packet::CloseImage { name }
            | Packet::CreateImage { name, .. }
            | Packet::UpdateImage { name, .. }
            | Packet::VectorGraphics { name, .. } => name,
        }
    }

    pub fn encode(&self) -> Result<Frame> {
        match self {
            Packet::OpenImage {
                path,
                channel_selector,
                grab_focus,
            } => encode_open_image(path, channel_selector, *grab_focus),
            Packet::ReloadImage { name, grab_focus } => encode_reload_image(name, *grab_focus),
            Packet::CloseImage { name } => encode_close_image(name),
            Packet::CreateImage {
                name,
                width,
                height,
                channel_names,
                grab_focus,
            } => encode_create_image(name, *width, *height, channel_names, *grab_focus),
            Packet::UpdateImage {
                name,
                region,
                channels,
                data,
                grab_focus,
            } => encode_update_image(name, *region, channels, data, *grab_focus),
            Packet::VectorGraphics {
                name,
                append,
                commands,
                grab_focus,
            } => encode_vector_graphics(name, commands, *append, *grab_focus),
        }
    }

    /// Parse a frame back into a packet.
    ///
    /// Legacy kinds are recognised but rejected with [`FrameError::LegacyPacket`].
    pub fn decode(frame: &Frame) -> Result<Self> {
        let mut r = ByteReader::new(frame.payload());
        let packet = match frame.kind() {
            kind @ (PacketKind::OpenImage
            | PacketKind::UpdateImage
            | PacketKind::UpdateImageMultiChannel) => {
                return Err(FrameError::LegacyPacket(kind));
            }
            PacketKind::OpenImageWithSelector => Packet::OpenImage {
                grab_focus: r.bool()?,
                path: r.str()?.to_string(),
                channel_selector: r.str()?.to_string(),
            },
            PacketKind::ReloadImage => Packet::ReloadImage {
                grab_focus: r.bool()?,
                name: r.str()?.to_string(),
            },
            PacketKind::CloseImage => Packet::CloseImage {
                name: r.str()?.to_string(),
            },
            PacketKind::CreateImage => {
                let grab_focus = r.bool()?;
                let name = r.str()?.to_string();
                let width = r.u32()?;
                let height = r.u32()?;
                let count = r.u32()? as usize;
                check_create(width, height, count)?;
                let channel_names = (0..count)
                    .map(|_| r.str().map(str::to_string))
                    .collect::<Result<Vec<_>>>()?;
                Packet::CreateImage {
                    name,
                    width,
                    height,
                    channel_names,
                    grab_focus,
                }
            }
            PacketKind::UpdateImageStrided => decode_update(&mut r)?,
            PacketKind::VectorGraphics => {
                let grab_focus = r.bool()?;
                let name = r.str()?.to_string();
                let append = r.bool()?;
                let count = r.u32()? as usize;
                let commands = (0..count)
                    .map(|_| {
                        let tag = r.i8()?;
                        let kind = VgKind::from_i8(tag).ok_or(FrameError::UnknownVgCommand(tag))?;
                        let payload = r.f32_seq(kind.payload_len())?;
                        VgCommand::new(kind, &payload)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Packet::VectorGraphics {
                    name,
                    append,
                    commands,
                    grab_focus,
                }
            }
        };
        r.finish()?;
        Ok(packet)
    }
}

fn decode_update(r: &mut ByteReader<'_>) -> Result<Packet> {
    let grab_focus = r.bool()?;
    let name = r.str()?.to_string();
    let count = r.u32()? as usize;
    let names = (0..count)
        .map(|_| r.str().map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    let region = ImageRegion::new(r.u32()?, r.u32()?, r.u32()?, r.u32()?);
    region.validate()?;
    let offsets = r.i64_seq(count)?;
    let strides = r.i64_seq(count)?;
    let channels: Vec<_> = names
        .into_iter()
        .zip(offsets.into_iter().zip(strides))
        .map(|(name, (offset, stride))| ChannelDescriptor::new(name, offset, stride))
        .collect();

    let expected = required_data_len(&channels, region.pixel_count())?;
    let actual = r.remaining() / std::mem::size_of::<f32>();
    if actual != expected {
        return Err(FrameError::PixelDataSize { expected, actual });
    }
    let data = r.f32_seq(expected)?;

    Ok(Packet::UpdateImage {
        name,
        region,
        channels,
        data,
        grab_focus,
    })
}

impl TryFrom<&Frame> for Packet {
    type Error = FrameError;

    fn try_from(frame: &Frame) -> Result<Self> {
        Packet::decode(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_channel_names, interleaved_channels};
    use crate::vg::Pos;

    fn body(frame: &Frame) -> &[u8] {
        frame.payload()
    }

    #[test]
    fn open_image_layout_and_roundtrip() {
        let frame = encode_open_image("a.png", "R", true).unwrap();
        assert_eq!(frame.kind(), PacketKind::OpenImageWithSelector);
        assert_eq!(frame.as_bytes()[4], 7);
        assert_eq!(body(&frame), b"\x01a.png\0R\0");

        let packet = Packet::decode(&frame).unwrap();
        assert_eq!(
            packet,
            Packet::OpenImage {
                path: "a.png".into(),
                channel_selector: "R".into(),
                grab_focus: true,
            }
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode_open_image("a.png", "", false).unwrap();
        let b = encode_open_image("a.png", "", false).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn reload_and_close_layouts() {
        let reload = encode_reload_image("img", false).unwrap();
        assert_eq!(reload.kind(), PacketKind::ReloadImage);
        assert_eq!(body(&reload), b"\x00img\0");

        let close = encode_close_image("img").unwrap();
        assert_eq!(close.kind(), PacketKind::CloseImage);
        assert_eq!(body(&close), b"img\0");
    }

    #[test]
    fn create_image_layout() {
        let frame = encode_create_image("img", 2, 3, &["R", "G", "B"], true).unwrap();
        let mut expected = vec![1u8];
        expected.extend_from_slice(b"img\0");
        expected.extend_from_slice(&2u32.to_ne_bytes());
        expected.extend_from_slice(&3u32.to_ne_bytes());
        expected.extend_from_slice(&3u32.to_ne_bytes());
        expected.extend_from_slice(b"R\0G\0B\0");
        assert_eq!(body(&frame), expected.as_slice());
    }

    #[test]
    fn create_image_argument_errors() {
        assert!(matches!(
            encode_create_image("img", 0, 2, &["R"], false),
            Err(FrameError::EmptyImage { .. })
        ));
        assert!(matches!(
            encode_create_image::<&str>("img", 2, 2, &[], false),
            Err(FrameError::NoChannels)
        ));
        assert!(matches!(
            encode_create_image("img", u32::MAX, 2, &["R"], false),
            Err(FrameError::DimensionOutOfRange { .. })
        ));
    }

    #[test]
    fn five_explicit_channels_are_emitted_in_order() {
        let names = ["a", "b", "c", "d", "e"];
        let frame = encode_create_image("img", 1, 1, &names, false).unwrap();
        match Packet::decode(&frame).unwrap() {
            Packet::CreateImage { channel_names, .. } => assert_eq!(channel_names, names),
            other => panic!("unexpected packet {other:?}"),
        }
    }

    fn rgb_2x2() -> (Vec<ChannelDescriptor>, Vec<f32>) {
        let channels = vec![
            ChannelDescriptor::new("R", 0, 3),
            ChannelDescriptor::new("G", 1, 3),
            ChannelDescriptor::new("B", 2, 3),
        ];
        let data = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2];
        (channels, data)
    }

    #[test]
    fn update_image_sends_pixels_verbatim() {
        let (channels, data) = rgb_2x2();
        let frame =
            encode_update_image("img", ImageRegion::full(2, 2), &channels, &data, false).unwrap();
        assert_eq!(frame.kind(), PacketKind::UpdateImageStrided);

        let tail = &frame.as_bytes()[frame.len() - 48..];
        assert_eq!(tail, bytemuck::cast_slice::<f32, u8>(&data));

        match Packet::decode(&frame).unwrap() {
            Packet::UpdateImage {
                name,
                region,
                channels: decoded,
                data: pixels,
                grab_focus,
            } => {
                assert_eq!(name, "img");
                assert_eq!(region, ImageRegion::new(0, 0, 2, 2));
                assert_eq!(decoded, channels);
                assert_eq!(pixels, data);
                assert!(!grab_focus);
            }
            other => panic!("unexpected packet {other:?}"),
        }
    }

    #[test]
    fn update_image_requires_exact_length() {
        let (channels, mut data) = rgb_2x2();
        data.push(0.0);
        assert!(matches!(
            encode_update_image("img", ImageRegion::full(2, 2), &channels, &data, false),
            Err(FrameError::PixelDataSize {
                expected: 12,
                actual: 13
            })
        ));
        data.truncate(11);
        assert!(matches!(
            encode_update_image("img", ImageRegion::full(2, 2), &channels, &data, false),
            Err(FrameError::PixelDataSize {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn update_image_rejects_negative_stride() {
        let channels = vec![ChannelDescriptor::new("R", 3, -1)];
        assert!(matches!(
            encode_update_image("img", ImageRegion::full(2, 2), &channels, &[0.0; 4], false),
            Err(FrameError::NegativeLayout { .. })
        ));
    }

    #[test]
    fn default_layout_matches_channel_count() {
        for count in 1..=4usize {
            let names = default_channel_names(count).unwrap();
            let channels = interleaved_channels(&names);
            let data = vec![0.5f32; 3 * 2 * count];
            let frame =
                encode_update_image("img", ImageRegion::full(3, 2), &channels, &data, false)
                    .unwrap();
            let Packet::UpdateImage { channels, .. } = Packet::decode(&frame).unwrap() else {
                panic!("expected an update");
            };
            for (i, channel) in channels.iter().enumerate() {
                assert_eq!((channel.offset, channel.stride), (i as i64, count as i64));
            }
        }
    }

    #[test]
    fn vector_graphics_payload_lengths() {
        let commands = [
            VgCommand::begin_path(),
            VgCommand::move_to(Pos::new(0.0, 0.0)),
            VgCommand::line_to(Pos::new(10.0, 10.0)),
            VgCommand::stroke(),
        ];
        let frame = encode_vector_graphics("img", &commands, true, false).unwrap();

        let mut r = ByteReader::new(frame.payload());
        assert!(!r.bool().unwrap());
        assert_eq!(r.str().unwrap(), "img");
        assert!(r.bool().unwrap());
        assert_eq!(r.u32().unwrap(), 4);
        let mut lengths = Vec::new();
        for _ in 0..4 {
            let kind = VgKind::from_i8(r.i8().unwrap()).unwrap();
            lengths.push(kind.payload_len());
            r.f32_seq(kind.payload_len()).unwrap();
        }
        r.finish().unwrap();
        assert_eq!(lengths, vec![0, 2, 2, 0]);

        match Packet::decode(&frame).unwrap() {
            Packet::VectorGraphics { commands: back, .. } => assert_eq!(back, commands),
            other => panic!("unexpected packet {other:?}"),
        }
    }

    #[test]
    fn empty_vector_graphics_list() {
        let frame = encode_vector_graphics("img", &[], false, false).unwrap();
        assert_eq!(body(&frame), b"\x00img\0\x00\x00\x00\x00\x00");
    }

    #[test]
    fn interior_nul_in_name_is_an_argument_error() {
        let err = encode_close_image("a\0b").unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn legacy_and_unknown_frames_are_rejected() {
        let mut raw = 6u32.to_ne_bytes().to_vec();
        raw.extend_from_slice(&[PacketKind::OpenImage.as_u8(), 0]);
        let legacy = Frame::from_bytes(raw).unwrap();
        assert!(matches!(
            Packet::decode(&legacy),
            Err(FrameError::LegacyPacket(PacketKind::OpenImage))
        ));

        let mut raw = 14u32.to_ne_bytes().to_vec();
        raw.push(PacketKind::VectorGraphics.as_u8());
        raw.extend_from_slice(b"\x00i\0\x00");
        raw.extend_from_slice(&1u32.to_ne_bytes());
        raw.push(99);
        let frame = Frame::from_bytes(raw).unwrap();
        assert!(matches!(
            Packet::decode(&frame),
            Err(FrameError::UnknownVgCommand(99))
        ));
    }

    #[test]
    fn decode_rejects_what_encode_rejects() {
        let mut payload = b"\x00img\0".to_vec();
        payload.extend_from_slice(&1u32.to_ne_bytes());
        payload.extend_from_slice(b"R\0");
        for field in [0u32, 0, 0, 0] {
            payload.extend_from_slice(&field.to_ne_bytes());
        }
        payload.extend_from_slice(&0i64.to_ne_bytes());
        payload.extend_from_slice(&1i64.to_ne_bytes());
        payload.extend_from_slice(&0.5f32.to_ne_bytes());
        let empty_region = framed(PacketKind::UpdateImageStrided, &payload);
        assert!(matches!(
            Packet::decode(&empty_region),
            Err(FrameError::EmptyImage {
                width: 0,
                height: 0
            })
        ));

        let mut payload = b"\x00img\0".to_vec();
        for field in [4u32, 0, 1] {
            payload.extend_from_slice(&field.to_ne_bytes());
        }
        payload.extend_from_slice(b"R\0");
        let zero_height = framed(PacketKind::CreateImage, &payload);
        assert!(matches!(
            Packet::decode(&zero_height),
            Err(FrameError::EmptyImage {
                width: 4,
                height: 0
            })
        ));

        let mut payload = b"\x00img\0".to_vec();
        for field in [4u32, 4, 0] {
            payload.extend_from_slice(&field.to_ne_bytes());
        }
        let no_channels = framed(PacketKind::CreateImage, &payload);
        assert!(matches!(
            Packet::decode(&no_channels),
            Err(FrameError::NoChannels)
        ));
    }

    fn framed(kind: PacketKind, payload: &[u8]) -> Frame {
        let len = (5 + payload.len()) as u32;
        let mut raw = len.to_ne_bytes().to_vec();
        raw.push(kind.as_u8());
        raw.extend_from_slice(payload);
        Frame::from_bytes(raw).unwrap()
    }

    #[test]
    fn packet_encode_matches_free_functions() {
        let packet = Packet::CreateImage {
            name: "img".into(),
            width: 4,
            height: 4,
            channel_names: vec!["Y".into()],
            grab_focus: false,
        };
        assert_eq!(packet.kind(), PacketKind::CreateImage);
        assert_eq!(packet.image_name(), "img");
        assert_eq!(
            packet.encode().unwrap(),
            encode_create_image("img", 4, 4, &["Y"], false).unwrap()
        );
    }
}
