//! Vector-graphics overlay commands.
//!
//! Each command is a one-byte tag followed by a fixed number of `f32`s. The count is
//! not on the wire; the viewer derives it from the tag, so [`VgKind::payload_len`] is
//! part of the protocol and a command always carries exactly that many floats.

use std::fmt;

use crate::error::{FrameError, Result};

/// Largest payload any command carries (rounded rect with four radii).
pub const MAX_VG_PAYLOAD: usize = 8;

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VgKind {
    Save = 0,
    Restore = 1,
    FillColor = 2,
    Fill = 3,
    StrokeColor = 4,
    Stroke = 5,
    BeginPath = 6,
    ClosePath = 7,
    PathWinding = 8,
    DebugDumpPathCache = 9,
    MoveTo = 10,
    LineTo = 11,
    ArcTo = 12,
    Arc = 13,
    BezierTo = 14,
    Circle = 15,
    Ellipse = 16,
    QuadTo = 17,
    Rect = 18,
    RoundedRect = 19,
    RoundedRectVarying = 20,
}

impl VgKind {
    /// Every kind in tag order.
    pub const ALL: [VgKind; 21] = [
        VgKind::Save,
        VgKind::Restore,
        VgKind::FillColor,
        VgKind::Fill,
        VgKind::StrokeColor,
        VgKind::Stroke,
        VgKind::BeginPath,
        VgKind::ClosePath,
        VgKind::PathWinding,
        VgKind::DebugDumpPathCache,
        VgKind::MoveTo,
        VgKind::LineTo,
        VgKind::ArcTo,
        VgKind::Arc,
        VgKind::BezierTo,
        VgKind::Circle,
        VgKind::Ellipse,
        VgKind::QuadTo,
        VgKind::Rect,
        VgKind::RoundedRect,
        VgKind::RoundedRectVarying,
    ];

    /// Number of floats following the tag on the wire.
    pub const fn payload_len(self) -> usize {
        match self {
            VgKind::Save
            | VgKind::Restore
            | VgKind::Fill
            | VgKind::Stroke
            | VgKind::BeginPath
            | VgKind::ClosePath
            | VgKind::DebugDumpPathCache => 0,
            VgKind::PathWinding => 1,
            VgKind::MoveTo | VgKind::LineTo => 2,
            VgKind::Circle => 3,
            VgKind::FillColor
            | VgKind::StrokeColor
            | VgKind::Ellipse
            | VgKind::QuadTo
            | VgKind::Rect => 4,
            VgKind::ArcTo | VgKind::RoundedRect => 5,
            VgKind::Arc | VgKind::BezierTo => 6,
            VgKind::RoundedRectVarying => 8,
        }
    }

    pub fn as_i8(self) -> i8 {
        self as i8
    }

    pub fn from_i8(tag: i8) -> Option<Self> {
        usize::try_from(tag)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }
}

/// Path winding direction. Encoded as its integer value in a float slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise = 1,
    Clockwise = 2,
}

impl Winding {
    fn as_f32(self) -> f32 {
        self as i32 as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// One drawing command with its payload stored inline.
#[derive(Clone, Copy, PartialEq)]
pub struct VgCommand {
    kind: VgKind,
    len: u8,
    data: [f32; MAX_VG_PAYLOAD],
}

impl VgCommand {
    /// Build a command from a raw payload, which must hold exactly
    /// `kind.payload_len()` floats.
    pub fn new(kind: VgKind, payload: &[f32]) -> Result<Self> {
        if payload.len() != kind.payload_len() {
            return Err(FrameError::VgPayloadLength {
                kind,
                expected: kind.payload_len(),
                actual: payload.len(),
            });
        }
        let mut data = [0.0; MAX_VG_PAYLOAD];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            kind,
            len: payload.len() as u8,
            data,
        })
    }

    fn fixed<const N: usize>(kind: VgKind, payload: [f32; N]) -> Self {
        const { assert!(N <= MAX_VG_PAYLOAD) };
        debug_assert_eq!(N, kind.payload_len());
        let mut data = [0.0; MAX_VG_PAYLOAD];
        data[..N].copy_from_slice(&payload);
        Self {
            kind,
            len: N as u8,
            data,
        }
    }

    pub fn kind(&self) -> VgKind {
        self.kind
    }

    pub fn payload(&self) -> &[f32] {
        &self.data[..usize::from(self.len)]
    }

    pub fn save() -> Self {
        Self::fixed(VgKind::Save, [])
    }

    pub fn restore() -> Self {
        Self::fixed(VgKind::Restore, [])
    }

    pub fn fill_color(color: Color) -> Self {
        Self::fixed(VgKind::FillColor, color.to_array())
    }

    pub fn fill() -> Self {
        Self::fixed(VgKind::Fill, [])
    }

    pub fn stroke_color(color: Color) -> Self {
        Self::fixed(VgKind::StrokeColor, color.to_array())
    }

    pub fn stroke() -> Self {
        Self::fixed(VgKind::Stroke, [])
    }

    pub fn begin_path() -> Self {
        Self::fixed(VgKind::BeginPath, [])
    }

    pub fn close_path() -> Self {
        Self::fixed(VgKind::ClosePath, [])
    }

    pub fn path_winding(winding: Winding) -> Self {
        Self::fixed(VgKind::PathWinding, [winding.as_f32()])
    }

    pub fn debug_dump_path_cache() -> Self {
        Self::fixed(VgKind::DebugDumpPathCache, [])
    }

    pub fn move_to(p: Pos) -> Self {
        Self::fixed(VgKind::MoveTo, [p.x, p.y])
    }

    pub fn line_to(p: Pos) -> Self {
        Self::fixed(VgKind::LineTo, [p.x, p.y])
    }

    pub fn arc_to(p1: Pos, p2: Pos, radius: f32) -> Self {
        Self::fixed(VgKind::ArcTo, [p1.x, p1.y, p2.x, p2.y, radius])
    }

    /// Angles are in radians.
    pub fn arc(center: Pos, radius: f32, angle_begin: f32, angle_end: f32, winding: Winding) -> Self {
        Self::fixed(
            VgKind::Arc,
            [
                center.x,
                center.y,
                radius,
                angle_begin,
                angle_end,
                winding.as_f32(),
            ],
        )
    }

    pub fn bezier_to(c1: Pos, c2: Pos, p: Pos) -> Self {
        Self::fixed(VgKind::BezierTo, [c1.x, c1.y, c2.x, c2.y, p.x, p.y])
    }

    pub fn circle(center: Pos, radius: f32) -> Self {
        Self::fixed(VgKind::Circle, [center.x, center.y, radius])
    }

    pub fn ellipse(center: Pos, radius: Size) -> Self {
        Self::fixed(
            VgKind::Ellipse,
            [center.x, center.y, radius.width, radius.height],
        )
    }

    pub fn quad_to(c: Pos, p: Pos) -> Self {
        Self::fixed(VgKind::QuadTo, [c.x, c.y, p.x, p.y])
    }

    pub fn rect(p: Pos, size: Size) -> Self {
        Self::fixed(VgKind::Rect, [p.x, p.y, size.width, size.height])
    }

    pub fn rounded_rect(p: Pos, size: Size, radius: f32) -> Self {
        Self::fixed(
            VgKind::RoundedRect,
            [p.x, p.y, size.width, size.height, radius],
        )
    }

    /// Radii in order: top-left, top-right, bottom-right, bottom-left.
    pub fn rounded_rect_varying(p: Pos, size: Size, radii: [f32; 4]) -> Self {
        let [top_left, top_right, bottom_right, bottom_left] = radii;
        Self::fixed(
            VgKind::RoundedRectVarying,
            [
                p.x,
                p.y,
                size.width,
                size.height,
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            ],
        )
    }
}

impl fmt::Debug for VgCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VgCommand")
            .field("kind", &self.kind)
            .field("payload", &self.payload())
            .finish()
    }
}
