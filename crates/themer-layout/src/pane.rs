//! Pane headers and picture panes.

use serde::{Deserialize, Serialize};
use themer_common::{BinaryReader, BinaryWriter, Endian};

use crate::file::Section;
use crate::{Error, Result};

/// Length of the name field in a pane header.
const NAME_LEN: usize = 0x18;
const USER_INFO_LEN: usize = 8;
const NAME_OFFSET: usize = 4;

/// Offset of the vertex colors in a `pic1` body.
const PICTURE_COLORS: usize = Pane::SIZE;

const FLAG_VISIBLE: u8 = 0x01;

/// A two-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// A three-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// An 8-bit RGBA color as stored in layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Self = Self([0xFF; 4]);

    /// Parse an `RRGGBBAA` hex string.
    pub fn from_hex(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(text.to_string());
        if text.len() != 8 || !text.is_ascii() {
            return Err(invalid());
        }

        let mut out = [0u8; 4];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(out))
    }
}

/// Corner of a picture pane's quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    fn offset(self) -> usize {
        PICTURE_COLORS
            + 4 * match self {
                Self::TopLeft => 0,
                Self::TopRight => 1,
                Self::BottomLeft => 2,
                Self::BottomRight => 3,
            }
    }
}

/// Common header shared by every pane section.
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub flags: u8,
    /// Packed origin: bits 0-1 X, 2-3 Y, 4-5 parent X, 6-7 parent Y.
    pub origin: u8,
    pub alpha: u8,
    pub magnify_flags: u8,
    pub name: String,
    pub user_info: [u8; USER_INFO_LEN],
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec2,
    pub size: Vec2,
}

impl Pane {
    /// Size of the pane header at the start of a pane section body.
    pub const SIZE: usize = 0x4C;

    /// Create a visible, opaque, centered pane.
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        Self {
            flags: FLAG_VISIBLE,
            origin: 0,
            alpha: 0xFF,
            magnify_flags: 0,
            name: name.into(),
            user_info: [0; USER_INFO_LEN],
            translation: Vec3::default(),
            rotation: Vec3::default(),
            scale: Vec2 { x: 1.0, y: 1.0 },
            size,
        }
    }

    /// Read only the name of a pane, without validating the rest.
    pub(crate) fn read_name(data: &[u8]) -> Option<&str> {
        let field = data.get(NAME_OFFSET..NAME_OFFSET + NAME_LEN)?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        std::str::from_utf8(&field[..end]).ok()
    }

    /// Read a pane header from a section body.
    pub fn read(data: &[u8], endian: Endian) -> Result<Self> {
        let mut r = BinaryReader::new(data, endian);
        Ok(Self {
            flags: r.read_u8()?,
            origin: r.read_u8()?,
            alpha: r.read_u8()?,
            magnify_flags: r.read_u8()?,
            name: r.read_string_in_buffer(NAME_LEN)?.to_string(),
            user_info: r.read_array()?,
            translation: Vec3 {
                x: r.read_f32()?,
                y: r.read_f32()?,
                z: r.read_f32()?,
            },
            rotation: Vec3 {
                x: r.read_f32()?,
                y: r.read_f32()?,
                z: r.read_f32()?,
            },
            scale: Vec2 {
                x: r.read_f32()?,
                y: r.read_f32()?,
            },
            size: Vec2 {
                x: r.read_f32()?,
                y: r.read_f32()?,
            },
        })
    }

    /// Serialize the pane header.
    pub fn to_bytes(&self, endian: Endian) -> Vec<u8> {
        let mut w = BinaryWriter::with_capacity(endian, Self::SIZE);
        w.write_u8(self.flags);
        w.write_u8(self.origin);
        w.write_u8(self.alpha);
        w.write_u8(self.magnify_flags);
        w.write_fixed_string(&self.name, NAME_LEN);
        w.write_bytes(&self.user_info);
        for v in [self.translation.x, self.translation.y, self.translation.z] {
            w.write_f32(v);
        }
        for v in [self.rotation.x, self.rotation.y, self.rotation.z] {
            w.write_f32(v);
        }
        for v in [self.scale.x, self.scale.y, self.size.x, self.size.y] {
            w.write_f32(v);
        }
        w.into_inner()
    }

    /// Overwrite the pane header at the start of a section body.
    pub fn write(&self, data: &mut [u8], endian: Endian) -> Result<()> {
        let size = data.len();
        let header = data
            .get_mut(..Self::SIZE)
            .ok_or(themer_common::Error::WriteOutOfBounds {
                offset: 0,
                len: Self::SIZE,
                size,
            })?;
        header.copy_from_slice(&self.to_bytes(endian));
        Ok(())
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.flags & FLAG_VISIBLE != 0
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.flags |= FLAG_VISIBLE;
        } else {
            self.flags &= !FLAG_VISIBLE;
        }
    }

    pub fn origin_x(&self) -> u8 {
        self.origin & 3
    }

    pub fn origin_y(&self) -> u8 {
        (self.origin >> 2) & 3
    }

    pub fn parent_origin_x(&self) -> u8 {
        (self.origin >> 4) & 3
    }

    pub fn parent_origin_y(&self) -> u8 {
        (self.origin >> 6) & 3
    }

    pub fn set_origin_x(&mut self, value: u8) {
        self.set_origin_bits(0, value);
    }

    pub fn set_origin_y(&mut self, value: u8) {
        self.set_origin_bits(2, value);
    }

    pub fn set_parent_origin_x(&mut self, value: u8) {
        self.set_origin_bits(4, value);
    }

    pub fn set_parent_origin_y(&mut self, value: u8) {
        self.set_origin_bits(6, value);
    }

    fn set_origin_bits(&mut self, shift: u8, value: u8) {
        self.origin = (self.origin & !(3 << shift)) | ((value & 3) << shift);
    }
}

/// Read a vertex color of a `pic1` body.
pub fn picture_color(data: &[u8], corner: Corner) -> Option<Rgba> {
    let offset = corner.offset();
    let bytes = data.get(offset..offset + 4)?;
    Some(Rgba([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Overwrite a vertex color of a `pic1` body.
pub fn set_picture_color(data: &mut [u8], corner: Corner, color: Rgba) -> Result<()> {
    let offset = corner.offset();
    let size = data.len();
    data.get_mut(offset..offset + 4)
        .ok_or(themer_common::Error::WriteOutOfBounds {
            offset,
            len: 4,
            size,
        })?
        .copy_from_slice(&color.0);
    Ok(())
}

/// Build a `pic1` section showing one material over the whole pane.
pub fn picture_section(name: &str, material: u16, size: Vec2, endian: Endian) -> Section {
    let mut w = BinaryWriter::with_capacity(endian, 0x80);
    w.write_bytes(&Pane::new(name, size).to_bytes(endian));

    for _ in 0..4 {
        w.write_bytes(&Rgba::WHITE.0);
    }
    w.write_u16(material);
    w.write_u8(1); // texture coordinate sets
    w.write_u8(0);

    // one UV set: top-left, top-right, bottom-left, bottom-right
    for (u, v) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
        w.write_f32(u);
        w.write_f32(v);
    }

    Section::new(b"pic1", w.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_roundtrip() {
        let mut pane = Pane::new("N_Root", Vec2 { x: 640.0, y: 360.0 });
        pane.translation = Vec3 { x: 1.5, y: -2.0, z: 0.0 };
        pane.set_origin_y(2);

        for endian in [Endian::Little, Endian::Big] {
            let bytes = pane.to_bytes(endian);
            assert_eq!(bytes.len(), Pane::SIZE);
            assert_eq!(Pane::read(&bytes, endian).unwrap(), pane);
            assert_eq!(Pane::read_name(&bytes), Some("N_Root"));
        }
    }

    #[test]
    fn test_origin_bits() {
        let mut pane = Pane::new("p", Vec2::default());
        pane.set_origin_x(1);
        pane.set_origin_y(2);
        pane.set_parent_origin_x(3);
        pane.set_parent_origin_y(1);
        assert_eq!(pane.origin, 0b01_11_10_01);
        assert_eq!(
            (pane.origin_x(), pane.origin_y(), pane.parent_origin_x(), pane.parent_origin_y()),
            (1, 2, 3, 1)
        );

        pane.set_origin_y(0);
        assert_eq!(pane.origin_y(), 0);
        assert_eq!(pane.parent_origin_x(), 3);
    }

    #[test]
    fn test_visibility_flag() {
        let mut pane = Pane::new("p", Vec2::default());
        assert!(pane.is_visible());
        pane.set_visible(false);
        assert!(!pane.is_visible());
    }

    #[test]
    fn test_picture_colors() {
        let mut section = picture_section("P_Bg", 3, Vec2 { x: 1280.0, y: 720.0 }, Endian::Little);
        assert_eq!(section.data.len(), 0x80);
        assert_eq!(picture_color(&section.data, Corner::BottomRight), Some(Rgba::WHITE));

        let red = Rgba::from_hex("FF0000FF").unwrap();
        set_picture_color(&mut section.data, Corner::TopRight, red).unwrap();
        assert_eq!(picture_color(&section.data, Corner::TopRight), Some(red));
        assert_eq!(picture_color(&section.data, Corner::TopLeft), Some(Rgba::WHITE));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!(Rgba::from_hex("11223344").unwrap(), Rgba([0x11, 0x22, 0x33, 0x44]));
        assert!(Rgba::from_hex("112233").is_err());
        assert!(Rgba::from_hex("GG223344").is_err());
    }
}
