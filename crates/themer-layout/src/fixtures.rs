//! Synthetic layouts for tests.

use themer_common::{BinaryWriter, Endian};

use crate::pane::{picture_section, Pane, Vec2};
use crate::{BflytFile, Material, MaterialList, Section, TextureList};

const VERSION: u32 = 0x0800_0000;

/// Build a small layout: a root pane holding the given panes.
///
/// The layout has one texture (`White1x1^r`) and one material (`P_Frame`).
/// `pic1` panes use that material; other kinds get a bare pane header.
pub fn layout(endian: Endian, panes: &[(&[u8; 4], &str)]) -> BflytFile {
    let mut lyt = BinaryWriter::new(endian);
    lyt.write_u8(1); // centered origin
    lyt.write_bytes(&[0; 3]);
    lyt.write_f32(1280.0);
    lyt.write_f32(720.0);
    lyt.write_f32(0.0);
    lyt.write_f32(0.0);
    lyt.write_cstring("Layout");
    lyt.align(4, 0);

    let textures: TextureList = std::iter::once("White1x1^r".to_string()).collect();
    let mut materials = MaterialList::default();
    materials
        .push(Material::textured("P_Frame", 0, endian))
        .unwrap();

    let screen = Vec2 {
        x: 1280.0,
        y: 720.0,
    };

    let mut sections = vec![
        Section::new(b"lyt1", lyt.into_inner()),
        Section::new(b"txl1", textures.to_data(endian).unwrap()),
        Section::new(b"mat1", materials.to_data(endian).unwrap()),
        Section::new(b"pan1", Pane::new("RootPane", screen).to_bytes(endian)),
        Section::new(b"pas1", Vec::new()),
    ];

    for &(magic, name) in panes {
        let section = if magic == b"pic1" {
            picture_section(name, 0, screen, endian)
        } else {
            Section::new(magic, Pane::new(name, screen).to_bytes(endian))
        };
        sections.push(section);
    }

    sections.push(Section::new(b"pae1", Vec::new()));
    BflytFile::new(endian, VERSION, sections)
}
