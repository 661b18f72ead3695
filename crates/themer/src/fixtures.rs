//! Synthetic theme packs and target archives for tests.

use themer_common::Endian;
use themer_layout::BflytFile;
use themer_sarc::SarcArchive;
use themer_texture::TextureFormat;

use crate::template::PatchTemplate;
use crate::theme::{IMAGE_ENTRY, LAYOUT_ENTRY};
use crate::szs;

/// Width and height of [`image`].
pub const IMAGE_SIZE: u32 = 64;

/// A layout patch moving the home menu background pane.
pub const MOVE_BACKGROUND: &str = r#"{
    "PatchName": "Moved background",
    "AuthorName": "tester",
    "Files": [
        {
            "FileName": "blyt/RdtBase.bflyt",
            "Patches": [
                { "PaneName": "exelixBG", "Position": { "X": 64, "Y": 0, "Z": 0 } }
            ]
        }
    ]
}"#;

/// A square single-mipmap BC1 image.
pub fn image() -> Vec<u8> {
    themer_texture::fixtures::dds(TextureFormat::Bc1Unorm, IMAGE_SIZE, IMAGE_SIZE, 1)
}

/// A compressed theme pack with the given entries.
pub fn theme_pack(image: Option<Vec<u8>>, layout: Option<&str>) -> Vec<u8> {
    let mut archive = SarcArchive::new(Endian::Little);
    if let Some(image) = image {
        archive.insert(IMAGE_ENTRY, image);
    }
    if let Some(layout) = layout {
        archive.insert(LAYOUT_ENTRY, layout.as_bytes().to_vec());
    }
    archive.insert("info.json", br#"{"Target": "home"}"#.to_vec());
    szs::compress(&archive.pack().unwrap(), 1)
}

fn main_layout(template: &PatchTemplate) -> BflytFile {
    let mut panes: Vec<(&[u8; 4], &str)> = vec![(b"pan1", "N_Header")];
    for name in template.layout.target_panes {
        let magic = if name.starts_with("P_") { b"pic1" } else { b"pan1" };
        panes.push((magic, *name));
    }
    themer_layout::fixtures::layout(Endian::Little, &panes)
}

fn layout_with_texture(texture: &str) -> BflytFile {
    let mut layout = themer_layout::fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00")]);
    let mut textures = layout.texture_list().unwrap().unwrap_or_default();
    textures.add(texture);
    layout.set_texture_list(&textures).unwrap();
    layout
}

/// An unpacked archive the template detects and patches.
///
/// Signature entries get small placeholder contents except layouts the
/// template edits. The texture container holds the template's texture and
/// one unrelated texture.
pub fn target_archive(template: &PatchTemplate) -> SarcArchive {
    let mut archive = SarcArchive::new(Endian::Little);
    for name in template.signature.required {
        let data = if name.ends_with(".bflyt") {
            themer_layout::fixtures::layout(Endian::Little, &[]).to_bytes()
        } else {
            format!("placeholder {name}").into_bytes()
        };
        archive.insert(*name, data);
    }

    archive.insert(template.layout.layout_file, main_layout(template).to_bytes());
    if let Some(secondary) = template.layout.secondary {
        archive.insert(
            secondary.layout_file,
            layout_with_texture(secondary.replaced_texture).to_bytes(),
        );
    }

    let textures = [(template.texture.texture_name, 32, 32), ("Unrelated^t", 16, 16)];
    archive.insert(
        template.texture.container_file,
        themer_texture::fixtures::bntx(Endian::Little, &textures),
    );
    archive.insert("ui/untouched.msbt", b"MsgStdBn and more".to_vec());
    archive
}

/// [`target_archive`], packed and compressed.
pub fn target_szs(template: &PatchTemplate) -> Vec<u8> {
    szs::compress(&target_archive(template).pack().unwrap(), 1)
}
