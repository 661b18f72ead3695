//! The mutating stages of a patch run.
//!
//! Each stage edits the target archive in place and either completes or
//! leaves the archive as it found it.

use themer_layout::{BflytFile, LayoutPatch};
use themer_sarc::SarcArchive;
use themer_texture::{Bntx, Dds};
use tracing::debug;

use crate::template::{PatchTemplate, TextureSlot};
use crate::{Error, Result, Stage, StageError};

fn read_layout(archive: &SarcArchive, name: &str) -> std::result::Result<BflytFile, StageError> {
    let data = archive
        .get(name)
        .ok_or_else(|| StageError::MissingFile(name.to_string()))?;
    Ok(BflytFile::parse(data)?)
}

fn background(archive: &SarcArchive, template: &PatchTemplate) -> std::result::Result<Vec<(&'static str, Vec<u8>)>, StageError> {
    let target = &template.layout;

    let mut layout = read_layout(archive, target.layout_file)?;
    layout.patch_background(&template.background_patch())?;
    let mut edited = vec![(target.layout_file, layout.to_bytes())];

    if let Some(secondary) = target.secondary {
        let mut layout = read_layout(archive, secondary.layout_file)?;
        layout.rename_texture(secondary.replaced_texture, target.texture_name)?;
        edited.push((secondary.layout_file, layout.to_bytes()));
    }

    Ok(edited)
}

/// Insert the background pane into the template's layout.
pub fn patch_background(archive: &mut SarcArchive, template: &PatchTemplate) -> Result<()> {
    let edited = background(archive, template).map_err(|e| Error::stage(Stage::BackgroundLayout, e))?;
    for (name, data) in edited {
        archive.insert(name, data);
    }
    debug!(layout = template.layout.layout_file, "patched background layout");
    Ok(())
}

fn texture(archive: &SarcArchive, image: &[u8], slot: &TextureSlot) -> std::result::Result<Vec<u8>, StageError> {
    let dds = Dds::parse(image)?;
    let data = archive
        .get(slot.container_file)
        .ok_or_else(|| StageError::MissingFile(slot.container_file.to_string()))?;

    let mut bntx = Bntx::parse(data)?;
    bntx.replace_texture(slot.texture_name, &dds)?;
    Ok(bntx.into_bytes())
}

/// Replace the template's texture with the theme image.
pub fn inject_texture(archive: &mut SarcArchive, image: &[u8], slot: &TextureSlot) -> Result<()> {
    let data = texture(archive, image, slot).map_err(|e| Error::stage(Stage::Texture, e))?;
    archive.insert(slot.container_file, data);
    debug!(container = slot.container_file, texture = slot.texture_name, "injected texture");
    Ok(())
}

/// Parse a layout patch. Unparseable JSON and patches without edits are
/// both invalid.
pub fn load_overlay(json: &[u8]) -> Result<LayoutPatch> {
    LayoutPatch::from_slice(json).map_err(Error::InvalidOverlay)
}

/// Check a layout patch against the archive.
pub fn check_overlay(archive: &SarcArchive, patch: &LayoutPatch) -> Result<()> {
    patch
        .check_compatibility(archive)
        .map_err(Error::IncompatibleOverlay)
}

/// Apply a layout patch's edits in authored order.
pub fn apply_overlay(archive: &mut SarcArchive, patch: &LayoutPatch) -> Result<()> {
    patch
        .apply(archive)
        .map_err(|e| Error::stage(Stage::Overlay, e))
}
