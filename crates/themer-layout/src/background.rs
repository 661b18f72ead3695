//! Background pane insertion.

use tracing::debug;

use crate::pane::{picture_section, Vec2};
use crate::{BflytFile, Error, Material, MaterialList, Result, Section, TextureList};

/// Size of the inserted background picture, in layout units.
const SCREEN_SIZE: Vec2 = Vec2 {
    x: 1280.0,
    y: 720.0,
};

/// Parameters of a background patch.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundPatch<'a> {
    /// Name of the inserted picture pane and its material. Its presence marks
    /// a layout as already patched.
    pub pane_name: &'a str,
    /// Texture drawn by the inserted pane.
    pub texture_name: &'a str,
    /// Panes the background is drawn behind. The first one present decides
    /// the insertion point.
    pub target_panes: &'a [&'a str],
    /// Keep the target panes visible instead of hiding them.
    pub keep_target_panes: bool,
}

impl BflytFile {
    /// Texture list of the layout, if it has one.
    pub fn texture_list(&self) -> Result<Option<TextureList>> {
        self.find_section(b"txl1")
            .map(|i| TextureList::parse(&self.sections()[i].data, self.endian()))
            .transpose()
    }

    /// Replace the texture list, creating the section after `lyt1` if needed.
    pub fn set_texture_list(&mut self, textures: &TextureList) -> Result<()> {
        let data = textures.to_data(self.endian())?;
        match self.find_section(b"txl1") {
            Some(i) => self.sections_mut()[i].data = data,
            None => {
                let at = self.find_section(b"lyt1").map_or(0, |i| i + 1);
                self.sections_mut().insert(at, Section::new(b"txl1", data));
            }
        }
        Ok(())
    }

    /// Material list of the layout.
    pub fn materials(&self) -> Result<MaterialList> {
        let index = self
            .find_section(b"mat1")
            .ok_or(Error::MissingSection("mat1"))?;
        MaterialList::parse(&self.sections()[index].data, self.endian())
    }

    pub fn set_materials(&mut self, materials: &MaterialList) -> Result<()> {
        let index = self
            .find_section(b"mat1")
            .ok_or(Error::MissingSection("mat1"))?;
        let data = materials.to_data(self.endian())?;
        self.sections_mut()[index].data = data;
        Ok(())
    }

    /// Insert a full-screen picture pane showing `texture_name` behind the
    /// first of the target panes.
    ///
    /// The layout is left untouched when an error is returned.
    pub fn patch_background(&mut self, patch: &BackgroundPatch<'_>) -> Result<()> {
        if self.find_pane(patch.pane_name).is_some() {
            return Err(Error::AlreadyPatched(patch.pane_name.to_string()));
        }

        let targets: Vec<usize> = patch
            .target_panes
            .iter()
            .filter_map(|name| self.find_pane(name))
            .collect();
        if targets.is_empty() {
            return Err(Error::MissingPane(patch.target_panes.join(", ")));
        }

        let mut textures = self.texture_list()?.unwrap_or_default();
        let texture_index = textures.add(patch.texture_name);
        let texture_index =
            u16::try_from(texture_index).map_err(|_| Error::TooManyEntries("txl1"))?;

        let mut materials = self.materials()?;
        let material_index = materials.push(Material::textured(
            patch.pane_name,
            texture_index,
            self.endian(),
        ))?;

        // every check passed; from here on the edits cannot fail halfway
        self.set_texture_list(&textures)?;
        self.set_materials(&materials)?;

        let mut hidden = Vec::new();
        for name in patch.target_panes {
            if let Some(index) = self.find_pane(name) {
                hidden.push(index);
            }
        }

        let insert_at = hidden.iter().copied().min().unwrap_or_default();
        let endian = self.endian();
        self.sections_mut().insert(
            insert_at,
            picture_section(patch.pane_name, material_index, SCREEN_SIZE, endian),
        );

        if !patch.keep_target_panes {
            for index in hidden {
                let index = if index >= insert_at { index + 1 } else { index };
                let mut pane = self.pane(index)?;
                pane.set_visible(false);
                self.set_pane(index, &pane)?;
            }
        }

        debug!(
            pane = patch.pane_name,
            texture = patch.texture_name,
            material = material_index,
            at = insert_at,
            "inserted background pane"
        );
        Ok(())
    }

    /// Rename an entry of the texture list, keeping its index.
    pub fn rename_texture(&mut self, from: &str, to: &str) -> Result<()> {
        let mut textures = self
            .texture_list()?
            .ok_or_else(|| Error::MissingTexture(from.to_string()))?;
        textures.rename(from, to)?;
        self.set_texture_list(&textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use themer_common::Endian;

    const PATCH: BackgroundPatch<'static> = BackgroundPatch {
        pane_name: "exelixBG",
        texture_name: "White1x1A128^s",
        target_panes: &["L_BgNml", "P_Bg_00"],
        keep_target_panes: false,
    };

    #[test]
    fn test_inserts_pane_before_target() {
        let mut layout =
            fixtures::layout(Endian::Little, &[(b"pan1", "N_Main"), (b"pic1", "P_Bg_00")]);
        layout.patch_background(&PATCH).unwrap();

        let bg = layout.find_pane("exelixBG").unwrap();
        let target = layout.find_pane("P_Bg_00").unwrap();
        assert_eq!(bg + 1, target);
        assert!(layout.sections()[bg].is(b"pic1"));
        assert!(!layout.pane(target).unwrap().is_visible());
        assert!(layout.pane(layout.find_pane("N_Main").unwrap()).unwrap().is_visible());

        let textures = layout.texture_list().unwrap().unwrap();
        let materials = layout.materials().unwrap();
        let material = materials.index_of("exelixBG").unwrap();
        let maps = materials.iter().nth(material).unwrap().texture_maps(Endian::Little).unwrap();
        assert_eq!(textures.names()[maps[0] as usize], "White1x1A128^s");
    }

    #[test]
    fn test_patched_layout_survives_roundtrip() {
        let mut layout = fixtures::layout(Endian::Big, &[(b"pic1", "P_Bg_00")]);
        layout.patch_background(&PATCH).unwrap();
        let parsed = BflytFile::parse(&layout.to_bytes()).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn test_keep_target_panes() {
        let mut layout = fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00")]);
        layout
            .patch_background(&BackgroundPatch {
                keep_target_panes: true,
                ..PATCH
            })
            .unwrap();
        let target = layout.find_pane("P_Bg_00").unwrap();
        assert!(layout.pane(target).unwrap().is_visible());
    }

    #[test]
    fn test_rejects_already_patched() {
        let mut layout = fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00")]);
        layout.patch_background(&PATCH).unwrap();
        let before = layout.clone();
        assert!(matches!(
            layout.patch_background(&PATCH),
            Err(Error::AlreadyPatched(_))
        ));
        assert_eq!(layout, before);
    }

    #[test]
    fn test_missing_target_leaves_layout_untouched() {
        let mut layout = fixtures::layout(Endian::Little, &[(b"pan1", "N_Other")]);
        let before = layout.clone();
        assert!(matches!(
            layout.patch_background(&PATCH),
            Err(Error::MissingPane(_))
        ));
        assert_eq!(layout, before);
    }

    #[test]
    fn test_missing_materials() {
        let mut layout = fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00")]);
        layout.sections_mut().retain(|s| !s.is(b"mat1"));
        assert!(matches!(
            layout.patch_background(&PATCH),
            Err(Error::MissingSection("mat1"))
        ));
    }

    #[test]
    fn test_creates_texture_list() {
        let mut layout = fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00")]);
        layout.sections_mut().retain(|s| !s.is(b"txl1"));
        layout.patch_background(&PATCH).unwrap();

        let txl = layout.find_section(b"txl1").unwrap();
        assert!(layout.sections()[txl - 1].is(b"lyt1"));
        assert_eq!(
            layout.texture_list().unwrap().unwrap().names(),
            ["White1x1A128^s"]
        );
    }

    #[test]
    fn test_rename_texture() {
        let mut layout = fixtures::layout(Endian::Little, &[]);
        layout.rename_texture("White1x1^r", "White1x1A128^s").unwrap();
        assert_eq!(
            layout.texture_list().unwrap().unwrap().names(),
            ["White1x1A128^s"]
        );
        assert!(matches!(
            layout.rename_texture("missing", "x"),
            Err(Error::MissingTexture(_))
        ));
    }
}
