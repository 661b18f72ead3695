//! JSON layout patches.
//!
//! A layout patch is an ordered list of per-file pane edits authored by a
//! theme maker and shipped as `layout.json` inside a theme pack:
//!
//! ```json
//! {
//!   "PatchName": "Centered icons",
//!   "AuthorName": "someone",
//!   "Files": [
//!     {
//!       "FileName": "blyt/RdtBase.bflyt",
//!       "Patches": [
//!         { "PaneName": "N_ScrollWindow", "Position": { "X": 0, "Y": -40, "Z": 0 } },
//!         { "PaneName": "P_Bg_00", "Visible": false, "ColorTL": "FF0000FF" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use themer_sarc::SarcArchive;
use tracing::debug;

use crate::pane::{set_picture_color, Corner, Rgba, Vec2, Vec3};
use crate::{BflytFile, Error, Result};

/// A complete layout patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LayoutPatch {
    #[serde(default)]
    pub patch_name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub files: Vec<FilePatch>,
}

/// Edits to one layout file of the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilePatch {
    pub file_name: String,
    #[serde(default)]
    pub patches: Vec<PanePatch>,
}

/// Edits to one pane. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PanePatch {
    pub pane_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_y: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_origin_x: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_origin_y: Option<u8>,
    #[serde(rename = "ColorTL", default, skip_serializing_if = "Option::is_none")]
    pub color_tl: Option<String>,
    #[serde(rename = "ColorTR", default, skip_serializing_if = "Option::is_none")]
    pub color_tr: Option<String>,
    #[serde(rename = "ColorBL", default, skip_serializing_if = "Option::is_none")]
    pub color_bl: Option<String>,
    #[serde(rename = "ColorBR", default, skip_serializing_if = "Option::is_none")]
    pub color_br: Option<String>,
}

impl LayoutPatch {
    /// Parse a layout patch from JSON text.
    ///
    /// A patch without file edits is rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let patch: Self = serde_json::from_str(json)?;
        patch.validate()
    }

    /// Parse a layout patch from raw JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let patch: Self = serde_json::from_slice(data)?;
        patch.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.files.is_empty() {
            return Err(Error::EmptyPatch);
        }
        Ok(self)
    }

    /// Check that every edited file exists in the archive, is a layout and
    /// contains every edited pane.
    pub fn check_compatibility(&self, archive: &SarcArchive) -> Result<()> {
        for file in &self.files {
            let data = archive
                .get(&file.file_name)
                .ok_or_else(|| Error::MissingFile(file.file_name.clone()))?;
            let layout = BflytFile::parse(data)?;

            let panes: HashSet<&str> = layout.pane_names().collect();
            if let Some(missing) = file
                .patches
                .iter()
                .find(|p| !panes.contains(p.pane_name.as_str()))
            {
                return Err(Error::MissingPane(format!(
                    "{} in {}",
                    missing.pane_name, file.file_name
                )));
            }
        }
        Ok(())
    }

    pub fn is_compatible(&self, archive: &SarcArchive) -> bool {
        self.check_compatibility(archive).is_ok()
    }

    /// Apply every file edit in authored order.
    ///
    /// Layouts are edited on parsed copies and written back only once every
    /// edit succeeded; on error the archive is unchanged.
    pub fn apply(&self, archive: &mut SarcArchive) -> Result<()> {
        let mut staged: HashMap<&str, BflytFile> = HashMap::new();
        let mut order = Vec::new();

        for file in &self.files {
            let name = file.file_name.as_str();
            if !staged.contains_key(name) {
                let data = archive
                    .get(name)
                    .ok_or_else(|| Error::MissingFile(name.to_string()))?;
                staged.insert(name, BflytFile::parse(data)?);
                order.push(name);
            }
            if let Some(layout) = staged.get_mut(name) {
                file.apply(layout)?;
            }
        }

        for name in order {
            if let Some(layout) = staged.remove(name) {
                archive.insert(name, layout.to_bytes());
            }
        }

        debug!(files = self.files.len(), patch = %self.patch_name, "applied layout patch");
        Ok(())
    }
}

impl FilePatch {
    /// Apply the pane edits to a parsed layout, in order.
    pub fn apply(&self, layout: &mut BflytFile) -> Result<()> {
        for edit in &self.patches {
            edit.apply(layout)?;
        }
        Ok(())
    }
}

impl PanePatch {
    fn colors(&self) -> Result<Vec<(Corner, Rgba)>> {
        [
            (Corner::TopLeft, &self.color_tl),
            (Corner::TopRight, &self.color_tr),
            (Corner::BottomLeft, &self.color_bl),
            (Corner::BottomRight, &self.color_br),
        ]
        .into_iter()
        .filter_map(|(corner, hex)| hex.as_deref().map(|hex| (corner, hex)))
        .map(|(corner, hex)| Ok((corner, Rgba::from_hex(hex)?)))
        .collect()
    }

    /// Apply this edit to the pane it names.
    pub fn apply(&self, layout: &mut BflytFile) -> Result<()> {
        let index = layout
            .find_pane(&self.pane_name)
            .ok_or_else(|| Error::MissingPane(self.pane_name.clone()))?;

        let colors = self.colors()?;
        if !colors.is_empty() && !layout.sections()[index].is(b"pic1") {
            return Err(Error::NotAPicture(self.pane_name.clone()));
        }

        for (field, value) in [
            ("OriginX", self.origin_x),
            ("OriginY", self.origin_y),
            ("ParentOriginX", self.parent_origin_x),
            ("ParentOriginY", self.parent_origin_y),
        ] {
            if let Some(value) = value.filter(|&v| v > 2) {
                return Err(Error::InvalidOrigin {
                    pane: self.pane_name.clone(),
                    field,
                    value,
                });
            }
        }

        let mut pane = layout.pane(index)?;
        if let Some(position) = self.position {
            pane.translation = position;
        }
        if let Some(rotation) = self.rotation {
            pane.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            pane.scale = scale;
        }
        if let Some(size) = self.size {
            pane.size = size;
        }
        if let Some(visible) = self.visible {
            pane.set_visible(visible);
        }
        if let Some(v) = self.origin_x {
            pane.set_origin_x(v);
        }
        if let Some(v) = self.origin_y {
            pane.set_origin_y(v);
        }
        if let Some(v) = self.parent_origin_x {
            pane.set_parent_origin_x(v);
        }
        if let Some(v) = self.parent_origin_y {
            pane.set_parent_origin_y(v);
        }
        layout.set_pane(index, &pane)?;

        let section = &mut layout.sections_mut()[index];
        for (corner, color) in colors {
            set_picture_color(&mut section.data, corner, color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::pane::picture_color;
    use themer_common::Endian;

    const LAYOUT: &str = "blyt/BgNml.bflyt";

    fn archive() -> SarcArchive {
        let layout =
            fixtures::layout(Endian::Little, &[(b"pic1", "P_Bg_00"), (b"txt1", "T_Title")]);
        let mut archive = SarcArchive::new(Endian::Little);
        archive.insert(LAYOUT, layout.to_bytes());
        archive.insert("timg/__Combined.bntx", vec![0; 16]);
        archive
    }

    fn move_to(x: f32) -> PanePatch {
        PanePatch {
            pane_name: "P_Bg_00".into(),
            position: Some(Vec3 { x, y: 0.0, z: 0.0 }),
            ..Default::default()
        }
    }

    fn file_patch(patches: Vec<PanePatch>) -> LayoutPatch {
        LayoutPatch {
            patch_name: "test".into(),
            author_name: "tester".into(),
            files: vec![FilePatch {
                file_name: LAYOUT.into(),
                patches,
            }],
        }
    }

    fn pane_of(archive: &SarcArchive, name: &str) -> crate::Pane {
        let layout = BflytFile::parse(archive.get(LAYOUT).unwrap()).unwrap();
        layout.pane(layout.find_pane(name).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_json() {
        let patch = LayoutPatch::from_json(
            r#"{
                "PatchName": "Moved",
                "AuthorName": "me",
                "Files": [{
                    "FileName": "blyt/BgNml.bflyt",
                    "Patches": [{
                        "PaneName": "P_Bg_00",
                        "Position": { "X": 1.0, "Y": 2.0, "Z": 0.0 },
                        "Visible": false,
                        "ParentOriginX": 2,
                        "ColorTL": "FF0000FF"
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(patch.patch_name, "Moved");
        let edit = &patch.files[0].patches[0];
        assert_eq!(edit.position, Some(Vec3 { x: 1.0, y: 2.0, z: 0.0 }));
        assert_eq!(edit.visible, Some(false));
        assert_eq!(edit.parent_origin_x, Some(2));
        assert_eq!(edit.color_tl.as_deref(), Some("FF0000FF"));
        assert_eq!(edit.scale, None);
    }

    #[test]
    fn test_rejects_empty_patch() {
        assert!(matches!(
            LayoutPatch::from_json(r#"{ "PatchName": "x", "Files": [] }"#),
            Err(Error::EmptyPatch)
        ));
        assert!(matches!(LayoutPatch::from_slice(b"{}"), Err(Error::EmptyPatch)));
        assert!(matches!(LayoutPatch::from_slice(b"not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_compatibility() {
        let archive = archive();
        assert!(file_patch(vec![move_to(1.0)]).is_compatible(&archive));

        let missing_pane = file_patch(vec![PanePatch {
            pane_name: "P_Nope".into(),
            ..Default::default()
        }]);
        assert!(matches!(
            missing_pane.check_compatibility(&archive),
            Err(Error::MissingPane(_))
        ));

        let mut missing_file = file_patch(vec![move_to(1.0)]);
        missing_file.files[0].file_name = "blyt/Other.bflyt".into();
        assert!(!missing_file.is_compatible(&archive));

        let mut not_layout = file_patch(vec![move_to(1.0)]);
        not_layout.files[0].file_name = "timg/__Combined.bntx".into();
        assert!(!not_layout.is_compatible(&archive));
    }

    #[test]
    fn test_edits_apply_in_order() {
        let mut forward = archive();
        file_patch(vec![move_to(1.0), move_to(2.0)])
            .apply(&mut forward)
            .unwrap();

        let mut reverse = archive();
        file_patch(vec![move_to(2.0), move_to(1.0)])
            .apply(&mut reverse)
            .unwrap();

        assert_eq!(pane_of(&forward, "P_Bg_00").translation.x, 2.0);
        assert_eq!(pane_of(&reverse, "P_Bg_00").translation.x, 1.0);
    }

    #[test]
    fn test_applies_pane_fields() {
        let mut archive = archive();
        file_patch(vec![PanePatch {
            pane_name: "P_Bg_00".into(),
            scale: Some(Vec2 { x: 2.0, y: 0.5 }),
            visible: Some(false),
            origin_x: Some(1),
            color_br: Some("00FF0080".into()),
            ..Default::default()
        }])
        .apply(&mut archive)
        .unwrap();

        let pane = pane_of(&archive, "P_Bg_00");
        assert_eq!(pane.scale, Vec2 { x: 2.0, y: 0.5 });
        assert!(!pane.is_visible());
        assert_eq!(pane.origin_x(), 1);

        let layout = BflytFile::parse(archive.get(LAYOUT).unwrap()).unwrap();
        let section = &layout.sections()[layout.find_pane("P_Bg_00").unwrap()];
        assert_eq!(
            picture_color(&section.data, Corner::BottomRight),
            Some(Rgba([0x00, 0xFF, 0x00, 0x80]))
        );
    }

    #[test]
    fn test_failed_patch_leaves_archive_untouched() {
        let mut archive = archive();
        let before = archive.clone();

        // the second edit colors a text pane
        let patch = file_patch(vec![
            move_to(5.0),
            PanePatch {
                pane_name: "T_Title".into(),
                color_tl: Some("FFFFFFFF".into()),
                ..Default::default()
            },
        ]);
        assert!(matches!(patch.apply(&mut archive), Err(Error::NotAPicture(_))));
        assert_eq!(archive, before);
    }

    #[test]
    fn test_rejects_out_of_range_origin() {
        let mut archive = archive();
        let before = archive.clone();
        let patch = file_patch(vec![PanePatch {
            pane_name: "P_Bg_00".into(),
            origin_x: Some(5),
            ..Default::default()
        }]);
        assert!(matches!(
            patch.apply(&mut archive),
            Err(Error::InvalidOrigin { field: "OriginX", value: 5, .. })
        ));
        assert_eq!(archive, before);
    }

    #[test]
    fn test_invalid_color() {
        let mut archive = archive();
        let patch = file_patch(vec![PanePatch {
            pane_name: "P_Bg_00".into(),
            color_tl: Some("red".into()),
            ..Default::default()
        }]);
        assert!(matches!(patch.apply(&mut archive), Err(Error::InvalidColor(_))));
    }
}
