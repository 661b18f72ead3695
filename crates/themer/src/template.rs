//! Patch templates and template detection.
//!
//! A template names the layout and texture entries a theme replaces in one
//! kind of archive, and the file-name signature that identifies that kind.
//! Detection walks [`DEFAULT_TEMPLATES`] in order and picks the first match,
//! so templates with a more specific signature are listed first.

use themer_layout::BackgroundPatch;
use themer_sarc::SarcArchive;
use tracing::debug;

/// File names that identify an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Entries that must all be present.
    pub required: &'static [&'static str],
    /// Entries that must all be absent.
    pub forbidden: &'static [&'static str],
}

impl Signature {
    pub fn matches(&self, archive: &SarcArchive) -> bool {
        self.required.iter().all(|name| archive.contains(name))
            && !self.forbidden.iter().any(|name| archive.contains(name))
    }

    /// True when every archive this signature matches by its required entries
    /// is also matched by `other`'s, and the two differ.
    pub fn is_stricter_than(&self, other: &Signature) -> bool {
        self.required.len() > other.required.len()
            && other.required.iter().all(|name| self.required.contains(name))
    }
}

/// An extra layout that uses the background texture under another name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryLayout {
    pub layout_file: &'static str,
    /// Texture list entry renamed to the background texture.
    pub replaced_texture: &'static str,
}

/// Where the background pane goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTarget {
    pub layout_file: &'static str,
    /// Name of the inserted pane; its presence marks a patched layout.
    pub pane_name: &'static str,
    pub texture_name: &'static str,
    pub target_panes: &'static [&'static str],
    pub keep_target_panes: bool,
    pub secondary: Option<SecondaryLayout>,
}

/// Which texture the theme image replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSlot {
    pub container_file: &'static str,
    pub texture_name: &'static str,
}

/// A patch profile for one kind of archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchTemplate {
    pub firmware_name: &'static str,
    pub template_name: &'static str,
    /// File name the patched archive is written as.
    pub target_file_name: &'static str,
    pub layout: LayoutTarget,
    pub texture: TextureSlot,
    pub signature: Signature,
}

impl PatchTemplate {
    /// Background patch parameters for the main layout.
    pub fn background_patch(&self) -> BackgroundPatch<'static> {
        BackgroundPatch {
            pane_name: self.layout.pane_name,
            texture_name: self.layout.texture_name,
            target_panes: self.layout.target_panes,
            keep_target_panes: self.layout.keep_target_panes,
        }
    }
}

const COMBINED_TEXTURES: &str = "timg/__Combined.bntx";

const fn combined(texture_name: &'static str) -> TextureSlot {
    TextureSlot {
        container_file: COMBINED_TEXTURES,
        texture_name,
    }
}

const HOME_MENU_LAYOUT: LayoutTarget = LayoutTarget {
    layout_file: "blyt/RdtBase.bflyt",
    pane_name: "exelixBG",
    texture_name: "White1x1A128^s",
    target_panes: &["L_BgNml"],
    keep_target_panes: false,
    secondary: None,
};

const fn applet(pane_name: &'static str) -> LayoutTarget {
    LayoutTarget {
        layout_file: "blyt/BgNml.bflyt",
        pane_name,
        texture_name: "NavBg_03^d",
        target_panes: &["P_Bg_00"],
        keep_target_panes: false,
        secondary: None,
    }
}

/// Built-in templates, in detection priority order.
pub static DEFAULT_TEMPLATES: &[PatchTemplate] = &[
    PatchTemplate {
        firmware_name: ">= 6.0",
        template_name: "home menu",
        target_file_name: "ResidentMenu.szs",
        layout: LayoutTarget {
            secondary: Some(SecondaryLayout {
                layout_file: "blyt/BgNml.bflyt",
                replaced_texture: "White1x1A64^t",
            }),
            ..HOME_MENU_LAYOUT
        },
        texture: combined("White1x1A128^s"),
        signature: Signature {
            required: &[
                "blyt/RdtBase.bflyt",
                "anim/RdtBase_SystemAppletPos.bflan",
                "blyt/RdtIconPromotion.bflyt",
            ],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: "<= 5.X",
        template_name: "home menu",
        target_file_name: "ResidentMenu.szs",
        layout: HOME_MENU_LAYOUT,
        texture: combined("White1x1A128^s"),
        signature: Signature {
            required: &["blyt/RdtBase.bflyt", "anim/RdtBase_SystemAppletPos.bflan"],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: "all firmwares",
        template_name: "lock screen",
        target_file_name: "Entrance.szs",
        layout: LayoutTarget {
            layout_file: "blyt/EntMain.bflyt",
            pane_name: "exelixLK",
            texture_name: "White1x1^s",
            target_panes: &["Bg_00"],
            keep_target_panes: false,
            secondary: None,
        },
        texture: combined("White1x1^s"),
        signature: Signature {
            required: &["blyt/EntMain.bflyt", "blyt/EntBtnResumeSystemApplet.bflyt"],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: "all firmwares",
        template_name: "user page",
        target_file_name: "MyPage.szs",
        layout: LayoutTarget {
            layout_file: "blyt/BgNav_Root.bflyt",
            pane_name: "exelixMY",
            texture_name: "NavBg_03^d",
            target_panes: &["L_AreaNav", "L_AreaMain"],
            keep_target_panes: true,
            secondary: None,
        },
        texture: combined("NavBg_03^d"),
        signature: Signature {
            required: &["blyt/BgNav_Root.bflyt", "blyt/MypUserIconMini.bflyt"],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: ">= 6.0",
        template_name: "all apps menu",
        target_file_name: "Flaunch.szs",
        layout: applet("exelixFL"),
        texture: combined("NavBg_03^d"),
        signature: Signature {
            required: &[
                "blyt/BgNml.bflyt",
                "blyt/FlcBtnIconGame.bflyt",
                "anim/BaseBg_Loading.bflan",
            ],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: "all firmwares",
        template_name: "settings applet",
        target_file_name: "Set.szs",
        layout: applet("exelixSET"),
        texture: combined("NavBg_03^d"),
        signature: Signature {
            required: &[
                "blyt/BgNml.bflyt",
                "blyt/SetCntDataMngPhoto.bflyt",
                "blyt/SetSideStory.bflyt",
            ],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: "all firmwares",
        template_name: "news applet",
        target_file_name: "Notification.szs",
        layout: applet("exelixNEW"),
        texture: combined("NavBg_03^d"),
        signature: Signature {
            required: &["blyt/BgNml.bflyt", "blyt/NtfBase.bflyt", "blyt/NtfImage.bflyt"],
            forbidden: &[],
        },
    },
    PatchTemplate {
        firmware_name: "all firmwares",
        template_name: "player select",
        target_file_name: "Psl.szs",
        layout: LayoutTarget {
            layout_file: "blyt/PslSelectSinglePlayer.bflyt",
            pane_name: "exelixPSL",
            texture_name: "Psl_Bg^s",
            target_panes: &["P_Bg"],
            keep_target_panes: false,
            secondary: None,
        },
        texture: combined("Psl_Bg^s"),
        signature: Signature {
            required: &["blyt/PslSelectSinglePlayer.bflyt"],
            forbidden: &[],
        },
    },
];

/// Pick the built-in template for an archive.
pub fn detect(archive: &SarcArchive) -> Option<&'static PatchTemplate> {
    detect_in(DEFAULT_TEMPLATES, archive)
}

/// Pick the first template of `templates` whose signature matches.
pub fn detect_in<'a>(templates: &'a [PatchTemplate], archive: &SarcArchive) -> Option<&'a PatchTemplate> {
    let found = templates.iter().find(|t| t.signature.matches(archive));
    match found {
        Some(t) => debug!(template = t.template_name, firmware = t.firmware_name, "detected template"),
        None => debug!(files = archive.len(), "no template matched"),
    }
    found
}
