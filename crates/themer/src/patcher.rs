//! A complete patch run.

use themer_layout::LayoutPatch;
use themer_sarc::SarcArchive;
use tracing::info;

use crate::template::{self, PatchTemplate};
use crate::theme::ThemePack;
use crate::{pipeline, szs, Error, Result, Stage};

/// Default Yaz0 search effort.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 3;

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOptions {
    /// Yaz0 search effort, `0..=9`.
    pub compression_level: u8,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Progress callbacks of a patch run. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait Reporter {
    fn archive_opened(&mut self, archive: &SarcArchive, decompressed_size: usize) {}
    fn template_found(&mut self, template: &PatchTemplate) {}
    fn stage_started(&mut self, stage: Stage) {}
    fn stage_finished(&mut self, stage: Stage) {}
    fn overlay_loaded(&mut self, patch: &LayoutPatch) {}
    fn compatibility_checked(&mut self) {}
    fn repacking(&mut self) {}
    fn compressing(&mut self) {}
    fn compressed(&mut self, size: usize) {}
}

/// A reporter that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {}

/// A patched archive ready to be written.
#[derive(Debug, Clone)]
pub struct PatchOutput {
    pub template: &'static PatchTemplate,
    /// Compressed archive bytes.
    pub data: Vec<u8>,
}

impl PatchOutput {
    /// File name the archive should be written as.
    pub fn file_name(&self) -> &'static str {
        self.template.target_file_name
    }
}

/// Applies theme packs to archives.
#[derive(Debug, Default, Clone)]
pub struct ThemePatcher {
    options: PatchOptions,
}

impl ThemePatcher {
    pub fn new(options: PatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    /// Patch `target` with the theme pack `theme`.
    ///
    /// Both inputs may be Yaz0 compressed or raw SARC. Stages run in order
    /// and the first failure aborts the run; nothing is produced unless
    /// every stage succeeded.
    pub fn patch(
        &self,
        theme: &[u8],
        target: &[u8],
        reporter: &mut dyn Reporter,
    ) -> Result<PatchOutput> {
        let theme = ThemePack::from_bytes(theme)?;

        let raw = szs::decompress(target).map_err(|e| Error::InvalidTarget(e.into()))?;
        let mut archive =
            SarcArchive::unpack(&raw).map_err(|e| Error::InvalidTarget(e.into()))?;
        reporter.archive_opened(&archive, raw.len());

        let template = template::detect(&archive).ok_or(Error::NoCompatibleTemplate)?;
        reporter.template_found(template);
        info!(
            template = template.template_name,
            firmware = template.firmware_name,
            output = template.target_file_name,
            "found target"
        );

        reporter.stage_started(Stage::BackgroundLayout);
        pipeline::patch_background(&mut archive, template)?;
        reporter.stage_finished(Stage::BackgroundLayout);

        reporter.stage_started(Stage::Texture);
        pipeline::inject_texture(&mut archive, theme.image(), &template.texture)?;
        reporter.stage_finished(Stage::Texture);

        if let Some(json) = theme.layout() {
            let patch = pipeline::load_overlay(json)?;
            reporter.overlay_loaded(&patch);

            pipeline::check_overlay(&archive, &patch)?;
            reporter.compatibility_checked();

            reporter.stage_started(Stage::Overlay);
            pipeline::apply_overlay(&mut archive, &patch)?;
            reporter.stage_finished(Stage::Overlay);
        }

        reporter.repacking();
        let packed = archive.pack()?;

        reporter.compressing();
        let data = szs::compress(&packed, self.options.compression_level);
        reporter.compressed(data.len());

        Ok(PatchOutput { template, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::template::DEFAULT_TEMPLATES;
    use themer_layout::BflytFile;
    use themer_texture::Bntx;

    /// Records which callbacks ran.
    #[derive(Default)]
    struct Log(Vec<String>);

    impl Reporter for Log {
        fn template_found(&mut self, template: &PatchTemplate) {
            self.0.push(format!("template {}", template.target_file_name));
        }
        fn stage_started(&mut self, stage: Stage) {
            self.0.push(format!("start {stage}"));
        }
        fn stage_finished(&mut self, stage: Stage) {
            self.0.push(format!("done {stage}"));
        }
        fn overlay_loaded(&mut self, patch: &LayoutPatch) {
            self.0.push(format!("overlay {} by {}", patch.patch_name, patch.author_name));
        }
        fn repacking(&mut self) {
            self.0.push("repack".into());
        }
    }

    fn run(theme: &[u8], target: &[u8]) -> (Result<PatchOutput>, Vec<String>) {
        let mut log = Log::default();
        let patcher = ThemePatcher::new(PatchOptions {
            compression_level: 1,
        });
        let result = patcher.patch(theme, target, &mut log);
        (result, log.0)
    }

    #[test]
    fn test_patches_every_template() {
        let theme = fixtures::theme_pack(Some(fixtures::image()), None);
        for template in DEFAULT_TEMPLATES {
            let target = fixtures::target_szs(template);
            let (result, _) = run(&theme, &target);
            let output = result.unwrap();
            assert_eq!(output.file_name(), template.target_file_name);
            assert_eq!(output.template, template);

            let archive = szs::open(&output.data).unwrap();
            let layout = BflytFile::parse(archive.get(template.layout.layout_file).unwrap()).unwrap();
            assert!(layout.find_pane(template.layout.pane_name).is_some());

            let bntx = Bntx::parse(archive.get(template.texture.container_file).unwrap()).unwrap();
            let texture = bntx.texture(template.texture.texture_name).unwrap();
            assert_eq!(texture.width, fixtures::IMAGE_SIZE);
        }
    }

    #[test]
    fn test_stage_order_without_overlay() {
        let theme = fixtures::theme_pack(Some(fixtures::image()), None);
        let (result, log) = run(&theme, &fixtures::target_szs(&DEFAULT_TEMPLATES[2]));
        result.unwrap();
        assert_eq!(
            log,
            [
                "template Entrance.szs",
                "start background layout",
                "done background layout",
                "start texture injection",
                "done texture injection",
                "repack",
            ]
        );
    }

    #[test]
    fn test_unrelated_files_survive() {
        let template = &DEFAULT_TEMPLATES[6];
        let theme = fixtures::theme_pack(Some(fixtures::image()), None);
        let before = fixtures::target_archive(template);
        let (result, _) = run(&theme, &fixtures::target_szs(template));
        let after = szs::open(&result.unwrap().data).unwrap();

        assert_eq!(
            after.names().collect::<Vec<_>>(),
            before.names().collect::<Vec<_>>()
        );
        for file in before.iter() {
            if file.name != template.layout.layout_file && file.name != template.texture.container_file {
                assert_eq!(after.get(&file.name), Some(&file.data[..]), "{}", file.name);
            }
        }
    }

    #[test]
    fn test_missing_image() {
        let theme = fixtures::theme_pack(None, Some(fixtures::MOVE_BACKGROUND));
        let (result, log) = run(&theme, &fixtures::target_szs(&DEFAULT_TEMPLATES[0]));
        assert_eq!(result.unwrap_err().exit_code(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_unknown_target() {
        let theme = fixtures::theme_pack(Some(fixtures::image()), None);
        let mut archive = SarcArchive::new(themer_common::Endian::Little);
        archive.insert("blyt/Unknown.bflyt", vec![0; 8]);
        let target = szs::compress(&archive.pack().unwrap(), 0);

        let (result, log) = run(&theme, &target);
        assert!(matches!(result, Err(Error::NoCompatibleTemplate)));
        assert!(log.is_empty());

        let (result, _) = run(&theme, b"neither yaz0 nor sarc");
        assert_eq!(result.unwrap_err().exit_code(), 2);
    }

    #[test]
    fn test_background_failure_halts() {
        let template = &DEFAULT_TEMPLATES[3];
        let theme = fixtures::theme_pack(Some(fixtures::image()), Some(fixtures::MOVE_BACKGROUND));

        // a patched archive cannot be patched twice
        let (first, _) = run(&fixtures::theme_pack(Some(fixtures::image()), None), &fixtures::target_szs(template));
        let (result, log) = run(&theme, &first.unwrap().data);

        assert_eq!(result.unwrap_err().exit_code(), 3);
        assert_eq!(log.last().map(String::as_str), Some("start background layout"));
    }

    #[test]
    fn test_texture_failure_halts() {
        let theme = fixtures::theme_pack(Some(b"not a dds".to_vec()), Some(fixtures::MOVE_BACKGROUND));
        let (result, log) = run(&theme, &fixtures::target_szs(&DEFAULT_TEMPLATES[0]));
        assert_eq!(result.unwrap_err().exit_code(), 4);
        assert!(!log.iter().any(|l| l.starts_with("overlay") || l == "repack"));
    }

    #[test]
    fn test_overlay_applied() {
        let template = &DEFAULT_TEMPLATES[0];
        let theme = fixtures::theme_pack(Some(fixtures::image()), Some(fixtures::MOVE_BACKGROUND));
        let (result, log) = run(&theme, &fixtures::target_szs(template));
        let output = result.unwrap();

        assert!(log.contains(&"overlay Moved background by tester".to_string()));
        assert!(log.contains(&"done layout patch".to_string()));

        let archive = szs::open(&output.data).unwrap();
        let layout = BflytFile::parse(archive.get(template.layout.layout_file).unwrap()).unwrap();
        let pane = layout.pane(layout.find_pane("exelixBG").unwrap()).unwrap();
        assert_eq!(pane.translation.x, 64.0);
    }

    #[test]
    fn test_empty_overlay() {
        let theme = fixtures::theme_pack(Some(fixtures::image()), Some(r#"{"PatchName": "x", "Files": []}"#));
        let (result, log) = run(&theme, &fixtures::target_szs(&DEFAULT_TEMPLATES[0]));
        assert_eq!(result.unwrap_err().exit_code(), 5);
        assert!(!log.contains(&"repack".to_string()));
    }

    #[test]
    fn test_incompatible_overlay() {
        let json = r#"{"Files": [{"FileName": "blyt/RdtBase.bflyt", "Patches": [
            {"PaneName": "P_NotThere", "Visible": false}
        ]}]}"#;
        let theme = fixtures::theme_pack(Some(fixtures::image()), Some(json));
        let (result, log) = run(&theme, &fixtures::target_szs(&DEFAULT_TEMPLATES[0]));
        assert_eq!(result.unwrap_err().exit_code(), 6);
        assert!(!log.iter().any(|l| l == "start layout patch"));
    }

    #[test]
    fn test_overlay_apply_failure() {
        let edits = [
            // L_BgNml is a plain pane and cannot take vertex colors
            r#"{"PaneName": "L_BgNml", "ColorTL": "000000FF"}"#,
            r#"{"PaneName": "exelixBG", "OriginX": 5}"#,
        ];
        for edit in edits {
            let json = format!(
                r#"{{"Files": [{{"FileName": "blyt/RdtBase.bflyt", "Patches": [{edit}]}}]}}"#
            );
            let theme = fixtures::theme_pack(Some(fixtures::image()), Some(&json));
            let (result, _) = run(&theme, &fixtures::target_szs(&DEFAULT_TEMPLATES[0]));
            assert_eq!(result.unwrap_err().exit_code(), 7, "{edit}");
        }
    }
}
