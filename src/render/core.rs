use std::io::Write;

use crate::error::Result;
use crate::input::KeyBindings;
use crate::tree::Mode;
use crate::width::truncate_to_width;

const CURSOR_MARKER: &str = " -> ";
const CURSOR_BLANK: &str = "    ";
const EOL: &str = "\r\n";

/// One visible child: its title and selected flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub title: String,
    pub selected: bool,
}

/// Snapshot of engine state for one render pass.
///
/// Composition is a pure function of this struct; the engine builds a view
/// and hands it to the renderer, which only writes to the sink.
#[derive(Debug, Clone)]
pub struct MenuView {
    /// Title of the node whose children are on screen.
    pub title: String,
    /// Selection mode of that node; markers are suppressed under `Simple`.
    pub mode: Mode,
    /// The full child list in display order.
    pub entries: Vec<ViewEntry>,
    /// Absolute cursor index into `entries`.
    pub cursor: usize,
    /// First visible entry index.
    pub offset: usize,
    /// Window capacity in rows; short frames are padded with blank lines.
    pub height: usize,
    /// Info text of the entry under the cursor, if one exists.
    pub info: Option<String>,
    pub keys: KeyBindings,
}

/// Renderer runtime parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    pub max_title_width: usize,
    pub max_info_width: usize,
    pub show_key_bindings: bool,
    /// Hash each composed frame and skip the write when nothing changed.
    /// Off by default: a handled `select` with no action still re-renders.
    pub skip_unchanged: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            max_title_width: 74,
            max_info_width: 78,
            show_key_bindings: true,
            skip_unchanged: false,
        }
    }
}

/// Plain-text menu renderer for character displays.
pub struct MenuRenderer {
    settings: RendererSettings,
    last_hash: Option<blake3::Hash>,
}

impl MenuRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            last_hash: None,
        }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Compose `view` and write it to `writer`. Returns `false` when the
    /// frame was deduplicated away under `skip_unchanged`.
    pub fn render(&mut self, writer: &mut impl Write, view: &MenuView) -> Result<bool> {
        let frame = compose(view, &self.settings);

        if self.settings.skip_unchanged {
            let hash = blake3::hash(frame.as_bytes());
            if self.last_hash == Some(hash) {
                return Ok(false);
            }
            self.last_hash = Some(hash);
        }

        writer.write_all(frame.as_bytes())?;
        writer.flush()?;
        Ok(true)
    }
}

/// Build the full menu screen: blank line, title, blank line, frame rows
/// padded to `height`, blank line, info line, key-bindings banner.
fn compose(view: &MenuView, settings: &RendererSettings) -> String {
    let mut out = String::new();

    out.push_str(EOL);
    out.push_str(&truncate_to_width(&view.title, settings.max_title_width));
    out.push_str(EOL);
    out.push_str(EOL);

    let end = usize::min(view.offset + view.height, view.entries.len());
    for index in view.offset..end {
        let entry = &view.entries[index];
        out.push_str(if index == view.cursor {
            CURSOR_MARKER
        } else {
            CURSOR_BLANK
        });
        if view.mode != Mode::Simple {
            out.push_str(if entry.selected { "[*] " } else { "[ ] " });
        }
        out.push_str(&format!(
            "{:>2}. {}",
            index + 1,
            truncate_to_width(&entry.title, settings.max_title_width)
        ));
        out.push_str(EOL);
    }
    for _ in end.saturating_sub(view.offset)..view.height {
        out.push_str(EOL);
    }

    out.push_str(EOL);
    match &view.info {
        Some(info) => {
            out.push_str(&format!(
                "< {} >",
                truncate_to_width(info, settings.max_info_width)
            ));
            out.push_str(EOL);
        }
        None => out.push_str(EOL),
    }

    if settings.show_key_bindings {
        out.push_str(&format!(
            "KEY BINDINGS => UP:[{}]  DOWN:[{}]  SELECT:[{}]  BACK:[{}]  HOME:[{}]",
            view.keys.up, view.keys.down, view.keys.select, view.keys.back, view.keys.home
        ));
        out.push_str(EOL);
    }

    out
}
