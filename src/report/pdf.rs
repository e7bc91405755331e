// src/report/pdf.rs
// =============================================================================
// Writes the text report as a one-column monospaced PDF.
//
// Layout (A4, millimetres from the top-left corner):
// - Optional profile picture at (15, 15), 35 x 35
// - Body text from y = 60, 9 pt, 5 mm per line, wrapped to the page width
// - New page when the next line would cross the 20 mm bottom margin
// - Italic footer near the bottom of the last page
//
// Font: DejaVuSansMono.ttf from the working directory when present, which can
// draw the box characters of the table. Without it we use the built-in
// Courier, which only covers ASCII, so the text is reduced to ASCII first.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use printpdf::image_crate::codecs::{jpeg::JpegDecoder, png::PngDecoder};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference,
};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT_MARGIN: f32 = 15.0;
const BOTTOM_MARGIN: f32 = 20.0;
const TOP_MARGIN: f32 = 10.0;
const BODY_START: f32 = 60.0;
const LINE_HEIGHT: f32 = 5.0;
const FONT_SIZE: f32 = 9.0;
const PICTURE_SIZE: f32 = 35.0;
const PICTURE_TOP: f32 = 15.0;
const FOOTER_FROM_BOTTOM: f32 = 12.0;

// Monospace advance is 0.6 em for Courier and DejaVu Sans Mono alike
const CHAR_WIDTH_MM: f32 = FONT_SIZE * 0.6 * 25.4 / 72.0;

pub const FOOTER: &str = "Generated by ig-osint";
pub const MONO_FONT_FILE: &str = "DejaVuSansMono.ttf";

// Optional inputs for the PDF layout
#[derive(Debug, Default, Clone)]
pub struct PdfAssets {
    pub font: Option<PathBuf>,
    pub profile_pic: Option<PathBuf>,
}

impl PdfAssets {
    // Picks up DejaVuSansMono.ttf from `font_dir` and a profile picture from
    // the profile's download folder, when either exists
    pub fn discover(font_dir: &Path, downloads: &Path) -> Self {
        let font = font_dir.join(MONO_FONT_FILE);
        Self {
            font: font.is_file().then_some(font),
            profile_pic: find_profile_picture(downloads),
        }
    }
}

// First file whose name mentions "profile" and looks like an image
pub fn find_profile_picture(folder: &Path) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(folder)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    entries.into_iter().find(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        name.contains("profile")
            && [".jpg", ".jpeg", ".png"].iter().any(|ext| name.ends_with(ext))
    })
}

pub fn write_pdf(text: &str, title: &str, assets: &PdfAssets, path: &Path) -> Result<()> {
    let (doc, page, layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let mut layer = doc.get_page(page).get_layer(layer);

    let (font, text) = match load_font(&doc, assets.font.as_deref()) {
        Some(font) => (font, remove_emojis(text)),
        None => {
            let font = doc
                .add_builtin_font(BuiltinFont::Courier)
                .map_err(pdf_error)?;
            (font, to_ascii(&remove_emojis(text)))
        }
    };

    if let Some(picture) = &assets.profile_pic {
        // A broken picture shouldn't cost us the whole report
        if let Err(e) = place_picture(&layer, picture) {
            warn!(path = %picture.display(), error = %e, "skipping profile picture");
        }
    }

    let max_chars = ((PAGE_WIDTH - 2.0 * LEFT_MARGIN) / CHAR_WIDTH_MM) as usize;
    let mut y = BODY_START;

    for line in text.lines().flat_map(|line| wrap(line, max_chars)) {
        y += LINE_HEIGHT;
        if y > PAGE_HEIGHT - BOTTOM_MARGIN {
            let (page, new_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(new_layer);
            y = TOP_MARGIN + LINE_HEIGHT;
        }
        layer.use_text(line, FONT_SIZE, Mm(LEFT_MARGIN), Mm(PAGE_HEIGHT - y), &font);
    }

    let footer_font = doc
        .add_builtin_font(BuiltinFont::CourierOblique)
        .map_err(pdf_error)?;
    let footer_x = (PAGE_WIDTH - FOOTER.len() as f32 * CHAR_WIDTH_MM) / 2.0;
    layer.use_text(
        FOOTER,
        FONT_SIZE,
        Mm(footer_x),
        Mm(FOOTER_FROM_BOTTOM),
        &footer_font,
    );

    let file = File::create(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;
    doc.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
    Ok(())
}

fn load_font(doc: &PdfDocumentReference, path: Option<&Path>) -> Option<IndirectFontRef> {
    let path = path?;
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open font, using Courier");
            return None;
        }
    };
    match doc.add_external_font(file) {
        Ok(font) => {
            debug!(path = %path.display(), "embedded monospace font");
            Some(font)
        }
        Err(e) => {
            warn!(path = %path.display(), error = ?e, "cannot load font, using Courier");
            None
        }
    }
}

fn place_picture(layer: &PdfLayerReference, path: &Path) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);
    let is_png = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    let image = if is_png {
        Image::try_from(PngDecoder::new(reader)?)?
    } else {
        Image::try_from(JpegDecoder::new(reader)?)?
    };

    // Native size at the default 300 dpi, scaled to a 35 mm square
    let dpi = 300.0;
    let native_w = image.image.width.0 as f32 / dpi * 25.4;
    let native_h = image.image.height.0 as f32 / dpi * 25.4;
    if native_w <= 0.0 || native_h <= 0.0 {
        return Err(anyhow!("image has no pixels"));
    }

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(LEFT_MARGIN)),
            translate_y: Some(Mm(PAGE_HEIGHT - PICTURE_TOP - PICTURE_SIZE)),
            scale_x: Some(PICTURE_SIZE / native_w),
            scale_y: Some(PICTURE_SIZE / native_h),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    Ok(())
}

// Hard-wraps a line at `width` chars; an empty line stays one empty line
fn wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() || width == 0 {
        return vec![line.to_string()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

fn emoji_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            "[\u{1F600}-\u{1F64F}\u{1F300}-\u{1F5FF}\u{1F680}-\u{1F6FF}\u{1F1E0}-\u{1F1FF}]+",
        )
        .expect("valid regex")
    })
}

pub fn remove_emojis(text: &str) -> String {
    emoji_regex().replace_all(text, "").into_owned()
}

// Built-in PDF fonts only cover ASCII; map what we draw ourselves and
// replace the rest
pub fn to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '╔' | '╦' | '╗' | '╠' | '╬' | '╣' | '╚' | '╩' | '╝' => out.push('+'),
            '═' => out.push('-'),
            '║' => out.push('|'),
            '→' => out.push_str("->"),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn pdf_error(e: printpdf::Error) -> anyhow::Error {
    anyhow!("PDF error: {:?}", e)
}
