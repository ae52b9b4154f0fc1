//! Shrink-to-fit text layout.
//!
//! The flashcard contract is that text never escapes its sub-region: a long
//! example sentence must shrink, then wrap, then clip — in that order — but
//! never collide with a neighbouring field or cell. The policy is an
//! explicit measurement loop, a pure function that can be tested without
//! any PDF backend.
//!
//! All geometry in this module is in points. Conversion to millimetres is
//! the renderer's problem.
//!
//! ## Measurement
//!
//! [`TextMeasure`] abstracts "how wide is this string at this size". Two
//! implementations exist: [`TtfMetrics`] reads real glyph advances from an
//! embedded TrueType font, and [`BuiltinMetrics`] approximates the built-in
//! Helvetica with a width table. Approximate widths are fine for the
//! built-in path — it only carries Latin text, and the fit loop always errs
//! on the side of shrinking.

use ttf_parser::Face;

/// Line height as a multiple of the font size.
pub const LINE_SPACING: f32 = 1.2;

/// Width measurement for a single-line string at a given font size (points).
pub trait TextMeasure: Send + Sync {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Glyph-advance measurement backed by a TrueType font.
pub struct TtfMetrics {
    data: Vec<u8>,
}

impl TtfMetrics {
    /// Validate and wrap raw font bytes.
    ///
    /// The face is parsed once here so later lookups cannot fail; parsing
    /// is a zero-copy table-directory read, so re-parsing per measurement
    /// stays cheap.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, String> {
        Face::parse(&data, 0).map_err(|e| e.to_string())?;
        Ok(Self { data })
    }

    fn advance(face: &Face<'_>, ch: char, font_size: f32) -> f32 {
        let units = face.units_per_em() as f32;
        match face
            .glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
        {
            Some(adv) => adv as f32 / units * font_size,
            // No glyph: assume a full em for wide scripts, 0.6 em otherwise.
            None if is_cjk(ch) => font_size,
            None => font_size * 0.6,
        }
    }
}

impl TextMeasure for TtfMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let Ok(face) = Face::parse(&self.data, 0) else {
            // Unreachable after from_bytes validated the data.
            return approx_width(text, font_size);
        };
        text.chars()
            .map(|ch| Self::advance(&face, ch, font_size))
            .sum()
    }
}

/// Approximate Helvetica measurement for the built-in font path.
pub struct BuiltinMetrics;

impl TextMeasure for BuiltinMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        approx_width(text, font_size)
    }
}

/// Approximate Helvetica advance widths at 1000 units/em.
fn approx_width(text: &str, font_size: f32) -> f32 {
    text.chars()
        .map(|ch| {
            let units = match ch {
                ' ' => 278.0,
                'i' | 'j' | 'l' | 'f' | 't' => 278.0,
                'I' | 'J' => 278.0,
                'm' | 'w' => 833.0,
                'M' | 'W' => 889.0,
                '0'..='9' => 556.0,
                'A'..='Z' => 667.0,
                'a'..='z' => 556.0,
                '.' | ',' | ':' | ';' | '\'' | '!' | '|' | '(' | ')' | '[' | ']' => 333.0,
                c if is_cjk(c) => 1000.0,
                _ => 556.0,
            };
            units / 1000.0 * font_size
        })
        .sum()
}

/// CJK codepoints wrap character-by-character; everything else wraps on
/// whitespace.
pub fn is_cjk(ch: char) -> bool {
    matches!(ch as u32,
        0x2E80..=0x9FFF       // radicals, extension A, CJK unified ideographs
        | 0xF900..=0xFAFF     // compatibility ideographs
        | 0xFF00..=0xFFEF     // full-width forms
        | 0x20000..=0x2FA1F   // extensions B+
    )
}

/// The result of fitting text into a box: wrapped lines at a chosen size.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    /// Wrapped lines, top to bottom. Empty for empty input or a box too
    /// small for even one line at the floor size.
    pub lines: Vec<String>,
    /// The chosen font size in points.
    pub font_size: f32,
    /// True when the text had to be cut to stay inside the box.
    pub clipped: bool,
}

impl FittedText {
    /// Total stacked height of the fitted lines in points.
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.font_size * LINE_SPACING
    }
}

/// Fit `text` into a `max_width × max_height` points box.
///
/// Lays the text out at `nominal_size`, wrapping to the box width; if the
/// wrapped block is too tall, retries at progressively smaller sizes (half
/// point steps) down to `floor_size`; if it still does not fit, drops
/// trailing lines so the block stays inside the box. Never fails, never
/// overflows.
pub fn fit_text(
    text: &str,
    max_width: f32,
    max_height: f32,
    nominal_size: f32,
    floor_size: f32,
    metrics: &dyn TextMeasure,
) -> FittedText {
    let text = text.trim();
    if text.is_empty() {
        return FittedText {
            lines: Vec::new(),
            font_size: nominal_size,
            clipped: false,
        };
    }

    let floor_size = floor_size.min(nominal_size);
    let mut size = nominal_size;
    loop {
        let lines = wrap_lines(text, size, max_width, metrics);
        let block_height = lines.len() as f32 * size * LINE_SPACING;
        let widest = lines
            .iter()
            .map(|l| metrics.text_width(l, size))
            .fold(0.0_f32, f32::max);
        if block_height <= max_height && widest <= max_width {
            return FittedText {
                lines,
                font_size: size,
                clipped: false,
            };
        }
        if size <= floor_size + f32::EPSILON {
            // Floor reached: keep what fits vertically, cut the rest.
            let line_height = size * LINE_SPACING;
            let keep = (max_height / line_height).floor() as usize;
            let mut lines = lines;
            lines.truncate(keep);
            return FittedText {
                lines,
                font_size: size,
                clipped: true,
            };
        }
        size = (size - 0.5).max(floor_size);
    }
}

/// Greedy wrap of `text` into lines no wider than `max_width`.
///
/// Latin words are kept whole and joined with single spaces; CJK characters
/// each break independently. A single unit wider than the box is split
/// character-by-character as a last resort.
pub fn wrap_lines(
    text: &str,
    font_size: f32,
    max_width: f32,
    metrics: &dyn TextMeasure,
) -> Vec<String> {
    let units = split_units(text);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for unit in &units {
        let candidate = if line.is_empty() {
            unit.clone()
        } else if needs_space(&line, unit) {
            format!("{line} {unit}")
        } else {
            format!("{line}{unit}")
        };

        if metrics.text_width(&candidate, font_size) <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        if metrics.text_width(unit, font_size) <= max_width {
            line = unit.clone();
        } else {
            // Unit alone overflows: hard character break.
            for ch in unit.chars() {
                let candidate = format!("{line}{ch}");
                if line.is_empty() || metrics.text_width(&candidate, font_size) <= max_width {
                    line = candidate;
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push(ch);
                }
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Split text into wrap units: whitespace-separated words, with each CJK
/// character its own unit.
fn split_units(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut word = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !word.is_empty() {
                units.push(std::mem::take(&mut word));
            }
        } else if is_cjk(ch) {
            if !word.is_empty() {
                units.push(std::mem::take(&mut word));
            }
            units.push(ch.to_string());
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        units.push(word);
    }
    units
}

/// A space joins two Latin units; CJK adjacency needs none.
fn needs_space(line: &str, unit: &str) -> bool {
    let prev_cjk = line.chars().last().map(is_cjk).unwrap_or(false);
    let next_cjk = unit.chars().next().map(is_cjk).unwrap_or(false);
    !prev_cjk && !next_cjk
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX_W: f32 = 180.0;
    const BOX_H: f32 = 40.0;

    #[test]
    fn short_text_keeps_nominal_size() {
        let fitted = fit_text("apple", BOX_W, BOX_H, 14.0, 5.0, &BuiltinMetrics);
        assert_eq!(fitted.font_size, 14.0);
        assert_eq!(fitted.lines, ["apple"]);
        assert!(!fitted.clipped);
    }

    #[test]
    fn long_text_shrinks_below_nominal() {
        let long = "The quick brown fox jumps over the lazy dog again and again \
                    until everyone involved is thoroughly exhausted";
        let fitted = fit_text(long, BOX_W, BOX_H, 14.0, 5.0, &BuiltinMetrics);
        assert!(fitted.font_size < 14.0);
        assert!(!fitted.clipped);
        assert!(fitted.height() <= BOX_H);
    }

    #[test]
    fn fitted_block_always_stays_inside_the_box() {
        let absurd = "word ".repeat(400);
        let fitted = fit_text(&absurd, BOX_W, BOX_H, 14.0, 5.0, &BuiltinMetrics);
        assert!(fitted.height() <= BOX_H);
        for line in &fitted.lines {
            assert!(BuiltinMetrics.text_width(line, fitted.font_size) <= BOX_W + f32::EPSILON);
        }
    }

    #[test]
    fn overlong_text_clips_at_floor_instead_of_overflowing() {
        let absurd = "antidisestablishmentarianism ".repeat(200);
        let fitted = fit_text(&absurd, 60.0, 12.0, 14.0, 5.0, &BuiltinMetrics);
        assert!(fitted.clipped);
        assert_eq!(fitted.font_size, 5.0);
        assert!(fitted.height() <= 12.0);
    }

    #[test]
    fn empty_text_yields_no_lines() {
        let fitted = fit_text("   ", BOX_W, BOX_H, 14.0, 5.0, &BuiltinMetrics);
        assert!(fitted.lines.is_empty());
        assert!(!fitted.clipped);
    }

    #[test]
    fn cjk_breaks_per_character() {
        // Each ideograph is a full em, so only a few fit per 60 pt line.
        let fitted = fit_text("我每天早上跑步去学校", 60.0, 200.0, 12.0, 5.0, &BuiltinMetrics);
        assert!(fitted.lines.len() > 1);
        for line in &fitted.lines {
            assert!(BuiltinMetrics.text_width(line, fitted.font_size) <= 60.0);
        }
    }

    #[test]
    fn mixed_script_wrap_joins_latin_with_spaces_only() {
        // Spaces survive between Latin words; CJK boundaries drop them.
        assert_eq!(
            wrap_lines("run fast", 10.0, 500.0, &BuiltinMetrics),
            ["run fast"]
        );
        assert_eq!(
            wrap_lines("run 跑 fast", 10.0, 500.0, &BuiltinMetrics),
            ["run跑fast"]
        );
    }

    #[test]
    fn fit_is_deterministic() {
        let text = "determinism matters for reproducible decks";
        let a = fit_text(text, BOX_W, BOX_H, 14.0, 5.0, &BuiltinMetrics);
        let b = fit_text(text, BOX_W, BOX_H, 14.0, 5.0, &BuiltinMetrics);
        assert_eq!(a, b);
    }
}
