// SPDX-License-Identifier: MIT
//
// Terminal swatches for the `harmonies` command.
//
// Each color is drawn as a two-cell block with a 24-bit background
// (SGR 48;2), followed by its `#rrggbb` code. Everything writes to any
// `impl Write` so the output can be captured in tests.
use std::io::{self, Write};

use tinct_theme::{Color, Harmonies, PaletteHarmonies};

// ─── Primitives ──────────────────────────────────────────────────────────────

/// Draw one swatch block: truecolor background, two spaces, reset.
pub fn block(w: &mut impl Write, color: Color) -> io::Result<()> {
    let [r, g, b] = color.rgb();
    write!(w, "\x1b[48;2;{r};{g};{b}m  \x1b[0m")
}

/// A block followed by the color's code.
pub fn labeled(w: &mut impl Write, color: Color) -> io::Result<()> {
    block(w, color)?;
    write!(w, " {color}")
}

/// A row of labeled blocks separated by two spaces.
pub fn row(w: &mut impl Write, colors: &[Color]) -> io::Result<()> {
    for (i, &color) in colors.iter().enumerate() {
        if i > 0 {
            w.write_all(b"  ")?;
        }
        labeled(w, color)?;
    }
    Ok(())
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Width of the family-name column.
const NAME_WIDTH: usize = 14;

/// Print a heading line and the six harmony families of one color.
pub fn harmonies(w: &mut impl Write, title: &str, h: &Harmonies) -> io::Result<()> {
    write!(w, "{title} ")?;
    labeled(w, h.base)?;
    writeln!(w)?;
    for (kind, colors) in h.families() {
        write!(w, "  {:<NAME_WIDTH$}", kind.name())?;
        row(w, colors)?;
        writeln!(w)?;
    }
    Ok(())
}

/// Print the whole palette: keys by index, then roles by name.
pub fn report(w: &mut impl Write, all: &PaletteHarmonies) -> io::Result<()> {
    for (i, h) in all.keys.iter().enumerate() {
        harmonies(w, &format!("KEY({i})"), h)?;
        writeln!(w)?;
    }
    for (name, h) in &all.roles {
        harmonies(w, &format!("ROLE({name})"), h)?;
        writeln!(w)?;
    }
    Ok(())
}
