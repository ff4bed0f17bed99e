//! View Renderer - HTML-Seite
//!
//! Der Renderer schreibt in einen beliebigen `core::fmt::Write` Sink,
//! die Firmware nutzt einen `heapless::String`. Die Ausgabe hängt nur
//! vom Panel-Zustand und der Statuszeile ab. JSON entsteht in der Firmware
//! per `serde-json-core` aus `PanelStatus`.

use core::fmt::{self, Write};

use rgb::RGB8;

use crate::types::{Light, LightCommand, LightPanel, Notice};

/// Seitentitel
pub const PAGE_TITLE: &str = "Dadicator";

/// Überschrift über den Lampen
pub const PAGE_HEADING: &str = "dadicator";

/// Obergrenze der gerenderten Seite in Bytes
///
/// Die Seite ohne Statuszeile hat knapp 1 KB. Die längste Statuszeile ist ein
/// abgelehntes Token mit `MAX_ECHOED_TOKEN_CHARS` Zeichen, die alle escaped
/// werden (bis zu 6 Bytes pro Zeichen).
pub const MAX_PAGE_LEN: usize = 2048;

/// Rendert die komplette HTML-Seite
///
/// Jede Lampe ist ein Link auf die jeweils entgegengesetzte Aktion,
/// eine leuchtende grüne Lampe zeigt also auf `/led/green/off`.
pub fn render_html<W: Write>(
    out: &mut W,
    panel: &LightPanel,
    notice: &Notice<'_>,
) -> fmt::Result {
    out.write_str("<!DOCTYPE html>\n<html>\n<head>\n")?;
    out.write_str("<meta charset=\"utf-8\">\n")?;
    out.write_str("<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n")?;
    writeln!(out, "<title>{}</title>", PAGE_TITLE)?;
    write_style(out)?;
    out.write_str("</head>\n<body>\n")?;
    writeln!(out, "<h1>{}</h1>", PAGE_HEADING)?;

    out.write_str("<p class=\"notice\">")?;
    write!(HtmlEscaped(&mut *out), "{}", notice)?;
    out.write_str("</p>\n")?;

    out.write_str("<div class=\"panel\">\n")?;
    for light in Light::ALL {
        write_lamp(out, panel, light)?;
    }
    out.write_str("</div>\n</body>\n</html>\n")
}

fn write_style<W: Write>(out: &mut W) -> fmt::Result {
    out.write_str("<style>\n")?;
    out.write_str(
        "body{font-family:sans-serif;text-align:center;background:#202020;color:#eee;}\n",
    )?;
    out.write_str(
        ".panel{display:inline-block;padding:1rem;background:#111;border-radius:1rem;}\n",
    )?;
    out.write_str(
        ".lamp{display:block;width:6rem;height:6rem;margin:1rem;border-radius:50%;\
         line-height:6rem;color:#fff;text-decoration:none;font-weight:bold;}\n",
    )?;
    for light in Light::ALL {
        write!(out, ".lamp.{}.on{{background:", light.as_str())?;
        write_hex(out, light.lit_color())?;
        out.write_str(";}\n")?;
        write!(out, ".lamp.{}.off{{background:", light.as_str())?;
        write_hex(out, light.dimmed_color())?;
        out.write_str(";}\n")?;
    }
    out.write_str("</style>\n")
}

fn write_lamp<W: Write>(out: &mut W, panel: &LightPanel, light: Light) -> fmt::Result {
    let state = panel.get(light);
    let target = LightCommand::new(light, state.toggled());
    writeln!(
        out,
        "<a class=\"lamp {} {}\" href=\"{}\">{} : {}</a>",
        light.as_str(),
        state.as_str(),
        target.path(),
        light.label(),
        state.as_str()
    )
}

fn write_hex<W: Write>(out: &mut W, color: RGB8) -> fmt::Result {
    write!(out, "#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// Schreibt nach `out` und escaped dabei HTML-Sonderzeichen
///
/// Abgelehnte Tokens stammen direkt aus dem Request-Pfad.
pub struct HtmlEscaped<'w, W: Write>(pub &'w mut W);

impl<W: Write> Write for HtmlEscaped<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;
        while let Some(pos) = rest.find(['<', '>', '&', '"', '\'']) {
            self.0.write_str(&rest[..pos])?;
            let entity = match rest.as_bytes()[pos] {
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'&' => "&amp;",
                b'"' => "&quot;",
                _ => "&#39;",
            };
            self.0.write_str(entity)?;
            rest = &rest[pos + 1..];
        }
        self.0.write_str(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimaler Stack-Sink für no_std Tests
    struct Buf {
        data: [u8; 256],
        len: usize,
    }

    impl Buf {
        fn new() -> Self {
            Self {
                data: [0; 256],
                len: 0,
            }
        }

        fn as_str(&self) -> &str {
            core::str::from_utf8(&self.data[..self.len]).unwrap()
        }
    }

    impl Write for Buf {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let end = self.len + s.len();
            if end > self.data.len() {
                return Err(fmt::Error);
            }
            self.data[self.len..end].copy_from_slice(s.as_bytes());
            self.len = end;
            Ok(())
        }
    }

    #[test]
    fn test_html_escaped() {
        let mut buf = Buf::new();
        write!(HtmlEscaped(&mut buf), "<b>\"x\" & 'y'</b>").unwrap();
        assert_eq!(
            buf.as_str(),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_write_hex() {
        let mut buf = Buf::new();
        write_hex(&mut buf, RGB8 { r: 255, g: 200, b: 0 }).unwrap();
        assert_eq!(buf.as_str(), "#ffc800");
    }
}
