//! PPLB command builder
//!
//! Provides a fluent API for building PPLB label formats for Argox
//! desktop label printers (OS-2140 family). Commands are CRLF
//! terminated; the printer swallows the whole format between `^XA`
//! and `^XZ` and prints it as one pass over the stock.

/// PPLB format builder
///
/// Geometry is given in printer dots (203 dpi heads: 8 dots per mm).
pub struct PplbBuilder {
    buf: String,
}

impl PplbBuilder {
    /// Start a new format with the label geometry header.
    ///
    /// `width` and `height` are the printable area in dots, `speed`
    /// is inches per second and `darkness` the burn density (0-15).
    pub fn new(width: u32, height: u32, speed: u8, darkness: u8) -> Self {
        let mut buf = String::with_capacity(1024);
        buf.push_str("^XA\r\n");
        buf.push_str("^LH0,0\r\n");
        buf.push_str(&format!("^LL{}\r\n", height));
        buf.push_str(&format!("^PW{}\r\n", width));
        buf.push_str(&format!("^PR{}\r\n", speed));
        buf.push_str(&format!("^MD{}\r\n", darkness));
        Self { buf }
    }

    // === Fields ===

    /// Place a text field at (x, y) in the default 20x20 font.
    pub fn text_field(&mut self, x: u32, y: u32, text: &str) -> &mut Self {
        self.buf
            .push_str(&format!("^FO{},{}^A0N,20,20^FD{}^FS\r\n", x, y, text));
        self
    }

    /// Place an EAN-13 barcode field at (x, y).
    ///
    /// `^BY2` sets the narrow bar to 2 dots; the 60-dot-tall symbol
    /// prints its human readable line (`Y`) below the bars.
    pub fn ean13_field(&mut self, x: u32, y: u32, digits: &str) -> &mut Self {
        self.buf.push_str(&format!(
            "^FO{},{}^BY2^BEN,60,Y,N^FD{}^FS\r\n",
            x, y, digits
        ));
        self
    }

    // === Finishing ===

    /// Set the print quantity for this format.
    pub fn quantity(&mut self, count: u32) -> &mut Self {
        self.buf.push_str(&format!("^PQ{}\r\n", count));
        self
    }

    /// Close the format and return the raw bytes to send.
    pub fn build(mut self) -> Vec<u8> {
        self.buf.push_str("^XZ\r\n");
        self.buf.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_geometry() {
        let out = String::from_utf8(PplbBuilder::new(840, 176, 2, 8).build()).unwrap();
        assert!(out.starts_with("^XA\r\n^LH0,0\r\n"));
        assert!(out.contains("^LL176\r\n"));
        assert!(out.contains("^PW840\r\n"));
        assert!(out.contains("^PR2\r\n"));
        assert!(out.contains("^MD8\r\n"));
        assert!(out.ends_with("^XZ\r\n"));
    }

    #[test]
    fn test_text_and_barcode_fields() {
        let mut builder = PplbBuilder::new(840, 176, 2, 8);
        builder.text_field(50, 24, "ESTRELA METAIS");
        builder.ean13_field(50, 96, "789846581577");
        builder.quantity(1);
        let out = String::from_utf8(builder.build()).unwrap();

        assert!(out.contains("^FO50,24^A0N,20,20^FDESTRELA METAIS^FS\r\n"));
        assert!(out.contains("^FO50,96^BY2^BEN,60,Y,N^FD789846581577^FS\r\n"));
        assert!(out.contains("^PQ1\r\n"));
    }
}
