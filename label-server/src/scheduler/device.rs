//! Device batch dispatch boundary
//!
//! The scheduler only knows "send this batch to this printer". The
//! PPLB rendering and the transport live behind [`BatchDevice`] so
//! the scheduling logic can be tested against a recording fake and
//! the server can run without hardware.

use async_trait::async_trait;
use label_printer::{MockPrinter, NetworkPrinter, PplbBuilder, PrintError, Printer};
use shared::{PrintBatch, PrintSlot, PrinterIdentity};
use thiserror::Error;
use tracing::{debug, info};

/// X origin of each of the three label positions on the stock, in dots.
const SLOT_X_POSITIONS: [u32; 3] = [50, 314, 578];

/// Y rows inside one label, in dots.
const ROW_COMPANY: u32 = 24;
const ROW_NAME: u32 = 48;
const ROW_CODE: u32 = 72;
const ROW_BARCODE: u32 = 96;

const COMPANY_LINE: &str = "ESTRELA METAIS";

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Print failed: {0}")]
    Print(#[from] PrintError),
}

pub type DeviceResult<T> = Result<T, DeviceError>;

/// One physical print pass over a batch of three label slots.
#[async_trait]
pub trait BatchDevice: Send + Sync {
    async fn dispatch_batch(
        &self,
        batch: &PrintBatch,
        identity: &PrinterIdentity,
    ) -> DeviceResult<()>;
}

/// Render a batch into one PPLB format.
///
/// Empty slots are simply skipped; the stock still advances because
/// the format covers the full three-wide row.
fn render_batch(batch: &PrintBatch, identity: &PrinterIdentity) -> Vec<u8> {
    let config = &identity.config;
    let mut builder = PplbBuilder::new(
        config.width_dots,
        config.height_dots,
        config.speed,
        config.darkness,
    );

    for (slot, &x) in batch.slots.iter().zip(SLOT_X_POSITIONS.iter()) {
        let PrintSlot::Filled { product } = slot else {
            continue;
        };
        builder.text_field(x, ROW_COMPANY, COMPANY_LINE);
        builder.text_field(x, ROW_NAME, &product.name_short);
        builder.text_field(x, ROW_CODE, &product.product_code);
        builder.ean13_field(x, ROW_BARCODE, &product.barcode);
    }

    builder.quantity(1);
    builder.build()
}

/// Dispatches rendered batches to a network label printer. The
/// identity's name doubles as the printer host.
pub struct PplbDevice {
    port: u16,
}

impl PplbDevice {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl BatchDevice for PplbDevice {
    async fn dispatch_batch(
        &self,
        batch: &PrintBatch,
        identity: &PrinterIdentity,
    ) -> DeviceResult<()> {
        let data = render_batch(batch, identity);
        debug!(
            printer = %identity.name,
            labels = batch.label_count(),
            bytes = data.len(),
            "Dispatching batch"
        );

        let printer = NetworkPrinter::new(identity.name.clone(), self.port);
        printer.print(&data).await?;
        Ok(())
    }
}

/// Renders batches but sends them to an in-memory printer. Used when
/// the server runs without attached hardware.
pub struct MockDevice {
    printer: MockPrinter,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            printer: MockPrinter::new(),
        }
    }

    pub fn dispatched(&self) -> usize {
        self.printer.job_count()
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BatchDevice for MockDevice {
    async fn dispatch_batch(
        &self,
        batch: &PrintBatch,
        identity: &PrinterIdentity,
    ) -> DeviceResult<()> {
        let data = render_batch(batch, identity);
        info!(
            printer = %identity.name,
            labels = batch.label_count(),
            "[MOCK] dispatching batch"
        );
        self.printer.print(&data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Product;

    fn product(code: &str, barcode: &str) -> Product {
        Product {
            id: Some(1),
            product_code: code.to_string(),
            name: "Torneira Cromada".to_string(),
            name_short: "Torneira Cromada".to_string(),
            barcode: barcode.to_string(),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_render_places_slots_at_fixed_x() {
        let batch = PrintBatch::from_products(&[
            product("0001", "7898465810011"),
            product("0002", "7898465810028"),
            product("0003", "7898465810035"),
        ]);
        let out =
            String::from_utf8(render_batch(&batch, &PrinterIdentity::new("printer"))).unwrap();

        for x in [50, 314, 578] {
            assert!(out.contains(&format!("^FO{},24^A0N,20,20^FDESTRELA METAIS^FS", x)));
            assert!(out.contains(&format!("^FO{},96^BY2^BEN,60,Y,N^FD", x)));
        }
        assert!(out.contains("^PQ1\r\n"));
    }

    #[test]
    fn test_render_skips_empty_slots() {
        let batch = PrintBatch::from_products(&[product("0001", "7898465810011")]);
        let out =
            String::from_utf8(render_batch(&batch, &PrinterIdentity::new("printer"))).unwrap();

        assert!(out.contains("^FO50,24"));
        assert!(!out.contains("^FO314,"));
        assert!(!out.contains("^FO578,"));
    }

    #[tokio::test]
    async fn test_mock_device_counts_dispatches() {
        let device = MockDevice::new();
        let batch = PrintBatch::from_products(&[product("0001", "7898465810011")]);

        device
            .dispatch_batch(&batch, &PrinterIdentity::new("mock"))
            .await
            .unwrap();

        assert_eq!(device.dispatched(), 1);
    }
}
