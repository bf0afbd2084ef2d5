use std::sync::Arc;
use tracing::debug;

use domain::document::{ImageCommand, PrinterCommand, PrinterTarget};
use domain::driver::ImageLoader;
use domain::error::Result;
use domain::instruction::{BitmapInstruction, Charset, CutType, DrawerChannel, PrintInstruction};
use domain::CompiledDocument;

/// Turns an ordered instruction list into one compiled document.
///
/// Every instruction contributes at most one command to a single printer
/// target, in list order. Unknown instructions contribute nothing.
pub struct CommandCompiler {
    images: Arc<dyn ImageLoader>,
}

impl CommandCompiler {
    pub fn new(images: Arc<dyn ImageLoader>) -> Self {
        Self { images }
    }

    pub async fn compile(&self, instructions: &[PrintInstruction]) -> Result<CompiledDocument> {
        let mut printer = PrinterTarget::new();

        for instruction in instructions {
            let command = match instruction {
                PrintInstruction::SetEncoding { charset } => PrinterCommand::TextEncoding {
                    charset: Charset::normalize(charset),
                },
                PrintInstruction::CutPaper { cut } => PrinterCommand::Cut {
                    cut: CutType::from_name(cut),
                },
                PrintInstruction::OpenDrawer => PrinterCommand::OpenDrawer {
                    channel: DrawerChannel::No1,
                },
                PrintInstruction::AppendBitmap(bitmap) => self.image(bitmap).await?,
                PrintInstruction::AppendText { text } => PrinterCommand::Text {
                    content: text.clone(),
                },
                PrintInstruction::Unsupported { tag } => {
                    debug!(tag = %tag, "Skipping unsupported print instruction");
                    continue;
                }
            };
            printer.push(command);
        }

        debug!(commands = printer.len(), "Document compiled");
        Ok(CompiledDocument::new(printer))
    }

    async fn image(&self, bitmap: &BitmapInstruction) -> Result<PrinterCommand> {
        let data = self.images.load(&bitmap.path).await?;
        Ok(PrinterCommand::Image(ImageCommand {
            data,
            width: bitmap.width(),
            diffusion: bitmap.diffusion(),
            alignment: bitmap.alignment(),
        }))
    }
}
