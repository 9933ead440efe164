use anyhow::Result;
use arboard::Clipboard;

/// Somewhere the short URL can be copied to
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard via arboard.
///
/// The handle is opened lazily on first copy, so a headless session without
/// a clipboard only fails when the user actually asks to copy.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new()?);
        }
        match self.inner.as_mut() {
            Some(clipboard) => {
                clipboard.set_text(text)?;
                Ok(())
            }
            None => Err(anyhow::anyhow!("Clipboard unavailable")),
        }
    }
}
