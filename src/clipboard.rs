use crate::error::{Result, SnippetError};

/// Anything that can take over the clipboard contents.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard.
///
/// The handle is opened on the first copy and kept for the lifetime of the
/// value: on X11 and Wayland the copied text is only served while a handle
/// is alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
    hold_until_replaced: bool,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// For one-shot processes: on Linux each copy blocks until another
    /// program takes the clipboard over, so the text outlives the process.
    pub fn until_replaced() -> Self {
        Self {
            handle: None,
            hold_until_replaced: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn holds_until_replaced(&self) -> bool {
        self.hold_until_replaced
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        let clipboard = match self.handle.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(clipboard_error)?,
        };
        Ok(self.handle.insert(clipboard))
    }
}

impl Clipboard for SystemClipboard {
    #[cfg(target_os = "linux")]
    fn set_text(&mut self, text: &str) -> Result<()> {
        use arboard::SetExtLinux;

        let hold = self.hold_until_replaced;
        let clipboard = self.handle()?;
        if hold {
            clipboard.set().wait().text(text).map_err(clipboard_error)
        } else {
            clipboard.set_text(text).map_err(clipboard_error)
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.handle()?.set_text(text).map_err(clipboard_error)
    }
}

fn clipboard_error(err: arboard::Error) -> SnippetError {
    SnippetError::Clipboard(err.to_string())
}

/// Records every copy; used by tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    history: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_owned());
        Ok(())
    }
}
