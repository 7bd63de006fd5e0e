//! # Output Sinks
//!
//! Writes a finished [`TideDocument`] next to the feed it came from:
//!
//! - `<feed stem>.txt`: the document verbatim
//! - `<feed stem>.prn`: one month per page, pages separated by a form feed,
//!   lines centered for a monospaced printer
//!
//! Outputs of a previous run are removed before a new run starts. Every sink
//! renders its contents before the first file is written, and a failed write
//! removes whatever was already written, so a failed run leaves no tables
//! behind.

use crate::document::TideDocument;
use crate::TableError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Page separator of the print output.
pub const FORM_FEED: &str = "\x0c";

/// Somewhere a finished document can be written.
pub trait DocumentSink {
    /// File this sink writes.
    fn path(&self) -> &Path;

    /// Full file contents for `document`.
    fn render(&self, document: &TideDocument) -> String;

    fn write(&self, document: &TideDocument) -> Result<(), TableError> {
        fs::write(self.path(), self.render(document))?;
        info!(path = %self.path().display(), "wrote tide tables");
        Ok(())
    }
}

/// Plain text file holding the document verbatim.
#[derive(Clone, Debug)]
pub struct TextFileSink {
    path: PathBuf,
}

impl TextFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TextFileSink { path: path.into() }
    }
}

impl DocumentSink for TextFileSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, document: &TideDocument) -> String {
        document.text()
    }
}

/// Paginated print file: one month per page.
#[derive(Clone, Debug)]
pub struct PrintFileSink {
    path: PathBuf,
    page_columns: usize,
}

impl PrintFileSink {
    pub fn new(path: impl Into<PathBuf>, page_columns: usize) -> Self {
        PrintFileSink {
            path: path.into(),
            page_columns,
        }
    }
}

impl DocumentSink for PrintFileSink {
    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, document: &TideDocument) -> String {
        document.pages(self.page_columns).join(FORM_FEED)
    }
}

/// Where the outputs of a feed go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub text: PathBuf,
    pub pages: PathBuf,
}

impl OutputPaths {
    /// `<directory>/<feed stem>.txt` and `.prn`.
    pub fn for_feed(feed: &Path, directory: &Path) -> Self {
        let stem = feed
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tablas".to_string());
        OutputPaths {
            text: directory.join(format!("{stem}.txt")),
            pages: directory.join(format!("{stem}.prn")),
        }
    }

    pub fn sinks(&self, page_columns: usize) -> Vec<Box<dyn DocumentSink>> {
        let text: Box<dyn DocumentSink> = Box::new(TextFileSink::new(&self.text));
        let pages: Box<dyn DocumentSink> =
            Box::new(PrintFileSink::new(&self.pages, page_columns));
        vec![text, pages]
    }

    /// Render `document` for every sink, then write the files. If any write
    /// fails, the outputs already written are removed before the error is
    /// returned.
    pub fn write_document(
        &self,
        document: &TideDocument,
        page_columns: usize,
    ) -> Result<(), TableError> {
        let rendered: Vec<(PathBuf, String)> = self
            .sinks(page_columns)
            .iter()
            .map(|sink| (sink.path().to_path_buf(), sink.render(document)))
            .collect();

        for (path, contents) in &rendered {
            if let Err(e) = fs::write(path, contents) {
                warn!(path = %path.display(), error = %e, "write failed, removing partial outputs");
                if let Err(cleanup) = self.remove_previous() {
                    warn!(error = %cleanup, "could not remove partial outputs");
                }
                return Err(e.into());
            }
            info!(path = %path.display(), "wrote tide tables");
        }
        Ok(())
    }

    /// Delete outputs left by a previous run. Missing files are fine.
    pub fn remove_previous(&self) -> Result<(), TableError> {
        for path in [&self.text, &self.pages] {
            match fs::remove_file(path) {
                Ok(()) => {
                    debug!(path = %path.display(), "removed previous output");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn document() -> TideDocument {
        TideDocument::assemble(vec!["\n\n\nENERO".to_string(), "\n\n\nFEBRERO".to_string()])
    }

    #[test]
    fn test_output_paths_follow_feed_stem() {
        let paths = OutputPaths::for_feed(Path::new("data/HL25023.LIS"), Path::new("out"));
        assert_eq!(paths.text, Path::new("out/HL25023.txt"));
        assert_eq!(paths.pages, Path::new("out/HL25023.prn"));
    }

    #[test]
    fn test_text_sink_writes_verbatim() {
        let dir = tempdir().unwrap();
        let sink = TextFileSink::new(dir.path().join("HL25023.txt"));
        sink.write(&document()).unwrap();

        let written = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(written, "\n\n\nENERO\n\n\nFEBRERO");
    }

    #[test]
    fn test_print_sink_puts_each_month_on_a_page() {
        let dir = tempdir().unwrap();
        let sink = PrintFileSink::new(dir.path().join("HL25023.prn"), 9);
        sink.write(&document()).unwrap();

        let written = fs::read_to_string(sink.path()).unwrap();
        let pages: Vec<&str> = written.split(FORM_FEED).collect();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].ends_with("\n  ENERO"));
        assert!(pages[1].ends_with("\n FEBRERO"));
    }

    #[test]
    fn test_remove_previous_outputs() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::for_feed(Path::new("HL25023.LIS"), dir.path());
        fs::write(&paths.text, "old").unwrap();

        paths.remove_previous().unwrap();
        assert!(!paths.text.exists());
        assert!(!paths.pages.exists());

        // Nothing left to remove is not an error
        paths.remove_previous().unwrap();
    }

    #[test]
    fn test_failed_write_leaves_no_outputs() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::for_feed(Path::new("HL25023.LIS"), dir.path());
        // A directory where the print file should go makes its write fail
        fs::create_dir(&paths.pages).unwrap();

        let result = paths.write_document(&document(), 85);
        assert!(matches!(result, Err(TableError::Io(_))));
        assert!(!paths.text.exists());
    }

    #[test]
    fn test_write_document_writes_both_outputs() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::for_feed(Path::new("HL25023.LIS"), dir.path());
        paths.write_document(&document(), 9).unwrap();

        assert_eq!(fs::read_to_string(&paths.text).unwrap(), document().text());
        let pages = fs::read_to_string(&paths.pages).unwrap();
        assert_eq!(pages.split(FORM_FEED).count(), 2);
    }

    #[test]
    fn test_sinks_write_both_outputs() {
        let dir = tempdir().unwrap();
        let paths = OutputPaths::for_feed(Path::new("HL25023.LIS"), dir.path());
        for sink in paths.sinks(85) {
            sink.write(&document()).unwrap();
        }
        assert!(paths.text.exists());
        assert!(paths.pages.exists());
    }
}
