//! Native file picker
//!
//! [`DialogFilePicker`] drives whichever desktop dialog helper is installed
//! (`zenity` or `kdialog`). A cancelled dialog is not an error: it yields an
//! empty selection.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tradfile_core::prelude::*;
use tradfile_core::PDF_EXTENSION;

/// Options passed to the native picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub allow_multiple: bool,
    pub create_directories: bool,
    /// Extensions without the leading dot
    pub extension_filter: Vec<String>,
}

impl PickRequest {
    /// The request used by the main page: several PDFs, no folder creation.
    pub fn pdf_documents() -> Self {
        Self {
            allow_multiple: true,
            create_directories: false,
            extension_filter: vec![PDF_EXTENSION.to_string()],
        }
    }

    fn glob_patterns(&self) -> Vec<String> {
        self.extension_filter
            .iter()
            .map(|ext| format!("*.{}", ext))
            .collect()
    }
}

/// Contract for selecting files. `Ok(vec![])` means the user cancelled.
#[trait_variant::make(FilePicker: Send)]
pub trait LocalFilePicker {
    async fn pick(&self, request: &PickRequest) -> Result<Vec<PathBuf>>;
}

/// Supported dialog helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTool {
    Zenity,
    Kdialog,
}

impl DialogTool {
    pub fn program(&self) -> &'static str {
        match self {
            DialogTool::Zenity => "zenity",
            DialogTool::Kdialog => "kdialog",
        }
    }

    /// Command-line arguments for this helper.
    pub fn args(&self, request: &PickRequest) -> Vec<String> {
        let patterns = request.glob_patterns();
        match self {
            DialogTool::Zenity => {
                let mut args = vec![
                    "--file-selection".to_string(),
                    "--title=Select documents".to_string(),
                ];
                if request.allow_multiple {
                    args.push("--multiple".to_string());
                    args.push("--separator=\n".to_string());
                }
                if !patterns.is_empty() {
                    args.push(format!("--file-filter=Documents | {}", patterns.join(" ")));
                }
                args
            }
            DialogTool::Kdialog => {
                let mut args = vec!["--getopenfilename".to_string(), ".".to_string()];
                args.push(if patterns.is_empty() {
                    "*".to_string()
                } else {
                    format!("{} | Documents", patterns.join(" "))
                });
                if request.allow_multiple {
                    args.push("--multiple".to_string());
                    args.push("--separate-output".to_string());
                }
                args
            }
        }
    }
}

/// Parse dialog stdout: one absolute path per line.
///
/// Only line terminators are stripped; spaces belong to the path.
pub fn parse_selection(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// File picker backed by an installed dialog helper.
#[derive(Debug, Clone)]
pub struct DialogFilePicker {
    tool: Option<DialogTool>,
}

impl DialogFilePicker {
    /// Look for `zenity`, then `kdialog`, on `PATH`.
    pub fn detect() -> Self {
        let tool = [DialogTool::Zenity, DialogTool::Kdialog]
            .into_iter()
            .find(|tool| which::which(tool.program()).is_ok());

        match tool {
            Some(tool) => debug!("Using {} for file selection", tool.program()),
            None => warn!("No file dialog helper found; picking files is unavailable"),
        }

        Self { tool }
    }

    pub fn with_tool(tool: Option<DialogTool>) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> Option<DialogTool> {
        self.tool
    }
}

impl FilePicker for DialogFilePicker {
    async fn pick(&self, request: &PickRequest) -> Result<Vec<PathBuf>> {
        let tool = self.tool.ok_or(Error::PickerUnavailable)?;

        let output = Command::new(tool.program())
            .args(tool.args(request))
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::picker(format!("failed to run {}: {}", tool.program(), e)))?;

        // Both helpers exit with 1 when the dialog is dismissed
        match output.status.code() {
            Some(0) => {}
            Some(1) => {
                debug!("File dialog cancelled");
                return Ok(Vec::new());
            }
            _ => {
                return Err(Error::picker(format!(
                    "{} exited with {}",
                    tool.program(),
                    output.status
                )))
            }
        }

        let mut paths = parse_selection(&String::from_utf8_lossy(&output.stdout));
        if !request.allow_multiple {
            paths.truncate(1);
        }
        Ok(paths)
    }
}
