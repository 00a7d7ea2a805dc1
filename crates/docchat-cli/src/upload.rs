use docchat_client::UploadFile;
use docchat_core::{DocchatResult, Route};
use docchat_session::UploadSession;
use std::io::Write;
use tokio::io::{AsyncBufRead, Lines};

/// Interactive upload form: asks for a path until an upload succeeds.
/// An empty line or end of input leaves without navigating.
///
/// Reads from the caller's `lines` so input typed ahead for the chat view
/// stays buffered for it.
pub async fn upload_prompt<R>(
    session: &UploadSession,
    lines: &mut Lines<R>,
) -> anyhow::Result<Option<Route>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        if let Some(reason) = session.last_error() {
            eprintln!("Upload failed: {reason}");
        }
        print!("Upload Document\nPath to file (empty to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        let path = line.trim();
        if path.is_empty() {
            return Ok(None);
        }

        let file = match UploadFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if let Ok(route) = submit_with_progress(session, file, &mut std::io::stderr()).await {
            return Ok(Some(route));
        }
    }
}

/// Uploads `file`, writing the progress line to `out` before the request
/// is sent.
pub async fn submit_with_progress(
    session: &UploadSession,
    file: UploadFile,
    out: &mut impl Write,
) -> DocchatResult<Route> {
    writeln!(out, "{}", progress_line(&file.file_name))?;
    out.flush()?;
    session.submit(file).await
}

fn progress_line(file_name: &str) -> String {
    format!("Processing your document ({file_name})...")
}
