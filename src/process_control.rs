use std::{
    io::{BufRead, BufReader, ErrorKind, Read},
    process::Child,
    thread,
};

#[cfg(target_os = "windows")]
use std::process::{Command, Stdio};

pub(crate) fn stop_child_process(child: &mut Child) {
    #[cfg(target_os = "windows")]
    {
        let _ = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .status();
        let _ = child.wait();
        return;
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = child.kill();
        let _ = child.wait();
    }
}

/// Forwards each line of a child stream to `log` until the stream closes.
/// Bytes that are not UTF-8 are replaced rather than ending the reader.
pub(crate) fn forward_output_lines<R, F>(stream: R, stream_name: &str, log: F)
where
    R: Read + Send + 'static,
    F: Fn(&str) + Send + 'static,
{
    let thread_name = format!("backend-{stream_name}");
    let spawn_result = thread::Builder::new().name(thread_name).spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let trimmed = line.trim_end();
                    if !trimmed.is_empty() {
                        log(&format!("[backend] {trimmed}"));
                    }
                }
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });
    if let Err(error) = spawn_result {
        tracing::warn!("failed to spawn backend {stream_name} reader: {error}");
    }
}
