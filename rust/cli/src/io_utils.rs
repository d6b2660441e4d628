//! File and stdin helpers shared by the commands.
//!
//! - Reading a line of interactive input
//! - Reading JSONL text files (UTF-8 BOM stripped)
//! - Creating the parent directory of an output file

use std::io::BufRead;
use std::path::Path;

/// Reads one line and trims it. `None` on EOF or a read error.
///
/// ```rust
/// use std::io::Cursor;
/// # use fivepiles_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("p Ah 2\n");
/// assert_eq!(read_stdin_line(&mut input), Some("p Ah 2".to_string()));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Reads a whole text file, dropping a leading UTF-8 BOM.
pub fn read_text(path: &Path) -> Result<String, std::io::Error> {
    let mut content = std::fs::read_to_string(path)?;
    strip_utf8_bom(&mut content);
    Ok(content)
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
