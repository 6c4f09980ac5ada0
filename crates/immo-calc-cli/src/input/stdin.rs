use std::io::{self, Read};

/// Whatever was piped on stdin; `None` for a terminal or a blank pipe.
pub fn read_piped() -> io::Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;
    Ok(Some(buffer).filter(|text| !text.trim().is_empty()))
}
