pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read a document from `--input <file>`, falling back to piped stdin.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    read_optional(path)?
        .ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}

/// Like [`read_document`], but `None` when neither a file nor stdin is given.
pub fn read_optional<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => file::read_json(path).map(Some),
        None => stdin::read_stdin(),
    }
}
