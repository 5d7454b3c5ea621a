//! Symbol list loader.
//!
//! Reads a newline-delimited list of ticker symbols. Spreadsheet exports of
//! Japanese lists arrive in a handful of encodings, so decoding is an ordered
//! list of attempts: the first encoding that decodes the whole file and
//! parses as CSV wins.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::{EUC_JP, SHIFT_JIS, UTF_8};
use thiserror::Error;

use crate::domain::SymbolList;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Candidate text encodings, tried in `FALLBACK_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8, with a leading byte-order mark stripped when present (Excel exports).
    Utf8Sig,
    Utf8,
    /// Windows-31J. encoding_rs' Shift_JIS decoder is this superset.
    Cp932,
    EucJp,
}

impl TextEncoding {
    pub const FALLBACK_ORDER: [TextEncoding; 4] = [
        TextEncoding::Utf8Sig,
        TextEncoding::Utf8,
        TextEncoding::Cp932,
        TextEncoding::EucJp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Cp932 => "cp932",
            TextEncoding::EucJp => "euc-jp",
        }
    }

    /// Decode the full buffer, or `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            TextEncoding::Cp932 => {
                SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::EucJp => {
                EUC_JP.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file {} not found", path.display())]
    FileMissing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {} with available encodings ({tried})", path.display())]
    Decode { path: PathBuf, tried: String },
}

/// Symbols together with the encoding that decoded them.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSymbols {
    pub symbols: SymbolList,
    pub encoding: TextEncoding,
}

/// Configurable loader. The default reads the first field of every line.
#[derive(Debug, Clone, Default)]
pub struct SymbolLoader {
    column: usize,
    skip_header: bool,
}

impl SymbolLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read symbols from field `column` (zero-based) instead of the first.
    pub fn column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Drop the first record, e.g. the `Rate,Symbol` header of a saved table.
    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    /// Load symbols, reporting failures through the log and returning an
    /// empty list instead of an error.
    pub fn load(&self, path: &Path) -> SymbolList {
        match self.try_load(path) {
            Ok(loaded) => {
                log::info!(
                    "Successfully loaded {} using {}.",
                    path.display(),
                    loaded.encoding
                );
                if loaded.symbols.is_empty() {
                    log::warn!("No valid stock symbols found in file {}.", path.display());
                }
                loaded.symbols
            }
            Err(e) => {
                log::error!("{e}");
                Vec::new()
            }
        }
    }

    pub fn try_load(&self, path: &Path) -> Result<LoadedSymbols, LoadError> {
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::FileMissing {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        self.parse_bytes(&bytes).ok_or_else(|| LoadError::Decode {
            path: path.to_path_buf(),
            tried: TextEncoding::FALLBACK_ORDER
                .iter()
                .map(|e| e.label())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Run the encoding attempts over an in-memory buffer.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Option<LoadedSymbols> {
        TextEncoding::FALLBACK_ORDER.iter().find_map(|&encoding| {
            let text = encoding.decode(bytes)?;
            match self.extract_symbols(&text) {
                Ok(symbols) => Some(LoadedSymbols { symbols, encoding }),
                Err(e) => {
                    log::debug!("{encoding} decoded but failed to parse as CSV: {e}");
                    None
                }
            }
        })
    }

    fn extract_symbols(&self, text: &str) -> Result<SymbolList, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut symbols = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            if self.skip_header && i == 0 {
                continue;
            }
            if let Some(field) = record.get(self.column) {
                let symbol = field.trim();
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }
        Ok(symbols)
    }
}

/// Load the first field of each line of `path`.
pub fn load(path: &Path) -> SymbolList {
    SymbolLoader::default().load(path)
}
