//! Symbol files in legacy Japanese encodings.

use encoding_rs::{EUC_JP, SHIFT_JIS};
use stockrate_core::data::universe::{
    to_symbols, write_symbol_list, Universe, CORE30_GROUP, TOKYO_SUFFIX,
};
use stockrate_core::data::{load, LoadError, SymbolLoader, TextEncoding};

const LISTING: &str = "7203.T,トヨタ自動車\n6758.T,ソニーグループ\n\n9984.T,ソフトバンクグループ\n";

fn write_encoded(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn shift_jis_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let (bytes, _, _) = SHIFT_JIS.encode(LISTING);
    let path = write_encoded(&dir, "sjis.csv", &bytes);

    let loaded = SymbolLoader::new().try_load(&path).unwrap();
    assert_eq!(loaded.encoding, TextEncoding::Cp932);
    assert_eq!(loaded.symbols, vec!["7203.T", "6758.T", "9984.T"]);
}

#[test]
fn euc_jp_file_loads() {
    let dir = tempfile::tempdir().unwrap();
    let (bytes, _, _) = EUC_JP.encode(LISTING);
    let path = write_encoded(&dir, "eucjp.csv", &bytes);

    // Whichever legacy decoder accepts the bytes, the ASCII first column survives.
    assert_eq!(load(&path), vec!["7203.T", "6758.T", "9984.T"]);
}

#[test]
fn utf8_with_bom_loads() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(LISTING.as_bytes());
    let path = write_encoded(&dir, "bom.csv", &bytes);

    let loaded = SymbolLoader::new().try_load(&path).unwrap();
    assert_eq!(loaded.encoding, TextEncoding::Utf8Sig);
    assert_eq!(loaded.symbols[0], "7203.T");
}

#[test]
fn undecodable_file_is_soft_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_encoded(&dir, "garbage.csv", &[0xFF, 0xFF, 0xFF, b'\n']);

    assert!(matches!(
        SymbolLoader::new().try_load(&path),
        Err(LoadError::Decode { .. })
    ));
    assert!(load(&path).is_empty());
}

#[test]
fn empty_file_gives_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_encoded(&dir, "empty.csv", b"\n  \n");
    assert!(load(&path).is_empty());
}

#[test]
fn generated_universe_list_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data/topix_core30.csv");
    let universe = Universe::default_core30();
    let symbols = to_symbols(universe.group_codes(CORE30_GROUP).unwrap(), TOKYO_SUFFIX);

    write_symbol_list(&path, &symbols).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("2914.T\n"));
    assert_eq!(load(&path), symbols);
}
