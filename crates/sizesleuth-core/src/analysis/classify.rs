/// "Important system file" classification by file suffix.
///
/// Pure function, no filesystem access. Folders are important by definition
/// and never reach this check.

/// Longest suffix in the allow-list; anything longer cannot match.
const MAX_EXT_LEN: usize = 8;

/// `true` if the file name ends with a system, library or executable suffix.
///
/// Zero-heap-allocation hot path: the extension is lowercased into a fixed
/// stack buffer rather than allocating a `String` per file.
pub fn is_important_system_file(name: &str) -> bool {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return false,
    };
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_EXT_LEN {
        return false;
    }

    let mut lower = [0u8; MAX_EXT_LEN];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    matches!(
        &lower[..bytes.len()],
        b"sys" | b"dll" | b"exe" | b"drv" | b"so" | b"dylib"
    )
}
