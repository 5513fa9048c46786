//! Address to function name lookup

use std::io::Write;

use crate::domain::{PrintMode, ProfileError};
use crate::symbolization::{ResolvedFrame, Symbolizer};

/// Parse an address written as `0x..` hex, `0o..` or leading-`0` octal, `0b..` binary or decimal
#[must_use]
pub fn parse_address(word: &str) -> Option<u64> {
    let word = word.trim();
    let (digits, radix) = if let Some(hex) =
        word.strip_prefix("0x").or_else(|| word.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(oct) = word.strip_prefix("0o") {
        (oct, 8)
    } else if let Some(bin) = word.strip_prefix("0b") {
        (bin, 2)
    } else if word.len() > 1 && word.starts_with('0') {
        (&word[1..], 8)
    } else {
        (word, 10)
    };
    u64::from_str_radix(digits, radix).ok()
}

/// Write `0x<addr> <function>` for every word that resolves
///
/// Words that don't parse, parse to zero, or don't resolve are skipped.
/// Detailed mode prints every inlined frame with its source location instead.
///
/// # Errors
/// Returns [`ProfileError::SinkWrite`] if the sink rejects the output
pub fn write_symbols<W, F>(
    words: &[String],
    mode: PrintMode,
    resolve: F,
    w: &mut W,
) -> Result<(), ProfileError>
where
    W: Write + ?Sized,
    F: Fn(u64) -> Option<ResolvedFrame>,
{
    let addrs = words.iter().filter_map(|word| parse_address(word)).filter(|a| *a != 0);
    for (idx, frame) in addrs.filter_map(resolve).enumerate() {
        let Some(function) = frame.function() else {
            continue;
        };
        match mode {
            PrintMode::Normal => writeln!(w, "{:#x} {function}", frame.addr),
            PrintMode::Detailed => writeln!(w, "{}", frame.format(idx)),
        }
        .map_err(ProfileError::sink)?;
    }
    Ok(())
}

/// Resolve live addresses of this process against its own debug info
///
/// # Errors
/// Returns [`ProfileError::SymbolizationFailed`] if the executable has no
/// usable debug info, or a sink error
pub fn write_self_symbols<W: Write + ?Sized>(
    words: &[String],
    mode: PrintMode,
    w: &mut W,
) -> Result<(), ProfileError> {
    let symbolizer = Symbolizer::for_current_exe()
        .map_err(|e| ProfileError::SymbolizationFailed(format!("{e:#}")))?;

    write_symbols(words, mode, |addr| symbolizer.resolve_runtime(addr), w)
}
