// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Turn configured labels and identifiers into safe archive name components.

/// Label used when nothing printable survives sanitising.
const FALLBACK_LABEL: &str = "solution";

/// Basenames Windows refuses to create.
const RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Produce a single filesystem-safe path component.
///
/// Unicode is transliterated with `deunicode`, anything other than ASCII
/// alphanumerics, `-`, `_` and `.` becomes `_`, runs of `_` or `.` collapse,
/// and trailing dots are dropped. Reserved device names get a `_` suffix.
pub fn sanitize_component(value: &str) -> String {
    let ascii = deunicode::deunicode(value);
    let mut out = String::with_capacity(ascii.len());

    for ch in ascii.trim().chars() {
        let ch = match ch {
            c if c.is_ascii_alphanumeric() || c == '-' => c,
            '.' => '.',
            _ => '_',
        };
        let repeat = (ch == '_' || ch == '.') && out.ends_with(ch);
        // "_." reads as noise; keep the dot only.
        if ch == '.' && out.ends_with('_') {
            out.pop();
        }
        if !repeat {
            out.push(ch);
        }
    }

    let trimmed = out.trim_end_matches(['.', '_']).trim_start_matches('_');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return FALLBACK_LABEL.to_string();
    }

    let (base, ext) = match trimmed.split_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (trimmed, None),
    };
    if RESERVED.iter().any(|r| r.eq_ignore_ascii_case(base)) {
        return match ext {
            Some(ext) => format!("{base}_.{ext}"),
            None => format!("{base}_"),
        };
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::sanitize_component;

    #[test]
    fn transliterates_and_replaces_separators() {
        assert_eq!(sanitize_component("Lösung Gruppe 4"), "Losung_Gruppe_4");
        assert_eq!(sanitize_component("a/b\\c"), "a_b_c");
    }

    #[test]
    fn collapses_runs_and_trims_edges() {
        assert_eq!(sanitize_component("  my  label.. "), "my_label");
        assert_eq!(sanitize_component("__x__"), "x");
    }

    #[test]
    fn keeps_plain_labels_untouched() {
        assert_eq!(sanitize_component("solution"), "solution");
        assert_eq!(sanitize_component("123456"), "123456");
    }

    // Reserved Windows device names in the basename get a suffix.
    #[test]
    fn suffixes_reserved_device_names() {
        assert_eq!(sanitize_component("con"), "con_");
        assert_eq!(sanitize_component("NUL.txt"), "NUL_.txt");
    }

    #[test]
    fn falls_back_when_nothing_survives() {
        assert_eq!(sanitize_component("..."), "solution");
        assert_eq!(sanitize_component("   "), "solution");
    }
}
