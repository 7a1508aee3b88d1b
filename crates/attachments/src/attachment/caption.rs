// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Produces the placeholder shown in an empty caption. The text is for
/// display only and never written into the attachment attributes.
pub trait CaptionPlaceholder {
    fn placeholder(&self, file_name: &str, file_size: &str) -> String;
}

/// `"name.png · 1.5 KB"`, falling back to whichever half is known.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileNamePlaceholder;

impl CaptionPlaceholder for FileNamePlaceholder {
    fn placeholder(&self, file_name: &str, file_size: &str) -> String {
        let size = match file_size.parse::<u64>() {
            Ok(bytes) => format_file_size(bytes),
            Err(_) => file_size.to_owned(),
        };
        match (file_name.is_empty(), size.is_empty()) {
            (false, false) => format!("{file_name} \u{b7} {size}"),
            (false, true) => file_name.to_owned(),
            (true, false) => size,
            (true, true) => String::from("Add a caption"),
        }
    }
}

const SIZE_UNITS: [&str; 6] = ["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Human readable size in base 1024 with at most two decimals, trailing
/// zeros dropped: `1536` is `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    match bytes {
        0 => return String::from("0 Bytes"),
        1 => return String::from("1 Byte"),
        _ => {}
    }
    let mut exponent = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && exponent < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }
    let fixed = format!("{scaled:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[exponent])
}
