// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Blockroute-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Blockroute and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::Canvas;

/// One `String` per canvas row, untrimmed.
pub fn canvas_lines(canvas: &Canvas) -> Vec<String> {
    if canvas.height() == 0 {
        return Vec::new();
    }
    canvas
        .to_string()
        .split('\n')
        .map(str::to_owned)
        .collect()
}

/// Canvas text with trailing spaces and trailing blank lines removed.
pub fn canvas_to_string_trimmed(canvas: &Canvas) -> String {
    let mut lines = canvas_lines(canvas)
        .into_iter()
        .map(|line| line.trim_end_matches(' ').to_owned())
        .collect::<Vec<_>>();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
