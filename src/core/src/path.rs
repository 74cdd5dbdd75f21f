// Copyright 2026 The Swvk Developers.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A lexical-only path type: everything `GrammarCodegen` needs to turn a
//! requested output directory plus a generated file name into bytes on disk,
//! without ever touching the filesystem itself.
//!
//! Two flavors are supported, selected per-`Path` rather than per-process, so
//! the same binary can normalize grammar-compiler paths the host way while
//! still being testable for the other flavor: [`Flavor::Posix`] has only
//! `AbsoluteRootName` roots (`//host`); [`Flavor::Windows`] additionally has
//! `RelativeRootName` roots (`C:`) and prefers `\` as its separator.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavor {
    Posix,
    Windows,
}

impl Flavor {
    pub fn native() -> Self {
        if cfg!(windows) {
            Flavor::Windows
        } else {
            Flavor::Posix
        }
    }

    fn preferred_separator(self) -> char {
        match self {
            Flavor::Posix => '/',
            Flavor::Windows => '\\',
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            Flavor::Posix => c == '/',
            Flavor::Windows => c == '/' || c == '\\',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartKind {
    RelativeRootName,
    AbsoluteRootName,
    RootDir,
    FileName,
}

/// The `kind` of a whole path: `Multi` once it has more than one part after
/// collapsing; otherwise the single part's own kind (or `Empty`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    Empty,
    Single(PartKind),
    Multi,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Part {
    kind: PartKind,
    text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    flavor: Flavor,
    parts: Vec<Part>,
}

impl Path {
    pub fn new(flavor: Flavor, text: &str) -> Self {
        Path { flavor, parts: parse(flavor, text) }
    }

    pub fn from_native(text: &str) -> Self {
        Self::new(Flavor::native(), text)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn kind(&self) -> PathKind {
        match self.parts.len() {
            0 => PathKind::Empty,
            1 => PathKind::Single(self.parts[0].kind),
            _ => PathKind::Multi,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self.parts.first(), Some(p) if p.kind == PartKind::AbsoluteRootName)
            || (self.has_root_directory() && self.root_name_text().is_none())
    }

    fn root_name_text(&self) -> Option<&str> {
        match self.parts.first() {
            Some(p) if p.kind == PartKind::RelativeRootName || p.kind == PartKind::AbsoluteRootName => {
                Some(p.text.as_str())
            }
            _ => None,
        }
    }

    pub fn has_root_directory(&self) -> bool {
        self.parts.iter().take(2).any(|p| p.kind == PartKind::RootDir)
    }

    pub fn to_string_lossy(&self) -> String {
        let mut out = String::new();
        let mut need_separator = false;
        for part in &self.parts {
            match part.kind {
                PartKind::RelativeRootName | PartKind::AbsoluteRootName => {
                    out.push_str(&part.text);
                    need_separator = false;
                }
                PartKind::RootDir => {
                    out.push(self.flavor.preferred_separator());
                    need_separator = false;
                }
                PartKind::FileName => {
                    if need_separator {
                        out.push(self.flavor.preferred_separator());
                    }
                    out.push_str(&part.text);
                    need_separator = true;
                }
            }
        }
        out
    }

    /// Appends `rhs`, applying the same replace/extend rules as `operator/=`.
    pub fn join(&self, rhs: &Path) -> Path {
        if rhs.is_absolute() {
            return rhs.clone();
        }
        if rhs.root_name_text().is_some() && rhs.root_name_text() != self.root_name_text() {
            return rhs.clone();
        }
        let mut parts = if rhs.has_root_directory() {
            // keep only this path's root name, drop its relative portion
            match self.parts.first() {
                Some(p) if p.kind == PartKind::RelativeRootName || p.kind == PartKind::AbsoluteRootName => {
                    vec![p.clone()]
                }
                _ => Vec::new(),
            }
        } else {
            self.parts.clone()
        };
        // `to_string_lossy` already inserts a separator before a `FileName`
        // part that follows another `FileName` or a `RootDir`, so the two
        // part lists can simply be concatenated here.
        for p in &rhs.parts {
            parts.push(p.clone());
        }
        Path { flavor: self.flavor, parts }
    }

    pub fn lexically_normal(&self) -> Path {
        if self.is_empty() {
            return self.clone();
        }
        let has_root_dir = self.has_root_directory();
        let root_name = self.root_name_text().map(|s| s.to_string());
        let root_kind = self.parts.first().map(|p| p.kind);

        let mut stack: Vec<Part> = Vec::new();
        for part in self.parts.iter().filter(|p| p.kind == PartKind::FileName) {
            if part.text == "." {
                continue;
            }
            if part.text == ".." {
                let can_pop = matches!(stack.last(), Some(p) if p.text != "..");
                if can_pop {
                    stack.pop();
                    continue;
                }
                if has_root_dir {
                    continue;
                }
                stack.push(part.clone());
                continue;
            }
            stack.push(part.clone());
        }
        // trailing ".." keeps an empty filename marker, matching the source's
        // "keep the trailing empty file name" rule
        if let Some(last) = self.parts.iter().rev().find(|p| p.kind == PartKind::FileName) {
            if last.text == ".." {
                if let Some(top) = stack.last() {
                    if top.text == ".." {
                        stack.push(Part { kind: PartKind::FileName, text: String::new() });
                    }
                }
            }
        }

        let mut parts = Vec::new();
        if let (Some(kind), Some(text)) = (root_kind, root_name) {
            parts.push(Part { kind, text });
        }
        if has_root_dir {
            parts.push(Part { kind: PartKind::RootDir, text: self.flavor.preferred_separator().to_string() });
        }
        if stack.is_empty() && parts.is_empty() {
            parts.push(Part { kind: PartKind::FileName, text: ".".to_string() });
        } else {
            parts.extend(stack);
        }
        Path { flavor: self.flavor, parts }
    }

    pub fn lexically_relative(&self, base: &Path) -> Option<Path> {
        if self.root_name_text() != base.root_name_text() {
            return None;
        }
        if self.is_absolute() != base.is_absolute() {
            return None;
        }
        if !self.has_root_directory() && base.has_root_directory() {
            return None;
        }
        let a_files: Vec<&Part> = self.parts.iter().filter(|p| p.kind == PartKind::FileName).collect();
        let b_files: Vec<&Part> = base.parts.iter().filter(|p| p.kind == PartKind::FileName).collect();
        let mut i = 0;
        while i < a_files.len() && i < b_files.len() && a_files[i].text == b_files[i].text {
            i += 1;
        }
        if i == a_files.len() && i == b_files.len() {
            return Some(Path::new(self.flavor, "."));
        }
        let mut up_count: i64 = 0;
        for part in &b_files[i..] {
            if part.text == ".." {
                up_count -= 1;
            } else if part.text != "." {
                up_count += 1;
            }
        }
        if up_count < 0 {
            return None;
        }
        let mut parts = Vec::new();
        for _ in 0..up_count {
            parts.push(Part { kind: PartKind::FileName, text: "..".to_string() });
        }
        for part in &a_files[i..] {
            parts.push((*part).clone());
        }
        if parts.is_empty() {
            return Some(Path::new(self.flavor, "."));
        }
        Some(Path { flavor: self.flavor, parts })
    }

    pub fn lexically_proximate(&self, base: &Path) -> Path {
        match self.lexically_relative(base) {
            Some(p) if !p.is_empty() => p,
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}


/// Splits `text` into root-name, root-directory, and file-name parts. `..`
/// and `.` are ordinary file names at this stage; `lexically_normal`
/// interprets them.
fn parse(flavor: Flavor, text: &str) -> Vec<Part> {
    if text.is_empty() {
        return Vec::new();
    }
    let chars: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut i = 0usize;

    // root name detection
    if flavor == Flavor::Windows && chars.len() >= 2 && chars[1] == ':' && chars[0].is_ascii_alphabetic() {
        parts.push(Part { kind: PartKind::RelativeRootName, text: chars[..2].iter().collect() });
        i = 2;
    } else if chars.len() >= 2 && flavor.is_separator(chars[0]) && flavor.is_separator(chars[1]) {
        // "//host" style absolute root name: exactly two leading separators
        // per POSIX (three or more collapse to an ordinary root directory).
        let third_is_sep = chars.get(2).map(|c| flavor.is_separator(*c)).unwrap_or(false);
        if !third_is_sep {
            let start = i;
            let mut j = i + 2;
            while j < chars.len() && !flavor.is_separator(chars[j]) {
                j += 1;
            }
            parts.push(Part { kind: PartKind::AbsoluteRootName, text: chars[start..j].iter().collect() });
            i = j;
        }
    }

    if i < chars.len() && flavor.is_separator(chars[i]) {
        parts.push(Part { kind: PartKind::RootDir, text: flavor.preferred_separator().to_string() });
        while i < chars.len() && flavor.is_separator(chars[i]) {
            i += 1;
        }
    }

    while i < chars.len() {
        let start = i;
        while i < chars.len() && !flavor.is_separator(chars[i]) {
            i += 1;
        }
        if i > start {
            parts.push(Part { kind: PartKind::FileName, text: chars[start..i].iter().collect() });
        }
        while i < chars.len() && flavor.is_separator(chars[i]) {
            i += 1;
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dot_and_dot_dot() {
        let p = Path::new(Flavor::Posix, "a/b/../c/./d");
        assert_eq!(p.lexically_normal().to_string_lossy(), "a/c/d");
    }

    #[test]
    fn relative_between_siblings() {
        let a = Path::new(Flavor::Posix, "/a");
        let b = Path::new(Flavor::Posix, "/b");
        assert_eq!(a.lexically_relative(&b).unwrap().to_string_lossy(), "../a");
    }

    #[test]
    fn normalization_is_idempotent() {
        for text in ["a/b/../c/./d", "/a/../../b", "../x/y", ".", "a//b///c", "/"] {
            let p = Path::new(Flavor::Posix, text);
            let once = p.lexically_normal();
            let twice = once.lexically_normal();
            assert_eq!(once, twice, "not idempotent for {}", text);
        }
    }

    #[test]
    fn relative_inverse_round_trips_through_normal() {
        let base = Path::new(Flavor::Posix, "/a/b/c");
        for text in ["/a/b/c/d/e", "/a/x", "/a/b/c"] {
            let p = Path::new(Flavor::Posix, text);
            let rel = p.lexically_relative(&base).unwrap();
            let rejoined = base.join(&rel).lexically_normal();
            assert_eq!(rejoined, p.lexically_normal(), "base={} p={}", base, p);
        }
    }

    #[test]
    fn windows_drive_letter_root_name() {
        let p = Path::new(Flavor::Windows, "C:\\a\\b");
        assert!(p.is_absolute());
        assert_eq!(p.to_string_lossy(), "C:\\a\\b");
    }
}
