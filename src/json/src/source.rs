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

//! An immutable text source: file name, content bytes, and a line-start
//! index precomputed once so any [`Location`] into it can answer `(line,
//! column)` in `O(log N)`.

use std::io::Read;
use std::sync::Arc;

pub const DEFAULT_TAB_SIZE: usize = 8;

#[derive(Debug)]
pub struct Source {
    file_name: String,
    contents: Vec<u8>,
    /// Byte index of the start of every line after the first.
    line_start_indexes: Vec<usize>,
}

impl Source {
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Arc<Source> {
        let line_start_indexes = find_line_start_indexes(&contents);
        Arc::new(Source { file_name: file_name.into(), contents, line_start_indexes })
    }

    pub fn from_str(file_name: impl Into<String>, contents: &str) -> Arc<Source> {
        Self::new(file_name, contents.as_bytes().to_vec())
    }

    pub fn load_file(path: &std::path::Path) -> std::io::Result<Arc<Source>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(Self::new(path.to_string_lossy().into_owned(), contents))
    }

    pub fn load_stdin() -> std::io::Result<Arc<Source>> {
        let mut contents = Vec::new();
        std::io::stdin().read_to_end(&mut contents)?;
        Ok(Self::new("stdin", contents))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// `(line, byte index of that line's first byte)` for `byte_index`, 1-based line.
    pub fn line_and_start_index(&self, byte_index: usize) -> (usize, usize) {
        // number of line starts <= byte_index
        let line_starts_before = self.line_start_indexes.partition_point(|&start| start <= byte_index);
        let line = line_starts_before + 1;
        let start = if line <= 1 { 0 } else { self.line_start_indexes[line - 2] };
        (line, start)
    }

    pub fn line_and_column(&self, byte_index: usize, tab_size: usize) -> (usize, usize) {
        let (line, start) = self.line_and_start_index(byte_index);
        let mut column = 1usize;
        for &byte in &self.contents[start..byte_index.min(self.contents.len())] {
            if byte == b'\t' {
                column = column_after_tab(column, tab_size);
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

fn column_after_tab(column: usize, tab_size: usize) -> usize {
    if tab_size == 0 || column == 0 {
        column + 1
    } else {
        column + (tab_size - (column - 1) % tab_size)
    }
}

fn find_line_start_indexes(contents: &[u8]) -> Vec<usize> {
    let mut indexes = Vec::new();
    let mut i = 0;
    while i < contents.len() {
        let ch = contents[i];
        if i + 1 < contents.len() && ch == b'\r' && contents[i + 1] == b'\n' {
            indexes.push(i + 2);
            i += 2;
            continue;
        }
        if ch == b'\r' || ch == b'\n' {
            indexes.push(i + 1);
        }
        i += 1;
    }
    indexes
}

/// A byte offset into a [`Source`]. Cheap to copy; keeps the source alive
/// via shared ownership so it can outlive the parser that produced it.
#[derive(Clone, Debug)]
pub struct Location {
    source: Option<Arc<Source>>,
    byte_index: usize,
}

impl Location {
    pub fn new(source: Arc<Source>, byte_index: usize) -> Self {
        debug_assert!(byte_index <= source.len());
        Location { source: Some(source), byte_index }
    }

    pub fn none() -> Self {
        Location { source: None, byte_index: 0 }
    }

    pub fn byte_index(&self) -> usize {
        self.byte_index
    }

    pub fn line_and_column(&self, tab_size: usize) -> (usize, usize) {
        match &self.source {
            Some(source) => source.line_and_column(self.byte_index, tab_size),
            None => (0, 0),
        }
    }

    pub fn to_string_with_tab_size(&self, tab_size: usize) -> String {
        let file_name = match &self.source {
            Some(source) if !source.file_name().is_empty() => source.file_name().to_string(),
            _ => "<unknown>".to_string(),
        };
        let (line, column) = self.line_and_column(tab_size);
        format!("{}:{}:{}", file_name, line, column)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_with_tab_size(DEFAULT_TAB_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_indexing_handles_crlf() {
        let source = Source::from_str("t", "a\r\nb\nc\rd");
        assert_eq!(source.line_and_start_index(0), (1, 0));
        assert_eq!(source.line_and_start_index(3), (2, 3));
        assert_eq!(source.line_and_start_index(5), (3, 5));
        assert_eq!(source.line_and_start_index(7), (4, 7));
    }

    #[test]
    fn tab_stops_advance_column() {
        let source = Source::from_str("t", "\tx");
        assert_eq!(source.line_and_column(1, 8), (1, 9));
    }
}
