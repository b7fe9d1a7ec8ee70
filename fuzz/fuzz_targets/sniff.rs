// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![no_main]

use libfuzzer_sys::fuzz_target;

use std::fs;
use tarsniff::{ArchiveFormat, Sniffer};
use tempfile::tempdir;

fuzz_target!(|data: &[u8]| {
    // Sniffing must never panic, and must agree between the reader and path
    // entry points.
    let from_reader = tarsniff::sniff(data);

    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("input");
    fs::write(&path, data).unwrap();
    assert_eq!(tarsniff::sniff_path(&path), from_reader);
    assert_eq!(tarsniff::sniff_path(&path), from_reader);

    // Only gzip input can come back as a compressed archive.
    if from_reader == Some(ArchiveFormat::GzipTar) {
        assert!(data.starts_with(&[0x1f, 0x8b]));
        let mut plain = Sniffer::new();
        plain.set_decompress_gzip(false);
        assert_eq!(plain.sniff(data), None);
    }
});
