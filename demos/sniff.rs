use std::env;

use tarsniff::ArchiveFormat;

fn main() {
    env_logger::init();
    for path in env::args_os().skip(1) {
        let kind = match tarsniff::sniff_path(&path) {
            Some(ArchiveFormat::Tar) => "tar",
            Some(ArchiveFormat::GzipTar) => "tar+gzip",
            None => "not an archive",
        };
        println!("{}: {}", path.to_string_lossy(), kind);
    }
}
