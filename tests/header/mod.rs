use tarsniff::Header;

fn view(h: &tar::Header) -> &Header {
    Header::from_byte_slice(&h.as_bytes()[..])
}

#[test]
fn checksum_agrees_with_writer() {
    for mut h in [
        tar::Header::new_gnu(),
        tar::Header::new_ustar(),
        tar::Header::new_old(),
    ] {
        t!(h.set_path("foo/bar"));
        h.set_size(1234);
        h.set_mode(0o644);
        h.set_cksum();

        let ours = view(&h);
        assert_eq!(t!(ours.cksum()), ours.calculated_cksum());
        assert_eq!(t!(ours.cksum()), t!(h.cksum()));
        assert_eq!(
            ours.calculated_cksum() as i64,
            ours.calculated_signed_cksum()
        );
    }
}

#[test]
fn ustar_magic() {
    assert!(view(&tar::Header::new_gnu()).is_ustar());
    assert!(view(&tar::Header::new_ustar()).is_ustar());
    assert!(!view(&tar::Header::new_old()).is_ustar());
}

#[test]
fn size() {
    let mut h = tar::Header::new_gnu();
    h.set_size(1234);
    assert_eq!(t!(view(&h).size()), 1234);

    // Too large for the octal field, so stored as base-256.
    h.set_size(1 << 40);
    assert_eq!(t!(view(&h).size()), 1 << 40);
}

#[test]
fn long_ustar_path_uses_prefix() {
    let mut h = tar::Header::new_ustar();
    let dir = "abcd/".repeat(30);
    let path = format!("{}file", dir);
    t!(h.set_path(&path));
    assert!(h.as_ustar().unwrap().prefix[0] != 0);
    assert_eq!(&*view(&h).path_bytes(), path.as_bytes());
}

#[test]
fn old_header_ignores_prefix_area() {
    let mut h = tar::Header::new_old();
    t!(h.set_path("plain"));
    assert_eq!(&*view(&h).path_bytes(), b"plain");
}

#[test]
fn corrupted_fields() {
    let mut block = tar::Header::new_gnu().as_bytes().to_vec();
    block[124..136].copy_from_slice(b"not a size\0\0");
    block[148..156].copy_from_slice(b"1x345\0\0\0");
    let h = Header::from_byte_slice(&block);
    assert!(h.size().is_err());
    assert!(h.cksum().is_err());
}

#[test]
fn debug_shows_path() {
    let mut h = tar::Header::new_gnu();
    t!(h.set_path("hello.txt"));
    h.set_cksum();
    let s = format!("{:?}", view(&h));
    assert!(s.contains("hello.txt"), "{}", s);
}

#[test]
fn mode_and_mtime() {
    let mut h = tar::Header::new_gnu();
    h.set_mode(0o755);
    h.set_mtime(1_500_000_000);
    h.set_cksum();
    let ours = view(&h);
    assert_eq!(t!(ours.mode()), 0o755);
    assert_eq!(t!(ours.mtime()), 1_500_000_000);
}

#[test]
fn validate() {
    let mut h = tar::Header::new_gnu();
    t!(h.set_path("foo"));
    h.set_cksum();
    t!(view(&h).validate());

    let mut block = h.as_bytes().to_vec();
    block[0] = b'g';
    assert!(Header::from_byte_slice(&block).validate().is_err());

    block[0] = b'f';
    block[148..156].copy_from_slice(b"\0\0\0\0\0\0\0\0");
    assert!(Header::from_byte_slice(&block).validate().is_err());
}
