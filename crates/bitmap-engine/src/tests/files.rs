use super::test_image;
use crate::{GuestDimensions, Image, Pixel, codec, decrypt, encrypt, load, save, save_encoded, stego};

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("picture.bmp");
    let img = test_image();

    save(&img, &path).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, img);

    // 5 pixels * 3 bytes = 15, padded to 16 per row
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 54 + 16 * 3);
    assert_eq!(&bytes[..2], b"BM");
}

#[test]
fn test_bottom_up_storage() {
    let img = test_image();
    let bytes = codec::encode(&img);
    // The first stored row is the bottom row (y = 2), pixel (0, 2) in BGR order.
    let p = img.pixel(0, 2).unwrap();
    assert_eq!(&bytes[54..57], &[p.blue, p.green, p.red]);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load(dir.path().join("absent.bmp")),
        Err(crate::BitmapError::Io(_))
    ));
}

#[test]
fn test_hide_and_decrypt_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carrier.bmp");

    let mut host = Image::create(6, 4).unwrap();
    host.fill(Pixel::new(0x80, 0x40, 0x20));
    let guest = test_image();

    let encoded = encrypt(&host, &guest).unwrap();
    save_encoded(&encoded, &path).unwrap();

    let sidecar = std::fs::read_to_string(stego::sidecar_path(&path)).unwrap();
    let dims: GuestDimensions = serde_json::from_str(&sidecar).unwrap();
    assert_eq!(dims, GuestDimensions { height: 3, width: 5 });

    let revealed = decrypt(&path).unwrap();
    assert_eq!(revealed.dimensions(), (5, 3));
    for y in 0..3 {
        for x in 0..5 {
            let expected = guest.pixel(x, y).unwrap().map(|c| c & 0xF0);
            assert_eq!(revealed.pixel(x, y).unwrap(), expected);
        }
    }
}

#[test]
fn test_decrypt_without_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.bmp");
    save(&test_image(), &path).unwrap();
    assert!(matches!(decrypt(&path), Err(crate::BitmapError::Io(_))));
}
