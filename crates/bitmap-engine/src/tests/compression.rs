use super::test_image;
use crate::{Compressed, HuffmanTree, compress, decompress, decompress_exact};

#[test]
fn test_image_round_trip() {
    let img = test_image();
    let compressed = compress(&img);
    assert_eq!(compressed.symbol_count, img.pixels().len());

    let loose = decompress(&compressed.bytes, &compressed.tree).unwrap();
    assert!(loose.starts_with(img.pixels()));
    assert!(loose.len() - img.pixels().len() < 8);

    let exact = decompress_exact(&compressed.bytes, &compressed.tree, compressed.symbol_count)
        .unwrap();
    assert_eq!(exact, img.pixels());
}

#[test]
fn test_compressed_serializes_with_tree() {
    let compressed = compress(&test_image());
    let json = serde_json::to_string(&compressed).unwrap();
    let back: Compressed = serde_json::from_str(&json).unwrap();
    assert_eq!(back, compressed);
    assert_eq!(back.decompress().unwrap(), test_image().pixels());
}

#[test]
fn test_skewed_data_shrinks() {
    let mut data = vec![0u8; 4000];
    data.extend((0..=255u8).collect::<Vec<_>>());
    let compressed = crate::compress_bytes(&data);
    assert!(compressed.bytes.len() < data.len() / 2);
    assert!(!HuffmanTree::from_data(&data).is_empty());
}
