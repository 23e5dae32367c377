use golem_io::{
    DEFAULT_PALETTE, VoxError, decode, grid_from_model, grids_from_bytes, palette_from_file,
    unpack_color,
};

fn chunk(tag: &[u8; 4], content: &[u8], children: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(tag);
    out.extend_from_slice(&(content.len() as u32).to_le_bytes());
    out.extend_from_slice(&(children.len() as u32).to_le_bytes());
    out.extend_from_slice(content);
    out.extend_from_slice(children);
    out
}

fn vox_file(children: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"VOX ");
    out.extend_from_slice(&150u32.to_le_bytes());
    out.extend_from_slice(&chunk(b"MAIN", &[], children));
    out
}

fn size_chunk(x: u32, y: u32, z: u32) -> Vec<u8> {
    let mut c = Vec::new();
    c.extend_from_slice(&x.to_le_bytes());
    c.extend_from_slice(&y.to_le_bytes());
    c.extend_from_slice(&z.to_le_bytes());
    chunk(b"SIZE", &c, &[])
}

fn xyzi_chunk(voxels: &[(u8, u8, u8, u8)]) -> Vec<u8> {
    let mut c = Vec::new();
    c.extend_from_slice(&(voxels.len() as u32).to_le_bytes());
    for &(x, y, z, i) in voxels {
        c.extend_from_slice(&[x, y, z, i]);
    }
    chunk(b"XYZI", &c, &[])
}

fn rgba_chunk(first: [u8; 4]) -> Vec<u8> {
    let mut c = Vec::new();
    c.extend_from_slice(&first);
    for _ in 1..255 {
        c.extend_from_slice(&[7, 7, 7, 255]);
    }
    // Reserved trailing record, must be discarded by the decoder
    c.extend_from_slice(&[9, 9, 9, 9]);
    chunk(b"RGBA", &c, &[])
}

#[test]
fn minimal_file_decodes_to_one_model() {
    let mut children = size_chunk(2, 2, 2);
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 1)]));
    let data = decode(&vox_file(&children)).unwrap();

    assert_eq!(data.models.len(), 1);
    let m = &data.models[0];
    assert_eq!((m.size_x, m.size_y, m.size_z), (2, 2, 2));
    assert_eq!(m.voxels.len(), 1);
    assert_eq!(m.voxels[0].color, 1);
    assert!(!data.custom_palette);
}

#[test]
fn bad_magic_fails() {
    let mut bytes = vox_file(&size_chunk(1, 1, 1));
    bytes[..4].copy_from_slice(b"XOV ");
    assert_eq!(decode(&bytes), Err(VoxError::BadMagic(*b"XOV ")));
}

#[test]
fn bad_version_fails() {
    let mut bytes = vox_file(&[]);
    bytes[4..8].copy_from_slice(&149u32.to_le_bytes());
    assert_eq!(decode(&bytes), Err(VoxError::BadVersion(149)));
}

#[test]
fn missing_main_chunk_fails() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"VOX ");
    bytes.extend_from_slice(&150u32.to_le_bytes());
    bytes.extend_from_slice(&chunk(b"PACK", &[0, 0, 0, 0], &[]));
    assert_eq!(decode(&bytes), Err(VoxError::MissingMainChunk(*b"PACK")));
}

#[test]
fn negative_voxel_count_fails() {
    let mut c = Vec::new();
    c.extend_from_slice(&(-1i32).to_le_bytes());
    let mut children = size_chunk(1, 1, 1);
    children.extend_from_slice(&chunk(b"XYZI", &c, &[]));
    assert_eq!(decode(&vox_file(&children)), Err(VoxError::NegativeVoxelCount(-1)));
}

#[test]
fn truncated_stream_fails() {
    let mut bytes = vox_file(&size_chunk(2, 2, 2));
    bytes.truncate(bytes.len() - 5);
    assert_eq!(decode(&bytes), Err(VoxError::UnexpectedEof));
}

#[test]
fn unknown_chunks_are_skipped() {
    let mut children = size_chunk(2, 2, 2);
    children.extend_from_slice(&chunk(b"nTRN", &[0xde, 0xad, 0xbe, 0xef], &[]));
    children.extend_from_slice(&xyzi_chunk(&[(1, 1, 1, 3)]));
    let data = decode(&vox_file(&children)).unwrap();
    assert_eq!(data.models.len(), 1);
    assert_eq!(data.models[0].voxels.len(), 1);
}

#[test]
fn overlong_chunk_content_does_not_desync() {
    // An XYZI chunk whose declared content is larger than its records; the
    // cursor must land on the declared end before the next chunk.
    let mut c = Vec::new();
    c.extend_from_slice(&1u32.to_le_bytes());
    c.extend_from_slice(&[0, 0, 0, 1]);
    c.extend_from_slice(&[0xaa; 8]); // trailing junk inside the chunk
    let mut children = size_chunk(2, 2, 2);
    children.extend_from_slice(&chunk(b"XYZI", &c, &[]));
    children.extend_from_slice(&size_chunk(3, 3, 3));
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 2)]));

    let data = decode(&vox_file(&children)).unwrap();
    assert_eq!(data.models.len(), 2);
    assert_eq!(data.models[1].size_x, 3);
}

#[test]
fn multiple_models_keep_file_order() {
    let mut children = size_chunk(1, 1, 1);
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 1)]));
    children.extend_from_slice(&size_chunk(4, 5, 6));
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 2), (1, 2, 3, 4)]));

    let data = decode(&vox_file(&children)).unwrap();
    assert_eq!(data.models.len(), 2);
    assert_eq!(data.models[0].voxels.len(), 1);
    assert_eq!(
        (data.models[1].size_x, data.models[1].size_y, data.models[1].size_z),
        (4, 5, 6)
    );
    assert_eq!(data.models[1].voxels.len(), 2);
}

#[test]
fn custom_palette_reported_and_decoded() {
    let mut children = size_chunk(1, 1, 1);
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 1)]));
    children.extend_from_slice(&rgba_chunk([128, 64, 32, 255]));

    let data = decode(&vox_file(&children)).unwrap();
    assert!(data.custom_palette);
    assert_eq!(data.palette[1], [128, 64, 32, 255]);
    // The trailing reserved record never lands in a slot
    assert_eq!(data.palette[255], [7, 7, 7, 255]);

    let pal = palette_from_file(&data);
    assert_eq!(pal.len(), 256);
    let t = pal.get(1).unwrap();
    assert_eq!(t.color, [128.0 / 256.0, 64.0 / 256.0, 32.0 / 256.0, 255.0 / 256.0]);
}

#[test]
fn default_palette_used_without_rgba_chunk() {
    let mut children = size_chunk(1, 1, 1);
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 1)]));

    let data = decode(&vox_file(&children)).unwrap();
    assert!(!data.custom_palette);

    let pal = palette_from_file(&data);
    assert_eq!(pal.len(), 256);
    // Slot 1 of the stock table is white
    assert_eq!(pal.get(1).unwrap().color, unpack_color(DEFAULT_PALETTE[1]));
    assert_eq!(unpack_color(DEFAULT_PALETTE[1]), [255.0 / 256.0; 4]);
}

#[test]
fn grid_conversion_swaps_x_and_y_consistently() {
    let mut children = size_chunk(2, 3, 1);
    children.extend_from_slice(&xyzi_chunk(&[(1, 2, 0, 5)]));
    let data = decode(&vox_file(&children)).unwrap();

    let grid = grid_from_model(&data.models[0], palette_from_file(&data)).unwrap();
    assert_eq!((grid.sx, grid.sy, grid.sz), (3, 2, 1));
    assert_eq!(grid.get(2, 1, 0), 5);
}

#[test]
fn zero_dimension_models_convert_to_none() {
    let data = decode(&vox_file(&xyzi_chunk(&[(0, 0, 0, 1)]))).unwrap();
    assert_eq!(data.models.len(), 1);
    assert!(grid_from_model(&data.models[0], palette_from_file(&data)).is_none());
}

#[test]
fn grids_from_bytes_end_to_end() {
    let mut children = size_chunk(2, 2, 2);
    children.extend_from_slice(&xyzi_chunk(&[(0, 0, 0, 1), (1, 1, 1, 2)]));
    let grids = grids_from_bytes(&vox_file(&children)).unwrap();
    assert_eq!(grids.len(), 1);
    assert!(grids[0].has_voxels());
    assert_eq!(grids[0].palette.len(), 256);
}
