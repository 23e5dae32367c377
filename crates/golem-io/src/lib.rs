//! Voxel-model file import: chunk-format decoder and grid conversion.
//!
//! The format is a little-endian chunk stream: a 4-byte magic tag and
//! version, then one `MAIN` container whose children carry model dimensions
//! (`SIZE`), sparse voxel records (`XYZI`) and an optional custom palette
//! (`RGBA`). Unknown chunks are skipped by their declared length, so a
//! partially understood file never desynchronizes the walk.
#![forbid(unsafe_code)]

mod default_palette;

pub use default_palette::DEFAULT_PALETTE;

use golem_grid::{Palette, VoxelGrid};

pub const MAGIC: [u8; 4] = *b"VOX ";
pub const VERSION: u32 = 150;

const TAG_MAIN: [u8; 4] = *b"MAIN";
const TAG_SIZE: [u8; 4] = *b"SIZE";
const TAG_XYZI: [u8; 4] = *b"XYZI";
const TAG_RGBA: [u8; 4] = *b"RGBA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoxError {
    /// The stream does not start with the `VOX ` tag.
    BadMagic([u8; 4]),
    /// The format version is not the expected one.
    BadVersion(u32),
    /// The top-level container chunk is missing or mislabeled.
    MissingMainChunk([u8; 4]),
    /// A voxel chunk declared a negative record count.
    NegativeVoxelCount(i32),
    /// The stream ended inside a read.
    UnexpectedEof,
}

impl std::fmt::Display for VoxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoxError::BadMagic(tag) => {
                write!(f, "magic number does not match: {:?}", tag)
            }
            VoxError::BadVersion(v) => write!(f, "version does not match: {}", v),
            VoxError::MissingMainChunk(tag) => {
                write!(f, "main chunk is not found, got {:?}", tag)
            }
            VoxError::NegativeVoxelCount(n) => {
                write!(f, "negative number of voxels: {}", n)
            }
            VoxError::UnexpectedEof => write!(f, "unexpected end of stream"),
        }
    }
}

impl std::error::Error for VoxError {}

/// One sparse voxel record: byte coordinates plus a palette index in
/// `1..=255` (0 is never emitted by the source format).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawVoxel {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub color: u8,
}

/// Dimensions plus sparse voxel list, exactly as stored in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawModel {
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    pub voxels: Vec<RawVoxel>,
}

/// Full decode result: models in file order and the palette situation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxData {
    pub models: Vec<RawModel>,
    /// Whether the file carried its own `RGBA` chunk.
    pub custom_palette: bool,
    /// Raw RGBA records, slots 1..=255 filled from the file; slot 0 is the
    /// reserved placeholder. Meaningful only when `custom_palette` is set.
    pub palette: [[u8; 4]; 256],
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read(&mut self, n: usize) -> Result<&'a [u8], VoxError> {
        let end = self.pos.checked_add(n).ok_or(VoxError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(VoxError::UnexpectedEof);
        }
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn read_tag(&mut self) -> Result<[u8; 4], VoxError> {
        let b = self.read(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    fn read_u32(&mut self) -> Result<u32, VoxError> {
        let b = self.read(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, VoxError> {
        Ok(self.read_u32()? as i32)
    }

    /// Forces the cursor to an absolute offset; used to land on a chunk's
    /// computed end regardless of how much of it was consumed.
    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }
}

struct ChunkHeader {
    tag: [u8; 4],
    content: u32,
    /// Absolute offset one past the chunk's content and children.
    end: usize,
}

fn read_chunk(r: &mut Reader<'_>) -> Result<ChunkHeader, VoxError> {
    let tag = r.read_tag()?;
    let content = r.read_u32()?;
    let children = r.read_u32()?;
    let end = r
        .pos
        .saturating_add(content as usize)
        .saturating_add(children as usize);
    Ok(ChunkHeader { tag, content, end })
}

/// Decodes a voxel-model byte stream.
///
/// All-or-nothing: any failure aborts the decode and returns no partial
/// model list.
pub fn decode(bytes: &[u8]) -> Result<VoxData, VoxError> {
    let mut r = Reader::new(bytes);

    let magic = r.read_tag()?;
    if magic != MAGIC {
        return Err(VoxError::BadMagic(magic));
    }
    let version = r.read_u32()?;
    if version != VERSION {
        return Err(VoxError::BadVersion(version));
    }

    let main = read_chunk(&mut r)?;
    if main.tag != TAG_MAIN {
        return Err(VoxError::MissingMainChunk(main.tag));
    }
    // Direct content of the container is not ours to interpret.
    let after_content = r.pos.saturating_add(main.content as usize);
    r.seek(after_content);

    let mut models = Vec::new();
    let mut custom_palette = false;
    let mut palette = [[0u8; 4]; 256];
    // Dimensions persist across chunks until the next SIZE resets them.
    let mut size = (0u32, 0u32, 0u32);

    while r.pos < main.end {
        let sub = read_chunk(&mut r)?;
        if sub.tag == TAG_SIZE {
            size = (r.read_u32()?, r.read_u32()?, r.read_u32()?);
        } else if sub.tag == TAG_XYZI {
            let count = r.read_i32()?;
            if count < 0 {
                return Err(VoxError::NegativeVoxelCount(count));
            }
            let mut voxels = Vec::with_capacity(count.min(1 << 20) as usize);
            for _ in 0..count {
                let b = r.read(4)?;
                voxels.push(RawVoxel {
                    x: b[0],
                    y: b[1],
                    z: b[2],
                    color: b[3],
                });
            }
            models.push(RawModel {
                size_x: size.0,
                size_y: size.1,
                size_z: size.2,
                voxels,
            });
        } else if sub.tag == TAG_RGBA {
            custom_palette = true;
            for slot in 1..=255usize {
                let b = r.read(4)?;
                palette[slot] = [b[0], b[1], b[2], b[3]];
            }
            // Trailing record is reserved; read and discard.
            let _ = r.read(4)?;
        }
        // Land on the chunk's declared end whether or not it was consumed
        // (or even recognized).
        r.seek(sub.end);
    }

    log::debug!(
        "decoded {} model(s), custom palette: {}",
        models.len(),
        custom_palette
    );
    Ok(VoxData {
        models,
        custom_palette,
        palette,
    })
}

/// Unpacks a `0xRRGGBBAA` color from the built-in table; channels divide by
/// 256, matching the file palette decode.
#[inline]
pub fn unpack_color(packed: u32) -> [f32; 4] {
    [
        ((packed >> 24) & 0xff) as f32 / 256.0,
        ((packed >> 16) & 0xff) as f32 / 256.0,
        ((packed >> 8) & 0xff) as f32 / 256.0,
        (packed & 0xff) as f32 / 256.0,
    ]
}

/// Converts one stored RGBA record to a normalized color.
#[inline]
pub fn color_from_rgba(rgba: [u8; 4]) -> [f32; 4] {
    [
        rgba[0] as f32 / 256.0,
        rgba[1] as f32 / 256.0,
        rgba[2] as f32 / 256.0,
        rgba[3] as f32 / 256.0,
    ]
}

/// Builds the in-memory palette for a decoded file: the reserved tile at
/// index 0, then the 255 colors of the custom table, or of the built-in
/// default when the file had none.
pub fn palette_from_file(data: &VoxData) -> Palette {
    if data.custom_palette {
        Palette::with_reserved(data.palette[1..=255].iter().map(|&c| color_from_rgba(c)))
    } else {
        Palette::with_reserved(DEFAULT_PALETTE[1..=255].iter().map(|&c| unpack_color(c)))
    }
}

/// Converts one raw model to a grid.
///
/// The file's X and Y axes are swapped relative to the grid convention;
/// the swap is applied here exactly once, to dimensions and voxel records
/// alike. Returns `None` when any dimension is zero. Records whose color
/// does not index `palette` are dropped (impossible for the file's own
/// 256-entry palettes, possible with a caller-supplied override).
pub fn grid_from_model(model: &RawModel, palette: Palette) -> Option<VoxelGrid> {
    if model.size_x == 0 || model.size_y == 0 || model.size_z == 0 {
        return None;
    }
    let mut grid = VoxelGrid::new(
        palette,
        model.size_y as usize,
        model.size_x as usize,
        model.size_z as usize,
    );
    let mut dropped = 0usize;
    for v in &model.voxels {
        if grid.set(v.y as i32, v.x as i32, v.z as i32, v.color as u16).is_err() {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!("dropped {} voxel(s) outside the palette", dropped);
    }
    Some(grid)
}

/// Decodes a byte stream and converts every model to a grid, sharing the
/// file's palette. Models with a zero dimension are skipped.
pub fn grids_from_bytes(bytes: &[u8]) -> Result<Vec<VoxelGrid>, VoxError> {
    let data = decode(bytes)?;
    let palette = palette_from_file(&data);
    Ok(data
        .models
        .iter()
        .filter_map(|m| grid_from_model(m, palette.clone()))
        .collect())
}
