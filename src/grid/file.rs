use super::block::Block;
use super::grid::Grid;
use super::solution::Solution;
use crate::error::Error;
use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// grid file magic, version 2 of the Bloc Grid File format
const MAGIC: &[u8; 4] = b"BGF2";

fn truncated(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::InvalidGridFile("truncated file"),
        _ => Error::Io(e),
    }
}

impl Grid {
    /// read a grid and its minimum group size from a BGF2 stream:
    /// 4 magic bytes, width, height, min group size, then
    /// width * height block bytes (0 = empty, 1..=7 = colors)
    pub fn read(mut reader: impl Read) -> Result<(Grid, usize), Error> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(truncated)?;
        if &magic != MAGIC {
            return Err(Error::InvalidGridFile("magic bytes corrupted"));
        }
        let width = reader.read_u8().map_err(truncated)?;
        let height = reader.read_u8().map_err(truncated)?;
        if (width == 0) != (height == 0) {
            return Err(Error::InvalidGridFile("width/height invalid"));
        }
        let min_group_size = reader.read_u8().map_err(truncated)?;
        if min_group_size < 1 {
            return Err(Error::InvalidGridFile("minimum group size out of range"));
        }
        let mut bytes = vec![0u8; width as usize * height as usize];
        reader.read_exact(&mut bytes).map_err(truncated)?;
        if bytes.iter().any(|&b| b > 7) {
            return Err(Error::InvalidGridFile("block byte out of range"));
        }
        let blocks = bytes.into_iter().map(Block::from).collect();
        let grid = Grid::new(width, height, blocks, Solution::default());
        Ok((grid, min_group_size as usize))
    }

    /// write this grid and the minimum group size in BGF2 layout
    pub fn write(&self, mut writer: impl Write, min_group_size: usize) -> Result<(), Error> {
        if !(1..=255).contains(&min_group_size) {
            return Err(Error::InvalidArgument(
                "minimum group size must fit in one byte".to_string(),
            ));
        }
        writer.write_all(MAGIC)?;
        writer.write_u8(self.width())?;
        writer.write_u8(self.height())?;
        writer.write_u8(min_group_size as u8)?;
        for &block in self.blocks() {
            writer.write_u8(u8::from(block))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u8, height: u8, cells: &[u8]) -> Grid {
        Grid::new(
            width,
            height,
            cells.iter().copied().map(Block::from).collect(),
            Solution::default(),
        )
    }

    #[test]
    fn round_trip() {
        let g = grid(3, 2, &[1, 2, 3, 4, 5, 6]);
        let mut bytes = Vec::new();
        g.write(&mut bytes, 4).unwrap();
        let (read, min_group_size) = Grid::read(&bytes[..]).unwrap();
        assert_eq!(read, g);
        assert_eq!(min_group_size, 4);
    }

    #[test]
    fn layout() {
        let g = grid(2, 1, &[1, 7]);
        let mut bytes = Vec::new();
        g.write(&mut bytes, 2).unwrap();
        assert_eq!(bytes, b"BGF2\x02\x01\x02\x01\x07");
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = b"BGF1\x01\x01\x02\x01";
        assert!(matches!(
            Grid::read(&bytes[..]),
            Err(Error::InvalidGridFile(_))
        ));
    }

    #[test]
    fn rejects_mismatched_zero_dimensions() {
        let bytes = b"BGF2\x00\x01\x02";
        assert!(matches!(
            Grid::read(&bytes[..]),
            Err(Error::InvalidGridFile(_))
        ));
    }

    #[test]
    fn rejects_zero_min_group_size() {
        let bytes = b"BGF2\x01\x01\x00\x01";
        assert!(matches!(
            Grid::read(&bytes[..]),
            Err(Error::InvalidGridFile(_))
        ));
    }

    #[test]
    fn rejects_truncation() {
        let bytes = b"BGF2\x02\x02\x02\x01";
        assert!(matches!(
            Grid::read(&bytes[..]),
            Err(Error::InvalidGridFile("truncated file"))
        ));
    }

    #[test]
    fn rejects_block_out_of_range() {
        let bytes = b"BGF2\x01\x01\x02\x08";
        assert!(matches!(
            Grid::read(&bytes[..]),
            Err(Error::InvalidGridFile("block byte out of range"))
        ));
    }
}
