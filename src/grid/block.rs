/// a single cell of a grid. Empty is the absence of a block,
/// the seven colors are the playable values. the on-disk and
/// the packed encodings both use the discriminant directly
/// (0 = Empty, 1..=7 = colors), so a block fits in 3 bits.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Block {
    #[default]
    Empty,
    White,
    Red,
    Green,
    Blue,
    Magenta,
    Yellow,
    Cyan,
}

/// u8 isomorphism
/// the low 3 bits select the block; masking makes the
/// conversion total, which is what the packed decoder needs
impl From<u8> for Block {
    fn from(n: u8) -> Self {
        match n & 0b111 {
            0 => Block::Empty,
            1 => Block::White,
            2 => Block::Red,
            3 => Block::Green,
            4 => Block::Blue,
            5 => Block::Magenta,
            6 => Block::Yellow,
            7 => Block::Cyan,
            _ => unreachable!(),
        }
    }
}
impl From<Block> for u8 {
    fn from(block: Block) -> Self {
        block as u8
    }
}
