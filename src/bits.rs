//! # 比特分块模块
//!
//! 把字节序列拆成固定宽度的比特块 ([`BitChunkSplitter`])，以及把比特块重新拼回字节
//! ([`BitChunkJoiner`])。两者对任意合法宽度互为逆运算：每个字节都从最高位开始，
//! 依次取出 `8 / k` 个宽度为 `k` 的块。

use crate::constants::DEFAULT_CHUNK_WIDTH;
use crate::error::{Result, StegoError};
use std::fmt;
use std::str::FromStr;

/// 分块宽度 `k`：每个颜色通道中用来承载数据的低位比特数。
///
/// 只能是 8 的正因数 (1、2、4、8)，构造时即完成校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkWidth(u8);

impl ChunkWidth {
    /// 校验并构造分块宽度。
    ///
    /// # Errors
    ///
    /// `k` 不是 1、2、4、8 之一时返回 [`StegoError::InvalidChunkWidth`]。
    pub fn new(k: u8) -> Result<Self> {
        match k {
            1 | 2 | 4 | 8 => Ok(Self(k)),
            _ => Err(StegoError::InvalidChunkWidth(k)),
        }
    }

    /// 所有合法宽度，从小到大。
    pub fn all() -> [Self; 4] {
        [Self(1), Self(2), Self(4), Self(8)]
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// 一个字节会被拆成多少个块。
    pub fn chunks_per_byte(self) -> usize {
        usize::from(8 / self.0)
    }

    /// 低 `k` 位全为 1 的掩码，例如 `k = 4` 时为 `0b0000_1111`。
    pub fn low_mask(self) -> u8 {
        ((1u16 << self.0) - 1) as u8
    }

    /// 保留高 `8 - k` 位、清空低 `k` 位的掩码，即 `256 - 2^k`。
    pub fn clear_mask(self) -> u8 {
        !self.low_mask()
    }
}

impl Default for ChunkWidth {
    fn default() -> Self {
        Self(DEFAULT_CHUNK_WIDTH)
    }
}

impl TryFrom<u8> for ChunkWidth {
    type Error = StegoError;

    fn try_from(k: u8) -> Result<Self> {
        Self::new(k)
    }
}

impl FromStr for ChunkWidth {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        // 非数字或超出 u8 的输入同样视为非法宽度
        let k = s.trim().parse::<u8>().unwrap_or(0);
        Self::new(k)
    }
}

impl fmt::Display for ChunkWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 分块器产出的一个比特块。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// 块的值，满足 `0 <= value < 2^k`。
    pub value: u8,
    /// 该块来源字节在输入中的下标。
    pub byte_index: usize,
}

/// 惰性地把字节序列拆成宽度为 `k` 的比特块。
///
/// 作为 [`Iterator`] 使用：耗尽时返回 `None`，因此值为 0 的块与"没有更多块"
/// 可以被区分开。
#[derive(Debug, Clone)]
pub struct BitChunkSplitter<'a> {
    bytes: &'a [u8],
    width: ChunkWidth,
    byte_index: usize,
    bit_offset: u8,
}

impl<'a> BitChunkSplitter<'a> {
    pub fn new(bytes: &'a [u8], width: ChunkWidth) -> Self {
        Self {
            bytes,
            width,
            byte_index: 0,
            bit_offset: 0,
        }
    }

    /// 总块数，即 `len(bytes) * (8 / k)`。
    pub fn total_chunks(&self) -> usize {
        self.bytes.len() * self.width.chunks_per_byte()
    }

    /// 已经开始拆分的字节数 (包括正在拆分的那个字节)。
    pub fn consumed_bytes(&self) -> usize {
        if self.bit_offset == 0 {
            self.byte_index
        } else {
            self.byte_index + 1
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.bytes.len()
    }
}

impl Iterator for BitChunkSplitter<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let byte = *self.bytes.get(self.byte_index)?;
        let k = self.width.bits();
        let value = (byte >> (8 - self.bit_offset - k)) & self.width.low_mask();
        let chunk = Chunk {
            value,
            byte_index: self.byte_index,
        };

        self.bit_offset += k;
        if self.bit_offset == 8 {
            self.bit_offset = 0;
            self.byte_index += 1;
        }

        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let done = self.byte_index * self.width.chunks_per_byte()
            + usize::from(self.bit_offset / self.width.bits());
        let left = self.total_chunks() - done;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BitChunkSplitter<'_> {}

/// 逐块接收宽度为 `k` 的比特块，每凑满 `8 / k` 块就完成一个字节。
#[derive(Debug, Clone)]
pub struct BitChunkJoiner {
    width: ChunkWidth,
    bytes: Vec<u8>,
    current: u8,
    bit_offset: u8,
}

impl BitChunkJoiner {
    pub fn new(width: ChunkWidth) -> Self {
        Self::with_capacity(width, 0)
    }

    /// 预先为 `capacity` 个完成字节分配空间。
    ///
    /// 调用者必须保证 `capacity` 有合理的上界 (例如不超过载体的剩余容量)。
    pub fn with_capacity(width: ChunkWidth, capacity: usize) -> Self {
        Self {
            width,
            bytes: Vec::with_capacity(capacity),
            current: 0,
            bit_offset: 0,
        }
    }

    /// 推入一个块。只使用 `chunk` 的低 `k` 位。
    ///
    /// 当这个块恰好补全一个字节时返回该字节。
    pub fn push(&mut self, chunk: u8) -> Option<u8> {
        let k = self.width.bits();
        let value = chunk & self.width.low_mask();
        self.current |= value << (8 - self.bit_offset - k);
        self.bit_offset += k;

        if self.bit_offset < 8 {
            return None;
        }

        let byte = std::mem::take(&mut self.current);
        self.bit_offset = 0;
        self.bytes.push(byte);
        Some(byte)
    }

    /// 已完成的字节数。
    pub fn completed(&self) -> usize {
        self.bytes.len()
    }

    /// 是否正有一个未完成的字节。
    pub fn has_partial(&self) -> bool {
        self.bit_offset != 0
    }

    /// 返回目前已完成的字节；未完成的半个字节会被丢弃。
    pub fn finalize(self) -> Vec<u8> {
        self.bytes
    }
}
