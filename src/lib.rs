//! # lsb_pack 库
//!
//! 本库包含分块 LSB 隐写工具的核心逻辑：把任意字节负载 (前置 4 字节长度头)
//! 拆成宽度为 `k` 的比特块，写入图像颜色通道的低位，并能原样恢复。

// 声明库包含的所有模块。

pub mod bits;
pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod progress;
pub mod steganography;

pub use bits::{BitChunkJoiner, BitChunkSplitter, Chunk, ChunkWidth};
pub use carrier::{ChannelCarrier, Position, RasterCursor};
pub use error::{Result, StegoError};
pub use steganography::{decode, encode};
