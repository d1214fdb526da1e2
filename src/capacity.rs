//! # 容量模块
//!
//! 根据图像尺寸和分块宽度预估可隐藏的字节数。编码器本身并不依赖这里的结果，
//! 它在遍历过程中动态发现载体耗尽；这里的计算用于在编码前提前判断。

use crate::bits::ChunkWidth;
use crate::constants::{CHANNELS_PER_PIXEL, HEADER_SIZE};

/// 载体最多能容纳的字节数 (包括长度头)：`floor(width * height * 3 / (8 / k))`。
pub fn capacity(width: u32, height: u32, chunk_width: ChunkWidth) -> u64 {
    let channels = u64::from(width) * u64::from(height) * CHANNELS_PER_PIXEL as u64;
    channels / chunk_width.chunks_per_byte() as u64
}

/// 扣除 4 字节长度头之后，负载本身的最大长度。
pub fn max_payload_len(width: u32, height: u32, chunk_width: ChunkWidth) -> u64 {
    capacity(width, height, chunk_width).saturating_sub(HEADER_SIZE as u64)
}

/// 以便于阅读的单位格式化字节数。
pub fn format_capacity(bytes: u64) -> String {
    if bytes > 1_000_000 {
        format!("{:.3} MB", bytes as f64 / 1_000_000.0)
    } else if bytes > 1_000 {
        format!("{:.3} kB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes} bytes")
    }
}
